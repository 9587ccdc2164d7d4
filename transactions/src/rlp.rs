//! Canonical recursive length-prefix encoding.
//!
//! An item is either a byte string or a list of items:
//!
//! - a single byte below `0x80` is its own encoding
//! - a string of up to 55 bytes is `0x80 + len` followed by the bytes
//! - a longer string is `0xB7 + len_of_len`, the big-endian length, the bytes
//! - lists use the same scheme with base `0xC0` / `0xF7` over the
//!   concatenated encodings of their elements
//!
//! Unsigned integers are minimal big-endian strings; zero is the empty string.
//! The decoder only accepts the canonical form of every item.

use meridian_types::{Address, Amount, BigInt, Signature, ADDRESS_LEN};
use num_bigint::Sign;
use num_traits::{Signed, Zero};

use crate::error::{DecodeError, EncodeError};

const STRING_OFFSET: u8 = 0x80;
const LIST_OFFSET: u8 = 0xC0;
const MAX_SHORT_LEN: usize = 55;

/// Types with a canonical item encoding.
pub trait RlpEncode {
    fn rlp_append(&self, out: &mut Vec<u8>) -> Result<(), EncodeError>;

    fn rlp_bytes(&self) -> Result<Vec<u8>, EncodeError> {
        let mut out = Vec::new();
        self.rlp_append(&mut out)?;
        Ok(out)
    }
}

/// Types that can be read back from a canonical item encoding.
pub trait RlpDecode: Sized {
    fn rlp_decode(rlp: &mut Rlp<'_>) -> Result<Self, DecodeError>;
}

// ── Encoding ────────────────────────────────────────────────────────────

fn append_header(out: &mut Vec<u8>, offset: u8, len: usize) {
    if len <= MAX_SHORT_LEN {
        out.push(offset + len as u8);
    } else {
        let be = (len as u64).to_be_bytes();
        let skip = (len as u64).leading_zeros() as usize / 8;
        let len_bytes = &be[skip..];
        out.push(offset + MAX_SHORT_LEN as u8 + len_bytes.len() as u8);
        out.extend_from_slice(len_bytes);
    }
}

pub fn append_bytes(out: &mut Vec<u8>, bytes: &[u8]) {
    if let [b] = bytes {
        if *b < STRING_OFFSET {
            out.push(*b);
            return;
        }
    }
    append_header(out, STRING_OFFSET, bytes.len());
    out.extend_from_slice(bytes);
}

pub fn append_str(out: &mut Vec<u8>, s: &str) {
    append_bytes(out, s.as_bytes());
}

pub fn append_u64(out: &mut Vec<u8>, value: u64) {
    let be = value.to_be_bytes();
    let skip = value.leading_zeros() as usize / 8;
    append_bytes(out, &be[skip..]);
}

pub fn append_bigint(out: &mut Vec<u8>, value: &BigInt) -> Result<(), EncodeError> {
    if value.is_negative() {
        return Err(EncodeError::NegativeInteger(value.to_string()));
    }
    if value.is_zero() {
        append_bytes(out, &[]);
    } else {
        let (_, magnitude) = value.to_bytes_be();
        append_bytes(out, &magnitude);
    }
    Ok(())
}

/// Append a list whose elements are written by `f`.
pub fn append_list(out: &mut Vec<u8>, f: impl FnOnce(&mut Vec<u8>)) {
    let mut payload = Vec::new();
    f(&mut payload);
    append_header(out, LIST_OFFSET, payload.len());
    out.extend_from_slice(&payload);
}

/// Fallible form of [`append_list`].
pub fn try_append_list(
    out: &mut Vec<u8>,
    f: impl FnOnce(&mut Vec<u8>) -> Result<(), EncodeError>,
) -> Result<(), EncodeError> {
    let mut payload = Vec::new();
    f(&mut payload)?;
    append_header(out, LIST_OFFSET, payload.len());
    out.extend_from_slice(&payload);
    Ok(())
}

/// Append a homogeneous list.
pub fn append_seq<T: RlpEncode>(out: &mut Vec<u8>, items: &[T]) -> Result<(), EncodeError> {
    try_append_list(out, |payload| {
        for item in items {
            item.rlp_append(payload)?;
        }
        Ok(())
    })
}

// ── Decoding ────────────────────────────────────────────────────────────

enum Item<'a> {
    Bytes(&'a [u8]),
    List(&'a [u8]),
}

/// Cursor over a sequence of items.
///
/// The top-level cursor reports missing input as [`DecodeError::UnexpectedEof`]
/// and leftover input as [`DecodeError::TrailingBytes`]; a cursor over list
/// contents reports [`DecodeError::TooFewElements`] and
/// [`DecodeError::TooManyElements`] instead.
#[derive(Debug, Clone)]
pub struct Rlp<'a> {
    data: &'a [u8],
    in_list: bool,
}

impl<'a> Rlp<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            in_list: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Require that every item has been consumed.
    pub fn finish(self) -> Result<(), DecodeError> {
        match (self.data.is_empty(), self.in_list) {
            (true, _) => Ok(()),
            (false, true) => Err(DecodeError::TooManyElements),
            (false, false) => Err(DecodeError::TrailingBytes),
        }
    }

    fn slice(&self, start: usize, len: usize) -> Result<&'a [u8], DecodeError> {
        let data: &'a [u8] = self.data;
        let end = start.checked_add(len).ok_or(DecodeError::LengthOverflow)?;
        data.get(start..end).ok_or(DecodeError::UnexpectedEof)
    }

    /// Read a long-form length of `len_of_len` bytes following the prefix byte.
    fn long_len(&self, len_of_len: u8) -> Result<usize, DecodeError> {
        let len_bytes = self.slice(1, len_of_len as usize)?;
        if len_bytes.first() == Some(&0) {
            return Err(DecodeError::NonCanonicalSize);
        }
        let len = len_bytes
            .iter()
            .fold(0u64, |acc, b| (acc << 8) | u64::from(*b));
        let len = usize::try_from(len).map_err(|_| DecodeError::LengthOverflow)?;
        if len <= MAX_SHORT_LEN {
            return Err(DecodeError::NonCanonicalSize);
        }
        Ok(len)
    }

    fn next_item(&mut self) -> Result<Item<'a>, DecodeError> {
        let Some(&prefix) = self.data.first() else {
            return Err(if self.in_list {
                DecodeError::TooFewElements
            } else {
                DecodeError::UnexpectedEof
            });
        };
        let (item, consumed) = match prefix {
            0x00..=0x7F => (Item::Bytes(self.slice(0, 1)?), 1),
            0x80..=0xB7 => {
                let len = (prefix - STRING_OFFSET) as usize;
                let payload = self.slice(1, len)?;
                if len == 1 && payload[0] < STRING_OFFSET {
                    return Err(DecodeError::NonCanonicalSize);
                }
                (Item::Bytes(payload), 1 + len)
            }
            0xB8..=0xBF => {
                let len_of_len = prefix - STRING_OFFSET - MAX_SHORT_LEN as u8;
                let len = self.long_len(len_of_len)?;
                let header = 1 + len_of_len as usize;
                (Item::Bytes(self.slice(header, len)?), header + len)
            }
            0xC0..=0xF7 => {
                let len = (prefix - LIST_OFFSET) as usize;
                (Item::List(self.slice(1, len)?), 1 + len)
            }
            0xF8..=0xFF => {
                let len_of_len = prefix - LIST_OFFSET - MAX_SHORT_LEN as u8;
                let len = self.long_len(len_of_len)?;
                let header = 1 + len_of_len as usize;
                (Item::List(self.slice(header, len)?), header + len)
            }
        };
        self.data = &self.data[consumed..];
        Ok(item)
    }

    /// Read a byte string.
    pub fn bytes(&mut self) -> Result<&'a [u8], DecodeError> {
        match self.next_item()? {
            Item::Bytes(bytes) => Ok(bytes),
            Item::List(_) => Err(DecodeError::ExpectedString),
        }
    }

    /// Enter a list, returning a cursor over its elements.
    pub fn list(&mut self) -> Result<Rlp<'a>, DecodeError> {
        match self.next_item()? {
            Item::List(payload) => Ok(Rlp {
                data: payload,
                in_list: true,
            }),
            Item::Bytes(_) => Err(DecodeError::ExpectedList),
        }
    }

    pub fn u64(&mut self) -> Result<u64, DecodeError> {
        let bytes = self.bytes()?;
        if bytes.first() == Some(&0) {
            return Err(DecodeError::NonCanonicalInteger);
        }
        if bytes.len() > 8 {
            return Err(DecodeError::IntegerOverflow);
        }
        Ok(bytes.iter().fold(0u64, |acc, b| (acc << 8) | u64::from(*b)))
    }

    pub fn u32(&mut self) -> Result<u32, DecodeError> {
        u32::try_from(self.u64()?).map_err(|_| DecodeError::IntegerOverflow)
    }

    pub fn bigint(&mut self) -> Result<BigInt, DecodeError> {
        let bytes = self.bytes()?;
        if bytes.first() == Some(&0) {
            return Err(DecodeError::NonCanonicalInteger);
        }
        Ok(BigInt::from_bytes_be(Sign::Plus, bytes))
    }

    pub fn string(&mut self) -> Result<String, DecodeError> {
        String::from_utf8(self.bytes()?.to_vec()).map_err(|_| DecodeError::InvalidUtf8)
    }

    pub fn decode<T: RlpDecode>(&mut self) -> Result<T, DecodeError> {
        T::rlp_decode(self)
    }

    /// Read a homogeneous list.
    pub fn seq<T: RlpDecode>(&mut self) -> Result<Vec<T>, DecodeError> {
        let mut list = self.list()?;
        let mut items = Vec::new();
        while !list.is_empty() {
            items.push(T::rlp_decode(&mut list)?);
        }
        Ok(items)
    }
}

// ── Shared field types ──────────────────────────────────────────────────

impl RlpEncode for Address {
    fn rlp_append(&self, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        append_bytes(out, self.as_bytes());
        Ok(())
    }
}

impl RlpDecode for Address {
    fn rlp_decode(rlp: &mut Rlp<'_>) -> Result<Self, DecodeError> {
        let bytes = rlp.bytes()?;
        if bytes.len() != ADDRESS_LEN {
            return Err(DecodeError::InvalidAddressLength(bytes.len()));
        }
        Address::from_slice(bytes).map_err(|_| DecodeError::InvalidAddressLength(bytes.len()))
    }
}

impl RlpEncode for Amount {
    fn rlp_append(&self, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        try_append_list(out, |p| {
            append_bigint(p, &self.primary)?;
            append_bigint(p, &self.secondary)
        })
    }
}

impl RlpDecode for Amount {
    fn rlp_decode(rlp: &mut Rlp<'_>) -> Result<Self, DecodeError> {
        let mut fields = rlp.list()?;
        let primary = fields.bigint()?;
        let secondary = fields.bigint()?;
        fields.finish()?;
        Ok(Amount { primary, secondary })
    }
}

impl RlpEncode for Signature {
    fn rlp_append(&self, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        append_bytes(out, self.as_bytes());
        Ok(())
    }
}

impl RlpDecode for Signature {
    fn rlp_decode(rlp: &mut Rlp<'_>) -> Result<Self, DecodeError> {
        Ok(Signature::from(rlp.bytes()?))
    }
}

impl RlpEncode for String {
    fn rlp_append(&self, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        append_str(out, self);
        Ok(())
    }
}

impl RlpDecode for String {
    fn rlp_decode(rlp: &mut Rlp<'_>) -> Result<Self, DecodeError> {
        rlp.string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_u64(v: u64) -> Vec<u8> {
        let mut out = Vec::new();
        append_u64(&mut out, v);
        out
    }

    fn encode_bytes(b: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        append_bytes(&mut out, b);
        out
    }

    #[test]
    fn integer_encodings() {
        assert_eq!(encode_u64(0), vec![0x80]);
        assert_eq!(encode_u64(15), vec![0x0F]);
        assert_eq!(encode_u64(0x7F), vec![0x7F]);
        assert_eq!(encode_u64(0x80), vec![0x81, 0x80]);
        assert_eq!(encode_u64(1024), vec![0x82, 0x04, 0x00]);
        assert_eq!(
            encode_u64(u64::MAX),
            vec![0x88, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF]
        );
    }

    #[test]
    fn string_encodings() {
        assert_eq!(encode_bytes(b""), vec![0x80]);
        assert_eq!(encode_bytes(b"dog"), vec![0x83, b'd', b'o', b'g']);
        let long = vec![b'a'; 56];
        let encoded = encode_bytes(&long);
        assert_eq!(&encoded[..2], &[0xB8, 56]);
        assert_eq!(encoded.len(), 58);
    }

    #[test]
    fn list_encodings() {
        let mut out = Vec::new();
        append_list(&mut out, |_| {});
        assert_eq!(out, vec![0xC0]);

        let mut out = Vec::new();
        append_list(&mut out, |p| {
            append_str(p, "cat");
            append_str(p, "dog");
        });
        assert_eq!(out, vec![0xC8, 0x83, b'c', b'a', b't', 0x83, b'd', b'o', b'g']);
    }

    #[test]
    fn bigint_zero_and_negative() {
        let mut out = Vec::new();
        append_bigint(&mut out, &BigInt::from(0)).unwrap();
        assert_eq!(out, vec![0x80]);
        assert!(matches!(
            append_bigint(&mut out, &BigInt::from(-1)),
            Err(EncodeError::NegativeInteger(_))
        ));
    }

    #[test]
    fn rejects_non_canonical_single_byte() {
        let mut rlp = Rlp::new(&[0x81, 0x05]);
        assert_eq!(rlp.bytes(), Err(DecodeError::NonCanonicalSize));
    }

    #[test]
    fn rejects_long_form_for_short_string() {
        let mut data = vec![0xB8, 3];
        data.extend_from_slice(b"abc");
        assert_eq!(Rlp::new(&data).bytes(), Err(DecodeError::NonCanonicalSize));
    }

    #[test]
    fn rejects_leading_zero_in_length() {
        let mut data = vec![0xB9, 0x00, 56];
        data.extend_from_slice(&[b'a'; 56]);
        assert_eq!(Rlp::new(&data).bytes(), Err(DecodeError::NonCanonicalSize));
    }

    #[test]
    fn rejects_leading_zero_integer() {
        assert_eq!(
            Rlp::new(&[0x82, 0x00, 0x01]).u64(),
            Err(DecodeError::NonCanonicalInteger)
        );
        assert_eq!(Rlp::new(&[0x00]).u64(), Err(DecodeError::NonCanonicalInteger));
        assert_eq!(Rlp::new(&[0x00]).bigint(), Err(DecodeError::NonCanonicalInteger));
    }

    #[test]
    fn rejects_oversized_u64() {
        let mut data = vec![0x89];
        data.extend_from_slice(&[0x01; 9]);
        assert_eq!(Rlp::new(&data).u64(), Err(DecodeError::IntegerOverflow));
    }

    #[test]
    fn truncated_input() {
        assert_eq!(Rlp::new(&[0x83, b'a']).bytes(), Err(DecodeError::UnexpectedEof));
        assert_eq!(Rlp::new(&[]).bytes(), Err(DecodeError::UnexpectedEof));
    }

    #[test]
    fn list_arity_errors() {
        let mut rlp = Rlp::new(&[0xC1, 0x01]);
        let mut list = rlp.list().unwrap();
        assert_eq!(list.u64(), Ok(1));
        assert_eq!(list.u64(), Err(DecodeError::TooFewElements));

        let mut rlp = Rlp::new(&[0xC2, 0x01, 0x02]);
        let mut list = rlp.list().unwrap();
        list.u64().unwrap();
        assert_eq!(list.finish(), Err(DecodeError::TooManyElements));
    }

    #[test]
    fn type_mismatch() {
        assert_eq!(Rlp::new(&[0xC0]).bytes(), Err(DecodeError::ExpectedString));
        assert_eq!(Rlp::new(&[0x80]).list().err(), Some(DecodeError::ExpectedList));
    }

    #[test]
    fn address_length_checked() {
        let mut out = Vec::new();
        append_bytes(&mut out, &[1u8; 19]);
        assert_eq!(
            Rlp::new(&out).decode::<Address>(),
            Err(DecodeError::InvalidAddressLength(19))
        );
    }

    #[test]
    fn amount_roundtrip() {
        let amount = Amount::new(0, 12345);
        let bytes = amount.rlp_bytes().unwrap();
        assert_eq!(bytes, vec![0xC4, 0x80, 0x82, 0x30, 0x39]);
        assert_eq!(Rlp::new(&bytes).decode::<Amount>(), Ok(amount));
    }
}
