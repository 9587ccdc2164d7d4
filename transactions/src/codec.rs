//! Wire format: `uint(tag) ++ list(body fields)`.
//!
//! Decoding is strict: every item must be in canonical form and nothing may
//! follow the body, so any accepted input re-encodes to itself.

use crate::error::{DecodeError, EncodeError};
use crate::rlp::{self, Rlp};
use crate::{Transaction, TxBody, TxType};

/// Encode a single variant with its type tag.
pub fn encode_body<T: TxBody>(body: &T) -> Result<Vec<u8>, EncodeError> {
    let mut out = Vec::new();
    rlp::append_u64(&mut out, u64::from(T::TX_TYPE.tag()));
    body.rlp_append(&mut out)?;
    Ok(out)
}

pub fn encode(tx: &Transaction) -> Result<Vec<u8>, EncodeError> {
    let result = match tx {
        Transaction::Issuance(body) => encode_body(body),
        Transaction::Slash(body) => encode_body(body),
        Transaction::Transfer(body) => encode_body(body),
        Transaction::ReserveFund(body) => encode_body(body),
        Transaction::ReleaseFund(body) => encode_body(body),
        Transaction::ServicePayment(body) => encode_body(body),
        Transaction::SplitRule(body) => encode_body(body),
        Transaction::SmartContract(body) => encode_body(body),
        Transaction::StakeDeposit(body) => encode_body(body),
    };
    if let Err(e) = &result {
        tracing::debug!(tx_type = ?tx.tx_type(), error = %e, "transaction encode failed");
    }
    result
}

pub fn decode(bytes: &[u8]) -> Result<Transaction, DecodeError> {
    let result = decode_tagged(bytes);
    if let Err(e) = &result {
        tracing::debug!(len = bytes.len(), error = %e, "transaction decode failed");
    }
    result
}

fn decode_tagged(bytes: &[u8]) -> Result<Transaction, DecodeError> {
    let mut rlp = Rlp::new(bytes);
    let tag = rlp.u64()?;
    let tx_type = TxType::from_tag(tag).ok_or(DecodeError::UnknownTxType(tag))?;
    let tx = match tx_type {
        TxType::Issuance => Transaction::Issuance(rlp.decode()?),
        TxType::Slash => Transaction::Slash(rlp.decode()?),
        TxType::Transfer => Transaction::Transfer(rlp.decode()?),
        TxType::ReserveFund => Transaction::ReserveFund(rlp.decode()?),
        TxType::ReleaseFund => Transaction::ReleaseFund(rlp.decode()?),
        TxType::ServicePayment => Transaction::ServicePayment(rlp.decode()?),
        TxType::SplitRule => Transaction::SplitRule(rlp.decode()?),
        TxType::SmartContract => Transaction::SmartContract(rlp.decode()?),
        TxType::StakeDeposit => Transaction::StakeDeposit(rlp.decode()?),
    };
    rlp.finish()?;
    Ok(tx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endorsement::{Endorsement, Payout};
    use crate::transfer::TransferTx;
    use meridian_types::{Address, Amount};

    fn transfer() -> Transaction {
        TransferTx::new(
            Amount::primary(1),
            vec![Endorsement::new(Address::from_label("a"), Amount::primary(2), 3)],
            vec![Payout::new(Address::from_label("b"), Amount::primary(1))],
        )
        .into()
    }

    #[test]
    fn unknown_tag() {
        let mut bytes = encode(&transfer()).unwrap();
        bytes[0] = 0x09;
        assert_eq!(decode(&bytes), Err(DecodeError::UnknownTxType(9)));
        bytes[0] = 0x7F;
        assert_eq!(decode(&bytes), Err(DecodeError::UnknownTxType(127)));
    }

    #[test]
    fn trailing_bytes() {
        let mut bytes = encode(&transfer()).unwrap();
        bytes.push(0x00);
        assert_eq!(decode(&bytes), Err(DecodeError::TrailingBytes));
    }

    #[test]
    fn truncated() {
        let bytes = encode(&transfer()).unwrap();
        for len in 0..bytes.len() {
            assert!(decode(&bytes[..len]).is_err(), "prefix of {len} bytes decoded");
        }
    }

    #[test]
    fn tag_zero_is_empty_string() {
        let bytes = encode(&Transaction::Issuance(Default::default())).unwrap();
        assert_eq!(bytes[0], 0x80);
        assert_eq!(decode(&bytes).unwrap().tx_type(), TxType::Issuance);
    }

    #[test]
    fn body_of_wrong_variant_rejected() {
        // A transfer body under the slash tag has the wrong arity.
        let mut bytes = encode(&transfer()).unwrap();
        bytes[0] = 0x01;
        assert!(decode(&bytes).is_err());
    }
}
