//! Serde adapters for the JSON form used by human-facing tooling.
//!
//! Wide values must survive a JSON round trip exactly, so big integers are
//! written as decimal strings and never pass through `f64`.

/// Arbitrary-precision integers as decimal strings.
///
/// Deserialization also accepts JSON integer literals of any width. With
/// serde_json's `arbitrary_precision` feature a literal outside the 64-bit
/// range arrives as its original digits; fractional and exponent literals
/// are rejected instead of being rounded.
pub mod decimal {
    use num_bigint::BigInt;
    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};
    use std::fmt;
    use std::str::FromStr;

    pub fn serialize<S: Serializer>(value: &BigInt, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_str_radix(10))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigInt, D::Error> {
        deserializer.deserialize_any(DecimalVisitor)
    }

    /// Map key serde_json uses to hand over a number token it did not
    /// convert to a native type.
    const NUMBER_TOKEN: &str = "$serde_json::private::Number";

    struct DecimalVisitor;

    impl DecimalVisitor {
        fn parse<E: de::Error>(&self, digits: &str) -> Result<BigInt, E> {
            let unsigned = digits.strip_prefix('-').unwrap_or(digits);
            if unsigned.is_empty() || !unsigned.bytes().all(|b| b.is_ascii_digit()) {
                return Err(E::invalid_value(de::Unexpected::Str(digits), self));
            }
            BigInt::from_str(digits).map_err(|_| E::invalid_value(de::Unexpected::Str(digits), self))
        }
    }

    impl<'de> Visitor<'de> for DecimalVisitor {
        type Value = BigInt;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            write!(f, "a decimal integer string or a JSON integer")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<BigInt, E> {
            self.parse(v.trim())
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<BigInt, E> {
            Ok(BigInt::from(v))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<BigInt, E> {
            Ok(BigInt::from(v))
        }

        fn visit_u128<E: de::Error>(self, v: u128) -> Result<BigInt, E> {
            Ok(BigInt::from(v))
        }

        fn visit_i128<E: de::Error>(self, v: i128) -> Result<BigInt, E> {
            Ok(BigInt::from(v))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<BigInt, E> {
            Err(E::invalid_type(de::Unexpected::Float(v), &self))
        }

        fn visit_map<A: de::MapAccess<'de>>(self, mut map: A) -> Result<BigInt, A::Error> {
            match map.next_key::<String>()? {
                Some(key) if key == NUMBER_TOKEN => {
                    let digits: String = map.next_value()?;
                    self.parse(&digits)
                }
                _ => Err(de::Error::invalid_type(de::Unexpected::Map, &self)),
            }
        }
    }
}

/// Opaque byte fields as `0x`-prefixed lowercase hex.
pub mod hex_bytes {
    use serde::de::{self, Deserialize};
    use serde::{Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("0x{}", hex::encode(value)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        let digits = s.strip_prefix("0x").unwrap_or(&s);
        hex::decode(digits).map_err(de::Error::custom)
    }
}
