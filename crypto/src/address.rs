//! Account address derivation and checksummed display.
//!
//! Address = last 20 bytes of `keccak256(public_key)`.
//! Checksummed display follows EIP-55: a hex letter is uppercased when the
//! matching nibble of `keccak256(lowercase_hex)` is >= 8.

use meridian_types::{Address, PublicKey, TypesError};

use crate::hash::keccak256;

/// Derive the account address of a public key.
pub fn derive_address(public_key: &PublicKey) -> Address {
    let digest = keccak256(public_key.as_bytes());
    let mut bytes = [0u8; 20];
    bytes.copy_from_slice(&digest[12..]);
    Address::new(bytes)
}

/// Render an address as EIP-55 mixed-case hex with a `0x` prefix.
pub fn to_checksum_address(address: &Address) -> String {
    let lower = hex::encode(address.as_bytes());
    let digest = keccak256(lower.as_bytes());
    let mut out = String::with_capacity(42);
    out.push_str("0x");
    for (i, c) in lower.chars().enumerate() {
        let nibble = (digest[i / 2] >> (if i % 2 == 0 { 4 } else { 0 })) & 0x0F;
        if c.is_ascii_alphabetic() && nibble >= 8 {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Parse an address and, when it is written in mixed case, require a valid
/// EIP-55 checksum. All-lowercase or all-uppercase input is accepted as-is.
pub fn parse_checksum_address(s: &str) -> Result<Address, TypesError> {
    let address: Address = s.parse()?;
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    let has_lower = digits.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = digits.chars().any(|c| c.is_ascii_uppercase());
    if has_lower && has_upper && to_checksum_address(&address)[2..] != *digits {
        return Err(TypesError::InvalidAddress(format!("bad checksum: {s}")));
    }
    Ok(address)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::{generate_keypair, keypair_from_seed};

    #[test]
    fn derive_is_deterministic() {
        let kp = keypair_from_seed(&[7u8; 32]);
        assert_eq!(derive_address(&kp.public), derive_address(&kp.public));
    }

    #[test]
    fn different_keys_different_addresses() {
        let k1 = generate_keypair();
        let k2 = generate_keypair();
        assert_ne!(derive_address(&k1.public), derive_address(&k2.public));
    }

    #[test]
    fn eip55_reference_vectors() {
        for expected in [
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
            "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359",
            "0xdbF03B407c01E7cD3CBea99509d93f8DDDC8C6FB",
            "0xD1220A0cf47c7B9Be7A2E6BA89F429762e7b9aDb",
        ] {
            let addr: Address = expected.parse().unwrap();
            assert_eq!(to_checksum_address(&addr), expected);
        }
    }

    #[test]
    fn checksum_parse_rejects_bad_case() {
        assert!(parse_checksum_address("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed").is_ok());
        assert!(parse_checksum_address("0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed").is_ok());
        assert!(parse_checksum_address("0x5AAeb6053F3E94C9b9A09f33669435E7Ef1BeAed").is_err());
    }

    #[test]
    fn checksum_parse_accepts_upper_prefix() {
        let lower = parse_checksum_address("0X5aaeb6053f3e94c9b9a09f33669435e7ef1beaed").unwrap();
        let mixed = parse_checksum_address("0X5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed").unwrap();
        assert_eq!(lower, mixed);
        assert!(parse_checksum_address("0X5AAeb6053F3E94C9b9A09f33669435E7Ef1BeAed").is_err());
    }
}
