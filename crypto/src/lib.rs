//! Cryptographic primitives for Meridian.
//!
//! - **Ed25519** for signing and signature verification
//! - **Keccak-256** for sign-bytes digests, transaction hashes and addresses
//! - Address derivation and EIP-55 checksummed display

pub mod address;
pub mod hash;
pub mod keys;
pub mod sign;

pub use address::{derive_address, parse_checksum_address, to_checksum_address};
pub use hash::{hash_transaction, keccak256, keccak256_multi};
pub use keys::{
    generate_keypair, keypair_from_private, keypair_from_secret, keypair_from_seed,
    public_from_private,
};
pub use sign::{sign_message, verify_signature, SIGNATURE_LEN};
