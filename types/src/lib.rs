//! Fundamental types for the Meridian transaction layer.
//!
//! Shared by every other crate in the workspace: dual-denomination amounts,
//! account addresses, signatures, keys and transaction hashes.

pub mod address;
pub mod amount;
pub mod error;
pub mod hash;
pub mod keys;
pub mod serde_fmt;

pub use address::{Address, ADDRESS_LEN};
pub use amount::Amount;
pub use error::TypesError;
pub use hash::TxHash;
pub use keys::{KeyPair, PrivateKey, PublicKey, Signature};
pub use num_bigint::BigInt;
