//! Wallet core library for Meridian.
//!
//! Provides what a wallet needs to sign transactions:
//! - The [`TxSigner`] capability with software and hardware implementations
//! - The hardware driver contract, bounded by a timeout
//! - Role-aware signing (endorsers, service payment source and target)
//! - Password-encrypted keystores
//! - TOML configuration

pub mod config;
pub mod derivation;
pub mod error;
pub mod hardware;
pub mod keystore;
pub mod signer;
pub mod signing;

pub use config::{HardwareConfig, WalletConfig};
pub use derivation::{DerivationPath, HARDENED};
pub use error::{SignerError, WalletError};
pub use hardware::{HardwareDriver, HardwareSigner, Transport};
pub use keystore::{
    decrypt_keystore, encrypt_keystore, encrypt_signer, load_keystore, save_keystore,
    KeystoreFile,
};
pub use signer::{LocalSigner, TxSigner};
pub use signing::{
    sign_all, sign_bytes_for_role, sign_transaction, sign_with_fallback, SignOutcome,
    SigningRole,
};
