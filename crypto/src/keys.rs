//! Ed25519 key generation.

use ed25519_dalek::SigningKey;
use meridian_types::{KeyPair, PrivateKey, PublicKey};
use rand::rngs::OsRng;

use crate::hash::keccak256;

/// Generate a new Ed25519 key pair from a secure random source.
pub fn generate_keypair() -> KeyPair {
    let signing_key = SigningKey::generate(&mut OsRng);
    let verifying_key = signing_key.verifying_key();
    KeyPair {
        public: PublicKey(verifying_key.to_bytes()),
        private: PrivateKey(signing_key.to_bytes()),
    }
}

/// Derive the public key from a private key.
pub fn public_from_private(private: &PrivateKey) -> PublicKey {
    let signing_key = SigningKey::from_bytes(&private.0);
    PublicKey(signing_key.verifying_key().to_bytes())
}

/// Reconstruct a full key pair from a private key.
pub fn keypair_from_private(private: PrivateKey) -> KeyPair {
    let public = public_from_private(&private);
    KeyPair { public, private }
}

/// Derive a key pair from a 32-byte seed (deterministic).
pub fn keypair_from_seed(seed: &[u8; 32]) -> KeyPair {
    keypair_from_private(PrivateKey(*seed))
}

/// Derive a key pair from a human-readable secret.
///
/// The seed is `keccak256(secret)`. Only suitable for test accounts and
/// local development networks.
pub fn keypair_from_secret(secret: &str) -> KeyPair {
    keypair_from_seed(&keccak256(secret.as_bytes()))
}
