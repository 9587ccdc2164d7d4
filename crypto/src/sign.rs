//! Ed25519 signing over Keccak-256 digests.
//!
//! Sign-bytes pre-images are hashed first and the 32-byte digest is what
//! gets signed, so signatures are independent of pre-image length.

use ed25519_dalek::{Signer, SigningKey, Verifier, VerifyingKey};
use meridian_types::{PrivateKey, PublicKey, Signature};

use crate::hash::keccak256;

/// Length of an Ed25519 signature in bytes.
pub const SIGNATURE_LEN: usize = 64;

/// Sign `keccak256(message)` with a private key.
pub fn sign_message(message: &[u8], private_key: &PrivateKey) -> Signature {
    let signing_key = SigningKey::from_bytes(&private_key.0);
    let sig = signing_key.sign(&keccak256(message));
    Signature::from(sig.to_bytes())
}

/// Verify a signature produced by [`sign_message`].
///
/// Returns `false` for empty or wrongly sized signatures and invalid keys.
pub fn verify_signature(message: &[u8], signature: &Signature, public_key: &PublicKey) -> bool {
    let Ok(verifying_key) = VerifyingKey::from_bytes(&public_key.0) else {
        return false;
    };
    let Ok(bytes) = <[u8; SIGNATURE_LEN]>::try_from(signature.as_bytes()) else {
        return false;
    };
    let dalek_sig = ed25519_dalek::Signature::from_bytes(&bytes);
    verifying_key
        .verify(&keccak256(message), &dalek_sig)
        .is_ok()
}
