//! Signature verification against recomputed sign bytes.

use meridian_crypto::{derive_address, verify_signature};
use meridian_types::PublicKey;

use crate::error::EncodeError;
use crate::Transaction;

/// Check the endorsement signed by `public_key`.
///
/// The pre-image is recomputed for the signer's role, so a service payment
/// source is checked against the source view and its target against the
/// target view. Returns `Ok(false)` when no endorsement belongs to the key
/// or its signature slot is empty.
///
/// Only Ed25519 signatures made by [`meridian_crypto::sign_message`] verify.
/// 65-byte recoverable secp256k1 signatures decode and round-trip through
/// the codec unchanged but always verify as `false`.
pub fn verify_endorsement(
    tx: &Transaction,
    chain_id: &str,
    public_key: &PublicKey,
) -> Result<bool, EncodeError> {
    let address = derive_address(public_key);
    let (signature, sign_bytes) = match tx {
        Transaction::ServicePayment(payment) if payment.source.address == address => (
            &payment.source.signature,
            payment.source_sign_bytes(chain_id)?,
        ),
        Transaction::ServicePayment(payment) if payment.target.address == address => (
            &payment.target.signature,
            payment.target_sign_bytes(chain_id)?,
        ),
        _ => {
            let Some(endorsement) = tx.endorsements().into_iter().find(|e| e.address == address)
            else {
                return Ok(false);
            };
            (&endorsement.signature, tx.sign_bytes(chain_id)?)
        }
    };
    if signature.is_empty() {
        return Ok(false);
    }
    Ok(verify_signature(&sign_bytes, signature, public_key))
}

/// Whether every endorsement carries a signature. Does not verify them.
pub fn is_fully_signed(tx: &Transaction) -> bool {
    tx.endorsements().iter().all(|e| e.is_signed())
}
