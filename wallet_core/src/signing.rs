//! Compute sign bytes for a role, obtain a signature, attach it.

use meridian_transactions::Transaction;
use meridian_types::{Address, Signature};
use serde::{Deserialize, Serialize};

use crate::error::WalletError;
use crate::signer::TxSigner;

/// Which pre-image a signer signs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SigningRole {
    /// Any endorsement signed over the generic sign bytes.
    Endorser,
    /// Source of a service payment: the payment voucher view.
    ServiceSource,
    /// Target of a service payment: the full view including the source signature.
    ServiceTarget,
}

/// Result of one signing attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SignOutcome {
    /// Address the signer reported.
    pub address: Address,
    /// Whether a matching endorsement received the signature.
    pub attached: bool,
}

/// The pre-image `role` signs on `tx`.
pub fn sign_bytes_for_role(
    tx: &Transaction,
    chain_id: &str,
    role: SigningRole,
) -> Result<Vec<u8>, WalletError> {
    match (role, tx) {
        (SigningRole::ServiceSource, Transaction::ServicePayment(p)) => {
            Ok(p.source_sign_bytes(chain_id)?)
        }
        (SigningRole::ServiceTarget, Transaction::ServicePayment(p)) => {
            Ok(p.target_sign_bytes(chain_id)?)
        }
        (SigningRole::Endorser, tx) if !matches!(tx, Transaction::ServicePayment(_)) => {
            Ok(tx.sign_bytes(chain_id)?)
        }
        (role, tx) => Err(WalletError::RoleMismatch {
            role,
            tx_type: tx.tx_type(),
        }),
    }
}

fn attach(tx: &mut Transaction, role: SigningRole, address: &Address, signature: Signature) -> bool {
    match (role, tx) {
        (SigningRole::ServiceSource, Transaction::ServicePayment(p)) if p.source.address == *address => {
            p.source.signature = signature;
            true
        }
        (SigningRole::ServiceTarget, Transaction::ServicePayment(p)) if p.target.address == *address => {
            p.target.signature = signature;
            true
        }
        (SigningRole::Endorser, tx) => tx.set_signature(address, signature),
        _ => false,
    }
}

/// Sign `tx` in place as `role`.
///
/// A signer that reports an address owning no endorsement for the role
/// leaves the transaction untouched; the outcome says so.
pub fn sign_transaction(
    tx: &mut Transaction,
    chain_id: &str,
    role: SigningRole,
    signer: &dyn TxSigner,
) -> Result<SignOutcome, WalletError> {
    let sign_bytes = sign_bytes_for_role(tx, chain_id, role)?;
    let (address, signature) = signer.sign(&sign_bytes)?;
    let attached = attach(tx, role, &address, signature);
    if attached {
        tracing::debug!(tx_type = ?tx.tx_type(), ?role, signer = %address, "signature attached");
    } else {
        tracing::warn!(
            tx_type = ?tx.tx_type(),
            ?role,
            signer = %address,
            "signer owns no endorsement for this role, signature discarded"
        );
    }
    Ok(SignOutcome { address, attached })
}

/// Sign with `primary`, falling back to `fallback` when the primary signer
/// fails recoverably (timeout, disconnect, no device).
pub fn sign_with_fallback(
    tx: &mut Transaction,
    chain_id: &str,
    role: SigningRole,
    primary: &dyn TxSigner,
    fallback: &dyn TxSigner,
) -> Result<SignOutcome, WalletError> {
    match sign_transaction(tx, chain_id, role, primary) {
        Err(WalletError::Signer(e)) if e.is_recoverable() => {
            tracing::warn!(error = %e, ?role, "primary signer unavailable, using fallback");
            sign_transaction(tx, chain_id, role, fallback)
        }
        other => other,
    }
}

/// Sign with each signer in turn as an endorser. Stops at the first error.
pub fn sign_all(
    tx: &mut Transaction,
    chain_id: &str,
    signers: &[&dyn TxSigner],
) -> Result<Vec<SignOutcome>, WalletError> {
    let mut outcomes = Vec::with_capacity(signers.len());
    for signer in signers {
        outcomes.push(sign_transaction(tx, chain_id, SigningRole::Endorser, *signer)?);
    }
    Ok(outcomes)
}
