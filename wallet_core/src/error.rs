use meridian_transactions::{EncodeError, TxType};
use thiserror::Error;

use crate::signing::SigningRole;

/// Failure reported by a signer or hardware driver.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignerError {
    #[error("signer did not respond within {timeout_ms} ms")]
    Timeout { timeout_ms: u64 },

    #[error("signing request rejected on device")]
    Rejected,

    #[error("device disconnected")]
    Disconnected,

    #[error("no hardware device found")]
    DeviceNotFound,

    #[error("device still busy with a call that timed out")]
    Busy,

    #[error("driver error: {0}")]
    Driver(String),
}

impl SignerError {
    /// Whether another signer may be tried. A user rejection is final.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Timeout { .. } | Self::Disconnected | Self::DeviceNotFound | Self::Busy
        )
    }
}

#[derive(Debug, Error)]
pub enum WalletError {
    #[error(transparent)]
    Signer(#[from] SignerError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error("role {role:?} does not apply to {tx_type:?} transactions")]
    RoleMismatch { role: SigningRole, tx_type: TxType },

    #[error("key error: {0}")]
    Key(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}
