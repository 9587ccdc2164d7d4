//! Meridian transaction variants and their canonical byte forms.
//!
//! Transaction types:
//! - **Issuance**: Block proposer mints rewards to a set of payouts
//! - **Slash**: Penalises an account that misused a reserved fund
//! - **Transfer**: Moves value from endorsing accounts to payouts
//! - **ReserveFund**: Escrows value for paying resources off-chain
//! - **ReleaseFund**: Returns an expired reserve to its source
//! - **ServicePayment**: Settles an off-chain payment against a reserve
//! - **SplitRule**: Declares how a resource's revenue is divided
//! - **SmartContract**: Calls or deploys a contract
//! - **StakeDeposit**: Locks value as stake
//!
//! Every variant has one canonical encoding ([`codec`]) and a signing
//! pre-image ([`Transaction::sign_bytes`]) that is independent of any
//! signature already attached.

pub mod codec;
pub mod endorsement;
pub mod error;
pub mod issuance;
pub mod release_fund;
pub mod reserve_fund;
pub mod rlp;
pub mod service_payment;
pub mod sign_bytes;
pub mod slash;
pub mod smart_contract;
pub mod split_rule;
pub mod stake_deposit;
pub mod transfer;
pub mod verify;

pub use endorsement::{Endorsement, Payout, Split};
pub use error::{DecodeError, EncodeError};
pub use issuance::IssuanceTx;
pub use release_fund::ReleaseFundTx;
pub use reserve_fund::ReserveFundTx;
pub use service_payment::ServicePaymentTx;
pub use slash::SlashTx;
pub use smart_contract::SmartContractTx;
pub use split_rule::SplitRuleTx;
pub use stake_deposit::StakeDepositTx;
pub use transfer::TransferTx;
pub use verify::{is_fully_signed, verify_endorsement};

use meridian_types::{Address, Signature, TxHash};
use serde::{Deserialize, Serialize};

use crate::rlp::{RlpDecode, RlpEncode};

/// Wire tag of each variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum TxType {
    Issuance = 0,
    Slash = 1,
    Transfer = 2,
    ReserveFund = 3,
    ReleaseFund = 4,
    ServicePayment = 5,
    SplitRule = 6,
    SmartContract = 7,
    StakeDeposit = 8,
}

impl TxType {
    pub const ALL: [TxType; 9] = [
        Self::Issuance,
        Self::Slash,
        Self::Transfer,
        Self::ReserveFund,
        Self::ReleaseFund,
        Self::ServicePayment,
        Self::SplitRule,
        Self::SmartContract,
        Self::StakeDeposit,
    ];

    pub const fn tag(self) -> u8 {
        self as u8
    }

    pub fn from_tag(tag: u64) -> Option<Self> {
        Self::ALL.into_iter().find(|t| u64::from(t.tag()) == tag)
    }
}

/// Behaviour shared by every variant body.
///
/// A body knows its wire tag and exposes its endorsements in wire order;
/// signature attachment and sign bytes are derived from those.
pub trait TxBody: RlpEncode + RlpDecode + Clone {
    const TX_TYPE: TxType;

    fn endorsements(&self) -> Vec<&Endorsement>;

    fn endorsements_mut(&mut self) -> Vec<&mut Endorsement>;

    /// Attach `signature` to every endorsement owned by `address`.
    ///
    /// Returns whether any endorsement matched. A non-matching address is
    /// not an error: the transaction is left untouched.
    fn set_signature(&mut self, address: &Address, signature: impl Into<Signature>) -> bool {
        let signature = signature.into();
        let mut attached = false;
        for endorsement in self.endorsements_mut() {
            if endorsement.address == *address {
                endorsement.signature = signature.clone();
                attached = true;
            }
        }
        attached
    }

    fn clear_signatures(&mut self) {
        for endorsement in self.endorsements_mut() {
            endorsement.signature.clear();
        }
    }

    /// Signing pre-image with every signature cleared. `self` is not modified.
    fn sign_bytes(&self, chain_id: &str) -> Result<Vec<u8>, EncodeError> {
        let mut unsigned = self.clone();
        unsigned.clear_signatures();
        sign_bytes::sign_bytes_for(chain_id, &unsigned)
    }

    fn to_bytes(&self) -> Result<Vec<u8>, EncodeError> {
        codec::encode_body(self)
    }
}

/// The closed set of transaction variants.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transaction {
    Issuance(IssuanceTx),
    Slash(SlashTx),
    Transfer(TransferTx),
    ReserveFund(ReserveFundTx),
    ReleaseFund(ReleaseFundTx),
    ServicePayment(ServicePaymentTx),
    SplitRule(SplitRuleTx),
    SmartContract(SmartContractTx),
    StakeDeposit(StakeDepositTx),
}

impl Transaction {
    pub fn tx_type(&self) -> TxType {
        match self {
            Self::Issuance(_) => TxType::Issuance,
            Self::Slash(_) => TxType::Slash,
            Self::Transfer(_) => TxType::Transfer,
            Self::ReserveFund(_) => TxType::ReserveFund,
            Self::ReleaseFund(_) => TxType::ReleaseFund,
            Self::ServicePayment(_) => TxType::ServicePayment,
            Self::SplitRule(_) => TxType::SplitRule,
            Self::SmartContract(_) => TxType::SmartContract,
            Self::StakeDeposit(_) => TxType::StakeDeposit,
        }
    }

    /// Endorsements in wire order.
    pub fn endorsements(&self) -> Vec<&Endorsement> {
        match self {
            Self::Issuance(tx) => tx.endorsements(),
            Self::Slash(tx) => tx.endorsements(),
            Self::Transfer(tx) => tx.endorsements(),
            Self::ReserveFund(tx) => tx.endorsements(),
            Self::ReleaseFund(tx) => tx.endorsements(),
            Self::ServicePayment(tx) => tx.endorsements(),
            Self::SplitRule(tx) => tx.endorsements(),
            Self::SmartContract(tx) => tx.endorsements(),
            Self::StakeDeposit(tx) => tx.endorsements(),
        }
    }

    /// Addresses expected to sign, in wire order.
    pub fn signers(&self) -> Vec<Address> {
        self.endorsements().into_iter().map(|e| e.address).collect()
    }

    /// Attach a signature to every endorsement owned by `address`.
    ///
    /// Returns `false`, leaving the transaction unchanged, when `address`
    /// owns no endorsement.
    pub fn set_signature(&mut self, address: &Address, signature: impl Into<Signature>) -> bool {
        let attached = match self {
            Self::Issuance(tx) => tx.set_signature(address, signature),
            Self::Slash(tx) => tx.set_signature(address, signature),
            Self::Transfer(tx) => tx.set_signature(address, signature),
            Self::ReserveFund(tx) => tx.set_signature(address, signature),
            Self::ReleaseFund(tx) => tx.set_signature(address, signature),
            Self::ServicePayment(tx) => tx.set_signature(address, signature),
            Self::SplitRule(tx) => tx.set_signature(address, signature),
            Self::SmartContract(tx) => tx.set_signature(address, signature),
            Self::StakeDeposit(tx) => tx.set_signature(address, signature),
        };
        tracing::debug!(tx_type = ?self.tx_type(), signer = %address, attached, "set signature");
        attached
    }

    /// Signing pre-image under `chain_id`, with every signature cleared.
    ///
    /// For a service payment this is the target view with both signatures
    /// cleared; the role-specific views are on [`ServicePaymentTx`].
    pub fn sign_bytes(&self, chain_id: &str) -> Result<Vec<u8>, EncodeError> {
        match self {
            Self::Issuance(tx) => tx.sign_bytes(chain_id),
            Self::Slash(tx) => tx.sign_bytes(chain_id),
            Self::Transfer(tx) => tx.sign_bytes(chain_id),
            Self::ReserveFund(tx) => tx.sign_bytes(chain_id),
            Self::ReleaseFund(tx) => tx.sign_bytes(chain_id),
            Self::ServicePayment(tx) => tx.sign_bytes(chain_id),
            Self::SplitRule(tx) => tx.sign_bytes(chain_id),
            Self::SmartContract(tx) => tx.sign_bytes(chain_id),
            Self::StakeDeposit(tx) => tx.sign_bytes(chain_id),
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, EncodeError> {
        codec::encode(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        codec::decode(bytes)
    }

    /// Keccak-256 of the wire bytes, signatures included.
    pub fn hash(&self) -> Result<TxHash, EncodeError> {
        Ok(meridian_crypto::hash_transaction(&self.to_bytes()?))
    }
}

macro_rules! impl_from_body {
    ($($variant:ident($body:ty)),* $(,)?) => {
        $(
            impl From<$body> for Transaction {
                fn from(tx: $body) -> Self {
                    Self::$variant(tx)
                }
            }
        )*
    };
}

impl_from_body!(
    Issuance(IssuanceTx),
    Slash(SlashTx),
    Transfer(TransferTx),
    ReserveFund(ReserveFundTx),
    ReleaseFund(ReleaseFundTx),
    ServicePayment(ServicePaymentTx),
    SplitRule(SplitRuleTx),
    SmartContract(SmartContractTx),
    StakeDeposit(StakeDepositTx),
);
