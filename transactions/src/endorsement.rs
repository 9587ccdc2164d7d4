//! Signer slots and output records shared by the transaction variants.

use meridian_types::{Address, Amount, Signature};
use serde::{Deserialize, Serialize};

use crate::error::{DecodeError, EncodeError};
use crate::rlp::{self, Rlp, RlpDecode, RlpEncode};

/// A value contribution from an account, with the slot for its signature.
///
/// `sequence` is the account's replay counter; an empty `signature` means
/// the slot has not been signed yet.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endorsement {
    pub address: Address,
    pub amount: Amount,
    pub sequence: u64,
    pub signature: Signature,
}

impl Endorsement {
    /// An unsigned endorsement.
    pub fn new(address: Address, amount: Amount, sequence: u64) -> Self {
        Self {
            address,
            amount,
            sequence,
            signature: Signature::empty(),
        }
    }

    pub fn is_signed(&self) -> bool {
        !self.signature.is_empty()
    }
}

impl RlpEncode for Endorsement {
    fn rlp_append(&self, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        rlp::try_append_list(out, |p| {
            self.address.rlp_append(p)?;
            self.amount.rlp_append(p)?;
            rlp::append_u64(p, self.sequence);
            self.signature.rlp_append(p)
        })
    }
}

impl RlpDecode for Endorsement {
    fn rlp_decode(rlp: &mut Rlp<'_>) -> Result<Self, DecodeError> {
        let mut fields = rlp.list()?;
        let endorsement = Self {
            address: fields.decode()?,
            amount: fields.decode()?,
            sequence: fields.u64()?,
            signature: fields.decode()?,
        };
        fields.finish()?;
        Ok(endorsement)
    }
}

/// A value credited to an address.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payout {
    pub address: Address,
    pub amount: Amount,
}

impl Payout {
    pub fn new(address: Address, amount: Amount) -> Self {
        Self { address, amount }
    }
}

impl RlpEncode for Payout {
    fn rlp_append(&self, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        rlp::try_append_list(out, |p| {
            self.address.rlp_append(p)?;
            self.amount.rlp_append(p)
        })
    }
}

impl RlpDecode for Payout {
    fn rlp_decode(rlp: &mut Rlp<'_>) -> Result<Self, DecodeError> {
        let mut fields = rlp.list()?;
        let payout = Self {
            address: fields.decode()?,
            amount: fields.decode()?,
        };
        fields.finish()?;
        Ok(payout)
    }
}

/// One share of a resource's revenue split.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Split {
    pub address: Address,
    /// Integer percentage. Range checks belong to execution, not encoding.
    pub percentage: u32,
}

impl Split {
    pub fn new(address: Address, percentage: u32) -> Self {
        Self {
            address,
            percentage,
        }
    }
}

impl RlpEncode for Split {
    fn rlp_append(&self, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        rlp::try_append_list(out, |p| {
            self.address.rlp_append(p)?;
            rlp::append_u64(p, u64::from(self.percentage));
            Ok(())
        })
    }
}

impl RlpDecode for Split {
    fn rlp_decode(rlp: &mut Rlp<'_>) -> Result<Self, DecodeError> {
        let mut fields = rlp.list()?;
        let split = Self {
            address: fields.decode()?,
            percentage: fields.u32()?,
        };
        fields.finish()?;
        Ok(split)
    }
}
