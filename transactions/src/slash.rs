//! Penalty against an account that misused a reserved fund.

use meridian_types::Address;
use serde::{Deserialize, Serialize};

use crate::endorsement::Endorsement;
use crate::error::{DecodeError, EncodeError};
use crate::rlp::{self, Rlp, RlpDecode, RlpEncode};
use crate::{TxBody, TxType};

/// Slashes the collateral of `slashed_address` for the reserve identified by
/// `reserve_sequence`. `proof` is opaque evidence checked at execution.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlashTx {
    pub proposer: Endorsement,
    pub slashed_address: Address,
    pub reserve_sequence: u64,
    #[serde(with = "meridian_types::serde_fmt::hex_bytes")]
    pub proof: Vec<u8>,
}

impl SlashTx {
    pub fn new(
        proposer: Endorsement,
        slashed_address: Address,
        reserve_sequence: u64,
        proof: Vec<u8>,
    ) -> Self {
        Self {
            proposer,
            slashed_address,
            reserve_sequence,
            proof,
        }
    }
}

impl TxBody for SlashTx {
    const TX_TYPE: TxType = TxType::Slash;

    fn endorsements(&self) -> Vec<&Endorsement> {
        vec![&self.proposer]
    }

    fn endorsements_mut(&mut self) -> Vec<&mut Endorsement> {
        vec![&mut self.proposer]
    }
}

impl RlpEncode for SlashTx {
    fn rlp_append(&self, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        rlp::try_append_list(out, |p| {
            self.proposer.rlp_append(p)?;
            self.slashed_address.rlp_append(p)?;
            rlp::append_u64(p, self.reserve_sequence);
            rlp::append_bytes(p, &self.proof);
            Ok(())
        })
    }
}

impl RlpDecode for SlashTx {
    fn rlp_decode(rlp: &mut Rlp<'_>) -> Result<Self, DecodeError> {
        let mut fields = rlp.list()?;
        let tx = Self {
            proposer: fields.decode()?,
            slashed_address: fields.decode()?,
            reserve_sequence: fields.u64()?,
            proof: fields.bytes()?.to_vec(),
        };
        fields.finish()?;
        Ok(tx)
    }
}
