//! Block reward minting.

use meridian_types::Address;
use serde::{Deserialize, Serialize};

use crate::endorsement::{Endorsement, Payout};
use crate::error::{DecodeError, EncodeError};
use crate::rlp::{self, Rlp, RlpDecode, RlpEncode};
use crate::{TxBody, TxType};

/// Mints block rewards; signed by the block proposer.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuanceTx {
    pub proposer: Endorsement,
    pub payouts: Vec<Payout>,
    pub block_height: u64,
}

impl IssuanceTx {
    pub fn new(proposer: Endorsement, payouts: Vec<Payout>, block_height: u64) -> Self {
        Self {
            proposer,
            payouts,
            block_height,
        }
    }

    /// Addresses credited by this issuance, in order.
    pub fn recipients(&self) -> impl Iterator<Item = &Address> {
        self.payouts.iter().map(|p| &p.address)
    }
}

impl TxBody for IssuanceTx {
    const TX_TYPE: TxType = TxType::Issuance;

    fn endorsements(&self) -> Vec<&Endorsement> {
        vec![&self.proposer]
    }

    fn endorsements_mut(&mut self) -> Vec<&mut Endorsement> {
        vec![&mut self.proposer]
    }
}

impl RlpEncode for IssuanceTx {
    fn rlp_append(&self, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        rlp::try_append_list(out, |p| {
            self.proposer.rlp_append(p)?;
            rlp::append_seq(p, &self.payouts)?;
            rlp::append_u64(p, self.block_height);
            Ok(())
        })
    }
}

impl RlpDecode for IssuanceTx {
    fn rlp_decode(rlp: &mut Rlp<'_>) -> Result<Self, DecodeError> {
        let mut fields = rlp.list()?;
        let tx = Self {
            proposer: fields.decode()?,
            payouts: fields.seq()?,
            block_height: fields.u64()?,
        };
        fields.finish()?;
        Ok(tx)
    }
}
