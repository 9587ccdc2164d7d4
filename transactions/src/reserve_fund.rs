//! Reserve fund: escrows value so a source can pay for resources.

use meridian_types::Amount;
use serde::{Deserialize, Serialize};

use crate::endorsement::Endorsement;
use crate::error::{DecodeError, EncodeError};
use crate::rlp::{self, Rlp, RlpDecode, RlpEncode};
use crate::{TxBody, TxType};

/// Reserves `source.amount` for `duration` blocks, backed by `collateral`,
/// payable only to the listed resources.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReserveFundTx {
    pub fee: Amount,
    pub source: Endorsement,
    pub collateral: Amount,
    pub resource_ids: Vec<String>,
    pub duration: u64,
}

impl ReserveFundTx {
    pub fn new(
        fee: Amount,
        source: Endorsement,
        collateral: Amount,
        resource_ids: Vec<String>,
        duration: u64,
    ) -> Self {
        Self {
            fee,
            source,
            collateral,
            resource_ids,
            duration,
        }
    }
}

impl TxBody for ReserveFundTx {
    const TX_TYPE: TxType = TxType::ReserveFund;

    fn endorsements(&self) -> Vec<&Endorsement> {
        vec![&self.source]
    }

    fn endorsements_mut(&mut self) -> Vec<&mut Endorsement> {
        vec![&mut self.source]
    }
}

impl RlpEncode for ReserveFundTx {
    fn rlp_append(&self, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        rlp::try_append_list(out, |p| {
            self.fee.rlp_append(p)?;
            self.source.rlp_append(p)?;
            self.collateral.rlp_append(p)?;
            rlp::append_seq(p, &self.resource_ids)?;
            rlp::append_u64(p, self.duration);
            Ok(())
        })
    }
}

impl RlpDecode for ReserveFundTx {
    fn rlp_decode(rlp: &mut Rlp<'_>) -> Result<Self, DecodeError> {
        let mut fields = rlp.list()?;
        let tx = Self {
            fee: fields.decode()?,
            source: fields.decode()?,
            collateral: fields.decode()?,
            resource_ids: fields.seq()?,
            duration: fields.u64()?,
        };
        fields.finish()?;
        Ok(tx)
    }
}
