//! Release of a previously reserved fund back to its source.

use meridian_types::Amount;
use serde::{Deserialize, Serialize};

use crate::endorsement::Endorsement;
use crate::error::{DecodeError, EncodeError};
use crate::rlp::{self, Rlp, RlpDecode, RlpEncode};
use crate::{TxBody, TxType};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseFundTx {
    pub fee: Amount,
    pub source: Endorsement,
    /// Sequence of the reserve being released.
    pub reserve_sequence: u64,
}

impl ReleaseFundTx {
    pub fn new(fee: Amount, source: Endorsement, reserve_sequence: u64) -> Self {
        Self {
            fee,
            source,
            reserve_sequence,
        }
    }
}

impl TxBody for ReleaseFundTx {
    const TX_TYPE: TxType = TxType::ReleaseFund;

    fn endorsements(&self) -> Vec<&Endorsement> {
        vec![&self.source]
    }

    fn endorsements_mut(&mut self) -> Vec<&mut Endorsement> {
        vec![&mut self.source]
    }
}

impl RlpEncode for ReleaseFundTx {
    fn rlp_append(&self, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        rlp::try_append_list(out, |p| {
            self.fee.rlp_append(p)?;
            self.source.rlp_append(p)?;
            rlp::append_u64(p, self.reserve_sequence);
            Ok(())
        })
    }
}

impl RlpDecode for ReleaseFundTx {
    fn rlp_decode(rlp: &mut Rlp<'_>) -> Result<Self, DecodeError> {
        let mut fields = rlp.list()?;
        let tx = Self {
            fee: fields.decode()?,
            source: fields.decode()?,
            reserve_sequence: fields.u64()?,
        };
        fields.finish()?;
        Ok(tx)
    }
}
