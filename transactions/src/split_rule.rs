//! Revenue split rule for a resource.

use meridian_types::Amount;
use serde::{Deserialize, Serialize};

use crate::endorsement::{Endorsement, Split};
use crate::error::{DecodeError, EncodeError};
use crate::rlp::{self, Rlp, RlpDecode, RlpEncode};
use crate::{TxBody, TxType};

/// Declares how payments to `resource_id` are divided among `splits`
/// for `duration` blocks. Signed by the initiator.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitRuleTx {
    pub fee: Amount,
    pub resource_id: String,
    pub initiator: Endorsement,
    pub splits: Vec<Split>,
    pub duration: u64,
}

impl SplitRuleTx {
    pub fn new(
        fee: Amount,
        resource_id: impl Into<String>,
        initiator: Endorsement,
        splits: Vec<Split>,
        duration: u64,
    ) -> Self {
        Self {
            fee,
            resource_id: resource_id.into(),
            initiator,
            splits,
            duration,
        }
    }

    /// Sum of all split percentages.
    pub fn total_percentage(&self) -> u64 {
        self.splits.iter().map(|s| u64::from(s.percentage)).sum()
    }
}

impl TxBody for SplitRuleTx {
    const TX_TYPE: TxType = TxType::SplitRule;

    fn endorsements(&self) -> Vec<&Endorsement> {
        vec![&self.initiator]
    }

    fn endorsements_mut(&mut self) -> Vec<&mut Endorsement> {
        vec![&mut self.initiator]
    }
}

impl RlpEncode for SplitRuleTx {
    fn rlp_append(&self, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        rlp::try_append_list(out, |p| {
            self.fee.rlp_append(p)?;
            rlp::append_str(p, &self.resource_id);
            self.initiator.rlp_append(p)?;
            rlp::append_seq(p, &self.splits)?;
            rlp::append_u64(p, self.duration);
            Ok(())
        })
    }
}

impl RlpDecode for SplitRuleTx {
    fn rlp_decode(rlp: &mut Rlp<'_>) -> Result<Self, DecodeError> {
        let mut fields = rlp.list()?;
        let tx = Self {
            fee: fields.decode()?,
            resource_id: fields.string()?,
            initiator: fields.decode()?,
            splits: fields.seq()?,
            duration: fields.u64()?,
        };
        fields.finish()?;
        Ok(tx)
    }
}
