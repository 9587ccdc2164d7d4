//! Value transfer from one or more endorsing accounts to a set of payouts.

use meridian_types::Amount;
use serde::{Deserialize, Serialize};

use crate::endorsement::{Endorsement, Payout};
use crate::error::{DecodeError, EncodeError};
use crate::rlp::{self, Rlp, RlpDecode, RlpEncode};
use crate::{TxBody, TxType};

/// Moves value from `endorsements` to `payouts`, paying `fee`.
///
/// Each endorsement is signed independently by its own account over the
/// same sign bytes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferTx {
    pub fee: Amount,
    pub endorsements: Vec<Endorsement>,
    pub payouts: Vec<Payout>,
}

impl TransferTx {
    pub fn new(fee: Amount, endorsements: Vec<Endorsement>, payouts: Vec<Payout>) -> Self {
        Self {
            fee,
            endorsements,
            payouts,
        }
    }
}

impl TxBody for TransferTx {
    const TX_TYPE: TxType = TxType::Transfer;

    fn endorsements(&self) -> Vec<&Endorsement> {
        self.endorsements.iter().collect()
    }

    fn endorsements_mut(&mut self) -> Vec<&mut Endorsement> {
        self.endorsements.iter_mut().collect()
    }
}

/// `[fee, endorsements, payouts]`, shared with stake deposits.
pub(crate) fn append_fee_endorsements_payouts(
    out: &mut Vec<u8>,
    fee: &Amount,
    endorsements: &[Endorsement],
    payouts: &[Payout],
) -> Result<(), EncodeError> {
    rlp::try_append_list(out, |p| {
        fee.rlp_append(p)?;
        rlp::append_seq(p, endorsements)?;
        rlp::append_seq(p, payouts)
    })
}

pub(crate) fn read_fee_endorsements_payouts(
    rlp: &mut Rlp<'_>,
) -> Result<(Amount, Vec<Endorsement>, Vec<Payout>), DecodeError> {
    let mut fields = rlp.list()?;
    let fee = fields.decode()?;
    let endorsements = fields.seq()?;
    let payouts = fields.seq()?;
    fields.finish()?;
    Ok((fee, endorsements, payouts))
}

impl RlpEncode for TransferTx {
    fn rlp_append(&self, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        append_fee_endorsements_payouts(out, &self.fee, &self.endorsements, &self.payouts)
    }
}

impl RlpDecode for TransferTx {
    fn rlp_decode(rlp: &mut Rlp<'_>) -> Result<Self, DecodeError> {
        let (fee, endorsements, payouts) = read_fee_endorsements_payouts(rlp)?;
        Ok(Self {
            fee,
            endorsements,
            payouts,
        })
    }
}
