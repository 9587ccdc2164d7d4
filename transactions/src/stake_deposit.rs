//! Stake deposit: locks value as validator or guardian stake.

use meridian_types::Amount;
use serde::{Deserialize, Serialize};

use crate::endorsement::{Endorsement, Payout};
use crate::error::{DecodeError, EncodeError};
use crate::rlp::{Rlp, RlpDecode, RlpEncode};
use crate::transfer::{append_fee_endorsements_payouts, read_fee_endorsements_payouts};
use crate::{TxBody, TxType};

/// Same field layout as a transfer; `payouts` name the stake holders.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeDepositTx {
    pub fee: Amount,
    pub endorsements: Vec<Endorsement>,
    pub payouts: Vec<Payout>,
}

impl StakeDepositTx {
    pub fn new(fee: Amount, endorsements: Vec<Endorsement>, payouts: Vec<Payout>) -> Self {
        Self {
            fee,
            endorsements,
            payouts,
        }
    }
}

impl TxBody for StakeDepositTx {
    const TX_TYPE: TxType = TxType::StakeDeposit;

    fn endorsements(&self) -> Vec<&Endorsement> {
        self.endorsements.iter().collect()
    }

    fn endorsements_mut(&mut self) -> Vec<&mut Endorsement> {
        self.endorsements.iter_mut().collect()
    }
}

impl RlpEncode for StakeDepositTx {
    fn rlp_append(&self, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        append_fee_endorsements_payouts(out, &self.fee, &self.endorsements, &self.payouts)
    }
}

impl RlpDecode for StakeDepositTx {
    fn rlp_decode(rlp: &mut Rlp<'_>) -> Result<Self, DecodeError> {
        let (fee, endorsements, payouts) = read_fee_endorsements_payouts(rlp)?;
        Ok(Self {
            fee,
            endorsements,
            payouts,
        })
    }
}
