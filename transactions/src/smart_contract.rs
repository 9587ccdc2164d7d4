//! Contract call or deployment.

use meridian_types::{Amount, BigInt};
use serde::{Deserialize, Serialize};

use crate::endorsement::{Endorsement, Payout};
use crate::error::{DecodeError, EncodeError};
use crate::rlp::{self, Rlp, RlpDecode, RlpEncode};
use crate::{TxBody, TxType};

/// Calls the contract at `to.address` (or deploys `data` when the address is
/// zero), transferring `from.amount`. Gas semantics are not interpreted here.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmartContractTx {
    pub from: Endorsement,
    pub to: Payout,
    pub gas_limit: u64,
    #[serde(with = "meridian_types::serde_fmt::decimal")]
    pub gas_price: BigInt,
    #[serde(with = "meridian_types::serde_fmt::hex_bytes")]
    pub data: Vec<u8>,
}

impl SmartContractTx {
    pub fn new(from: Endorsement, to: Payout, gas_limit: u64, gas_price: BigInt, data: Vec<u8>) -> Self {
        Self {
            from,
            to,
            gas_limit,
            gas_price,
            data,
        }
    }

    /// Value transferred with the call.
    pub fn value(&self) -> &Amount {
        &self.from.amount
    }

    pub fn is_deployment(&self) -> bool {
        self.to.address.is_zero()
    }
}

impl TxBody for SmartContractTx {
    const TX_TYPE: TxType = TxType::SmartContract;

    fn endorsements(&self) -> Vec<&Endorsement> {
        vec![&self.from]
    }

    fn endorsements_mut(&mut self) -> Vec<&mut Endorsement> {
        vec![&mut self.from]
    }
}

impl RlpEncode for SmartContractTx {
    fn rlp_append(&self, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        rlp::try_append_list(out, |p| {
            self.from.rlp_append(p)?;
            self.to.rlp_append(p)?;
            rlp::append_u64(p, self.gas_limit);
            rlp::append_bigint(p, &self.gas_price)?;
            rlp::append_bytes(p, &self.data);
            Ok(())
        })
    }
}

impl RlpDecode for SmartContractTx {
    fn rlp_decode(rlp: &mut Rlp<'_>) -> Result<Self, DecodeError> {
        let mut fields = rlp.list()?;
        let tx = Self {
            from: fields.decode()?,
            to: fields.decode()?,
            gas_limit: fields.u64()?,
            gas_price: fields.bigint()?,
            data: fields.bytes()?.to_vec(),
        };
        fields.finish()?;
        Ok(tx)
    }
}
