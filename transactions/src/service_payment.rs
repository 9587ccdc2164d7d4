//! Off-chain service payment settled against a reserved fund.
//!
//! The two parties sign different views of the same transaction. The source
//! signs when the payment is issued, before fee and target details are
//! final; the target signs the complete transaction, including the source's
//! signature, when it claims the payment.

use meridian_types::Amount;
use serde::{Deserialize, Serialize};

use crate::endorsement::Endorsement;
use crate::error::{DecodeError, EncodeError};
use crate::rlp::{self, Rlp, RlpDecode, RlpEncode};
use crate::sign_bytes::sign_bytes_for;
use crate::{TxBody, TxType};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServicePaymentTx {
    pub fee: Amount,
    pub source: Endorsement,
    pub target: Endorsement,
    pub payment_sequence: u64,
    pub reserve_sequence: u64,
    pub resource_id: String,
}

impl ServicePaymentTx {
    pub fn new(
        fee: Amount,
        source: Endorsement,
        target: Endorsement,
        payment_sequence: u64,
        reserve_sequence: u64,
        resource_id: impl Into<String>,
    ) -> Self {
        Self {
            fee,
            source,
            target,
            payment_sequence,
            reserve_sequence,
            resource_id: resource_id.into(),
        }
    }

    /// Bytes the source signs.
    ///
    /// Fee is zeroed, the source keeps only address and amount, and the
    /// target keeps only its address. Every other field is as-is.
    pub fn source_sign_bytes(&self, chain_id: &str) -> Result<Vec<u8>, EncodeError> {
        let view = Self {
            fee: Amount::zero(),
            source: Endorsement::new(self.source.address, self.source.amount.clone(), 0),
            target: Endorsement::new(self.target.address, Amount::zero(), 0),
            payment_sequence: self.payment_sequence,
            reserve_sequence: self.reserve_sequence,
            resource_id: self.resource_id.clone(),
        };
        sign_bytes_for(chain_id, &view)
    }

    /// Bytes the target signs: the whole transaction with only the target
    /// signature cleared.
    pub fn target_sign_bytes(&self, chain_id: &str) -> Result<Vec<u8>, EncodeError> {
        let mut view = self.clone();
        view.target.signature.clear();
        sign_bytes_for(chain_id, &view)
    }
}

impl TxBody for ServicePaymentTx {
    const TX_TYPE: TxType = TxType::ServicePayment;

    fn endorsements(&self) -> Vec<&Endorsement> {
        vec![&self.source, &self.target]
    }

    fn endorsements_mut(&mut self) -> Vec<&mut Endorsement> {
        vec![&mut self.source, &mut self.target]
    }
}

impl RlpEncode for ServicePaymentTx {
    fn rlp_append(&self, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        rlp::try_append_list(out, |p| {
            self.fee.rlp_append(p)?;
            self.source.rlp_append(p)?;
            self.target.rlp_append(p)?;
            rlp::append_u64(p, self.payment_sequence);
            rlp::append_u64(p, self.reserve_sequence);
            rlp::append_str(p, &self.resource_id);
            Ok(())
        })
    }
}

impl RlpDecode for ServicePaymentTx {
    fn rlp_decode(rlp: &mut Rlp<'_>) -> Result<Self, DecodeError> {
        let mut fields = rlp.list()?;
        let tx = Self {
            fee: fields.decode()?,
            source: fields.decode()?,
            target: fields.decode()?,
            payment_sequence: fields.u64()?,
            reserve_sequence: fields.u64()?,
            resource_id: fields.string()?,
        };
        fields.finish()?;
        Ok(tx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meridian_types::{Address, Signature};

    fn payment() -> ServicePaymentTx {
        ServicePaymentTx::new(
            Amount::secondary(111),
            Endorsement::new(Address::from_label("source"), Amount::secondary(12345), 67890),
            Endorsement::new(Address::from_label("target"), Amount::zero(), 22341),
            3,
            12,
            "rid00123",
        )
    }

    #[test]
    fn source_view_ignores_fee_and_target_details() {
        let a = payment();
        let mut b = payment();
        b.fee = Amount::secondary(999);
        b.target.amount = Amount::primary(5);
        b.target.sequence = 1;
        b.target.signature = Signature::from(vec![1u8; 64]);
        b.source.sequence = 4;
        assert_eq!(
            a.source_sign_bytes("test_chain").unwrap(),
            b.source_sign_bytes("test_chain").unwrap()
        );
    }

    #[test]
    fn target_view_covers_source_signature() {
        let a = payment();
        let mut b = payment();
        b.source.signature = Signature::from(vec![7u8; 64]);
        assert_ne!(
            a.target_sign_bytes("test_chain").unwrap(),
            b.target_sign_bytes("test_chain").unwrap()
        );

        let mut c = payment();
        c.target.signature = Signature::from(vec![9u8; 64]);
        assert_eq!(
            a.target_sign_bytes("test_chain").unwrap(),
            c.target_sign_bytes("test_chain").unwrap()
        );
    }

    #[test]
    fn views_do_not_mutate() {
        let mut tx = payment();
        tx.target.signature = Signature::from(vec![9u8; 64]);
        let before = tx.clone();
        tx.source_sign_bytes("c").unwrap();
        tx.target_sign_bytes("c").unwrap();
        assert_eq!(tx, before);
    }
}
