//! Byte-exact sign-bytes and wire vectors.
//!
//! Any change here is a consensus break: previously signed transactions
//! would stop verifying.

use meridian_crypto::{derive_address, keypair_from_secret};
use meridian_transactions::{
    verify_endorsement, Endorsement, IssuanceTx, Payout, ReleaseFundTx, ReserveFundTx, ServicePaymentTx, SlashTx,
    Split, SplitRuleTx, StakeDepositTx, Transaction, TransferTx, TxBody,
};
use meridian_types::{Address, Amount, BigInt};

fn proposer() -> Endorsement {
    let address: Address = "B23369B1225E72332462A75C1B7F509A805E3D6E".parse().unwrap();
    Endorsement::new(address, Amount::zero(), 1)
}

fn label(s: &str) -> Address {
    Address::from_label(s)
}

fn hex_upper(bytes: &[u8]) -> String {
    hex::encode_upper(bytes)
}

#[test]
fn issuance_sign_bytes() {
    let tx = IssuanceTx::new(
        proposer(),
        vec![
            Payout::new(label("validator1"), Amount::new(333, 0)),
            Payout::new(label("validator1"), Amount::new(444, 0)),
        ],
        10,
    );
    assert_eq!(
        hex_upper(&tx.sign_bytes("test_chain_id").unwrap()),
        "F87F80808094000000000000000000000000000000000000000080B8648D746573745F636861696E5F696480F853DA94B23369B1225E72332462A75C1B7F509A805E3D6EC280800180F6DA9476616C696461746F723100000000000000000000C482014D80DA9476616C696461746F723100000000000000000000C48201BC800A"
    );
}

#[test]
fn slash_sign_bytes() {
    let tx = SlashTx::new(proposer(), label("014FAB"), 1, b"2345ABC".to_vec());
    assert_eq!(
        hex_upper(&tx.sign_bytes("test_chain").unwrap()),
        "F86280808094000000000000000000000000000000000000000080B8478A746573745F636861696E01F839DA94B23369B1225E72332462A75C1B7F509A805E3D6EC280800180943031344641420000000000000000000000000000018732333435414243"
    );
}

fn transfer_parts() -> (Amount, Vec<Endorsement>, Vec<Payout>) {
    (
        Amount::new(111, 0),
        vec![
            Endorsement::new(label("input1"), Amount::new(12345, 0), 67890),
            Endorsement::new(label("input2"), Amount::new(111, 0), 222),
        ],
        vec![
            Payout::new(label("output1"), Amount::new(333, 0)),
            Payout::new(label("output2"), Amount::new(444, 0)),
        ],
    )
}

const TRANSFER_SIGN_BYTES: &str = "F8A180808094000000000000000000000000000000000000000080B8868A746573745F636861696E02F878C26F80F83CDF94696E707574310000000000000000000000000000C4823039808301093280DB94696E707574320000000000000000000000000000C26F8081DE80F6DA946F75747075743100000000000000000000000000C482014D80DA946F75747075743200000000000000000000000000C48201BC80";

#[test]
fn transfer_sign_bytes() {
    let (fee, endorsements, payouts) = transfer_parts();
    let tx = TransferTx::new(fee, endorsements, payouts);
    assert_eq!(
        hex_upper(&tx.sign_bytes("test_chain").unwrap()),
        TRANSFER_SIGN_BYTES
    );
}

// Stake deposits share the transfer body layout under their own tag, so the
// expected bytes are the transfer vector with the tag byte swapped.
#[test]
fn stake_deposit_differs_from_transfer_only_in_tag() {
    let (fee, endorsements, payouts) = transfer_parts();
    let tx = StakeDepositTx::new(fee, endorsements, payouts);
    let expected = TRANSFER_SIGN_BYTES.replacen("636861696E02", "636861696E08", 1);
    assert_eq!(hex_upper(&tx.sign_bytes("test_chain").unwrap()), expected);
}

fn source(name: &str) -> Endorsement {
    Endorsement::new(label(name), Amount::new(0, 12345), 67890)
}

#[test]
fn reserve_fund_sign_bytes() {
    let tx = ReserveFundTx::new(
        Amount::new(0, 111),
        source("input1"),
        Amount::new(0, 22897),
        vec!["rid00123".to_string()],
        999,
    );
    assert_eq!(
        hex_upper(&tx.sign_bytes("test_chain").unwrap()),
        "F85D80808094000000000000000000000000000000000000000080B8428A746573745F636861696E03F5C2806FDF94696E707574310000000000000000000000000000C4808230398301093280C480825971C98872696430303132338203E7"
    );
}

#[test]
fn release_fund_sign_bytes() {
    let tx = ReleaseFundTx::new(Amount::new(0, 111), source("input1"), 12);
    assert_eq!(
        hex_upper(&tx.sign_bytes("test_chain").unwrap()),
        "F84B80808094000000000000000000000000000000000000000080B18A746573745F636861696E04E4C2806FDF94696E707574310000000000000000000000000000C48082303983010932800C"
    );
}

fn service_payment() -> ServicePaymentTx {
    ServicePaymentTx::new(
        Amount::new(0, 111),
        source("source"),
        Endorsement::new(label("target"), Amount::zero(), 22341),
        3,
        12,
        "rid00123",
    )
}

#[test]
fn service_payment_source_sign_bytes() {
    assert_eq!(
        hex_upper(&service_payment().source_sign_bytes("test_chain").unwrap()),
        "F86F80808094000000000000000000000000000000000000000080B8548A746573745F636861696E05F846C28080DC94736F757263650000000000000000000000000000C4808230398080DA947461726765740000000000000000000000000000C280808080030C887269643030313233"
    );
}

#[test]
fn service_payment_target_sign_bytes() {
    assert_eq!(
        hex_upper(&service_payment().target_sign_bytes("test_chain").unwrap()),
        "F87480808094000000000000000000000000000000000000000080B8598A746573745F636861696E05F84BC2806FDF94736F757263650000000000000000000000000000C4808230398301093280DC947461726765740000000000000000000000000000C2808082574580030C887269643030313233"
    );
}

#[test]
fn service_payment_generic_sign_bytes_is_unsigned_target_view() {
    let tx = service_payment();
    assert_eq!(
        Transaction::from(tx.clone()).sign_bytes("test_chain").unwrap(),
        tx.target_sign_bytes("test_chain").unwrap()
    );
}

#[test]
fn split_rule_sign_bytes() {
    let tx = SplitRuleTx::new(
        Amount::new(0, 111),
        "rid00123",
        source("source"),
        vec![Split::new(label("splitaddr1"), 30)],
        99,
    );
    assert_eq!(
        hex_upper(&tx.sign_bytes("test_chain").unwrap()),
        "F86E80808094000000000000000000000000000000000000000080B8538A746573745F636861696E06F845C2806F887269643030313233DF94736F757263650000000000000000000000000000C4808230398301093280D7D69473706C69746164647231000000000000000000001E63"
    );
}

const SIGNED_TRANSFER: &str = "02f8a4c78085e8d4a51000f86ff86d94df1f3d3ee9430db3a44ae6b80eb3e23352bb785ed3888ac7230489e800008901158e46f1e875100002b8415a6e9a2e93487c786f07175998493161e61a5d9613745aa0e2fe51e5db1eaf626f72bfae41d971e88ff3b2c217cf611c2addb266e7d7ebda29cb0e9e5a2f482800eae994df1f3d3ee9430db3a44ae6b80eb3e23352bb785ed3888ac7230489e800008901158e460913d00000";

const SIGNED_TRANSFER_SIGN_BYTES: &str = "f88980808094000000000000000000000000000000000000000080b86e8a707269766174656e657402f860c78085e8d4a51000eceb94df1f3d3ee9430db3a44ae6b80eb3e23352bb785ed3888ac7230489e800008901158e46f1e87510000280eae994df1f3d3ee9430db3a44ae6b80eb3e23352bb785ed3888ac7230489e800008901158e460913d00000";

fn ether(n: u64) -> BigInt {
    BigInt::from(n) * BigInt::from(10u64).pow(18)
}

#[test]
fn signed_transfer_decodes_and_reencodes() {
    let bytes = hex::decode(SIGNED_TRANSFER).unwrap();
    let tx = Transaction::from_bytes(&bytes).unwrap();
    let Transaction::Transfer(body) = &tx else {
        panic!("expected transfer, got {:?}", tx.tx_type());
    };

    let address: Address = "0xdf1f3D3eE9430dB3A44aE6B80Eb3E23352BB785E".parse().unwrap();
    assert_eq!(body.fee, Amount::new(0, 1_000_000_000_000u64));
    assert_eq!(body.endorsements.len(), 1);
    let input = &body.endorsements[0];
    assert_eq!(input.address, address);
    assert_eq!(
        input.amount,
        Amount::new(ether(10), ether(20) + BigInt::from(1_000_000_000_000u64))
    );
    assert_eq!(input.sequence, 2);
    assert_eq!(input.signature.len(), 65);
    assert_eq!(
        body.payouts,
        vec![Payout::new(address, Amount::new(ether(10), ether(20)))]
    );

    assert_eq!(tx.to_bytes().unwrap(), bytes);
}

#[test]
fn signed_transfer_sign_bytes_ignore_signature() {
    let tx = Transaction::from_bytes(&hex::decode(SIGNED_TRANSFER).unwrap()).unwrap();
    assert_eq!(
        hex::encode(tx.sign_bytes("privatenet").unwrap()),
        SIGNED_TRANSFER_SIGN_BYTES
    );
}

#[test]
fn recoverable_signature_is_carried_but_not_verified() {
    let tx = Transaction::from_bytes(&hex::decode(SIGNED_TRANSFER).unwrap()).unwrap();
    let foreign = tx.endorsements()[0].signature.clone();
    assert_eq!(foreign.len(), 65);

    let key = keypair_from_secret("local");
    let owner = derive_address(&key.public);
    let mut local: Transaction = TransferTx::new(
        Amount::zero(),
        vec![Endorsement::new(owner, Amount::primary(1), 1)],
        vec![],
    )
    .into();
    assert!(local.set_signature(&owner, &foreign));
    assert!(!verify_endorsement(&local, "privatenet", &key.public).unwrap());
}
