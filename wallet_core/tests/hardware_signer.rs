//! Hardware signer flows against the nullable device.

use std::thread;
use std::time::{Duration, Instant};

use meridian_nullables::{DriverCall, NullHardwareDriver, NullTransport};
use meridian_transactions::{
    verify_endorsement, Endorsement, Payout, ServicePaymentTx, Transaction, TransferTx,
};
use meridian_types::{Address, Amount};
use meridian_wallet_core::{
    sign_transaction, sign_with_fallback, DerivationPath, HardwareConfig, HardwareSigner,
    LocalSigner, SignerError, SigningRole, TxSigner, WalletError,
};

const CHAIN: &str = "privatenet";

fn open_signer(device: &NullHardwareDriver, timeout: Duration) -> HardwareSigner<NullHardwareDriver> {
    let signer = HardwareSigner::new(device.clone(), DerivationPath::default(), timeout);
    signer
        .open(Box::new(NullTransport::new()), "passphrase")
        .unwrap();
    signer
}

fn transfer_from(address: Address) -> Transaction {
    TransferTx::new(
        Amount::zero(),
        vec![Endorsement::new(address, Amount::primary(10), 0)],
        vec![Payout::new(Address::from_label("shop"), Amount::primary(10))],
    )
    .into()
}

#[test]
fn session_lifecycle() {
    let device = NullHardwareDriver::new("ledger");
    let signer = HardwareSigner::new(device.clone(), DerivationPath::default(), Duration::from_secs(5));

    assert_eq!(signer.status().unwrap(), "locked");
    assert_eq!(signer.heartbeat(), Err(SignerError::Disconnected));

    let transport = NullTransport::new();
    signer.open(Box::new(transport.clone()), "pass").unwrap();
    assert_eq!(transport.written(), b"open");
    assert_eq!(signer.status().unwrap(), "ready");
    signer.heartbeat().unwrap();
    assert_eq!(
        signer.address().unwrap(),
        device.address_for(&DerivationPath::default())
    );

    signer.close().unwrap();
    assert!(!device.is_open());
}

#[test]
fn device_receives_exact_sign_bytes_and_signature_verifies() {
    let device = NullHardwareDriver::new("ledger");
    let signer = open_signer(&device, Duration::from_secs(5));
    let address = signer.address().unwrap();
    let mut tx = transfer_from(address);
    let expected = tx.sign_bytes(CHAIN).unwrap();

    let outcome = sign_transaction(&mut tx, CHAIN, SigningRole::Endorser, &signer).unwrap();
    assert!(outcome.attached);
    assert_eq!(device.signed_payloads(), vec![expected]);

    let public = device.keypair_for(&DerivationPath::default()).public;
    assert!(verify_endorsement(&tx, CHAIN, &public).unwrap());
}

#[test]
fn service_payment_source_local_target_hardware() {
    let source = LocalSigner::from_secret("consumer");
    let device = NullHardwareDriver::new("provider-ledger");
    let target = open_signer(&device, Duration::from_secs(5));
    let target_address = target.address().unwrap();

    let mut tx: Transaction = ServicePaymentTx::new(
        Amount::secondary(1),
        Endorsement::new(source.address(), Amount::secondary(100), 7),
        Endorsement::new(target_address, Amount::zero(), 3),
        1,
        12,
        "rid00123",
    )
    .into();

    let source_view = match &tx {
        Transaction::ServicePayment(p) => p.source_sign_bytes(CHAIN).unwrap(),
        _ => unreachable!(),
    };
    assert!(sign_transaction(&mut tx, CHAIN, SigningRole::ServiceSource, &source).unwrap().attached);

    let target_view = match &tx {
        Transaction::ServicePayment(p) => p.target_sign_bytes(CHAIN).unwrap(),
        _ => unreachable!(),
    };
    assert!(sign_transaction(&mut tx, CHAIN, SigningRole::ServiceTarget, &target).unwrap().attached);

    assert_eq!(device.signed_payloads(), vec![target_view]);
    assert_ne!(source_view, device.signed_payloads()[0]);
    assert!(verify_endorsement(&tx, CHAIN, source.public_key()).unwrap());
    let target_key = device.keypair_for(&DerivationPath::default()).public;
    assert!(verify_endorsement(&tx, CHAIN, &target_key).unwrap());
}

#[test]
fn stalled_device_times_out() {
    let device = NullHardwareDriver::new("ledger");
    let signer = open_signer(&device, Duration::from_millis(50));
    let mut tx = transfer_from(device.address_for(&DerivationPath::default()));
    let before = tx.clone();

    device.set_delay(Duration::from_millis(500));
    let err = sign_transaction(&mut tx, CHAIN, SigningRole::Endorser, &signer).unwrap_err();
    assert!(matches!(
        err,
        WalletError::Signer(SignerError::Timeout { timeout_ms: 50 })
    ));
    assert_eq!(tx, before);
}

#[test]
fn stalled_device_rejects_new_calls_until_it_returns() {
    let device = NullHardwareDriver::new("ledger");
    let signer = open_signer(&device, Duration::from_millis(100));
    device.set_delay(Duration::from_secs(2));

    assert_eq!(
        signer.sign(b"payload").unwrap_err(),
        SignerError::Timeout { timeout_ms: 100 }
    );
    for _ in 0..50 {
        assert_eq!(signer.sign(b"payload").unwrap_err(), SignerError::Busy);
    }
    assert_eq!(signer.heartbeat(), Err(SignerError::Busy));
    assert!(SignerError::Busy.is_recoverable());

    // The stalled call keeps its delay; later calls run without one.
    device.set_delay(Duration::ZERO);
    let deadline = Instant::now() + Duration::from_secs(10);
    while signer.heartbeat() == Err(SignerError::Busy) {
        assert!(Instant::now() < deadline, "device never became idle");
        thread::sleep(Duration::from_millis(20));
    }
    signer.heartbeat().unwrap();
    signer.sign(b"payload").unwrap();

    let signs = device
        .calls()
        .iter()
        .filter(|c| matches!(c, DriverCall::Sign(..)))
        .count();
    assert_eq!(signs, 2);
}

#[test]
fn busy_device_falls_back_to_local_key() {
    let local = LocalSigner::from_secret("backup");
    let device = NullHardwareDriver::new("ledger");
    let hardware = open_signer(&device, Duration::from_millis(100));
    device.set_delay(Duration::from_secs(2));
    assert!(hardware.sign(b"stall").is_err());

    let mut tx = transfer_from(local.address());
    let outcome =
        sign_with_fallback(&mut tx, CHAIN, SigningRole::Endorser, &hardware, &local).unwrap();
    assert_eq!(outcome.address, local.address());
    assert!(verify_endorsement(&tx, CHAIN, local.public_key()).unwrap());
}

#[test]
fn unplugged_device_falls_back_to_local_key() {
    let local = LocalSigner::from_secret("backup");
    let device = NullHardwareDriver::new("ledger");
    let hardware = open_signer(&device, Duration::from_secs(5));
    device.unplug();

    let mut tx = transfer_from(local.address());
    let outcome =
        sign_with_fallback(&mut tx, CHAIN, SigningRole::Endorser, &hardware, &local).unwrap();
    assert_eq!(outcome.address, local.address());
    assert!(outcome.attached);
    assert!(verify_endorsement(&tx, CHAIN, local.public_key()).unwrap());
}

#[test]
fn rejection_is_not_retried_with_fallback() {
    let local = LocalSigner::from_secret("backup");
    let device = NullHardwareDriver::new("ledger");
    let hardware = open_signer(&device, Duration::from_secs(5));
    device.fail_next(SignerError::Rejected);

    let mut tx = transfer_from(local.address());
    let before = tx.clone();
    let err = sign_with_fallback(&mut tx, CHAIN, SigningRole::Endorser, &hardware, &local)
        .unwrap_err();
    assert!(matches!(err, WalletError::Signer(SignerError::Rejected)));
    assert_eq!(tx, before);
}

#[test]
fn device_reporting_foreign_address_attaches_nothing() {
    let device = NullHardwareDriver::new("ledger");
    let signer = open_signer(&device, Duration::from_secs(5));
    let owner = device.address_for(&DerivationPath::default());
    device.report_address(Address::from_label("stranger"));

    let mut tx = transfer_from(owner);
    let before = tx.clone();
    let outcome = sign_transaction(&mut tx, CHAIN, SigningRole::Endorser, &signer).unwrap();
    assert!(!outcome.attached);
    assert_eq!(tx, before);
}

#[test]
fn signer_built_from_config_uses_its_path() {
    let device = NullHardwareDriver::new("ledger");
    let config = HardwareConfig {
        timeout_ms: 1_000,
        derivation_path: "m/44'/500'/0'/0/4".parse().unwrap(),
    };
    let signer = HardwareSigner::from_config(device.clone(), &config);
    signer.open(Box::new(NullTransport::new()), "").unwrap();

    let (address, _) = signer.sign(b"payload").unwrap();
    assert_eq!(address, device.address_for(&config.derivation_path));
    assert!(matches!(
        device.calls().last(),
        Some(DriverCall::Sign(path, _)) if *path == config.derivation_path
    ));
}
