//! Nullable hardware signing device.

use meridian_crypto::{derive_address, keypair_from_secret, sign_message};
use meridian_types::{Address, KeyPair, Signature};
use meridian_wallet_core::{DerivationPath, HardwareDriver, SignerError, Transport};
use std::collections::VecDeque;
use std::io::Write;
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

/// A driver call as observed by the device.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DriverCall {
    Status,
    Open,
    Close,
    Heartbeat,
    Derive(DerivationPath),
    Sign(DerivationPath, Vec<u8>),
}

struct DeviceState {
    seed_label: String,
    present: bool,
    opened: bool,
    delay: Duration,
    failures: VecDeque<SignerError>,
    reported_address: Option<Address>,
    calls: Vec<DriverCall>,
}

/// A deterministic fake device.
///
/// Keys are derived from a label and the derivation path, so tests can
/// recompute them. Clones share state: keep one clone for assertions and
/// hand the other to the signer.
#[derive(Clone)]
pub struct NullHardwareDriver {
    state: Arc<Mutex<DeviceState>>,
}

impl NullHardwareDriver {
    pub fn new(seed_label: &str) -> Self {
        Self {
            state: Arc::new(Mutex::new(DeviceState {
                seed_label: seed_label.to_string(),
                present: true,
                opened: false,
                delay: Duration::ZERO,
                failures: VecDeque::new(),
                reported_address: None,
                calls: Vec::new(),
            })),
        }
    }

    fn state(&self) -> MutexGuard<'_, DeviceState> {
        // Poisoned state stays readable.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Key the device holds at `path`.
    pub fn keypair_for(&self, path: &DerivationPath) -> KeyPair {
        let label = self.state().seed_label.clone();
        keypair_from_secret(&format!("{label}/{path}"))
    }

    pub fn address_for(&self, path: &DerivationPath) -> Address {
        derive_address(&self.keypair_for(path).public)
    }

    /// Stall every signing request by `delay`.
    pub fn set_delay(&self, delay: Duration) {
        self.state().delay = delay;
    }

    /// Fail the next driver call with `error`. Queued failures apply in order.
    pub fn fail_next(&self, error: SignerError) {
        self.state().failures.push_back(error);
    }

    /// Simulate the device being removed.
    pub fn unplug(&self) {
        let mut state = self.state();
        state.present = false;
        state.opened = false;
    }

    /// Report `address` instead of the derived one when signing.
    pub fn report_address(&self, address: Address) {
        self.state().reported_address = Some(address);
    }

    pub fn calls(&self) -> Vec<DriverCall> {
        self.state().calls.clone()
    }

    /// Payloads received by `sign_transaction`, in order.
    pub fn signed_payloads(&self) -> Vec<Vec<u8>> {
        self.state()
            .calls
            .iter()
            .filter_map(|c| match c {
                DriverCall::Sign(_, bytes) => Some(bytes.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn is_open(&self) -> bool {
        self.state().opened
    }

    /// Record the call and apply presence and scripted failures.
    fn enter(&self, call: DriverCall, needs_session: bool) -> Result<(), SignerError> {
        let mut state = self.state();
        state.calls.push(call);
        if let Some(error) = state.failures.pop_front() {
            return Err(error);
        }
        if !state.present {
            return Err(SignerError::DeviceNotFound);
        }
        if needs_session && !state.opened {
            return Err(SignerError::Disconnected);
        }
        Ok(())
    }
}

impl HardwareDriver for NullHardwareDriver {
    fn status(&mut self) -> Result<String, SignerError> {
        self.enter(DriverCall::Status, false)?;
        Ok(if self.is_open() { "ready" } else { "locked" }.to_string())
    }

    fn open(
        &mut self,
        mut transport: Box<dyn Transport>,
        _passphrase: &str,
    ) -> Result<(), SignerError> {
        self.enter(DriverCall::Open, false)?;
        transport
            .write_all(b"open")
            .map_err(|e| SignerError::Driver(e.to_string()))?;
        self.state().opened = true;
        Ok(())
    }

    fn close(&mut self) -> Result<(), SignerError> {
        self.enter(DriverCall::Close, false)?;
        self.state().opened = false;
        Ok(())
    }

    fn heartbeat(&mut self) -> Result<(), SignerError> {
        self.enter(DriverCall::Heartbeat, true)
    }

    fn derive(&mut self, path: &DerivationPath) -> Result<Address, SignerError> {
        self.enter(DriverCall::Derive(path.clone()), true)?;
        Ok(self.address_for(path))
    }

    fn sign_transaction(
        &mut self,
        path: &DerivationPath,
        sign_bytes: &[u8],
    ) -> Result<(Address, Signature), SignerError> {
        let delay = self.state().delay;
        if !delay.is_zero() {
            thread::sleep(delay);
        }
        self.enter(DriverCall::Sign(path.clone(), sign_bytes.to_vec()), true)?;
        let keypair = self.keypair_for(path);
        let address = self
            .state()
            .reported_address
            .unwrap_or_else(|| derive_address(&keypair.public));
        Ok((address, sign_message(sign_bytes, &keypair.private)))
    }
}
