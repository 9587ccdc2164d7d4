//! Hardware wallet driver contract and the timeout-bounded signer built on it.
//!
//! The device itself lives behind [`HardwareDriver`]. Each signer owns one
//! worker thread that holds the driver and runs calls in order; the caller
//! waits at most the configured timeout, so a hung or unplugged device
//! surfaces as a [`SignerError`] instead of blocking the wallet. While a
//! timed-out call is still running on the device, further calls fail
//! immediately with [`SignerError::Busy`].

use meridian_types::{Address, Signature};
use std::io::{Read, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

use crate::config::HardwareConfig;
use crate::derivation::DerivationPath;
use crate::error::SignerError;
use crate::signer::TxSigner;

/// Byte stream to the device (USB HID, serial, TCP bridge...).
pub trait Transport: Read + Write + Send {}

impl<T: Read + Write + Send> Transport for T {}

/// Driver for a hardware signing device.
///
/// `sign_transaction` receives the exact sign bytes produced by the
/// transaction layer and returns the address it signed for together with
/// the signature.
pub trait HardwareDriver: Send + 'static {
    fn status(&mut self) -> Result<String, SignerError>;

    fn open(&mut self, transport: Box<dyn Transport>, passphrase: &str)
        -> Result<(), SignerError>;

    fn close(&mut self) -> Result<(), SignerError>;

    fn heartbeat(&mut self) -> Result<(), SignerError>;

    fn derive(&mut self, path: &DerivationPath) -> Result<Address, SignerError>;

    fn sign_transaction(
        &mut self,
        path: &DerivationPath,
        sign_bytes: &[u8],
    ) -> Result<(Address, Signature), SignerError>;
}

type Job<D> = Box<dyn FnOnce(&mut D) + Send>;

/// A [`TxSigner`] backed by a hardware driver.
pub struct HardwareSigner<D: HardwareDriver> {
    jobs: Option<Sender<Job<D>>>,
    /// Completion flag of the last call that timed out, if any.
    stalled: Mutex<Option<Arc<AtomicBool>>>,
    path: DerivationPath,
    timeout: Duration,
}

impl<D: HardwareDriver> HardwareSigner<D> {
    /// Move `driver` onto its own worker thread.
    ///
    /// The worker exits once the signer is dropped and the call in
    /// progress, if any, returns.
    pub fn new(mut driver: D, path: DerivationPath, timeout: Duration) -> Self {
        let (jobs, queue) = mpsc::channel::<Job<D>>();
        let spawned = thread::Builder::new()
            .name("hw-driver".to_string())
            .spawn(move || {
                for job in queue {
                    job(&mut driver);
                }
            });
        let jobs = match spawned {
            Ok(_) => Some(jobs),
            Err(e) => {
                tracing::error!(error = %e, "failed to start hardware driver worker");
                None
            }
        };
        Self {
            jobs,
            stalled: Mutex::new(None),
            path,
            timeout,
        }
    }

    pub fn from_config(driver: D, config: &HardwareConfig) -> Self {
        Self::new(
            driver,
            config.derivation_path.clone(),
            Duration::from_millis(config.timeout_ms),
        )
    }

    pub fn path(&self) -> &DerivationPath {
        &self.path
    }

    pub fn status(&self) -> Result<String, SignerError> {
        self.call("status", |d| d.status())
    }

    pub fn open(&self, transport: Box<dyn Transport>, passphrase: &str) -> Result<(), SignerError> {
        let passphrase = passphrase.to_owned();
        self.call("open", move |d| d.open(transport, &passphrase))
    }

    pub fn close(&self) -> Result<(), SignerError> {
        self.call("close", |d| d.close())
    }

    pub fn heartbeat(&self) -> Result<(), SignerError> {
        self.call("heartbeat", |d| d.heartbeat())
    }

    /// Address at this signer's derivation path.
    pub fn address(&self) -> Result<Address, SignerError> {
        let path = self.path.clone();
        self.call("derive", move |d| d.derive(&path))
    }

    fn stalled(&self) -> MutexGuard<'_, Option<Arc<AtomicBool>>> {
        self.stalled.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Fail fast while a call that timed out still occupies the device.
    fn ensure_idle(&self, op: &'static str) -> Result<(), SignerError> {
        let mut stalled = self.stalled();
        match stalled.as_ref() {
            Some(done) if !done.load(Ordering::Acquire) => {
                tracing::debug!(op, "hardware device busy with a timed-out call");
                Err(SignerError::Busy)
            }
            _ => {
                *stalled = None;
                Ok(())
            }
        }
    }

    /// Run `f` against the driver on the worker thread, waiting at most the
    /// configured timeout.
    fn call<T, F>(&self, op: &'static str, f: F) -> Result<T, SignerError>
    where
        T: Send + 'static,
        F: FnOnce(&mut D) -> Result<T, SignerError> + Send + 'static,
    {
        self.ensure_idle(op)?;
        let jobs = self
            .jobs
            .as_ref()
            .ok_or_else(|| SignerError::Driver("hardware driver worker not running".to_string()))?;

        let done = Arc::new(AtomicBool::new(false));
        let finished = Arc::clone(&done);
        let (reply, result) = mpsc::channel();
        let job: Job<D> = Box::new(move |driver: &mut D| {
            let _ = reply.send(f(driver));
            finished.store(true, Ordering::Release);
        });
        if jobs.send(job).is_err() {
            tracing::warn!(op, "hardware driver worker has exited");
            return Err(SignerError::Disconnected);
        }

        let timeout_ms = self.timeout.as_millis() as u64;
        match result.recv_timeout(self.timeout) {
            Ok(result) => {
                if let Err(e) = &result {
                    tracing::debug!(op, error = %e, "hardware driver call failed");
                }
                result
            }
            Err(RecvTimeoutError::Timeout) => {
                *self.stalled() = Some(done);
                tracing::warn!(op, timeout_ms, "hardware driver call timed out");
                Err(SignerError::Timeout { timeout_ms })
            }
            Err(RecvTimeoutError::Disconnected) => {
                tracing::warn!(op, "hardware driver worker exited without a result");
                Err(SignerError::Disconnected)
            }
        }
    }
}

impl<D: HardwareDriver> TxSigner for HardwareSigner<D> {
    fn sign(&self, sign_bytes: &[u8]) -> Result<(Address, Signature), SignerError> {
        let path = self.path.clone();
        let bytes = sign_bytes.to_vec();
        self.call("sign_transaction", move |d| d.sign_transaction(&path, &bytes))
    }
}
