//! Nullable infrastructure for deterministic testing.
//!
//! Device I/O is abstracted behind traits in `meridian-wallet-core`. This
//! crate provides test-friendly implementations that:
//! - Return deterministic keys and signatures
//! - Can be scripted to fail, stall or reject
//! - Never touch USB, serial ports or the network
//!
//! Usage: swap the real hardware driver for [`NullHardwareDriver`] in tests.

pub mod hardware;
pub mod transport;

pub use hardware::{DriverCall, NullHardwareDriver};
pub use transport::NullTransport;
