//! BIP-32 style key derivation paths for hardware wallets.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::WalletError;

/// Offset marking a hardened path component.
pub const HARDENED: u32 = 0x8000_0000;

/// Default account path: `m/44'/500'/0'/0/0`.
pub const DEFAULT_PATH: &str = "m/44'/500'/0'/0/0";

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DerivationPath(Vec<u32>);

impl DerivationPath {
    pub fn new(components: Vec<u32>) -> Self {
        Self(components)
    }

    pub fn components(&self) -> &[u32] {
        &self.0
    }

    /// Path with the final component replaced by `index`.
    pub fn with_index(&self, index: u32) -> Self {
        let mut components = self.0.clone();
        match components.last_mut() {
            Some(last) => *last = index,
            None => components.push(index),
        }
        Self(components)
    }
}

impl Default for DerivationPath {
    fn default() -> Self {
        Self(vec![44 | HARDENED, 500 | HARDENED, HARDENED, 0, 0])
    }
}

impl FromStr for DerivationPath {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || WalletError::Config(format!("invalid derivation path: {s}"));
        let mut parts = s.trim().split('/');
        if parts.next() != Some("m") {
            return Err(invalid());
        }
        let components = parts
            .map(|part| {
                let (digits, hardened) = match part.strip_suffix(['\'', 'h']) {
                    Some(digits) => (digits, true),
                    None => (part, false),
                };
                let index: u32 = digits.parse().map_err(|_| invalid())?;
                if index >= HARDENED {
                    return Err(invalid());
                }
                Ok(if hardened { index | HARDENED } else { index })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self(components))
    }
}

impl TryFrom<String> for DerivationPath {
    type Error = WalletError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<DerivationPath> for String {
    fn from(path: DerivationPath) -> Self {
        path.to_string()
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("m")?;
        for c in &self.0 {
            if c & HARDENED != 0 {
                write!(f, "/{}'", c & !HARDENED)?;
            } else {
                write!(f, "/{c}")?;
            }
        }
        Ok(())
    }
}
