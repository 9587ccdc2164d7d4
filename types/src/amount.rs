//! Dual-denomination balances.
//!
//! Every balance on the ledger carries two independent components, one per
//! native unit. Components are arbitrary-precision signed integers: the type
//! can hold negative values, and deciding whether a negative or oversized
//! balance is acceptable belongs to the execution layer.

use num_bigint::BigInt;
use num_traits::{Signed, Zero};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};
use std::sync::LazyLock;

/// Shared immutable zero amount.
pub static ZERO: LazyLock<Amount> = LazyLock::new(Amount::zero);

/// An amount denominated in both the primary and the secondary unit.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Amount {
    #[serde(with = "crate::serde_fmt::decimal")]
    pub primary: BigInt,
    #[serde(with = "crate::serde_fmt::decimal")]
    pub secondary: BigInt,
}

impl Amount {
    pub fn new(primary: impl Into<BigInt>, secondary: impl Into<BigInt>) -> Self {
        Self {
            primary: primary.into(),
            secondary: secondary.into(),
        }
    }

    pub fn zero() -> Self {
        Self {
            primary: BigInt::zero(),
            secondary: BigInt::zero(),
        }
    }

    /// Only the primary unit is set.
    pub fn primary(value: impl Into<BigInt>) -> Self {
        Self::new(value, 0)
    }

    /// Only the secondary unit is set.
    pub fn secondary(value: impl Into<BigInt>) -> Self {
        Self::new(0, value)
    }

    pub fn is_zero(&self) -> bool {
        self.primary.is_zero() && self.secondary.is_zero()
    }

    /// Both components are `>= 0`.
    pub fn is_nonnegative(&self) -> bool {
        !self.primary.is_negative() && !self.secondary.is_negative()
    }

    /// Non-negative and at least one component strictly positive.
    pub fn is_positive(&self) -> bool {
        self.is_nonnegative() && !self.is_zero()
    }

    /// Component-wise `self >= other`.
    pub fn is_gte(&self, other: &Amount) -> bool {
        self.primary >= other.primary && self.secondary >= other.secondary
    }
}

impl Default for Amount {
    fn default() -> Self {
        Self::zero()
    }
}

impl Add for Amount {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self {
            primary: self.primary + rhs.primary,
            secondary: self.secondary + rhs.secondary,
        }
    }
}

impl<'a> Add<&'a Amount> for &'a Amount {
    type Output = Amount;
    fn add(self, rhs: &'a Amount) -> Amount {
        Amount {
            primary: &self.primary + &rhs.primary,
            secondary: &self.secondary + &rhs.secondary,
        }
    }
}

impl Sub for Amount {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self {
            primary: self.primary - rhs.primary,
            secondary: self.secondary - rhs.secondary,
        }
    }
}

impl<'a> Sub<&'a Amount> for &'a Amount {
    type Output = Amount;
    fn sub(self, rhs: &'a Amount) -> Amount {
        Amount {
            primary: &self.primary - &rhs.primary,
            secondary: &self.secondary - &rhs.secondary,
        }
    }
}

impl Neg for Amount {
    type Output = Self;
    fn neg(self) -> Self {
        Self {
            primary: -self.primary,
            secondary: -self.secondary,
        }
    }
}

impl<T: Into<BigInt>> Mul<T> for Amount {
    type Output = Self;
    fn mul(self, scalar: T) -> Self {
        let scalar = scalar.into();
        Self {
            primary: self.primary * &scalar,
            secondary: self.secondary * scalar,
        }
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} primary, {} secondary", self.primary, self.secondary)
    }
}
