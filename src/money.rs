//! Fixed-point currency amounts.
//!
//! Balances and wagers are stored as a signed count of cents, matching
//! the two-decimal precision of the accounting schema this crate
//! settles against. Floating point never touches the ledger.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// Cents per major unit (two decimal places).
const SCALE: i64 = 100;

/// A currency amount with two decimal places of precision.
///
/// Arithmetic is exact; the only rounding point is [`Amount::mul_frac`],
/// which rounds half away from zero.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Amount(i64);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    /// Whole major units, e.g. `Amount::from_int(10)` is 10.00.
    pub const fn from_int(value: i64) -> Self {
        Amount(value * SCALE)
    }

    /// Raw cent count, e.g. `Amount::from_cents(1050)` is 10.50.
    pub const fn from_cents(cents: i64) -> Self {
        Amount(cents)
    }

    pub const fn cents(self) -> i64 {
        self.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Multiply by an integer factor (payout multipliers are integers
    /// for every game except blackjack naturals).
    pub fn mul_int(self, factor: i64) -> Self {
        Amount(self.0 * factor)
    }

    /// Multiply by `num / den`, rounding half away from zero.
    pub fn mul_frac(self, num: i64, den: i64) -> Self {
        debug_assert!(den > 0, "fraction denominator must be positive");
        let scaled = self.0 as i128 * num as i128;
        let den = den as i128;
        let rounded = if scaled >= 0 {
            (scaled + den / 2) / den
        } else {
            (scaled - den / 2) / den
        };
        Amount(rounded as i64)
    }
}

impl Add for Amount {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Amount(self.0 + other.0)
    }
}

impl Sub for Amount {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Amount(self.0 - other.0)
    }
}

impl Neg for Amount {
    type Output = Self;
    fn neg(self) -> Self {
        Amount(-self.0)
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl SubAssign for Amount {
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, |acc, a| acc + a)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / SCALE as u64, abs % SCALE as u64)
    }
}
