//! Whole-rupee amounts.
//!
//! Prices on the site are quoted in whole rupees. The payment gateway works in
//! paise, but that conversion happens on the backend; the site only ever sends
//! and displays rupees.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, Mul};

use serde::{Deserialize, Serialize};

/// An amount in whole Indian rupees.
///
/// Arithmetic saturates instead of wrapping; a cart that overflows `u64`
/// rupees is not a realistic input.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Rupees(u64);

impl Rupees {
    /// Zero rupees.
    pub const ZERO: Self = Self(0);

    /// Create an amount from whole rupees.
    #[must_use]
    pub const fn new(amount: u64) -> Self {
        Self(amount)
    }

    /// Get the amount in whole rupees.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Format the amount with thousands separators, without the currency sign.
    ///
    /// ```
    /// use prana_core::Rupees;
    ///
    /// assert_eq!(Rupees::new(1_234_567).grouped(), "1,234,567");
    /// assert_eq!(Rupees::new(999).grouped(), "999");
    /// ```
    #[must_use]
    pub fn grouped(self) -> String {
        let digits = self.0.to_string();
        let mut out = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                out.push(',');
            }
            out.push(c);
        }
        out
    }
}

impl fmt::Display for Rupees {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "₹{}", self.grouped())
    }
}

impl Add for Rupees {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Mul<u32> for Rupees {
    type Output = Self;

    fn mul(self, rhs: u32) -> Self::Output {
        Self(self.0.saturating_mul(u64::from(rhs)))
    }
}

impl Sum for Rupees {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl From<u64> for Rupees {
    fn from(amount: u64) -> Self {
        Self(amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_groups_thousands() {
        assert_eq!(Rupees::new(0).to_string(), "₹0");
        assert_eq!(Rupees::new(1000).to_string(), "₹1,000");
        assert_eq!(Rupees::new(123_456).to_string(), "₹123,456");
    }

    #[test]
    fn test_sum_and_mul() {
        let total: Rupees = [Rupees::new(500) * 2, Rupees::new(1200) * 1]
            .into_iter()
            .sum();
        assert_eq!(total, Rupees::new(2200));
    }

    #[test]
    fn test_add_saturates() {
        assert_eq!(Rupees::new(u64::MAX) + Rupees::new(1), Rupees::new(u64::MAX));
    }
}
