//! Fixed-point monetary amounts.
//!
//! Every policy threshold (100, 1000, 2000, 5000, 10000, 100000) is compared
//! against an [`Amount`], which stores integer minor units (cents) so that
//! comparisons never drift the way floating point would.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CaregateError, Result};

const MINOR_PER_MAJOR: i64 = 100;

/// A signed monetary amount in minor units (cents).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Amount(i64);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    /// Build an amount from minor units (cents).
    pub const fn from_minor(minor: i64) -> Self {
        Amount(minor)
    }

    /// Build an amount from whole major units (dollars).
    ///
    /// Saturates at the `i64` bounds in minor units.
    pub const fn from_major(major: i64) -> Self {
        Amount(major.saturating_mul(MINOR_PER_MAJOR))
    }

    /// Like [`Amount::from_major`], but `None` when the value does not fit.
    pub const fn checked_from_major(major: i64) -> Option<Self> {
        match major.checked_mul(MINOR_PER_MAJOR) {
            Some(minor) => Some(Amount(minor)),
            None => None,
        }
    }

    /// The raw value in minor units.
    pub const fn minor_units(self) -> i64 {
        self.0
    }

    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let per = MINOR_PER_MAJOR as u64;
        write!(f, "{}{}.{:02}", sign, abs / per, abs % per)
    }
}

impl FromStr for Amount {
    type Err = CaregateError;

    /// Parse a decimal string such as `"2500"`, `"99.95"` or `"-3.5"`.
    ///
    /// At most two fractional digits are accepted.
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let (negative, unsigned) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };

        let (whole, frac) = unsigned.split_once('.').unwrap_or((unsigned, ""));

        let all_digits = |part: &str| part.chars().all(|c| c.is_ascii_digit());
        if (whole.is_empty() && frac.is_empty()) || !all_digits(whole) || !all_digits(frac) {
            return Err(CaregateError::validation(format!("Invalid amount '{}'", s)));
        }
        if frac.len() > 2 {
            return Err(CaregateError::validation(format!(
                "Invalid amount '{}': at most two fractional digits are allowed",
                s
            )));
        }

        let overflow = || CaregateError::validation(format!("Amount '{}' is out of range", s));

        let whole_value: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| overflow())?
        };
        let frac_value: i64 = match frac.len() {
            0 => 0,
            // "5" in "3.5" means fifty cents
            1 => frac.parse::<i64>().map_err(|_| overflow())? * 10,
            _ => frac.parse().map_err(|_| overflow())?,
        };

        let minor = whole_value
            .checked_mul(MINOR_PER_MAJOR)
            .and_then(|v| v.checked_add(frac_value))
            .ok_or_else(overflow)?;

        Ok(Amount(if negative { -minor } else { minor }))
    }
}
