use std::{
    fmt,
    ops::{Add, AddAssign, Sub, SubAssign},
    str::FromStr,
};

use crate::LedgerError;

/// Money amount represented as **integer paise**.
///
/// Use this type for monetary values crossing the API boundary (form input,
/// CLI arguments, display). Stored columns carry the raw `i64` minor units to
/// avoid floating-point drift.
///
/// # Examples
///
/// ```rust
/// use ledger::MoneyPaise;
///
/// let amount = MoneyPaise::new(12_34);
/// assert_eq!(amount.paise(), 1234);
/// assert_eq!(amount.to_string(), "₹12.34");
/// ```
///
/// Parsing from user input (accepts `.` or `,` as decimal separator; rejects
/// more than 2 decimals):
///
/// ```rust
/// use ledger::MoneyPaise;
///
/// assert_eq!("4000".parse::<MoneyPaise>().unwrap().paise(), 400_000);
/// assert_eq!("10,5".parse::<MoneyPaise>().unwrap().paise(), 1050);
/// assert!("12.345".parse::<MoneyPaise>().is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct MoneyPaise(i64);

impl MoneyPaise {
    pub const ZERO: MoneyPaise = MoneyPaise(0);

    /// Creates a new amount from integer paise.
    #[must_use]
    pub const fn new(paise: i64) -> Self {
        Self(paise)
    }

    /// Returns the raw value in paise.
    #[must_use]
    pub const fn paise(self) -> i64 {
        self.0
    }

    /// Returns `true` if the amount is 0.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if the amount is strictly positive.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Checked addition (returns `None` on overflow).
    #[must_use]
    pub fn checked_add(self, rhs: MoneyPaise) -> Option<MoneyPaise> {
        self.0.checked_add(rhs.0).map(MoneyPaise)
    }

    /// Checked subtraction (returns `None` on overflow).
    #[must_use]
    pub fn checked_sub(self, rhs: MoneyPaise) -> Option<MoneyPaise> {
        self.0.checked_sub(rhs.0).map(MoneyPaise)
    }
}

impl fmt::Display for MoneyPaise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let rupees = abs / 100;
        let paise = abs % 100;
        write!(f, "{sign}₹{rupees}.{paise:02}")
    }
}

impl From<i64> for MoneyPaise {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<MoneyPaise> for i64 {
    fn from(value: MoneyPaise) -> Self {
        value.0
    }
}

impl Add for MoneyPaise {
    type Output = MoneyPaise;

    fn add(self, rhs: MoneyPaise) -> Self::Output {
        MoneyPaise(self.0 + rhs.0)
    }
}

impl AddAssign for MoneyPaise {
    fn add_assign(&mut self, rhs: MoneyPaise) {
        self.0 += rhs.0;
    }
}

impl Sub for MoneyPaise {
    type Output = MoneyPaise;

    fn sub(self, rhs: MoneyPaise) -> Self::Output {
        MoneyPaise(self.0 - rhs.0)
    }
}

impl SubAssign for MoneyPaise {
    fn sub_assign(&mut self, rhs: MoneyPaise) {
        self.0 -= rhs.0;
    }
}

impl FromStr for MoneyPaise {
    type Err = LedgerError;

    /// Parses a decimal string into paise.
    ///
    /// Accepts `.` or `,` as decimal separator and an optional leading `+`.
    /// Negative amounts are rejected: the ledger never records one.
    ///
    /// Validation rules:
    /// - max 2 fractional digits (rejects `12.345`)
    /// - rejects empty/invalid strings
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let empty = || LedgerError::InvalidAmount("empty amount".to_string());
        let invalid = || LedgerError::InvalidAmount("invalid amount".to_string());
        let overflow = || LedgerError::InvalidAmount("amount too large".to_string());

        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(empty());
        }

        if trimmed.starts_with('-') {
            return Err(LedgerError::InvalidAmount(
                "amount must not be negative".to_string(),
            ));
        }
        let rest = trimmed.strip_prefix('+').unwrap_or(trimmed).trim();
        if rest.is_empty() {
            return Err(empty());
        }

        let rest = rest.replace(',', ".");
        let mut parts = rest.split('.');
        let rupees_str = parts.next().ok_or_else(invalid)?;
        let paise_str = parts.next();

        if parts.next().is_some() {
            return Err(invalid());
        }

        if rupees_str.is_empty() || !rupees_str.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let rupees: i64 = rupees_str.parse().map_err(|_| invalid())?;

        let paise: i64 = match paise_str {
            None => 0,
            Some("") => 0,
            Some(frac) => {
                if !frac.chars().all(|c| c.is_ascii_digit()) {
                    return Err(invalid());
                }
                match frac.len() {
                    1 => frac.parse::<i64>().map_err(|_| invalid())? * 10,
                    2 => frac.parse::<i64>().map_err(|_| invalid())?,
                    _ => {
                        return Err(LedgerError::InvalidAmount(
                            "too many decimals".to_string(),
                        ));
                    }
                }
            }
        };

        rupees
            .checked_mul(100)
            .and_then(|v| v.checked_add(paise))
            .map(MoneyPaise)
            .ok_or_else(overflow)
    }
}
