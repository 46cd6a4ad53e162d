//! Money type for representing currency amounts
//!
//! Amounts are stored in minor units (cents) as i64 so sums over a ledger
//! never drift the way floating point does.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Sub};

/// A monetary amount in minor units (hundredths of the currency unit)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Create a Money amount from minor units
    ///
    /// # Examples
    /// ```
    /// use expense_tracker::models::Money;
    /// let amount = Money::from_minor(1050); // $10.50
    /// assert_eq!(amount.minor(), 1050);
    /// ```
    pub const fn from_minor(minor: i64) -> Self {
        Self(minor)
    }

    /// Create a Money amount from major and minor parts
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        Self(major * 100 + minor)
    }

    pub const fn zero() -> Self {
        Self(0)
    }

    /// Get the amount in minor units
    pub const fn minor(&self) -> i64 {
        self.0
    }

    /// Whole major units, truncated toward zero
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// The minor remainder (0-99)
    pub const fn minor_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Sum that fails instead of wrapping past `i64`
    pub const fn checked_add(self, other: Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(sum) => Some(Self(sum)),
            None => None,
        }
    }

    /// Parse a money amount from a string
    ///
    /// Accepts "10.50", "$10.50", "10" (major units) and "10.5". More than
    /// two fractional digits is an error.
    pub fn parse(s: &str) -> Result<Self, MoneyParseError> {
        let s = s.trim();

        let (negative, s) = match s.strip_prefix('-') {
            Some(stripped) => (true, stripped),
            None => (false, s),
        };
        let s = s.strip_prefix('$').unwrap_or(s);
        let invalid = || MoneyParseError::InvalidFormat(s.to_string());

        let minor = match s.split_once('.') {
            Some((major, fraction)) => {
                let major: i64 = major.parse().map_err(|_| invalid())?;
                if fraction.contains('.') || !fraction.chars().all(|c| c.is_ascii_digit()) {
                    return Err(invalid());
                }
                let fraction: i64 = match fraction.len() {
                    0 => 0,
                    1 => fraction.parse::<i64>().map_err(|_| invalid())? * 10,
                    2 => fraction.parse().map_err(|_| invalid())?,
                    _ => return Err(invalid()),
                };
                major
                    .checked_mul(100)
                    .and_then(|m| m.checked_add(fraction))
                    .ok_or_else(invalid)?
            }
            None => s
                .parse::<i64>()
                .ok()
                .and_then(|major| major.checked_mul(100))
                .ok_or_else(invalid)?,
        };

        Ok(Self(if negative { -minor } else { minor }))
    }

    /// Format with a currency symbol
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        let sign = if self.is_negative() { "-" } else { "" };
        format!(
            "{}{}{}.{:02}",
            sign,
            symbol,
            self.major().abs(),
            self.minor_part()
        )
    }
}

/// Whole-number percentage of `part` over `whole`, rounded half-up
///
/// Returns 0 when `whole` is not positive. Results above 100 are kept as-is.
pub fn percent_of(part: Money, whole: Money) -> i64 {
    if !whole.is_positive() {
        return 0;
    }
    let part = part.minor() as i128;
    let whole = whole.minor() as i128;
    // floor((200 * part + whole) / (2 * whole)) rounds halves upward
    let scaled = (200 * part + whole).div_euclid(2 * whole);
    scaled.clamp(i64::MIN as i128, i64::MAX as i128) as i64
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_with_symbol("$"))
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0 - other.0)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> std::iter::Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

/// Error type for money parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoneyParseError {
    InvalidFormat(String),
}

impl fmt::Display for MoneyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoneyParseError::InvalidFormat(s) => write!(f, "Invalid money format: {}", s),
        }
    }
}

impl std::error::Error for MoneyParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parts() {
        let m = Money::from_minor(1050);
        assert_eq!(m.major(), 10);
        assert_eq!(m.minor_part(), 50);
        assert_eq!(Money::from_major_minor(10, 50), m);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_minor(1050).to_string(), "$10.50");
        assert_eq!(Money::zero().to_string(), "$0.00");
        assert_eq!(Money::from_minor(-1050).to_string(), "-$10.50");
        assert_eq!(Money::from_minor(5).format_with_symbol("€"), "€0.05");
    }

    #[test]
    fn test_parse() {
        assert_eq!(Money::parse("10.50").unwrap().minor(), 1050);
        assert_eq!(Money::parse("$10.50").unwrap().minor(), 1050);
        assert_eq!(Money::parse("-10.50").unwrap().minor(), -1050);
        assert_eq!(Money::parse("10").unwrap().minor(), 1000);
        assert_eq!(Money::parse("10.5").unwrap().minor(), 1050);
        assert_eq!(Money::parse("0.05").unwrap().minor(), 5);
        assert!(Money::parse("ten").is_err());
        assert!(Money::parse("1.2.3").is_err());
    }

    #[test]
    fn test_parse_rejects_sub_cent_digits() {
        assert_eq!(
            Money::parse("10.999"),
            Err(MoneyParseError::InvalidFormat("10.999".into()))
        );
        assert!(Money::parse("0.001").is_err());
        assert_eq!(Money::parse("10.90").unwrap().minor(), 1090);
    }

    #[test]
    fn test_checked_add() {
        let max = Money::from_minor(i64::MAX);
        assert_eq!(max.checked_add(Money::from_minor(1)), None);
        assert_eq!(
            Money::from_minor(150).checked_add(Money::from_minor(50)),
            Some(Money::from_minor(200))
        );
    }

    #[test]
    fn test_sum() {
        let amounts = [
            Money::from_minor(100),
            Money::from_minor(200),
            Money::from_minor(300),
        ];
        let total: Money = amounts.iter().sum();
        assert_eq!(total.minor(), 600);
    }

    #[test]
    fn test_percent_of_rounds_half_up() {
        assert_eq!(percent_of(Money::from_minor(1), Money::from_minor(200)), 1);
        assert_eq!(percent_of(Money::from_minor(1), Money::from_minor(300)), 0);
        assert_eq!(percent_of(Money::from_minor(2), Money::from_minor(3)), 67);
        assert_eq!(percent_of(Money::from_minor(400), Money::from_minor(1000)), 40);
    }

    #[test]
    fn test_percent_of_zero_target() {
        assert_eq!(percent_of(Money::from_minor(500), Money::zero()), 0);
        assert_eq!(percent_of(Money::zero(), Money::zero()), 0);
    }

    #[test]
    fn test_percent_of_not_clamped() {
        assert_eq!(percent_of(Money::from_minor(1500), Money::from_minor(1000)), 150);
    }

    #[test]
    fn test_serialization() {
        let m = Money::from_minor(1050);
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, "1050");
        let deserialized: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(m, deserialized);
    }
}
