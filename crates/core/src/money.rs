//! Non-negative monetary amounts backed by `rust_decimal`.
//!
//! Amounts keep full precision internally; rounding to two places happens
//! explicitly (`round_cents`) at the points where a figure is displayed or
//! summed, using midpoint-away-from-zero.

use core::fmt;
use core::iter::Sum;
use core::ops::Add;
use core::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_object::ValueObject;

/// Decimal places used for every displayed amount.
pub const CENT_PLACES: u32 = 2;

/// A non-negative amount of money (currency-agnostic).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Decimal", into = "Decimal")]
pub struct Money(Decimal);

impl ValueObject for Money {}

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    /// Wrap a decimal, flooring negatives at zero.
    pub fn new(amount: Decimal) -> Self {
        if amount > Decimal::ZERO {
            Self(amount)
        } else {
            Self::ZERO
        }
    }

    /// Whole currency units (e.g. `Money::whole(50_000)`).
    pub fn whole(units: u64) -> Self {
        Self(Decimal::from(units))
    }

    /// Permissive form-field parsing.
    ///
    /// Takes the leading decimal prefix of the trimmed text (`"12.5abc"` is
    /// 12.5, `"1e3"` is 1000). Empty, non-numeric, negative or
    /// unrepresentable input is zero.
    pub fn parse_lenient(raw: &str) -> Self {
        match scan_decimal(raw) {
            Some(value) if value > Decimal::ZERO => Self(value),
            Some(value) => {
                if value.is_sign_negative() && !value.is_zero() {
                    tracing::debug!(raw, "negative amount coerced to zero");
                }
                Self::ZERO
            }
            None => {
                if !raw.trim().is_empty() {
                    tracing::debug!(raw, "non-numeric amount coerced to zero");
                }
                Self::ZERO
            }
        }
    }

    /// Like [`Money::parse_lenient`], treating an absent field as zero.
    pub fn parse_field(raw: Option<&str>) -> Self {
        raw.map(Self::parse_lenient).unwrap_or(Self::ZERO)
    }

    pub fn amount(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Round to two decimal places (midpoint away from zero).
    pub fn round_cents(self) -> Self {
        Self(
            self.0
                .round_dp_with_strategy(CENT_PLACES, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// Multiply by a quantity. Saturates instead of overflowing.
    pub fn times(self, quantity: u32) -> Self {
        match self.0.checked_mul(Decimal::from(quantity)) {
            Some(value) => Self(value),
            None => {
                tracing::warn!(amount = %self.0, quantity, "amount overflow, saturating");
                Self(Decimal::MAX)
            }
        }
    }

    /// Multiply by a ratio (e.g. an insurance coverage share) and round to cents.
    pub fn scale(self, ratio: Decimal) -> Self {
        match self.0.checked_mul(ratio) {
            Some(value) => Self::new(value).round_cents(),
            None => {
                tracing::warn!(amount = %self.0, %ratio, "amount overflow, saturating");
                Self(Decimal::MAX)
            }
        }
    }

    /// `max(0, self - other)`.
    pub fn saturating_sub(self, other: Money) -> Self {
        Self::new(self.0 - other.0)
    }

    /// Fixed two-decimal, non-localized text (`"250000.00"`).
    pub fn to_fixed(&self) -> String {
        let mut rounded = self.round_cents().0;
        rounded.rescale(CENT_PLACES);
        rounded.to_string()
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        match self.0.checked_add(rhs.0) {
            Some(value) => Money(value),
            None => {
                tracing::warn!(lhs = %self.0, rhs = %rhs.0, "amount overflow, saturating");
                Money(Decimal::MAX)
            }
        }
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, |acc, amount| acc + amount)
    }
}

impl From<Decimal> for Money {
    fn from(value: Decimal) -> Self {
        Money::new(value)
    }
}

impl From<Money> for Decimal {
    fn from(value: Money) -> Self {
        value.0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_fixed())
    }
}

/// Strict parsing, for configuration and command-line values.
impl FromStr for Money {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = Decimal::from_str(s.trim())
            .map_err(|e| DomainError::validation(format!("invalid amount {s:?}: {e}")))?;
        if value.is_sign_negative() && !value.is_zero() {
            return Err(DomainError::validation(format!(
                "amount must not be negative: {s}"
            )));
        }
        Ok(Money::new(value))
    }
}

/// Parse the leading decimal number of `raw`: optional sign, digits, optional
/// fraction, optional exponent. Trailing text is ignored.
fn scan_decimal(raw: &str) -> Option<Decimal> {
    let s = raw.trim();
    let bytes = s.as_bytes();
    let mut pos = 0;

    let negative = match bytes.first() {
        Some(b'-') => {
            pos = 1;
            true
        }
        Some(b'+') => {
            pos = 1;
            false
        }
        _ => false,
    };

    let int_start = pos;
    pos += digit_run(&bytes[pos..]);
    let int_part = &s[int_start..pos];

    let mut frac_part = "";
    if bytes.get(pos) == Some(&b'.') {
        let frac_start = pos + 1;
        pos = frac_start + digit_run(&bytes[frac_start..]);
        frac_part = &s[frac_start..pos];
    }

    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }

    let mut normalized = String::with_capacity(int_part.len() + frac_part.len() + 3);
    if negative {
        normalized.push('-');
    }
    normalized.push_str(if int_part.is_empty() { "0" } else { int_part });
    if !frac_part.is_empty() {
        normalized.push('.');
        normalized.push_str(frac_part);
    }
    let mantissa = Decimal::from_str(&normalized).ok()?;

    // An exponent marker without digits ("5e", "5e+") is trailing text.
    let mut exponent: i64 = 0;
    if matches!(bytes.get(pos), Some(b'e' | b'E')) {
        let mut exp_pos = pos + 1;
        let exp_negative = match bytes.get(exp_pos) {
            Some(b'-') => {
                exp_pos += 1;
                true
            }
            Some(b'+') => {
                exp_pos += 1;
                false
            }
            _ => false,
        };
        let exp_digits = &s[exp_pos..exp_pos + digit_run(&bytes[exp_pos..])];
        if !exp_digits.is_empty() {
            let magnitude = exp_digits.parse::<i64>().unwrap_or(i64::MAX);
            exponent = if exp_negative { -magnitude } else { magnitude };
        }
    }

    apply_exponent(mantissa, exponent)
}

fn digit_run(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

/// `mantissa × 10^exponent`; `None` when the result does not fit a `Decimal`.
fn apply_exponent(mantissa: Decimal, exponent: i64) -> Option<Decimal> {
    let mut value = mantissa;
    for _ in 0..exponent.unsigned_abs() {
        if value.is_zero() {
            break;
        }
        value = if exponent > 0 {
            value.checked_mul(Decimal::TEN)?
        } else {
            value.checked_div(Decimal::TEN)?
        };
    }
    Some(value)
}
