use std::iter::Sum;

use crate::{Currency, EngineError, currency::Grouping};

/// Signed money amount represented as **integer minor units** (paise, cents).
///
/// Use this type for **all** monetary values in the engine (expense amounts,
/// subtotals, statistics) to avoid floating-point drift. Expense amounts are
/// always positive; sums use [`Money::saturating_add`] so a corrupted store can
/// never overflow the statistics.
///
/// # Examples
///
/// ```rust
/// use engine::{Currency, Money};
///
/// let amount = Money::new(12_345_678_90);
/// assert_eq!(amount.format(Currency::Inr), "₹1,23,45,678.90");
/// assert_eq!(amount.format(Currency::Eur), "€12,345,678.90");
/// ```
///
/// Parsing from user input (any decimal number, rounded to minor units):
///
/// ```rust
/// use engine::{Currency, Money};
///
/// assert_eq!(Money::parse_major("10", Currency::Inr).unwrap().minor(), 1000);
/// assert_eq!(Money::parse_major("12.345", Currency::Inr).unwrap().minor(), 1235);
/// assert_eq!(Money::parse_major("1e3", Currency::Inr).unwrap().minor(), 100_000);
/// assert!(Money::parse_major("10,5", Currency::Inr).is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    /// Creates a new amount from integer minor units.
    #[must_use]
    pub const fn new(minor: i64) -> Self {
        Self(minor)
    }

    /// Returns the raw value in minor units.
    #[must_use]
    pub const fn minor(self) -> i64 {
        self.0
    }

    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    #[must_use]
    pub const fn saturating_add(self, rhs: Money) -> Money {
        Money(self.0.saturating_add(rhs.0))
    }

    /// Converts a major-unit floating value (as found in the persisted JSON)
    /// into minor units, rounding half away from zero.
    ///
    /// Returns `None` for NaN, infinities and values outside the `i64` range.
    #[must_use]
    pub fn from_major_f64(value: f64, currency: Currency) -> Option<Money> {
        if !value.is_finite() {
            return None;
        }
        let scaled = (value * scale(currency) as f64).round();
        if scaled < i64::MIN as f64 || scaled > i64::MAX as f64 {
            return None;
        }
        Some(Money(scaled as i64))
    }

    /// Major-unit floating value, used only at the JSON boundary.
    #[must_use]
    pub fn to_major_f64(self, currency: Currency) -> f64 {
        self.0 as f64 / scale(currency) as f64
    }

    /// Parses a decimal number in major units into minor units.
    ///
    /// Accepts an optional sign, a plain or fractional mantissa (`12`, `12.5`,
    /// `.5`, `7.`) and an optional exponent (`1e3`, `2.5E-1`). Extra fraction
    /// digits are rounded half away from zero, so `12.345` becomes `1235`
    /// minor units. The arithmetic is done on the decimal digits, never on a
    /// binary float.
    pub fn parse_major(s: &str, currency: Currency) -> Result<Self, EngineError> {
        let invalid = || EngineError::InvalidAmount(format!("invalid amount: {s:?}"));
        let overflow = || EngineError::InvalidAmount("amount too large".to_string());

        let trimmed = s.trim();
        let (negative, rest) = if let Some(stripped) = trimmed.strip_prefix('-') {
            (true, stripped)
        } else if let Some(stripped) = trimmed.strip_prefix('+') {
            (false, stripped)
        } else {
            (false, trimmed)
        };

        let (mantissa, exponent) = match rest.split_once(['e', 'E']) {
            Some((mantissa, exponent)) => {
                (mantissa, parse_exponent(exponent).ok_or_else(invalid)?)
            }
            None => (rest, 0),
        };
        let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));
        let is_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(invalid());
        }
        if !is_digits(int_part) || !is_digits(frac_part) {
            return Err(invalid());
        }

        let digits = format!("{int_part}{frac_part}");
        let digits = digits.trim_start_matches('0');
        if digits.is_empty() {
            return Ok(Money::ZERO);
        }

        // Power of ten that turns `digits` into minor units.
        let shift = exponent
            .checked_add(i64::from(currency.minor_units()))
            .and_then(|v| v.checked_sub(i64::try_from(frac_part.len()).ok()?))
            .ok_or_else(overflow)?;
        let magnitude = scale_digits(digits, shift).ok_or_else(overflow)?;
        let magnitude = i64::try_from(magnitude).map_err(|_| overflow())?;

        Ok(Money(if negative { -magnitude } else { magnitude }))
    }

    /// Formats with symbol and grouping, e.g. `₹1,23,456.00`.
    #[must_use]
    pub fn format(self, currency: Currency) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!("{sign}{}{}", currency.symbol(), self.format_plain(currency).trim_start_matches('-'))
    }

    /// Formats with grouping but without the currency symbol, e.g. `1,23,456.00`.
    #[must_use]
    pub fn format_plain(self, currency: Currency) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let scale = scale(currency).unsigned_abs();
        let major = group_digits(&(abs / scale).to_string(), currency.grouping());
        let digits = usize::from(currency.minor_units());
        if digits == 0 {
            return format!("{sign}{major}");
        }
        let minor = abs % scale;
        format!("{sign}{major}.{minor:0digits$}")
    }

    /// Plain decimal in major units without grouping, e.g. `123456.00`.
    #[must_use]
    pub fn to_major_string(self, currency: Currency) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let scale = scale(currency).unsigned_abs();
        let digits = usize::from(currency.minor_units());
        if digits == 0 {
            return format!("{sign}{}", abs / scale);
        }
        format!("{sign}{}.{:0digits$}", abs / scale, abs % scale)
    }
}

fn scale(currency: Currency) -> i64 {
    10_i64.pow(u32::from(currency.minor_units()))
}

fn parse_exponent(raw: &str) -> Option<i64> {
    let unsigned = raw.strip_prefix(['+', '-']).unwrap_or(raw);
    if unsigned.is_empty() || !unsigned.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

/// `digits × 10^shift`, rounded half away from zero when `shift` is negative.
///
/// `digits` is a non-empty run of ASCII digits without leading zeros. `None`
/// means the result does not fit.
fn scale_digits(digits: &str, shift: i64) -> Option<u128> {
    if shift >= 0 {
        let shift = u32::try_from(shift).ok()?;
        let base: u128 = digits.parse().ok()?;
        return base.checked_mul(10_u128.checked_pow(shift)?);
    }

    let dropped = usize::try_from(shift.unsigned_abs()).ok()?;
    if dropped > digits.len() {
        return Some(0);
    }
    let (kept, rest) = digits.split_at(digits.len() - dropped);
    let kept: u128 = if kept.is_empty() { 0 } else { kept.parse().ok()? };
    let round_up = rest.as_bytes().first().is_some_and(|&b| b >= b'5');
    kept.checked_add(u128::from(round_up))
}

fn group_digits(digits: &str, grouping: Grouping) -> String {
    let len = digits.len();
    if len <= 3 {
        return digits.to_string();
    }

    let (head, tail) = digits.split_at(len - 3);
    let step = match grouping {
        Grouping::Thousands => 3,
        Grouping::Indian => 2,
    };

    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > step {
        groups.push(&head[end - step..end]);
        end -= step;
    }
    groups.push(&head[..end]);
    groups.reverse();

    format!("{},{tail}", groups.join(","))
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::ZERO, Money::saturating_add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}
