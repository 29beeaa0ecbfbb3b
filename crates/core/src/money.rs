//! Money in minor units.
//!
//! The backend stores every amount as `DECIMAL(p, 2)` and sends it either
//! as a JSON number or as text like `"1500.00"`. [`Money`] keeps the value
//! as an integer count of hundredths so nothing is rounded on the way
//! through, and writes it back as a two-decimal string.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::DomainError;

/// Digits after the decimal point in every backend amount column.
pub const SCALE: u32 = 2;
const MINOR_PER_UNIT: i64 = 10_i64.pow(SCALE);

/// An amount in hundredths of the currency unit.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_minor(minor: i64) -> Self {
        Self(minor)
    }

    /// Whole units, e.g. `Money::from_units(1500)` is `1500.00`.
    pub fn from_units(units: i64) -> Option<Self> {
        units.checked_mul(MINOR_PER_UNIT).map(Self)
    }

    pub const fn minor(&self) -> i64 {
        self.0
    }

    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Self)
    }

    /// `self × factor`, rounded half away from zero to the nearest minor
    /// unit. Used for rate × hours.
    pub fn mul_rounded(self, factor: f64) -> Option<Money> {
        let product = (self.0 as f64 * factor).round();
        if product.is_finite() && product >= i64::MIN as f64 && product <= i64::MAX as f64 {
            Some(Self(product as i64))
        } else {
            None
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let per = MINOR_PER_UNIT as u64;
        write!(f, "{sign}{}.{:02}", abs / per, abs % per)
    }
}

impl FromStr for Money {
    type Err = DomainError;

    /// Exact decimal parse: `"1500"`, `"1500.5"`, `"-0.75"`, `"1e3"` is
    /// refused. Digits past the second decimal must be zeros.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || DomainError::validation(format!("not an amount: {s:?}"));
        let text = s.trim();
        let (negative, digits) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text.strip_prefix('+').unwrap_or(text)),
        };
        let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));
        if whole.is_empty() && fraction.is_empty() {
            return Err(bad());
        }
        if !whole.chars().all(|c| c.is_ascii_digit()) || !fraction.chars().all(|c| c.is_ascii_digit()) {
            return Err(bad());
        }
        let (kept, rest) = fraction.split_at(fraction.len().min(SCALE as usize));
        if rest.chars().any(|c| c != '0') {
            return Err(DomainError::validation(format!(
                "{s:?} has more than {SCALE} decimal places"
            )));
        }

        let whole: i64 = if whole.is_empty() { 0 } else { whole.parse().map_err(|_| bad())? };
        let mut minor_part: i64 = if kept.is_empty() { 0 } else { kept.parse().map_err(|_| bad())? };
        if kept.len() < SCALE as usize {
            minor_part *= 10_i64.pow(SCALE - kept.len() as u32);
        }
        let minor = whole
            .checked_mul(MINOR_PER_UNIT)
            .and_then(|m| m.checked_add(minor_part))
            .ok_or_else(bad)?;
        Ok(Self(if negative { -minor } else { minor }))
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Integer(i64),
    Number(f64),
    Text(String),
}

impl NumberOrText {
    fn into_money(self) -> Result<Option<Money>, DomainError> {
        match self {
            NumberOrText::Integer(units) => Money::from_units(units)
                .map(Some)
                .ok_or_else(|| DomainError::validation(format!("amount {units} overflows"))),
            // shortest round-trip text of the double, e.g. 0.1 -> "0.1"
            NumberOrText::Number(n) if n.is_finite() => n.to_string().parse().map(Some),
            NumberOrText::Number(n) => Err(DomainError::validation(format!("not an amount: {n}"))),
            NumberOrText::Text(s) if s.trim().is_empty() => Ok(None),
            NumberOrText::Text(s) => s.parse().map(Some),
        }
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        NumberOrText::deserialize(deserializer)?
            .into_money()
            .map_err(serde::de::Error::custom)?
            .ok_or_else(|| serde::de::Error::custom("blank amount"))
    }
}

/// For `Option<Money>` fields: `null`, a missing field and `""` are `None`.
pub fn opt_money<'de, D>(deserializer: D) -> Result<Option<Money>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumberOrText>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) => raw.into_money().map_err(serde::de::Error::custom),
    }
}
