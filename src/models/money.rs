//! Money and currency types
//!
//! Amounts are stored in cents (i64) to avoid floating-point precision issues.
//! A `Money` value carries no currency of its own; the currency travels beside
//! it on the record (fee item, payment) and decides how the amount is shown.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// Represents a monetary amount stored as cents (hundredths of the currency unit)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Create a Money amount from cents
    ///
    /// # Examples
    /// ```
    /// use feedesk_cli::models::Money;
    /// let amount = Money::from_cents(1050); // 10.50
    /// assert_eq!(amount.units(), 10);
    /// ```
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Create a Money amount from whole currency units
    pub const fn from_units(units: i64) -> Self {
        Self(units * 100)
    }

    /// Create a Money amount from units and cents
    pub const fn from_units_cents(units: i64, cents: i64) -> Self {
        Self(units * 100 + cents)
    }

    pub const fn zero() -> Self {
        Self(0)
    }

    /// Get the amount in cents
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Get the whole units portion (truncated toward zero)
    pub const fn units(&self) -> i64 {
        self.0 / 100
    }

    /// Get the cents portion (0-99)
    pub const fn cents_part(&self) -> i64 {
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

    pub const fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// The smaller of two amounts
    pub fn min(self, other: Self) -> Self {
        if self <= other {
            self
        } else {
            other
        }
    }

    /// Whole percentage of `total` that this amount represents, rounded down
    ///
    /// Returns 0 when `total` is zero or negative.
    pub fn percent_of(&self, total: Money) -> u32 {
        if !total.is_positive() || self.is_negative() {
            return 0;
        }
        ((self.0 as i128 * 100) / total.0 as i128) as u32
    }

    /// Parse a money amount from a string
    ///
    /// Accepts formats: "10.50", "-10.50", "$10.50", "ZWL 1,120,000", "10"
    pub fn parse(s: &str) -> Result<Self, MoneyParseError> {
        let trimmed = s.trim();

        let (negative, rest) = match trimmed.strip_prefix('-') {
            Some(stripped) => (true, stripped.trim_start()),
            None => (false, trimmed),
        };

        // Remove currency marker if present
        let rest = ["$", "ZWL", "ZIG", "USD"]
            .iter()
            .find_map(|prefix| rest.strip_prefix(prefix))
            .unwrap_or(rest)
            .trim();

        let invalid = || MoneyParseError::InvalidFormat(s.to_string());

        let (whole, fraction) = match rest.split_once('.') {
            Some((whole, fraction)) => (whole, Some(fraction)),
            None => (rest, None),
        };
        if whole.is_empty() && fraction.map_or(true, str::is_empty) {
            return Err(invalid());
        }

        let whole = strip_separators(whole).ok_or_else(invalid)?;
        let units: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid())?
        };

        // Sub-cent amounts are rejected rather than truncated
        let cents: i64 = match fraction {
            None | Some("") => 0,
            Some(f) if f.len() > 2 || !f.chars().all(|c| c.is_ascii_digit()) => {
                return Err(invalid());
            }
            Some(f) if f.len() == 1 => f.parse::<i64>().map_err(|_| invalid())? * 10,
            Some(f) => f.parse().map_err(|_| invalid())?,
        };

        let cents = units
            .checked_mul(100)
            .and_then(|c| c.checked_add(cents))
            .ok_or_else(invalid)?;

        Ok(Self(if negative { -cents } else { cents }))
    }

    /// Format with thousands separators and two decimals, e.g. "1,120,000.00"
    pub fn format_grouped(&self) -> String {
        let units = self.units().abs().to_string();
        let mut grouped = String::with_capacity(units.len() + units.len() / 3);
        for (i, ch) in units.chars().enumerate() {
            if i > 0 && (units.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }
        let sign = if self.is_negative() { "-" } else { "" };
        format!("{}{}.{:02}", sign, grouped, self.cents_part())
    }

    /// Format without separators, e.g. "1120000.00", for CSV cells
    pub fn format_plain(&self) -> String {
        let sign = if self.is_negative() { "-" } else { "" };
        format!("{}{}.{:02}", sign, self.units().abs(), self.cents_part())
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.format_grouped())
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

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
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

/// Currencies accepted by the school
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    /// US dollar
    #[default]
    Usd,
    /// Zimbabwe Gold, shown with the ZWL symbol
    Zig,
}

impl Currency {
    pub fn all() -> [Currency; 2] {
        [Currency::Usd, Currency::Zig]
    }

    /// ISO-style code shown in tables
    pub fn code(&self) -> &'static str {
        match self {
            Self::Usd => "USD",
            Self::Zig => "ZIG",
        }
    }

    /// Prefix used when displaying an amount
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Usd => "$",
            Self::Zig => "ZWL ",
        }
    }

    /// Format an amount in this currency, e.g. "$250.00" or "ZWL 875,000.00"
    pub fn format(&self, amount: Money) -> String {
        if amount.is_negative() {
            format!("-{}{}", self.symbol(), amount.abs().format_grouped())
        } else {
            format!("{}{}", self.symbol(), amount.format_grouped())
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "usd" | "$" | "us" => Some(Self::Usd),
            "zig" | "zwl" => Some(Self::Zig),
            _ => None,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.code())
    }
}

/// Exchange rate between USD and ZIG, expressed as ZIG per one USD
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeRate {
    /// Amount of ZIG bought by one USD
    pub zig_per_usd: Money,

    /// When the rate was last set
    #[serde(default)]
    pub as_of: Option<NaiveDate>,
}

impl Default for ExchangeRate {
    fn default() -> Self {
        Self {
            zig_per_usd: Money::from_units(3_500),
            as_of: None,
        }
    }
}

impl ExchangeRate {
    pub fn new(zig_per_usd: Money, as_of: Option<NaiveDate>) -> Self {
        Self { zig_per_usd, as_of }
    }

    /// Convert an amount between currencies
    ///
    /// Rounds half away from zero to the cent. A non-positive rate leaves
    /// amounts unconverted only when both currencies match; otherwise the
    /// result is zero.
    pub fn convert(&self, amount: Money, from: Currency, to: Currency) -> Money {
        if from == to {
            return amount;
        }
        let rate = self.zig_per_usd.cents() as i128;
        if rate <= 0 {
            return Money::zero();
        }
        let cents = amount.cents() as i128;
        let converted = match (from, to) {
            (Currency::Usd, Currency::Zig) => div_round(cents * rate, 100),
            (Currency::Zig, Currency::Usd) => div_round(cents * 100, rate),
            _ => cents,
        };
        Money::from_cents(converted as i64)
    }
}

impl fmt::Display for ExchangeRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "1 USD = {}", Currency::Zig.format(self.zig_per_usd))
    }
}

/// Digits of a whole-unit part with thousands separators removed
///
/// Separators must fall between groups of exactly three digits.
fn strip_separators(whole: &str) -> Option<String> {
    if !whole.chars().all(|c| c.is_ascii_digit() || c == ',') {
        return None;
    }
    if whole.contains(',') {
        let mut groups = whole.split(',');
        let lead = groups.next()?;
        if lead.is_empty() || lead.len() > 3 || groups.any(|g| g.len() != 3) {
            return None;
        }
    }
    Some(whole.replace(',', ""))
}

fn div_round(numerator: i128, denominator: i128) -> i128 {
    let quotient = numerator / denominator;
    let remainder = numerator % denominator;
    if remainder.abs() * 2 >= denominator.abs() {
        quotient + numerator.signum() * denominator.signum()
    } else {
        quotient
    }
}
