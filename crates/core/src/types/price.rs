//! Type-safe price representation using decimal arithmetic.
//!
//! Prices are kept as [`Decimal`] so sums of `price × quantity` stay exact;
//! rounding only happens when a value is formatted for display or converted
//! to the payment provider's minor units.

use core::fmt;
use std::str::FromStr;

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is below zero.
    #[error("price cannot be negative (got {0})")]
    Negative(Decimal),
    /// The input is NaN, infinite, or out of decimal range.
    #[error("price must be a finite number")]
    NotFinite,
    /// The input string is not a number.
    #[error("invalid price: {0}")]
    Invalid(String),
    /// The amount is above [`Price::MAX`].
    #[error("price cannot exceed {max} (got {0})", max = Price::MAX)]
    TooLarge(Decimal),
    /// The amount has more significant digits than the stored record keeps.
    #[error("price has more than {max} significant digits (got {0})", max = Price::SIGNIFICANT_DIGITS)]
    TooPrecise(Decimal),
}

/// A non-negative unit price in the currency's standard unit (naira, not kobo).
///
/// Serialized as a plain JSON number so the persisted record stays
/// `[{"id": .., "name": .., "price": 1000.0, "qty": 1}]`. A JSON number is
/// read back as an `f64`, so a price carries at most
/// [`SIGNIFICANT_DIGITS`](Self::SIGNIFICANT_DIGITS) digits and is bounded by
/// [`MAX`](Self::MAX); within those limits the stored value reads back
/// unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "PriceRepr", into = "PriceRepr")]
pub struct Price(Decimal);

#[derive(Serialize, Deserialize)]
#[serde(transparent)]
struct PriceRepr(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Price {
    /// A price of zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Largest accepted price (one trillion).
    pub const MAX: Decimal = Decimal::from_parts(3_567_587_328, 232, 0, false, 0);

    /// Significant digits an `f64` record is guaranteed to read back exactly.
    pub const SIGNIFICANT_DIGITS: u32 = 15;

    /// Create a new price.
    ///
    /// # Errors
    ///
    /// Returns an error if `amount` is negative, above [`Price::MAX`], or has
    /// more than [`Price::SIGNIFICANT_DIGITS`] significant digits.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount));
        }
        if amount > Self::MAX {
            return Err(PriceError::TooLarge(amount));
        }
        let amount = amount.normalize();
        if significant_digits(amount) > Self::SIGNIFICANT_DIGITS {
            return Err(PriceError::TooPrecise(amount));
        }
        Ok(Self(amount))
    }

    /// Round `amount` to [`Price::SIGNIFICANT_DIGITS`] and build a price.
    ///
    /// Used for amounts that went through an `f64`, where digits past the
    /// fifteenth are conversion noise.
    ///
    /// # Errors
    ///
    /// Returns an error if `amount` is negative or above [`Price::MAX`].
    pub fn rounded(amount: Decimal) -> Result<Self, PriceError> {
        let rounded = amount
            .round_sf(Self::SIGNIFICANT_DIGITS)
            .ok_or(PriceError::NotFinite)?;
        Self::new(rounded)
    }

    /// Create a price from a floating point amount, as read from markup or JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not finite or is negative.
    pub fn from_f64(amount: f64) -> Result<Self, PriceError> {
        if !amount.is_finite() {
            return Err(PriceError::NotFinite);
        }
        let decimal = Decimal::from_f64(amount).ok_or(PriceError::NotFinite)?;
        Self::rounded(decimal)
    }

    /// The amount as a decimal.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<PriceRepr> for Price {
    type Error = PriceError;

    fn try_from(repr: PriceRepr) -> Result<Self, Self::Error> {
        Self::rounded(repr.0)
    }
}

/// Number of significant digits in a normalized decimal (zero has one).
fn significant_digits(amount: Decimal) -> u32 {
    amount
        .mantissa()
        .unsigned_abs()
        .checked_ilog10()
        .map_or(1, |log| log + 1)
}

impl From<Price> for PriceRepr {
    fn from(price: Price) -> Self {
        Self(price.0)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let decimal = Decimal::from_str(s.trim())
            .or_else(|_| Decimal::from_scientific(s.trim()))
            .map_err(|_| PriceError::Invalid(s.to_string()))?;
        Self::new(decimal)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Errors that can occur when parsing a [`CurrencyCode`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unsupported currency code: {0}")]
pub struct CurrencyCodeError(pub String);

/// ISO 4217 currency codes accepted by the payment provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[allow(clippy::upper_case_acronyms)]
pub enum CurrencyCode {
    #[default]
    NGN,
    USD,
    GHS,
    ZAR,
    KES,
}

impl CurrencyCode {
    /// Display glyph placed in front of formatted amounts.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::NGN => "\u{20a6}",
            Self::USD => "$",
            Self::GHS => "GH\u{20b5}",
            Self::ZAR => "R",
            Self::KES => "KSh",
        }
    }

    /// The three-letter ISO code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::NGN => "NGN",
            Self::USD => "USD",
            Self::GHS => "GHS",
            Self::ZAR => "ZAR",
            Self::KES => "KES",
        }
    }

    /// Number of minor units (kobo, cents, pesewas) per standard unit.
    #[must_use]
    pub const fn minor_units(self) -> u32 {
        100
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for CurrencyCode {
    type Err = CurrencyCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "NGN" => Ok(Self::NGN),
            "USD" => Ok(Self::USD),
            "GHS" => Ok(Self::GHS),
            "ZAR" => Ok(Self::ZAR),
            "KES" => Ok(Self::KES),
            _ => Err(CurrencyCodeError(s.to_string())),
        }
    }
}

/// Display formatting for money amounts.
///
/// Formatting is presentation only: the output is never parsed back into a
/// stored value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoneyFormat {
    /// Currency whose glyph prefixes the amount.
    pub currency: CurrencyCode,
    /// Separator between groups of three integer digits.
    pub group_separator: char,
    /// Separator between the integer part and the two decimals.
    pub decimal_separator: char,
}

impl Default for MoneyFormat {
    fn default() -> Self {
        Self::for_currency(CurrencyCode::default())
    }
}

impl MoneyFormat {
    /// Format with `,` grouping and `.` decimals.
    #[must_use]
    pub const fn for_currency(currency: CurrencyCode) -> Self {
        Self {
            currency,
            group_separator: ',',
            decimal_separator: '.',
        }
    }

    /// Format an amount, e.g. `₦1,234,567.50`.
    ///
    /// Rounds half away from zero to two decimal places.
    #[must_use]
    pub fn format(&self, amount: Decimal) -> String {
        let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        let negative = rounded.is_sign_negative() && !rounded.is_zero();
        let digits = format!("{:.2}", rounded.abs());
        let (whole, fraction) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

        let mut out = String::with_capacity(digits.len() + whole.len() / 3 + 4);
        if negative {
            out.push('-');
        }
        out.push_str(self.currency.symbol());
        out.push_str(&group_thousands(whole, self.group_separator));
        out.push(self.decimal_separator);
        out.push_str(fraction);
        out
    }
}

/// Format an amount with the default separators for `currency`.
#[must_use]
pub fn format_money(amount: Decimal, currency: CurrencyCode) -> String {
    MoneyFormat::for_currency(currency).format(amount)
}

fn group_thousands(digits: &str, separator: char) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(ch);
    }
    out
}
