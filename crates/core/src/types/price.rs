//! Type-safe price representation using decimal arithmetic.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A recorded price for an item in one currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., yen, dollars).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency: CurrencyCode,
    /// Where this price came from.
    #[serde(default)]
    pub source: PriceSource,
}

impl Price {
    /// Create a new origin price.
    #[must_use]
    pub const fn new(amount: Decimal, currency: CurrencyCode) -> Self {
        Self {
            amount,
            currency,
            source: PriceSource::Origin,
        }
    }

    /// Set the source of this price.
    #[must_use]
    pub const fn with_source(mut self, source: PriceSource) -> Self {
        self.source = source;
        self
    }
}

/// Provenance of a price record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PriceSource {
    /// Price as published by the brand in its home currency.
    #[default]
    Origin,
    /// Converted from another currency using an exchange rate.
    Converted,
    /// Entered by hand by a catalog editor.
    Manual,
}

impl PriceSource {
    /// The stored string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Origin => "origin",
            Self::Converted => "converted",
            Self::Manual => "manual",
        }
    }
}

impl std::fmt::Display for PriceSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PriceSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "origin" => Ok(Self::Origin),
            "converted" => Ok(Self::Converted),
            "manual" => Ok(Self::Manual),
            _ => Err(format!("invalid price source: {s}")),
        }
    }
}

/// Error returned when a currency code is malformed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid currency code: {0:?}")]
pub struct CurrencyCodeError(pub String);

/// ISO 4217 alphabetic currency code (always stored upper-case).
///
/// The catalog is not limited to a fixed set of currencies, so any three
/// ASCII letters are accepted.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Parse and normalize a currency code.
    ///
    /// # Errors
    ///
    /// Returns `CurrencyCodeError` unless the trimmed input is exactly three
    /// ASCII letters.
    pub fn parse(raw: &str) -> Result<Self, CurrencyCodeError> {
        let trimmed = raw.trim();
        if trimmed.len() == 3 && trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
            Ok(Self(trimmed.to_ascii_uppercase()))
        } else {
            Err(CurrencyCodeError(raw.to_owned()))
        }
    }

    /// The upper-case code.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for CurrencyCode {
    type Err = CurrencyCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = CurrencyCodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}
