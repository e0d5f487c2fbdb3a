//! # Money Module
//!
//! Provides the `Money` type for option prices and the `CurrencyCode`
//! carried by a product document.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  PRICES ON THE WIRE                                                     │
//! │                                                                         │
//! │  details:price is declared `integer` in the product schema: the widget │
//! │  expects minor units (cents, pence, ...).                               │
//! │                                                                         │
//! │  Option prices follow the same rule so that                             │
//! │    "is this price zero?"                                                │
//! │  is an exact integer comparison, never a float tolerance check.        │
//! │                                                                         │
//! │    Money(0)    → passes through recipient stripping silently           │
//! │    Money(250)  → stripped from recipient options with a warning        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use giveit_core::money::{CurrencyCode, Money};
//!
//! let price = Money::from_cents(1099);
//! assert_eq!(price.to_string(), "10.99");
//!
//! assert!(CurrencyCode::parse("USD").is_ok());
//! assert!(CurrencyCode::parse("DOLLAR").is_err());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::error::ProductError;
use crate::CURRENCY_CODE_LEN;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit.
///
/// Serializes as a bare JSON integer, which is what the widget reads.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Money(#[ts(type = "number")] i64);

impl Money {
    /// Creates a Money value from minor units.
    ///
    /// ## Example
    /// ```rust
    /// use giveit_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

/// Shows the amount as `major.minor` without a currency symbol.
///
/// ## Note
/// A product document may be in any currency, so no symbol is assumed.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

// =============================================================================
// Currency Code
// =============================================================================

/// A three-character ISO 4217 style currency code, stored verbatim.
///
/// Only the length is checked: conversion and lookup against the ISO
/// table are out of scope for the SDK.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Parses a currency code.
    ///
    /// ## Rules
    /// - Exactly 3 characters
    /// - Stored as given (no case folding)
    pub fn parse(code: &str) -> Result<Self, ProductError> {
        if code.chars().count() != CURRENCY_CODE_LEN {
            return Err(ProductError::InvalidCurrencyCode {
                code: code.to_string(),
            });
        }

        Ok(CurrencyCode(code.to_string()))
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
