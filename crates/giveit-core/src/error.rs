//! # Error Types
//!
//! Domain-specific error types for giveit-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  giveit-core errors (this file)                                        │
//! │  ├── ProductError   - Accumulated product data errors                  │
//! │  ├── SchemaError    - Bad schema definitions (raised at build time)    │
//! │  └── OptionWarning  - Non-fatal notices (stripped recipient prices)    │
//! │                                                                         │
//! │  giveit-sdk errors (separate crate)                                    │
//! │  └── SdkError       - Render pipeline + config failures                │
//! │                                                                         │
//! │  Flow: ProductError → accumulated list → error fragment                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Accumulate, Don't Throw
//! Product errors are collected on the document as the caller builds it.
//! A bad currency or a duplicate option id never aborts the builder chain;
//! the list is only consulted when the document is validated or rendered.
//! The `Display` output of each variant is the exact message that ends up
//! inside a `giveit-error` element.

use thiserror::Error;

use crate::money::Money;
use crate::options::Audience;

// =============================================================================
// Product Error
// =============================================================================

/// Errors raised while building or validating a product document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProductError {
    /// A required field is absent from the flattened details.
    #[error("missing field {field}")]
    MissingField { field: String },

    /// A required field is present but violates its declared kind.
    ///
    /// `reason` is the human-readable constraint violation, e.g.
    /// `"must be no more than 40 characters"`.
    #[error("{field} - {reason}")]
    InvalidFieldType { field: String, reason: String },

    /// Currency code was not exactly three characters.
    #[error("invalid currency {code}, must be a 3-letter ISO code")]
    InvalidCurrencyCode { code: String },

    /// An option with this id already exists for the audience.
    ///
    /// ## When This Occurs
    /// ```text
    /// add_buyer_option({ id: "size" })   → Ok
    /// add_buyer_option({ id: "size" })   → DuplicateOptionId   (first kept)
    /// add_recipient_option({ id: "size" }) → Ok   (separate namespace)
    /// ```
    #[error("cannot add {audience} option with duplicate id {id}")]
    DuplicateOptionId { audience: Audience, id: String },

    /// The document could not be serialized to its payload form.
    #[error("failed to serialize product data: {0}")]
    Serialization(String),
}

impl ProductError {
    /// Returns true for errors produced by checking details against a schema.
    ///
    /// These are recomputed on every validation; the rest are recorded once
    /// by the builder call that raised them.
    pub fn is_field_error(&self) -> bool {
        matches!(
            self,
            ProductError::MissingField { .. } | ProductError::InvalidFieldType { .. }
        )
    }
}

impl From<serde_json::Error> for ProductError {
    fn from(err: serde_json::Error) -> Self {
        ProductError::Serialization(err.to_string())
    }
}

// =============================================================================
// Schema Error
// =============================================================================

/// Errors in a field schema definition.
///
/// These are configuration mistakes and surface when the schema is built,
/// never during validation of a document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// The descriptor names a kind other than `string` or `integer`.
    #[error("unsupported type '{kind}' for field {path}")]
    UnsupportedKind { path: String, kind: String },

    /// The constraint after `:` could not be parsed.
    #[error("invalid constraint '{constraint}' for field {path}")]
    InvalidConstraint { path: String, constraint: String },

    /// A field path was empty.
    #[error("field path cannot be empty")]
    EmptyPath,

    /// The same field path was declared twice.
    #[error("field {path} is declared more than once")]
    DuplicatePath { path: String },
}

// =============================================================================
// Option Warning
// =============================================================================

/// Non-fatal notices raised while attaching options.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptionWarning {
    /// A recipient option (or one of its choices) carried a non-zero price.
    #[error("removing non-zero price ({price}) from recipient option ({id})")]
    PriceStripped { id: String, price: Money },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with ProductError.
pub type ProductResult<T> = Result<T, ProductError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ProductError::MissingField {
            field: "details:code".to_string(),
        };
        assert_eq!(err.to_string(), "missing field details:code");

        let err = ProductError::InvalidFieldType {
            field: "details:code".to_string(),
            reason: "must be no more than 40 characters".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "details:code - must be no more than 40 characters"
        );
    }

    #[test]
    fn test_currency_and_duplicate_messages() {
        let err = ProductError::InvalidCurrencyCode {
            code: "DOLLAR".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid currency DOLLAR, must be a 3-letter ISO code"
        );

        let err = ProductError::DuplicateOptionId {
            audience: Audience::Buyer,
            id: "size".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "cannot add buyer option with duplicate id size"
        );
    }

    #[test]
    fn test_is_field_error() {
        assert!(ProductError::MissingField {
            field: "details:code".to_string(),
        }
        .is_field_error());
        assert!(ProductError::InvalidFieldType {
            field: "details:price".to_string(),
            reason: "must be an integer".to_string(),
        }
        .is_field_error());
        assert!(!ProductError::InvalidCurrencyCode {
            code: "EU".to_string(),
        }
        .is_field_error());
        assert!(!ProductError::Serialization("bad".to_string()).is_field_error());
    }

    #[test]
    fn test_warning_message() {
        let warning = OptionWarning::PriceStripped {
            id: "gift-wrap".to_string(),
            price: Money::from_cents(250),
        };
        assert_eq!(
            warning.to_string(),
            "removing non-zero price (2.50) from recipient option (gift-wrap)"
        );
    }

    #[test]
    fn test_serde_error_converts_to_product_error() {
        let serde_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: ProductError = serde_err.into();
        assert!(matches!(err, ProductError::Serialization(_)));
    }
}
