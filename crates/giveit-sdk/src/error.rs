//! # SDK Error Types
//!
//! Error types for the render pipeline and its configuration.
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        SDK Error Categories                             │
//! │                                                                         │
//! │  ┌─────────────────────┐  ┌─────────────────────┐  ┌────────────────┐  │
//! │  │   Render            │  │   Configuration     │  │    Product     │  │
//! │  │                     │  │                     │  │                │  │
//! │  │  EncoderUnavailable │  │  InvalidConfig      │  │  ProductError  │  │
//! │  │  InvalidProduct     │  │  ConfigLoadFailed   │  │  (wrapped)     │  │
//! │  │  EncodingFailed     │  │  TracingInit        │  └────────────────┘  │
//! │  └─────────────────────┘  └─────────────────────┘                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Fatal vs. Rendered
//! Only `EncoderUnavailable` and the configuration errors are returned as
//! `Err`. `InvalidProduct`, `EncodingFailed` and `Product(Serialization)`
//! are the typed cause of a failed render
//! ([`RenderFailure::cause`](crate::pipeline::RenderFailure)), and their
//! `Display` is the last line of the error fragment.
//!
//! Field, currency and duplicate-option problems are accumulated on the
//! document as `ProductError`s and listed before that line.

use thiserror::Error;

use giveit_core::ProductError;

/// Result type alias for SDK operations.
pub type SdkResult<T> = Result<T, SdkError>;

/// SDK error type covering pipeline and configuration failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SdkError {
    // =========================================================================
    // Render Errors
    // =========================================================================
    /// No key-holder context was supplied to the render call.
    #[error("encoder must be initialized before rendering")]
    EncoderUnavailable,

    /// The document failed schema validation.
    #[error("product data is invalid")]
    InvalidProduct,

    /// The injected encoder reported a failure. Carries the encoder's
    /// reason unchanged.
    #[error("{0}")]
    EncodingFailed(String),

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid SDK configuration.
    #[error("Invalid SDK configuration: {0}")]
    InvalidConfig(String),

    /// Failed to load the config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// A global tracing subscriber was already installed.
    #[error("Failed to initialize tracing: {0}")]
    TracingInit(String),

    // =========================================================================
    // Product Errors
    // =========================================================================
    #[error(transparent)]
    Product(#[from] ProductError),
}

impl From<std::io::Error> for SdkError {
    fn from(err: std::io::Error) -> Self {
        SdkError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for SdkError {
    fn from(err: toml::de::Error) -> Self {
        SdkError::ConfigLoadFailed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            SdkError::EncoderUnavailable.to_string(),
            "encoder must be initialized before rendering"
        );
        assert_eq!(SdkError::InvalidProduct.to_string(), "product data is invalid");
        assert_eq!(
            SdkError::EncodingFailed("bad key".to_string()).to_string(),
            "bad key"
        );
    }

    #[test]
    fn test_product_error_is_transparent() {
        let err: SdkError = ProductError::MissingField {
            field: "details:code".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "missing field details:code");
    }
}
