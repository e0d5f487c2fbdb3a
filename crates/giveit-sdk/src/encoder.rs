//! # Encoder Seam
//!
//! The encryption primitive is supplied by the host. The pipeline only
//! needs `encode(plaintext, key) -> ciphertext | reason`.
//!
//! Any `Fn(&str, &DataKey) -> Result<String, EncodeError>` is an encoder,
//! which keeps test doubles to a single closure:
//!
//! ```rust
//! use giveit_sdk::context::DataKey;
//! use giveit_sdk::encoder::{EncodeError, PayloadEncoder};
//!
//! let reverse = |plaintext: &str, _key: &DataKey| -> Result<String, EncodeError> {
//!     Ok(plaintext.chars().rev().collect())
//! };
//!
//! let key = DataKey::new("k").unwrap();
//! assert_eq!(reverse.encode("abc", &key).unwrap(), "cba");
//! ```

use thiserror::Error;

use crate::context::DataKey;

/// Failure reported by an encoder. The reason is opaque to the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct EncodeError {
    reason: String,
}

impl EncodeError {
    pub fn new(reason: impl Into<String>) -> Self {
        EncodeError {
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// Turns a serialized payload into the opaque blob placed in the page.
pub trait PayloadEncoder {
    fn encode(&self, plaintext: &str, key: &DataKey) -> Result<String, EncodeError>;
}

impl<F> PayloadEncoder for F
where
    F: Fn(&str, &DataKey) -> Result<String, EncodeError>,
{
    fn encode(&self, plaintext: &str, key: &DataKey) -> Result<String, EncodeError> {
        self(plaintext, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_encoder_failure() {
        let failing = |_: &str, _: &DataKey| -> Result<String, EncodeError> {
            Err(EncodeError::new("cipher not available"))
        };

        let key = DataKey::new("k").unwrap();
        let err = failing.encode("{}", &key).unwrap_err();
        assert_eq!(err.reason(), "cipher not available");
        assert_eq!(err.to_string(), "cipher not available");
    }
}
