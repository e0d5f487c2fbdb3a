//! # Key-Holder Context
//!
//! The data key used to encrypt payloads, passed explicitly into every
//! render call instead of living in a process-wide singleton.
//!
//! ```text
//! SdkConfig::load()  ──►  SdkConfig::context()  ──►  Option<SdkContext>
//!                                                        │
//!                     PayloadPipeline::render(&product, ctx.as_ref())
//!                                                        │
//!                       None ──► SdkError::EncoderUnavailable
//! ```
//!
//! The context is immutable once built, so any number of concurrent renders
//! can borrow the same one.

use std::fmt;

use crate::error::{SdkError, SdkResult};

// =============================================================================
// Data Key
// =============================================================================

/// Secret key handed to the encoder. `Debug` never prints the key.
#[derive(Clone, PartialEq, Eq)]
pub struct DataKey(String);

impl DataKey {
    /// Wraps a key, rejecting empty or whitespace-only values.
    pub fn new(key: impl Into<String>) -> SdkResult<Self> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(SdkError::InvalidConfig("data key cannot be empty".to_string()));
        }
        Ok(DataKey(key))
    }

    /// Raw key material, for the encoder only.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for DataKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DataKey(<redacted>)")
    }
}

// =============================================================================
// SDK Context
// =============================================================================

/// Everything a render needs from the host that is not product data.
#[derive(Debug, Clone)]
pub struct SdkContext {
    data_key: DataKey,
}

impl SdkContext {
    pub fn new(data_key: DataKey) -> Self {
        SdkContext { data_key }
    }

    pub fn data_key(&self) -> &DataKey {
        &self.data_key
    }
}
