//! # Payload Fingerprint
//!
//! Deterministic SHA-256 fingerprint of a product document's content.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  {details, currency?, options}                                         │
//! │           │                                                             │
//! │           ▼  CanonicalBytes::new()                                      │
//! │  compact JSON, object keys sorted at every depth                       │
//! │           │                                                             │
//! │           ▼  sha256_fingerprint()                                       │
//! │  "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08"   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Same input, same bytes, same fingerprint: key order in the caller's
//! maps never changes the result.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

use crate::error::ProductResult;

// =============================================================================
// Canonical Bytes
// =============================================================================

/// Bytes produced by canonical JSON serialization.
///
/// The inner buffer is private: the only way to obtain one is
/// [`CanonicalBytes::new`], so every fingerprint is computed over
/// canonical input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalBytes(Vec<u8>);

impl CanonicalBytes {
    /// Serializes `value` with sorted object keys and compact separators.
    ///
    /// Going through [`serde_json::Value`] first re-sorts every object,
    /// including maps whose `Serialize` impl does not guarantee an order.
    ///
    /// This relies on `serde_json::Map` being a `BTreeMap`, i.e. on the
    /// `preserve_order` feature being off everywhere in the build. With it
    /// on, objects keep insertion order and fingerprints stop being stable
    /// (`test_canonical_bytes_sorted_keys` catches that).
    pub fn new(value: &impl Serialize) -> ProductResult<Self> {
        let value = serde_json::to_value(value)?;
        Ok(CanonicalBytes(serde_json::to_vec(&value)?))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

// =============================================================================
// Fingerprint
// =============================================================================

/// Lowercase hex SHA-256 digest of canonical bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Computes the SHA-256 fingerprint of canonical bytes.
pub fn sha256_fingerprint(data: &CanonicalBytes) -> Fingerprint {
    let hash = Sha256::digest(data.as_bytes());
    Fingerprint(hash.iter().map(|b| format!("{b:02x}")).collect())
}

/// Canonicalizes and fingerprints any serializable value.
pub fn fingerprint_of(value: &impl Serialize) -> ProductResult<Fingerprint> {
    Ok(sha256_fingerprint(&CanonicalBytes::new(value)?))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    #[test]
    fn test_canonical_bytes_sorted_keys() {
        let bytes = CanonicalBytes::new(&json!({"b": 2, "a": {"d": 1, "c": 0}})).unwrap();
        assert_eq!(bytes.as_bytes(), br#"{"a":{"c":0,"d":1},"b":2}"#);
    }

    #[test]
    fn test_fingerprint_known_vector() {
        // SHA-256 of the two bytes `{}`
        let fp = fingerprint_of(&json!({})).unwrap();
        assert_eq!(
            fp.as_str(),
            "44136fa355b3678a1146ad16f7e8649e94fb4fc21fe77e8310c060f61caaff8a"
        );
        assert_eq!(fp.as_str().len(), 64);
    }

    #[test]
    fn test_fingerprint_independent_of_insertion_order() {
        let mut first = HashMap::new();
        first.insert("code", "SKU-1");
        first.insert("name", "Mug");

        let mut second = HashMap::new();
        second.insert("name", "Mug");
        second.insert("code", "SKU-1");

        assert_eq!(fingerprint_of(&first).unwrap(), fingerprint_of(&second).unwrap());
    }

    #[test]
    fn test_fingerprint_changes_with_content() {
        let a = fingerprint_of(&json!({"price": 1099})).unwrap();
        let b = fingerprint_of(&json!({"price": 1100})).unwrap();
        assert_ne!(a, b);
    }
}
