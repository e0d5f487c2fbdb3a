//! # Field Schema
//!
//! Declarative table of the product fields the widget cannot work without.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Schema-Driven Validation                           │
//! │                                                                         │
//! │  ProductDocument.details                                               │
//! │  { "code": "SKU-1", "price": 1099, "name": "Mug", ... }                │
//! │           │                                                             │
//! │           ▼  flatten()                                                  │
//! │  { "details:code": "SKU-1", "details:price": 1099, ... }               │
//! │           │                                                             │
//! │           ▼  walk FieldSchema in declaration order                      │
//! │  details:code   string:40   ✓                                          │
//! │  details:price  integer     ✓                                          │
//! │  details:name   string:200  ✓                                          │
//! │  details:image  string      ✗ missing field details:image              │
//! │                                                                         │
//! │  Every rule is checked; errors are accumulated, not short-circuited.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Descriptors
//! Rules can be written as `kind` or `kind:constraint` strings. The only
//! kinds are `string` (constraint = inclusive max length in characters)
//! and `integer` (constraint ignored). Anything else is a [`SchemaError`]
//! at definition time, so a document can never fail validation because
//! of a typo in the schema.
//!
//! ## Usage
//! ```rust
//! use giveit_core::schema::{FieldKind, FieldSchema};
//!
//! let schema = FieldSchema::from_descriptors([
//!     ("details:code", "string:40"),
//!     ("details:price", "integer"),
//! ])
//! .unwrap();
//!
//! assert_eq!(
//!     schema.resolve("details:code"),
//!     Some(&FieldKind::String { max_len: Some(40) })
//! );
//! assert!(FieldSchema::from_descriptors([("details:code", "text")]).is_err());
//! ```

use serde_json::Value;

use crate::error::SchemaError;

/// Separator between a descriptor's kind and its constraint.
const CONSTRAINT_SEPARATOR: char = ':';

// =============================================================================
// Field Kind
// =============================================================================

/// The primitive kind a required field must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// A JSON string, optionally capped at `max_len` characters (inclusive).
    String { max_len: Option<usize> },
    /// A JSON integer. Floats such as `10.0` do not qualify.
    Integer,
}

impl FieldKind {
    /// Parses a `kind` or `kind:constraint` descriptor for the field at `path`.
    ///
    /// ## Example
    /// ```rust
    /// use giveit_core::schema::FieldKind;
    ///
    /// assert_eq!(
    ///     FieldKind::parse("details:name", "string:200").unwrap(),
    ///     FieldKind::String { max_len: Some(200) }
    /// );
    /// assert_eq!(
    ///     FieldKind::parse("details:price", "integer:5").unwrap(),
    ///     FieldKind::Integer
    /// );
    /// ```
    pub fn parse(path: &str, descriptor: &str) -> Result<Self, SchemaError> {
        let (kind, constraint) = match descriptor.split_once(CONSTRAINT_SEPARATOR) {
            Some((kind, constraint)) => (kind, Some(constraint)),
            None => (descriptor, None),
        };

        match kind {
            "string" => {
                let max_len = constraint
                    .map(|c| {
                        c.parse::<usize>()
                            .map_err(|_| SchemaError::InvalidConstraint {
                                path: path.to_string(),
                                constraint: c.to_string(),
                            })
                    })
                    .transpose()?;
                Ok(FieldKind::String { max_len })
            }
            "integer" => Ok(FieldKind::Integer),
            other => Err(SchemaError::UnsupportedKind {
                path: path.to_string(),
                kind: other.to_string(),
            }),
        }
    }

    /// Checks a value against this kind.
    ///
    /// ## Returns
    /// `Err` carries the human-readable violation that follows the field
    /// name in the error message, e.g. `"must be no more than 40 characters"`.
    pub fn check(&self, value: &Value) -> Result<(), String> {
        match self {
            FieldKind::Integer => {
                if value.is_i64() || value.is_u64() {
                    Ok(())
                } else {
                    Err("must be an integer".to_string())
                }
            }
            FieldKind::String { max_len } => {
                let Some(s) = value.as_str() else {
                    return Err("must be a string".to_string());
                };

                match max_len {
                    Some(max) if s.chars().count() > *max => {
                        Err(format!("must be no more than {} characters", max))
                    }
                    _ => Ok(()),
                }
            }
        }
    }
}

// =============================================================================
// Field Rule
// =============================================================================

/// One required field: its flattened `section:name` path and kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRule {
    pub path: String,
    pub kind: FieldKind,
}

impl FieldRule {
    fn new(path: &str, kind: FieldKind) -> Self {
        FieldRule {
            path: path.to_string(),
            kind,
        }
    }
}

// =============================================================================
// Field Schema
// =============================================================================

/// Ordered set of required field rules.
///
/// Declaration order is preserved so error lists are reproducible.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSchema {
    rules: Vec<FieldRule>,
}

impl FieldSchema {
    /// The schema every give.it product must satisfy.
    ///
    /// | path            | kind         |
    /// |-----------------|--------------|
    /// | `details:code`  | `string:40`  |
    /// | `details:price` | `integer`    |
    /// | `details:name`  | `string:200` |
    /// | `details:image` | `string`     |
    pub fn product() -> Self {
        FieldSchema {
            rules: vec![
                FieldRule::new("details:code", FieldKind::String { max_len: Some(40) }),
                FieldRule::new("details:price", FieldKind::Integer),
                FieldRule::new("details:name", FieldKind::String { max_len: Some(200) }),
                FieldRule::new("details:image", FieldKind::String { max_len: None }),
            ],
        }
    }

    /// Builds a schema from `(path, descriptor)` pairs.
    ///
    /// ## Errors
    /// - [`SchemaError::EmptyPath`] for an empty path
    /// - [`SchemaError::DuplicatePath`] when a path repeats
    /// - [`SchemaError::UnsupportedKind`] / [`SchemaError::InvalidConstraint`]
    ///   from descriptor parsing
    pub fn from_descriptors<I, P, D>(descriptors: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = (P, D)>,
        P: AsRef<str>,
        D: AsRef<str>,
    {
        let mut schema = FieldSchema::default();

        for (path, descriptor) in descriptors {
            let path = path.as_ref();
            let kind = FieldKind::parse(path, descriptor.as_ref())?;
            schema.push(path, kind)?;
        }

        Ok(schema)
    }

    /// Appends a rule, rejecting empty and repeated paths.
    pub fn push(&mut self, path: &str, kind: FieldKind) -> Result<(), SchemaError> {
        if path.is_empty() {
            return Err(SchemaError::EmptyPath);
        }

        if self.resolve(path).is_some() {
            return Err(SchemaError::DuplicatePath {
                path: path.to_string(),
            });
        }

        self.rules.push(FieldRule::new(path, kind));
        Ok(())
    }

    /// Looks up the kind declared for a flattened field path.
    pub fn resolve(&self, path: &str) -> Option<&FieldKind> {
        self.rules
            .iter()
            .find(|rule| rule.path == path)
            .map(|rule| &rule.kind)
    }

    /// Rules in declaration order.
    pub fn rules(&self) -> &[FieldRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
