//! # Product Document
//!
//! The aggregate a merchant fills in before rendering a give.it button.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     ProductDocument Lifecycle                           │
//! │                                                                         │
//! │  with_details({code, price, ...})                                      │
//! │       │   stamps metadata: fingerprint of the data AT THIS MOMENT      │
//! │       ▼                                                                 │
//! │  set_details / set_currency / add_*_option   (builder, accumulates     │
//! │       │                                       errors, never panics)    │
//! │       ▼                                                                 │
//! │  validate()  ── walks FieldSchema, appends one error per bad field     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  to_payload_json()                                                     │
//! │  {details, currency?, options, "give.it": {fingerprint, ...}}          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Metadata Is a Snapshot
//! The fingerprint describes the data the document was constructed with.
//! Later builder calls do NOT refresh it; call [`ProductDocument::stamp_metadata`]
//! explicitly to re-stamp over the current state.
//!
//! ## Example
//! ```rust
//! use giveit_core::options::ProductOption;
//! use giveit_core::product::ProductDocument;
//! use serde_json::json;
//!
//! let mut product = ProductDocument::with_details([
//!     ("code", json!("MUG-01")),
//!     ("price", json!(1299)),
//!     ("name", json!("Coffee Mug")),
//!     ("image", json!("https://shop.example/mug.png")),
//! ]);
//! product.set_currency("USD");
//! product.add_buyer_option(ProductOption::new("gift-wrap")).unwrap();
//!
//! assert!(product.validate());
//! assert!(product.errors().is_empty());
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;
use ts_rs::TS;

use crate::error::{OptionWarning, ProductError, ProductResult};
use crate::fingerprint::fingerprint_of;
use crate::money::CurrencyCode;
use crate::options::{strip_recipient_prices, Audience, OptionTree, ProductOption};
use crate::schema::FieldSchema;
use crate::{FIELD_PATH_SEPARATOR, SDK_VERSION};

/// Section name under which details appear in flattened paths.
const DETAILS_SECTION: &str = "details";

/// Format of the `rendered_at` stamp (UTC, microseconds).
const RENDERED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

// =============================================================================
// Metadata
// =============================================================================

/// Provenance block serialized under the `give.it` key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Metadata {
    /// SHA-256 of `{details, currency?, options}` at stamping time.
    pub fingerprint: String,

    /// UTC time the metadata was stamped.
    pub rendered_at: String,

    /// Generator tag, e.g. `"Rust 0.1.0"`.
    pub sdk_version: String,
}

/// Serialized view of a document. `metadata: None` is the fingerprint input.
#[derive(Serialize)]
struct Payload<'a> {
    details: &'a BTreeMap<String, Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    currency: Option<&'a CurrencyCode>,

    options: &'a OptionTree,

    #[serde(rename = "give.it", skip_serializing_if = "Option::is_none")]
    metadata: Option<&'a Metadata>,
}

// =============================================================================
// Product Document
// =============================================================================

/// A product, its selectable options, and the errors raised while building it.
#[derive(Debug, Clone)]
pub struct ProductDocument {
    details: BTreeMap<String, Value>,
    currency: Option<CurrencyCode>,
    options: OptionTree,
    metadata: Metadata,
    errors: Vec<ProductError>,
    warnings: Vec<OptionWarning>,
}

impl Default for ProductDocument {
    fn default() -> Self {
        ProductDocument::new()
    }
}

impl ProductDocument {
    /// Creates an empty document and stamps its metadata.
    pub fn new() -> Self {
        ProductDocument::with_details(std::iter::empty::<(String, Value)>())
    }

    /// Creates a document from initial details and stamps its metadata.
    pub fn with_details<I, K>(details: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let mut product = ProductDocument {
            details: details.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            currency: None,
            options: OptionTree::new(),
            metadata: Metadata::default(),
            errors: Vec::new(),
            warnings: Vec::new(),
        };

        if let Err(err) = product.stamp_metadata() {
            product.errors.push(err);
        }

        product
    }

    // =========================================================================
    // Builder
    // =========================================================================

    /// Merges details into the document, last write wins per key.
    pub fn set_details<I, K>(&mut self, details: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        self.details
            .extend(details.into_iter().map(|(k, v)| (k.into(), v)));
        self
    }

    /// Sets the currency if `code` is exactly three characters.
    ///
    /// ## On Failure
    /// Records [`ProductError::InvalidCurrencyCode`] and leaves the current
    /// currency (set or unset) untouched. The builder chain continues.
    pub fn set_currency(&mut self, code: &str) -> &mut Self {
        match CurrencyCode::parse(code) {
            Ok(currency) => self.currency = Some(currency),
            Err(err) => self.errors.push(err),
        }
        self
    }

    /// Adds an option the buyer chooses.
    ///
    /// ## Errors
    /// [`ProductError::DuplicateOptionId`], which is also recorded on the
    /// document.
    pub fn add_buyer_option(&mut self, option: ProductOption) -> ProductResult<&mut Self> {
        self.add_option(Audience::Buyer, option)
    }

    /// Adds an option the recipient chooses, stripping non-zero prices first.
    ///
    /// Stripped prices are recorded in [`ProductDocument::warnings`] and never
    /// fail the call.
    pub fn add_recipient_option(&mut self, option: ProductOption) -> ProductResult<&mut Self> {
        let (stripped, warnings) = strip_recipient_prices(&option);
        self.warnings.extend(warnings);
        self.add_option(Audience::Recipient, stripped)
    }

    /// Adds several buyer options; see [`OptionTree::add_options`] for the
    /// partial-success rules. Returns (and records) the rejected ones.
    pub fn add_buyer_options<I>(&mut self, options: I) -> Vec<ProductError>
    where
        I: IntoIterator<Item = ProductOption>,
    {
        let errors = self.options.add_options(Audience::Buyer, options);
        self.errors.extend(errors.iter().cloned());
        errors
    }

    /// Adds several recipient options, each stripped of non-zero prices.
    pub fn add_recipient_options<I>(&mut self, options: I) -> Vec<ProductError>
    where
        I: IntoIterator<Item = ProductOption>,
    {
        options
            .into_iter()
            .filter_map(|option| self.add_recipient_option(option).err())
            .collect()
    }

    fn add_option(&mut self, audience: Audience, option: ProductOption) -> ProductResult<&mut Self> {
        match self.options.add_option(audience, option) {
            Ok(()) => Ok(self),
            Err(err) => {
                self.errors.push(err.clone());
                Err(err)
            }
        }
    }

    // =========================================================================
    // Validation
    // =========================================================================

    /// Flat view of the details as `details:<key>[:<nested>...]` paths.
    ///
    /// ## Rules
    /// - Nested objects extend the path with their keys
    /// - Arrays extend the path with element indexes
    /// - `null` leaves are dropped (a null field counts as missing)
    /// - Options and metadata are not part of the view
    pub fn flatten(&self) -> BTreeMap<String, Value> {
        let mut flat = BTreeMap::new();
        for (key, value) in &self.details {
            flatten_into(&mut flat, format!("{DETAILS_SECTION}{FIELD_PATH_SEPARATOR}{key}"), value);
        }
        flat
    }

    /// Checks the details against a schema without recording anything.
    ///
    /// Returns one error per missing or mistyped field, in the schema's
    /// declaration order.
    pub fn check_fields(&self, schema: &FieldSchema) -> Vec<ProductError> {
        let flat = self.flatten();

        schema
            .rules()
            .iter()
            .filter_map(|rule| match flat.get(&rule.path) {
                None => Some(ProductError::MissingField {
                    field: rule.path.clone(),
                }),
                Some(value) => rule.kind.check(value).err().map(|reason| {
                    ProductError::InvalidFieldType {
                        field: rule.path.clone(),
                        reason,
                    }
                }),
            })
            .collect()
    }

    /// Validates against the standard product schema.
    pub fn validate(&mut self) -> bool {
        self.validate_with(&FieldSchema::product())
    }

    /// Validates against `schema`, appending every field error found.
    ///
    /// ## Returns
    /// `true` iff this call appended no errors. Errors recorded earlier (a
    /// bad currency, a duplicate option id) do not affect the result.
    pub fn validate_with(&mut self, schema: &FieldSchema) -> bool {
        let errors = self.check_fields(schema);
        let valid = errors.is_empty();

        debug!(valid, field_errors = errors.len(), "Validated product details");
        self.errors.extend(errors);
        valid
    }

    // =========================================================================
    // Metadata & Serialization
    // =========================================================================

    /// Stamps metadata over the current details, currency and options.
    ///
    /// Runs automatically at construction; calling it again re-stamps.
    pub fn stamp_metadata(&mut self) -> ProductResult<()> {
        let fingerprint = fingerprint_of(&self.payload(None))?;

        debug!(fingerprint = %fingerprint, "Stamped product metadata");
        self.metadata = Metadata {
            fingerprint: fingerprint.to_string(),
            rendered_at: Utc::now().format(RENDERED_AT_FORMAT).to_string(),
            sdk_version: format!("Rust {}", SDK_VERSION),
        };
        Ok(())
    }

    /// Serializes the full document for the encoder.
    pub fn to_payload_json(&self) -> ProductResult<String> {
        Ok(serde_json::to_string(&self.payload(Some(&self.metadata)))?)
    }

    fn payload<'a>(&'a self, metadata: Option<&'a Metadata>) -> Payload<'a> {
        Payload {
            details: &self.details,
            currency: self.currency.as_ref(),
            options: &self.options,
            metadata,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn details(&self) -> &BTreeMap<String, Value> {
        &self.details
    }

    pub fn currency(&self) -> Option<&CurrencyCode> {
        self.currency.as_ref()
    }

    pub fn options(&self) -> &OptionTree {
        &self.options
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Errors accumulated so far, in the order they were raised.
    pub fn errors(&self) -> &[ProductError] {
        &self.errors
    }

    /// Error messages as they appear in an error fragment.
    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }

    /// Warnings raised while attaching recipient options.
    pub fn warnings(&self) -> &[OptionWarning] {
        &self.warnings
    }
}

fn flatten_into(flat: &mut BTreeMap<String, Value>, path: String, value: &Value) {
    match value {
        Value::Null => {}
        Value::Object(map) => {
            for (key, nested) in map {
                flatten_into(flat, format!("{path}{FIELD_PATH_SEPARATOR}{key}"), nested);
            }
        }
        Value::Array(items) => {
            for (index, nested) in items.iter().enumerate() {
                flatten_into(flat, format!("{path}{FIELD_PATH_SEPARATOR}{index}"), nested);
            }
        }
        leaf => {
            flat.insert(path, leaf.clone());
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
