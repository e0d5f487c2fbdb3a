//! # giveit-core: Product Data Model for the give.it SDK
//!
//! This crate holds everything about a product that can be decided without
//! touching the outside world: its details, its option tree, the schema it
//! must satisfy and the fingerprint that makes the payload tamper-evident.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        give.it SDK Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Merchant page (host application)                │   │
//! │  │        builds a product ──► asks for a button fragment         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 giveit-sdk (render pipeline)                    │   │
//! │  │   validate ──► encode (injected) ──► embed fragment            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ giveit-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  product  │  │  options  │  │  schema   │  │fingerprint│  │   │
//! │  │   │ Document  │  │   Tree    │  │FieldKind  │  │  SHA-256  │  │   │
//! │  │   │ Metadata  │  │ Audience  │  │ FieldRule │  │ Canonical │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO CONFIG • NO ENCRYPTION • NO HTML                  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`product`] - The `ProductDocument` aggregate and its metadata
//! - [`options`] - Buyer/recipient option trees and price stripping
//! - [`schema`] - Declarative required-field schema
//! - [`fingerprint`] - Canonical bytes and SHA-256 fingerprint
//! - [`money`] - Integer money and currency codes
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use giveit_core::money::Money;
//! use giveit_core::options::{Audience, ProductOption};
//! use giveit_core::product::ProductDocument;
//! use serde_json::json;
//!
//! let mut product = ProductDocument::with_details([
//!     ("code", json!("TEE-01")),
//!     ("price", json!(2500)),
//!     ("name", json!("T-Shirt")),
//!     ("image", json!("https://shop.example/tee.png")),
//! ]);
//!
//! // The recipient picks a size; prices are stripped for them.
//! let size = ProductOption::new("size")
//!     .with_choice(ProductOption::new("XL").with_price(Money::from_cents(200)));
//! product.add_recipient_option(size).unwrap();
//!
//! assert!(product.validate());
//! assert_eq!(product.warnings().len(), 1);
//! assert_eq!(
//!     product.options().get(Audience::Recipient, "size").unwrap().choices[0].price,
//!     None
//! );
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod fingerprint;
pub mod money;
pub mod options;
pub mod product;
pub mod schema;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{OptionWarning, ProductError, ProductResult, SchemaError};
pub use money::{CurrencyCode, Money};
pub use options::{Audience, OptionTree, ProductOption};
pub use product::{Metadata, ProductDocument};
pub use schema::{FieldKind, FieldSchema};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Version stamped into every payload's `give.it.sdk_version`.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Length of an ISO 4217 currency code.
pub const CURRENCY_CODE_LEN: usize = 3;

/// Separator between segments of a flattened field path (`details:code`).
pub const FIELD_PATH_SEPARATOR: char = ':';
