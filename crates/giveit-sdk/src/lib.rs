//! # giveit-sdk: Button Rendering for give.it
//!
//! Validates a [`ProductDocument`](giveit_core::ProductDocument), serializes
//! it, hands it to an injected encoder and wraps the result in the markup a
//! merchant page embeds.
//!
//! ## Render Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                            Render Flow                                  │
//! │                                                                         │
//! │  SdkConfig::load() ──► context() ──► Option<SdkContext> (data key)     │
//! │                                            │                            │
//! │  ProductDocument ──► PayloadPipeline::render(&product, ctx)            │
//! │                          │                                              │
//! │                          ├── validate  (FieldSchema)                    │
//! │                          ├── encode    (PayloadEncoder, injected)       │
//! │                          └── embed     (fragment)                       │
//! │                                   │                                     │
//! │                                   ▼                                     │
//! │   Button(html) │ Errors(html) (verbose) │ NotRendered │ Err(fatal)      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`pipeline`] - The validate → encode → embed state machine
//! - [`fragment`] - Button and error markup
//! - [`encoder`] - The encoder seam
//! - [`context`] - The key-holder context
//! - [`config`] - TOML + environment configuration
//! - [`telemetry`] - `tracing` subscriber setup
//! - [`error`] - SDK error types
//!
//! ## Example Usage
//!
//! ```rust
//! use giveit_core::ProductDocument;
//! use giveit_sdk::context::{DataKey, SdkContext};
//! use giveit_sdk::encoder::EncodeError;
//! use giveit_sdk::pipeline::{PayloadPipeline, Rendered};
//! use serde_json::json;
//!
//! // Host-supplied encryption; here a stand-in that just measures the input.
//! let encoder = |plaintext: &str, _key: &DataKey| -> Result<String, EncodeError> {
//!     Ok(format!("len{}", plaintext.len()))
//! };
//!
//! let product = ProductDocument::with_details([
//!     ("code", json!("MUG-01")),
//!     ("price", json!(1299)),
//!     ("name", json!("Coffee Mug")),
//!     ("image", json!("https://shop.example/mug.png")),
//! ]);
//!
//! let ctx = SdkContext::new(DataKey::new("merchant-data-key").unwrap());
//! let rendered = PayloadPipeline::new(encoder).render(&product, Some(&ctx)).unwrap();
//!
//! assert!(matches!(rendered, Rendered::Button(_)));
//! ```

pub mod config;
pub mod context;
pub mod encoder;
pub mod error;
pub mod fragment;
pub mod pipeline;
pub mod telemetry;

pub use config::SdkConfig;
pub use context::{DataKey, SdkContext};
pub use encoder::{EncodeError, PayloadEncoder};
pub use error::{SdkError, SdkResult};
pub use pipeline::{PayloadPipeline, PipelineState, RenderFailure, Rendered};
