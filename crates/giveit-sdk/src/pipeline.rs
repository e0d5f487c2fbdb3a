//! # Payload Pipeline
//!
//! Turns a product document into a button fragment.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Render State Machine                             │
//! │                                                                         │
//! │   Draft ──validate──► Validated ──encode──► Encoded ──embed──► Embedded │
//! │     │                     │   │                                         │
//! │     │ field errors        │   │ no SdkContext                           │
//! │     ▼                     │   ▼                                         │
//! │   Failed ◄────────────────┘  Err(EncoderUnavailable)  (fatal, encoder   │
//! │     ▲   encoder error /                               never called)     │
//! │     │   serialization error                                             │
//! │                                                                         │
//! │  Failed + render_errors  → Rendered::Errors(<error fragment>)          │
//! │  Failed, default         → Rendered::NotRendered (no detail leaked)    │
//! │  Embedded                → Rendered::Button(<button fragment>)         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The pipeline never mutates the document. Field errors are always
//! recomputed against the pipeline's schema; any the document recorded from
//! an earlier `ProductDocument::validate` call are left out, so each
//! appears once. The remaining accumulated errors, the fresh field errors
//! and the typed cause make up a [`RenderFailure`], which the error fragment
//! lists in that order.

use tracing::{debug, warn};

use giveit_core::{FieldSchema, ProductDocument, ProductError};

use crate::config::{SdkConfig, DEFAULT_BUTTON_TYPE};
use crate::context::SdkContext;
use crate::encoder::PayloadEncoder;
use crate::error::{SdkError, SdkResult};
use crate::fragment::{button_fragment, error_fragment};

// =============================================================================
// States
// =============================================================================

/// Why a render stopped, and every message accumulated up to that point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderFailure {
    /// Gate that failed:
    /// - [`SdkError::InvalidProduct`] - field validation
    /// - [`SdkError::Product`] - payload serialization
    /// - [`SdkError::EncodingFailed`] - the injected encoder
    pub cause: SdkError,

    /// Accumulated error messages, oldest first, not including the cause.
    pub errors: Vec<String>,
}

impl RenderFailure {
    /// Gate-level reason, e.g. `"product data is invalid"` or the encoder's
    /// failure reason.
    pub fn reason(&self) -> String {
        self.cause.to_string()
    }

    /// Messages as shown in the error fragment: the errors, then the reason.
    pub fn messages(&self) -> Vec<String> {
        let mut messages = self.errors.clone();
        messages.push(self.reason());
        messages
    }
}

/// Where a document is in the render pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineState {
    Draft,
    Validated,
    Encoded { ciphertext: String },
    Embedded { fragment: String },
    Failed(RenderFailure),
}

/// What a render hands back to the host page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    /// The button fragment.
    Button(String),
    /// The error fragment (verbose rendering only).
    Errors(String),
    /// Nothing to embed; details are withheld.
    NotRendered,
}

impl Rendered {
    /// The markup to embed, if any.
    pub fn html(&self) -> Option<&str> {
        match self {
            Rendered::Button(html) | Rendered::Errors(html) => Some(html),
            Rendered::NotRendered => None,
        }
    }

    pub fn is_button(&self) -> bool {
        matches!(self, Rendered::Button(_))
    }
}

// =============================================================================
// Pipeline
// =============================================================================

/// Validate → encode → embed, with an injected encoder.
#[derive(Debug, Clone)]
pub struct PayloadPipeline<E> {
    encoder: E,
    schema: FieldSchema,
    button_type: String,
    render_errors: bool,
}

impl<E: PayloadEncoder> PayloadPipeline<E> {
    /// Pipeline with the product schema, default button and hidden errors.
    pub fn new(encoder: E) -> Self {
        PayloadPipeline {
            encoder,
            schema: FieldSchema::product(),
            button_type: DEFAULT_BUTTON_TYPE.to_string(),
            render_errors: false,
        }
    }

    /// Pipeline taking button type and verbosity from config.
    pub fn from_config(encoder: E, config: &SdkConfig) -> Self {
        PayloadPipeline::new(encoder)
            .with_button_type(config.button_type.clone())
            .with_render_errors(config.render_errors)
    }

    pub fn with_button_type(mut self, button_type: impl Into<String>) -> Self {
        self.button_type = button_type.into();
        self
    }

    /// Opt into verbose rendering: failures produce an error fragment.
    pub fn with_render_errors(mut self, render_errors: bool) -> Self {
        self.render_errors = render_errors;
        self
    }

    pub fn with_schema(mut self, schema: FieldSchema) -> Self {
        self.schema = schema;
        self
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Draft → Validated, or Failed with every field error.
    pub fn validate(&self, product: &ProductDocument) -> PipelineState {
        let field_errors = product.check_fields(&self.schema);

        if field_errors.is_empty() {
            debug!("Product validated");
            return PipelineState::Validated;
        }

        warn!(field_errors = field_errors.len(), "Product data is invalid");
        let errors = carried_errors(product)
            .chain(field_errors.iter())
            .map(ToString::to_string)
            .collect();

        PipelineState::Failed(RenderFailure {
            cause: SdkError::InvalidProduct,
            errors,
        })
    }

    /// Validated → Encoded, or Failed if serialization or the encoder fails.
    ///
    /// ## Errors
    /// [`SdkError::EncoderUnavailable`] when `context` is `None`. The
    /// encoder is not called in that case.
    pub fn encode(
        &self,
        product: &ProductDocument,
        context: Option<&SdkContext>,
    ) -> SdkResult<PipelineState> {
        let context = context.ok_or(SdkError::EncoderUnavailable)?;

        let plaintext = match product.to_payload_json() {
            Ok(json) => json,
            Err(err) => {
                warn!(error = %err, "Payload serialization failed");
                return Ok(fail(product, SdkError::Product(err)));
            }
        };

        match self.encoder.encode(&plaintext, context.data_key()) {
            Ok(ciphertext) => {
                debug!(
                    plaintext_len = plaintext.len(),
                    ciphertext_len = ciphertext.len(),
                    "Payload encoded"
                );
                Ok(PipelineState::Encoded { ciphertext })
            }
            Err(err) => {
                warn!(reason = %err, "Encoder failed");
                Ok(fail(product, SdkError::EncodingFailed(err.reason().to_string())))
            }
        }
    }

    /// Encoded → Embedded.
    pub fn embed(&self, ciphertext: &str) -> PipelineState {
        debug!(button_type = %self.button_type, "Embedding payload");
        PipelineState::Embedded {
            fragment: button_fragment(&self.button_type, ciphertext),
        }
    }

    // =========================================================================
    // Driver
    // =========================================================================

    /// Runs every transition and returns the terminal state.
    pub fn run(
        &self,
        product: &ProductDocument,
        context: Option<&SdkContext>,
    ) -> SdkResult<PipelineState> {
        let mut state = PipelineState::Draft;

        loop {
            state = match state {
                PipelineState::Draft => self.validate(product),
                PipelineState::Validated => self.encode(product, context)?,
                PipelineState::Encoded { ciphertext } => self.embed(&ciphertext),
                terminal @ (PipelineState::Embedded { .. } | PipelineState::Failed(_)) => {
                    return Ok(terminal)
                }
            };
        }
    }

    /// Renders a product into what the host page should embed.
    ///
    /// ## Returns
    /// - `Ok(Rendered::Button)` on success
    /// - `Ok(Rendered::Errors)` on failure with verbose rendering
    /// - `Ok(Rendered::NotRendered)` on failure otherwise
    /// - `Err(SdkError::EncoderUnavailable)` without a key-holder context
    pub fn render(
        &self,
        product: &ProductDocument,
        context: Option<&SdkContext>,
    ) -> SdkResult<Rendered> {
        match self.run(product, context)? {
            PipelineState::Embedded { fragment } => Ok(Rendered::Button(fragment)),
            PipelineState::Failed(failure) if self.render_errors => {
                Ok(Rendered::Errors(error_fragment(&failure.messages())))
            }
            _ => Ok(Rendered::NotRendered),
        }
    }
}

/// Errors the document recorded that the pipeline does not recompute.
fn carried_errors(product: &ProductDocument) -> impl Iterator<Item = &ProductError> {
    product.errors().iter().filter(|e| !e.is_field_error())
}

fn fail(product: &ProductDocument, cause: SdkError) -> PipelineState {
    PipelineState::Failed(RenderFailure {
        cause,
        errors: carried_errors(product).map(ToString::to_string).collect(),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::DataKey;
    use crate::encoder::EncodeError;
    use giveit_core::options::ProductOption;
    use serde_json::{json, Value};
    use std::cell::Cell;

    fn valid_product() -> ProductDocument {
        ProductDocument::with_details([
            ("code", json!("MUG-01")),
            ("price", json!(1299)),
            ("name", json!("Coffee Mug")),
            ("image", json!("https://shop.example/mug.png")),
        ])
    }

    fn context() -> SdkContext {
        SdkContext::new(DataKey::new("test-key").unwrap())
    }

    /// Encoder that tags the plaintext with the key so tests can see both.
    fn tagging(plaintext: &str, key: &DataKey) -> Result<String, EncodeError> {
        Ok(format!("{}|{}", key.expose(), plaintext.len()))
    }

    fn failing(_: &str, _: &DataKey) -> Result<String, EncodeError> {
        Err(EncodeError::new("unable to encrypt payload"))
    }

    #[test]
    fn test_render_valid_product() {
        let pipeline = PayloadPipeline::new(tagging).with_button_type("red_round");
        let product = valid_product();
        let ctx = context();

        let rendered = pipeline.render(&product, Some(&ctx)).unwrap();
        let expected_len = product.to_payload_json().unwrap().len();

        assert_eq!(
            rendered,
            Rendered::Button(format!(
                r#"<span class="giveit-button" data-giveit-buttontype="red_round" data-giveit-data="test-key|{expected_len}"></span>"#
            ))
        );
        assert!(rendered.is_button());
    }

    #[test]
    fn test_encoder_receives_full_payload() {
        let seen = std::cell::RefCell::new(String::new());
        let capture = |plaintext: &str, _: &DataKey| -> Result<String, EncodeError> {
            *seen.borrow_mut() = plaintext.to_string();
            Ok("x".to_string())
        };

        let mut product = valid_product();
        product.set_currency("USD");
        product.add_buyer_option(ProductOption::new("wrap")).unwrap();

        PayloadPipeline::new(capture)
            .render(&product, Some(&context()))
            .unwrap();

        let payload: Value = serde_json::from_str(&seen.borrow()).unwrap();
        assert_eq!(payload["currency"], json!("USD"));
        assert_eq!(payload["options"]["buyer"]["wrap"]["id"], json!("wrap"));
        assert_eq!(
            payload["give.it"]["fingerprint"],
            json!(product.metadata().fingerprint)
        );
    }

    #[test]
    fn test_invalid_product_verbose_lists_errors_in_order() {
        let mut product = ProductDocument::with_details([("price", json!(1299))]);
        product.set_currency("DOLLAR");

        let pipeline = PayloadPipeline::new(tagging).with_render_errors(true);
        let rendered = pipeline.render(&product, Some(&context())).unwrap();

        let expected = [
            "invalid currency DOLLAR, must be a 3-letter ISO code",
            "missing field details:code",
            "missing field details:name",
            "missing field details:image",
            "product data is invalid",
        ];
        assert_eq!(rendered, Rendered::Errors(error_fragment(&expected)));
    }

    #[test]
    fn test_prior_validate_does_not_repeat_field_errors() {
        let mut product = ProductDocument::with_details([("price", json!(1299))]);
        product.set_currency("DOLLAR");
        assert!(!product.validate());
        assert_eq!(product.errors().len(), 4);

        let pipeline = PayloadPipeline::new(tagging).with_render_errors(true);
        let rendered = pipeline.render(&product, Some(&context())).unwrap();

        let expected = [
            "invalid currency DOLLAR, must be a 3-letter ISO code",
            "missing field details:code",
            "missing field details:name",
            "missing field details:image",
            "product data is invalid",
        ];
        assert_eq!(rendered, Rendered::Errors(error_fragment(&expected)));
        assert_eq!(rendered.html().unwrap().matches("giveit-error").count(), 5);
    }

    #[test]
    fn test_stale_field_errors_do_not_block_fixed_product() {
        let mut product = ProductDocument::with_details([("price", json!(1299))]);
        assert!(!product.validate());

        product.set_details([
            ("code", json!("MUG-01")),
            ("price", json!(1299)),
            ("name", json!("Coffee Mug")),
            ("image", json!("https://shop.example/mug.png")),
        ]);

        let pipeline = PayloadPipeline::new(tagging).with_render_errors(true);
        assert!(pipeline
            .render(&product, Some(&context()))
            .unwrap()
            .is_button());
    }

    #[test]
    fn test_invalid_product_cause() {
        let product = ProductDocument::with_details([("price", json!(1299))]);
        match PayloadPipeline::new(tagging).validate(&product) {
            PipelineState::Failed(failure) => {
                assert_eq!(failure.cause, SdkError::InvalidProduct);
                assert_eq!(failure.reason(), "product data is invalid");
            }
            other => panic!("expected Failed, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_product_non_verbose_leaks_nothing() {
        let product = ProductDocument::with_details([("price", json!(1299))]);
        let pipeline = PayloadPipeline::new(tagging);

        let rendered = pipeline.render(&product, Some(&context())).unwrap();
        assert_eq!(rendered, Rendered::NotRendered);
        assert_eq!(rendered.html(), None);
    }

    #[test]
    fn test_validation_does_not_mutate_document() {
        let product = ProductDocument::with_details([("price", json!(1299))]);
        PayloadPipeline::new(tagging)
            .render(&product, Some(&context()))
            .unwrap();
        assert!(product.errors().is_empty());
    }

    #[test]
    fn test_missing_context_fails_without_calling_encoder() {
        let calls = Cell::new(0);
        let counting = |_: &str, _: &DataKey| -> Result<String, EncodeError> {
            calls.set(calls.get() + 1);
            Ok("x".to_string())
        };

        let pipeline = PayloadPipeline::new(counting).with_render_errors(true);
        let err = pipeline.render(&valid_product(), None).unwrap_err();

        assert!(matches!(err, SdkError::EncoderUnavailable));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_encoder_failure_hidden_by_default() {
        let pipeline = PayloadPipeline::new(failing);
        let rendered = pipeline.render(&valid_product(), Some(&context())).unwrap();
        assert_eq!(rendered, Rendered::NotRendered);
    }

    #[test]
    fn test_encoder_failure_verbose() {
        let pipeline = PayloadPipeline::new(failing).with_render_errors(true);
        let product = valid_product();

        match pipeline.encode(&product, Some(&context())).unwrap() {
            PipelineState::Failed(failure) => assert_eq!(
                failure.cause,
                SdkError::EncodingFailed("unable to encrypt payload".to_string())
            ),
            other => panic!("expected Failed, got {:?}", other),
        }

        let rendered = pipeline.render(&product, Some(&context())).unwrap();
        assert_eq!(
            rendered,
            Rendered::Errors(error_fragment(&["unable to encrypt payload"]))
        );
    }

    #[test]
    fn test_run_reports_terminal_state() {
        let pipeline = PayloadPipeline::new(failing);
        let state = pipeline.run(&valid_product(), Some(&context())).unwrap();

        assert_eq!(
            state,
            PipelineState::Failed(RenderFailure {
                cause: SdkError::EncodingFailed("unable to encrypt payload".to_string()),
                errors: Vec::new(),
            })
        );
    }

    #[test]
    fn test_transitions_step_by_step() {
        let pipeline = PayloadPipeline::new(tagging);
        let product = valid_product();

        assert_eq!(pipeline.validate(&product), PipelineState::Validated);

        let ciphertext = match pipeline.encode(&product, Some(&context())).unwrap() {
            PipelineState::Encoded { ciphertext } => ciphertext,
            other => panic!("expected Encoded, got {:?}", other),
        };
        assert!(ciphertext.starts_with("test-key|"));

        assert!(matches!(
            pipeline.embed(&ciphertext),
            PipelineState::Embedded { .. }
        ));
    }

    #[test]
    fn test_custom_schema() {
        let schema = FieldSchema::from_descriptors([("details:sku", "string:8")]).unwrap();
        let pipeline = PayloadPipeline::new(tagging).with_schema(schema);
        let product = ProductDocument::with_details([("sku", json!("ABC"))]);

        assert!(pipeline
            .render(&product, Some(&context()))
            .unwrap()
            .is_button());
    }

    #[test]
    fn test_from_config() {
        let config = SdkConfig {
            data_key: Some("cfg-key".to_string()),
            render_errors: true,
            button_type: "green_pill".to_string(),
        };
        let ctx = config.context().unwrap();
        let pipeline = PayloadPipeline::from_config(tagging, &config);

        let rendered = pipeline.render(&valid_product(), ctx.as_ref()).unwrap();
        let html = rendered.html().unwrap();
        assert!(html.contains(r#"data-giveit-buttontype="green_pill""#));
        assert!(html.contains("cfg-key|"));
    }
}
