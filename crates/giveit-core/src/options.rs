//! # Option Tree
//!
//! Buyer- and recipient-selectable options attached to a product.
//!
//! ## Structure
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           OptionTree                                    │
//! │                                                                         │
//! │  buyer ─────────┬── "delivery" ── price: 500                           │
//! │                 │      ├── choice "standard"                            │
//! │                 │      └── choice "express"  ── price: 900             │
//! │                 └── "gift-wrap"                                         │
//! │                                                                         │
//! │  recipient ─────┬── "size"                                             │
//! │                 │      ├── choice "S"                                   │
//! │                 │      ├── choice "M"                                   │
//! │                 │      └── choice "L"                                   │
//! │                 └── "colour"                                            │
//! │                                                                         │
//! │  • Ids are unique per audience, not globally                           │
//! │  • Recipients never pay: no non-zero price at any depth                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Recipient Price Stripping
//! The recipient of a gift chooses options but never pays for them. A
//! price that slipped into a recipient option is removed (with a warning)
//! rather than rejected, so a shop that reuses one option definition for
//! both audiences still renders a button.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, warn};
use ts_rs::TS;

use crate::error::{OptionWarning, ProductError, ProductResult};
use crate::money::Money;

// =============================================================================
// Audience
// =============================================================================

/// Who picks an option: the person buying, or the person receiving.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Audience {
    Buyer,
    Recipient,
}

impl Audience {
    pub fn as_str(&self) -> &'static str {
        match self {
            Audience::Buyer => "buyer",
            Audience::Recipient => "recipient",
        }
    }
}

impl fmt::Display for Audience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Product Option
// =============================================================================

/// A selectable option, possibly with nested choices of the same shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductOption {
    /// Caller-supplied identifier, unique within its audience.
    pub id: String,

    /// Display label shown by the widget.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub name: Option<String>,

    /// Surcharge in minor units.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub price: Option<Money>,

    /// Nested choices, in display order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[ts(as = "Option<Vec<ProductOption>>", optional)]
    pub choices: Vec<ProductOption>,
}

impl ProductOption {
    /// Creates an option with only an id.
    pub fn new(id: impl Into<String>) -> Self {
        ProductOption {
            id: id.into(),
            name: None,
            price: None,
            choices: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_price(mut self, price: Money) -> Self {
        self.price = Some(price);
        self
    }

    /// Appends a nested choice.
    pub fn with_choice(mut self, choice: ProductOption) -> Self {
        self.choices.push(choice);
        self
    }

    /// Returns true if this option or any nested choice has a non-zero price.
    pub fn has_nonzero_price(&self) -> bool {
        self.price.is_some_and(|p| !p.is_zero())
            || self.choices.iter().any(ProductOption::has_nonzero_price)
    }
}

// =============================================================================
// Price Stripping
// =============================================================================

/// Returns a copy of `option` with every non-zero price removed.
///
/// ## Rules
/// - Walks the tree depth-first, pre-order (a node before its choices)
/// - Non-zero price → removed, one [`OptionWarning::PriceStripped`] emitted
/// - Zero or absent price → left untouched
///
/// The input is never modified, so the same definition can still be added
/// to the buyer tree with its prices intact.
///
/// ## Example
/// ```rust
/// use giveit_core::money::Money;
/// use giveit_core::options::{strip_recipient_prices, ProductOption};
///
/// let size = ProductOption::new("size")
///     .with_choice(ProductOption::new("XL").with_price(Money::from_cents(200)));
///
/// let (stripped, warnings) = strip_recipient_prices(&size);
/// assert_eq!(stripped.choices[0].price, None);
/// assert_eq!(warnings.len(), 1);
/// assert_eq!(size.choices[0].price, Some(Money::from_cents(200)));
/// ```
pub fn strip_recipient_prices(option: &ProductOption) -> (ProductOption, Vec<OptionWarning>) {
    let mut stripped = option.clone();
    let mut warnings = Vec::new();
    strip_in_place(&mut stripped, &mut warnings);
    (stripped, warnings)
}

fn strip_in_place(option: &mut ProductOption, warnings: &mut Vec<OptionWarning>) {
    if let Some(price) = option.price {
        if !price.is_zero() {
            warn!(id = %option.id, price = %price, "Removing non-zero price from recipient option");
            warnings.push(OptionWarning::PriceStripped {
                id: option.id.clone(),
                price,
            });
            option.price = None;
        }
    }

    for choice in &mut option.choices {
        strip_in_place(choice, warnings);
    }
}

// =============================================================================
// Option Tree
// =============================================================================

/// Options keyed by audience, then by option id.
///
/// Serializes as `{"buyer": {id: option}, "recipient": {id: option}}`,
/// omitting an audience that has no options. Ids are kept in sorted order
/// so the serialized form is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionTree {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    buyer: BTreeMap<String, ProductOption>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    recipient: BTreeMap<String, ProductOption>,
}

impl OptionTree {
    pub fn new() -> Self {
        OptionTree::default()
    }

    fn audience(&self, audience: Audience) -> &BTreeMap<String, ProductOption> {
        match audience {
            Audience::Buyer => &self.buyer,
            Audience::Recipient => &self.recipient,
        }
    }

    fn audience_mut(&mut self, audience: Audience) -> &mut BTreeMap<String, ProductOption> {
        match audience {
            Audience::Buyer => &mut self.buyer,
            Audience::Recipient => &mut self.recipient,
        }
    }

    /// Inserts an option for an audience.
    ///
    /// ## Errors
    /// [`ProductError::DuplicateOptionId`] if the id is already present for
    /// that audience. The existing option is kept unchanged.
    pub fn add_option(&mut self, audience: Audience, option: ProductOption) -> ProductResult<()> {
        let options = self.audience_mut(audience);

        if options.contains_key(&option.id) {
            warn!(audience = %audience, id = %option.id, "Rejecting duplicate option id");
            return Err(ProductError::DuplicateOptionId {
                audience,
                id: option.id,
            });
        }

        debug!(audience = %audience, id = %option.id, "Adding option");
        options.insert(option.id.clone(), option);
        Ok(())
    }

    /// Inserts each option independently.
    ///
    /// ## Partial Success
    /// One duplicate does not stop the batch: every non-duplicate option is
    /// inserted, and the returned list holds one error per rejected option
    /// in input order. An empty list means everything was added.
    pub fn add_options<I>(&mut self, audience: Audience, options: I) -> Vec<ProductError>
    where
        I: IntoIterator<Item = ProductOption>,
    {
        options
            .into_iter()
            .filter_map(|option| self.add_option(audience, option).err())
            .collect()
    }

    /// Looks up an option by audience and id.
    pub fn get(&self, audience: Audience, id: &str) -> Option<&ProductOption> {
        self.audience(audience).get(id)
    }

    /// Iterates an audience's options in id order.
    pub fn iter(&self, audience: Audience) -> impl Iterator<Item = &ProductOption> {
        self.audience(audience).values()
    }

    /// Number of top-level options for an audience.
    pub fn len(&self, audience: Audience) -> usize {
        self.audience(audience).len()
    }

    /// True when neither audience has any options.
    pub fn is_empty(&self) -> bool {
        self.buyer.is_empty() && self.recipient.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn size_option() -> ProductOption {
        ProductOption::new("size")
            .with_name("Size")
            .with_choice(ProductOption::new("S"))
            .with_choice(ProductOption::new("M").with_price(Money::zero()))
            .with_choice(ProductOption::new("XL").with_price(Money::from_cents(200)))
    }

    #[test]
    fn test_duplicate_id_rejected_first_kept() {
        let mut tree = OptionTree::new();

        tree.add_option(Audience::Buyer, ProductOption::new("wrap").with_name("first"))
            .unwrap();
        let err = tree
            .add_option(Audience::Buyer, ProductOption::new("wrap").with_name("second"))
            .unwrap_err();

        assert_eq!(
            err,
            ProductError::DuplicateOptionId {
                audience: Audience::Buyer,
                id: "wrap".to_string(),
            }
        );
        assert_eq!(tree.len(Audience::Buyer), 1);
        assert_eq!(
            tree.get(Audience::Buyer, "wrap").unwrap().name.as_deref(),
            Some("first")
        );
    }

    #[test]
    fn test_audiences_are_separate_namespaces() {
        let mut tree = OptionTree::new();
        tree.add_option(Audience::Buyer, ProductOption::new("size")).unwrap();
        tree.add_option(Audience::Recipient, ProductOption::new("size")).unwrap();

        assert_eq!(tree.len(Audience::Buyer), 1);
        assert_eq!(tree.len(Audience::Recipient), 1);
    }

    #[test]
    fn test_add_options_partial_success() {
        let mut tree = OptionTree::new();
        tree.add_option(Audience::Buyer, ProductOption::new("b")).unwrap();

        let errors = tree.add_options(
            Audience::Buyer,
            vec![
                ProductOption::new("a"),
                ProductOption::new("b"),
                ProductOption::new("c"),
                ProductOption::new("a"),
            ],
        );

        assert_eq!(errors.len(), 2);
        assert!(errors
            .iter()
            .all(|e| matches!(e, ProductError::DuplicateOptionId { .. })));
        assert_eq!(tree.len(Audience::Buyer), 3);
    }

    #[test]
    fn test_strip_removes_only_nonzero_prices() {
        let (stripped, warnings) = strip_recipient_prices(&size_option());

        assert_eq!(stripped.choices[0].price, None);
        assert_eq!(stripped.choices[1].price, Some(Money::zero()));
        assert_eq!(stripped.choices[2].price, None);
        assert_eq!(
            warnings,
            vec![OptionWarning::PriceStripped {
                id: "XL".to_string(),
                price: Money::from_cents(200),
            }]
        );
        assert!(!stripped.has_nonzero_price());
    }

    #[test]
    fn test_strip_is_preorder() {
        let option = ProductOption::new("root")
            .with_price(Money::from_cents(100))
            .with_choice(
                ProductOption::new("a")
                    .with_price(Money::from_cents(200))
                    .with_choice(ProductOption::new("a1").with_price(Money::from_cents(300))),
            )
            .with_choice(ProductOption::new("b").with_price(Money::from_cents(400)));

        let (_, warnings) = strip_recipient_prices(&option);
        let ids: Vec<&str> = warnings
            .iter()
            .map(|w| match w {
                OptionWarning::PriceStripped { id, .. } => id.as_str(),
            })
            .collect();

        assert_eq!(ids, vec!["root", "a", "a1", "b"]);
    }

    #[test]
    fn test_strip_leaves_input_unchanged() {
        let original = size_option();
        let (_, _) = strip_recipient_prices(&original);
        assert_eq!(original, size_option());
        assert!(original.has_nonzero_price());
    }

    #[test]
    fn test_typescript_fields_match_serialized_shape() {
        let decl = ProductOption::decl();
        assert!(decl.contains("name?: string"));
        assert!(decl.contains("price?: Money"));
        assert!(decl.contains("choices?: Array<ProductOption>"));
    }

    #[test]
    fn test_tree_serialization_omits_empty_audience() {
        let mut tree = OptionTree::new();
        tree.add_option(Audience::Recipient, ProductOption::new("colour")).unwrap();

        let json = serde_json::to_value(&tree).unwrap();
        assert_eq!(json, serde_json::json!({ "recipient": { "colour": { "id": "colour" } } }));
    }
}
