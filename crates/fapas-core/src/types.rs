//! # Domain Types
//!
//! Core domain types shared by the cart, the store and the frontend.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  Catalog (inbound)            Cart (stored)          Checkout (result) │
//! │  ┌──────────────────┐        ┌────────────────┐     ┌────────────────┐ │
//! │  │ ProductDescriptor│ ─────► │ CartLineItem   │ ──► │ SettledLine    │ │
//! │  │  id              │  add   │  id            │     │  unit_price    │ │
//! │  │  title, image    │        │  title, image  │     │  subtotal      │ │
//! │  │  price           │        │  price         │     └───────┬────────┘ │
//! │  │  description     │        │  quantity ≥ 1  │             ▼          │
//! │  │  rating          │        └────────────────┘     ┌────────────────┐ │
//! │  └──────────────────┘                               │CheckoutReceipt │ │
//! │                                                     └────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Compatibility
//! The stored cart is a JSON array of `{ id, title, price, image, quantity }`
//! records. `id` may be a number or a string and must round-trip exactly;
//! `price` may hold a non-numeric value, which is kept verbatim.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use ts_rs::TS;
use uuid::Uuid;

use crate::amount::Amount;

// =============================================================================
// Product Id
// =============================================================================

/// Stable product identifier, the join key between catalog and cart.
///
/// Integer `1` and string `"1"` are different ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[serde(untagged)]
#[ts(export)]
pub enum ProductId {
    Int(i64),
    Text(String),
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductId::Int(id) => write!(f, "{}", id),
            ProductId::Text(id) => f.write_str(id),
        }
    }
}

impl From<i64> for ProductId {
    fn from(id: i64) -> Self {
        ProductId::Int(id)
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        ProductId::Text(id.to_string())
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        ProductId::Text(id)
    }
}

// =============================================================================
// Price
// =============================================================================

/// Unit price as it arrived from the catalog.
///
/// ## Why Keep Non-Numbers?
/// A bad price must not be coerced to 0 (that would let checkout charge
/// nothing) and must not make the whole stored cart unreadable. It is
/// kept as the raw JSON value, contributes 0 to totals, and blocks
/// checkout of its line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(untagged)]
#[ts(export)]
pub enum Price {
    /// A JSON number.
    Amount(Amount),
    /// Anything else (string, null, object...).
    Raw(serde_json::Value),
}

impl Price {
    /// Returns the unit price if it is a finite, non-negative number.
    pub fn amount(&self) -> Option<Amount> {
        match self {
            Price::Amount(amount) if amount.is_valid_price() => Some(*amount),
            _ => None,
        }
    }

    /// Returns true if the price can be charged.
    pub fn is_priceable(&self) -> bool {
        self.amount().is_some()
    }
}

/// A missing price reads as JSON `null`.
impl Default for Price {
    fn default() -> Self {
        Price::Raw(serde_json::Value::Null)
    }
}

/// NaN and infinities have no JSON form, so they become `null` up front.
impl From<f64> for Price {
    fn from(value: f64) -> Self {
        if value.is_finite() {
            Price::Amount(Amount::new(value))
        } else {
            Price::Raw(serde_json::Value::Null)
        }
    }
}

// =============================================================================
// Product Descriptor
// =============================================================================

/// Product rating from the catalog (display only).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Rating {
    pub rate: f64,
    pub count: u64,
}

/// A product as delivered by the catalog/browsing screens.
///
/// Only `id`, `title`, `price` and `image` are consumed by the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductDescriptor {
    pub id: ProductId,
    pub title: String,
    #[serde(default)]
    pub price: Price,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub rating: Option<Rating>,
}

impl ProductDescriptor {
    /// Creates a descriptor with the fields the cart cares about.
    pub fn new(
        id: impl Into<ProductId>,
        title: impl Into<String>,
        price: impl Into<Price>,
        image: impl Into<String>,
    ) -> Self {
        ProductDescriptor {
            id: id.into(),
            title: title.into(),
            price: price.into(),
            image: image.into(),
            description: None,
            rating: None,
        }
    }
}

// =============================================================================
// Cart Line Item
// =============================================================================

/// One product entry in the cart.
///
/// ## Invariant
/// `quantity >= 1` while the line exists. A line that would reach 0 is
/// dropped from the cart instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartLineItem {
    pub id: ProductId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub price: Price,
    #[serde(default)]
    pub image: String,
    #[serde(deserialize_with = "saturating_quantity")]
    pub quantity: u32,
}

/// Reads a stored quantity, mapping negatives to 0 and huge values to
/// `u32::MAX` so that one bad line never makes the whole cart unreadable.
fn saturating_quantity<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = i64::deserialize(deserializer)?;
    Ok(u32::try_from(raw.max(0)).unwrap_or(u32::MAX))
}

impl CartLineItem {
    /// Creates a line item from a catalog product.
    pub fn from_product(product: &ProductDescriptor, quantity: u32) -> Self {
        CartLineItem {
            id: product.id.clone(),
            title: product.title.clone(),
            price: product.price.clone(),
            image: product.image.clone(),
            quantity,
        }
    }

    /// Returns a copy of this line with a different quantity.
    pub fn with_quantity(&self, quantity: u32) -> Self {
        CartLineItem {
            quantity,
            ..self.clone()
        }
    }
}

// =============================================================================
// Checkout
// =============================================================================

/// A line that was paid for during checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SettledLine {
    pub id: ProductId,
    pub title: String,
    pub quantity: u32,
    pub unit_price: Amount,
    pub subtotal: Amount,
}

/// Result of a simulated checkout.
///
/// Receipts are handed back to the caller and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CheckoutReceipt {
    pub receipt_id: Uuid,
    pub checked_out_at: DateTime<Utc>,
    pub lines: Vec<SettledLine>,
    pub charged: Amount,
}

impl CheckoutReceipt {
    /// Builds a receipt for the settled lines; `charged` is their subtotal sum.
    pub fn new(lines: Vec<SettledLine>) -> Self {
        let charged = lines.iter().map(|l| l.subtotal).sum();
        CheckoutReceipt {
            receipt_id: Uuid::new_v4(),
            checked_out_at: Utc::now(),
            lines,
            charged,
        }
    }

    /// Returns true if nothing was charged (empty cart checkout).
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Confirmation text shown after payment, rounded to two decimals.
    ///
    /// ## Example
    /// ```text
    /// Payment successful for Backpack
    /// Amount paid: $30.00
    /// ```
    pub fn confirmation_message(&self) -> String {
        let subject = match self.lines.as_slice() {
            [single] => single.title.clone(),
            lines => format!("{} items", lines.len()),
        };
        format!(
            "Payment successful for {}\nAmount paid: {}",
            subject, self.charged
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_product_id_round_trip() {
        let int_id: ProductId = serde_json::from_value(json!(1)).unwrap();
        let text_id: ProductId = serde_json::from_value(json!("1")).unwrap();
        assert_eq!(int_id, ProductId::Int(1));
        assert_eq!(text_id, ProductId::Text("1".to_string()));
        assert_ne!(int_id, text_id);

        assert_eq!(serde_json::to_value(&int_id).unwrap(), json!(1));
        assert_eq!(serde_json::to_value(&text_id).unwrap(), json!("1"));
    }

    #[test]
    fn test_price_variants() {
        let numeric: Price = serde_json::from_value(json!(10)).unwrap();
        assert_eq!(numeric.amount(), Some(Amount::new(10.0)));

        let text: Price = serde_json::from_value(json!("ten")).unwrap();
        assert!(!text.is_priceable());
        assert_eq!(serde_json::to_value(&text).unwrap(), json!("ten"));

        let negative = Price::from(-3.0);
        assert!(!negative.is_priceable());

        assert!(!Price::default().is_priceable());
    }

    #[test]
    fn test_non_finite_price_survives_round_trip() {
        for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let item = CartLineItem {
                id: ProductId::from(1),
                title: "A".into(),
                price: Price::from(value),
                image: String::new(),
                quantity: 1,
            };
            assert_eq!(item.price, Price::Raw(serde_json::Value::Null));

            let bytes = serde_json::to_vec(&item).unwrap();
            let back: CartLineItem = serde_json::from_slice(&bytes).unwrap();
            assert_eq!(back, item);
        }
    }

    #[test]
    fn test_line_item_missing_price_reads_as_unpriceable() {
        let item: CartLineItem =
            serde_json::from_value(json!({"id": 3, "title": "Mug", "image": "m.png", "quantity": 2}))
                .unwrap();
        assert_eq!(item.quantity, 2);
        assert!(!item.price.is_priceable());
    }

    #[test]
    fn test_descriptor_from_catalog_json() {
        let product: ProductDescriptor = serde_json::from_value(json!({
            "id": 1,
            "title": "Fjallraven Backpack",
            "price": 109.95,
            "description": "Your perfect pack for everyday use",
            "image": "https://example.com/81fPKd-2AYL.jpg",
            "rating": { "rate": 3.9, "count": 120 }
        }))
        .unwrap();

        assert_eq!(product.id, ProductId::Int(1));
        assert_eq!(product.price.amount(), Some(Amount::new(109.95)));
        assert_eq!(product.rating.map(|r| r.count), Some(120));
    }

    #[test]
    fn test_line_item_wire_format() {
        let item = CartLineItem::from_product(&ProductDescriptor::new(1, "A", 10.0, "x"), 2);
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(
            value,
            json!({"id": 1, "title": "A", "price": 10.0, "image": "x", "quantity": 2})
        );
    }

    #[test]
    fn test_receipt_confirmation_message() {
        let receipt = CheckoutReceipt::new(vec![SettledLine {
            id: ProductId::from(1),
            title: "Backpack".to_string(),
            quantity: 3,
            unit_price: Amount::new(10.0),
            subtotal: Amount::new(30.0),
        }]);
        assert_eq!(receipt.charged, Amount::new(30.0));
        assert_eq!(
            receipt.confirmation_message(),
            "Payment successful for Backpack\nAmount paid: $30.00"
        );
    }

    #[test]
    fn test_empty_receipt() {
        let receipt = CheckoutReceipt::new(Vec::new());
        assert!(receipt.is_empty());
        assert!(receipt.charged.is_zero());
    }
}
