//! # Cart
//!
//! The cart value and its pure transitions.
//!
//! ## Line Item Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │            with_added(q)                                               │
//! │  absent ─────────────────► present(q)                                  │
//! │                              │   ▲                                      │
//! │        with_added / increment│   │decrement (floor at 1, never deletes)│
//! │                              ▼   │                                      │
//! │                            present(q+n)                                │
//! │                              │                                          │
//! │   with_removed_unit (q-1, dropped at 0)  ───────────► absent           │
//! │   checkout_line / checkout_all (any q)   ───────────► absent           │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Purity
//! Every transition takes `&self` and returns a NEW `Cart`. The snapshot a
//! caller holds is never modified behind its back, and a failed transition
//! leaves nothing half-applied.
//!
//! ## Invariants
//! - Lines are unique by `id`
//! - Every line has `quantity >= 1`
//! - Insertion order is kept; only removal changes positions

use serde::{Deserialize, Serialize};

use crate::aggregate::item_subtotal;
use crate::error::{CoreError, CoreResult};
use crate::types::{CartLineItem, ProductDescriptor, ProductId, SettledLine};
use crate::validation::validate_product;
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

// =============================================================================
// Limits
// =============================================================================

/// Upper bounds applied when quantities grow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLimits {
    /// Maximum quantity of a single line.
    pub max_item_quantity: u32,
    /// Maximum number of distinct lines.
    pub max_line_items: usize,
}

impl Default for CartLimits {
    fn default() -> Self {
        CartLimits {
            max_item_quantity: MAX_ITEM_QUANTITY,
            max_line_items: MAX_CART_ITEMS,
        }
    }
}

impl CartLimits {
    fn check_quantity(&self, requested: u64) -> CoreResult<u32> {
        if requested > u64::from(self.max_item_quantity) {
            return Err(CoreError::QuantityTooLarge {
                requested,
                max: self.max_item_quantity,
            });
        }
        // Bounded by max_item_quantity above
        Ok(requested as u32)
    }
}

// =============================================================================
// Stored Data Repair
// =============================================================================

/// What had to be fixed while loading a stored cart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepairReport {
    /// Lines stored with quantity 0 or below (dropped).
    pub dropped_non_positive: Vec<ProductId>,
    /// Ids that appeared more than once (merged into the first occurrence).
    pub merged_duplicates: Vec<ProductId>,
    /// Lines whose quantity was cut down to `max_item_quantity`.
    pub clamped: Vec<ProductId>,
}

impl RepairReport {
    /// Returns true if the stored data was already valid.
    pub fn is_clean(&self) -> bool {
        self.dropped_non_positive.is_empty()
            && self.merged_duplicates.is_empty()
            && self.clamped.is_empty()
    }
}

// =============================================================================
// Cart
// =============================================================================

/// Ordered collection of line items, unique by product id.
///
/// Serializes as a bare JSON array of line items. There is no
/// `Deserialize`: stored arrays come back through [`Cart::from_stored`].
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartLineItem>,
}

impl Cart {
    /// Creates an empty cart.
    pub fn new() -> Self {
        Cart { items: Vec::new() }
    }

    /// Builds a cart from stored records, restoring the invariants.
    ///
    /// ## Repairs
    /// - Lines with quantity 0 (negative stored quantities decode as 0)
    ///   are dropped
    /// - Duplicate ids are merged: quantities add up, the first position
    ///   and display fields win
    /// - Quantities above `limits.max_item_quantity` are cut down to it
    pub fn from_stored(records: Vec<CartLineItem>, limits: &CartLimits) -> (Self, RepairReport) {
        let mut report = RepairReport::default();
        let mut items: Vec<CartLineItem> = Vec::with_capacity(records.len());

        for record in records {
            if record.quantity == 0 {
                report.dropped_non_positive.push(record.id);
                continue;
            }
            match items.iter_mut().find(|i| i.id == record.id) {
                Some(existing) => {
                    existing.quantity = existing.quantity.saturating_add(record.quantity);
                    report.merged_duplicates.push(record.id);
                }
                None => items.push(record),
            }
        }

        for item in &mut items {
            if item.quantity > limits.max_item_quantity {
                item.quantity = limits.max_item_quantity;
                report.clamped.push(item.id.clone());
            }
        }

        (Cart { items }, report)
    }

    /// Returns the line items in cart order.
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Consumes the cart, returning its line items.
    pub fn into_items(self) -> Vec<CartLineItem> {
        self.items
    }

    /// Returns the number of distinct lines.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Finds a line by product id.
    pub fn get(&self, id: &ProductId) -> Option<&CartLineItem> {
        self.items.iter().find(|i| &i.id == id)
    }

    fn require(&self, id: &ProductId) -> CoreResult<&CartLineItem> {
        self.get(id)
            .ok_or_else(|| CoreError::NotFound { id: id.clone() })
    }

    /// Copy of the cart with one line replaced (`None` drops it).
    fn replacing(&self, id: &ProductId, replacement: Option<CartLineItem>) -> Cart {
        let mut replacement = replacement;
        let items = self
            .items
            .iter()
            .filter_map(|item| {
                if &item.id == id {
                    replacement.take()
                } else {
                    Some(item.clone())
                }
            })
            .collect();
        Cart { items }
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Adds `quantity` units of a product.
    ///
    /// ## Behavior
    /// - Product already in cart: its quantity grows by `quantity`
    /// - Product not in cart: a new line is appended
    ///
    /// ## Errors
    /// - `InvalidInput`: quantity is 0, or the descriptor is malformed
    /// - `QuantityTooLarge` / `CartTooLarge`: a limit would be exceeded
    pub fn with_added(
        &self,
        product: &ProductDescriptor,
        quantity: u32,
        limits: &CartLimits,
    ) -> CoreResult<Cart> {
        validate_product(product)?;
        let quantity = crate::validation::validate_quantity(
            i64::from(quantity),
            limits.max_item_quantity,
        )?;

        if let Some(existing) = self.get(&product.id) {
            let new_qty =
                limits.check_quantity(u64::from(existing.quantity) + u64::from(quantity))?;
            let updated = existing.with_quantity(new_qty);
            return Ok(self.replacing(&product.id, Some(updated)));
        }

        if self.items.len() >= limits.max_line_items {
            return Err(CoreError::CartTooLarge {
                max: limits.max_line_items,
            });
        }

        let mut items = self.items.clone();
        items.push(CartLineItem::from_product(product, quantity));
        Ok(Cart { items })
    }

    /// Adds one unit to an existing line.
    pub fn with_incremented(&self, id: &ProductId, limits: &CartLimits) -> CoreResult<Cart> {
        let item = self.require(id)?;
        let new_qty = limits.check_quantity(u64::from(item.quantity) + 1)?;
        Ok(self.replacing(id, Some(item.with_quantity(new_qty))))
    }

    /// Removes one unit from a line, but never below 1.
    ///
    /// Returns `Ok(None)` when the line is already at quantity 1: the cart
    /// does not change and the line stays.
    pub fn with_decremented(&self, id: &ProductId) -> CoreResult<Option<Cart>> {
        let item = self.require(id)?;
        if item.quantity <= 1 {
            return Ok(None);
        }
        Ok(Some(
            self.replacing(id, Some(item.with_quantity(item.quantity - 1))),
        ))
    }

    /// Removes exactly one unit; the line is dropped when it reaches 0.
    pub fn with_removed_unit(&self, id: &ProductId) -> CoreResult<Cart> {
        let item = self.require(id)?;
        let remaining = item.quantity.saturating_sub(1);
        let replacement = (remaining > 0).then(|| item.with_quantity(remaining));
        Ok(self.replacing(id, replacement))
    }

    /// Checks out a whole line, whatever its quantity.
    ///
    /// ## Returns
    /// The cart without that line, and the settled line whose `subtotal` is
    /// the amount charged.
    ///
    /// ## Errors
    /// - `NotFound`: no such line
    /// - `NotPriceable`: the line's price is not a usable number
    pub fn checkout_line(&self, id: &ProductId) -> CoreResult<(Cart, SettledLine)> {
        let item = self.require(id)?;
        let settled = settle(item)?;
        Ok((self.replacing(id, None), settled))
    }

    /// Settles every line. The caller replaces the cart with an empty one.
    ///
    /// Fails with `NotPriceable` on the first line that cannot be charged;
    /// nothing is settled in that case.
    pub fn checkout_all(&self) -> CoreResult<Vec<SettledLine>> {
        self.items.iter().map(settle).collect()
    }
}

fn settle(item: &CartLineItem) -> CoreResult<SettledLine> {
    match (item.price.amount(), item_subtotal(item)) {
        (Some(unit_price), Some(subtotal)) => Ok(SettledLine {
            id: item.id.clone(),
            title: item.title.clone(),
            quantity: item.quantity,
            unit_price,
            subtotal,
        }),
        _ => Err(CoreError::NotPriceable {
            id: item.id.clone(),
            title: item.title.clone(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate;
    use crate::amount::Amount;
    use crate::types::Price;

    fn product(id: i64, price: f64) -> ProductDescriptor {
        ProductDescriptor::new(id, format!("Product {}", id), price, "img")
    }

    fn limits() -> CartLimits {
        CartLimits::default()
    }

    fn qty(cart: &Cart, id: i64) -> Option<u32> {
        cart.get(&ProductId::from(id)).map(|i| i.quantity)
    }

    #[test]
    fn test_add_to_empty_cart() {
        let cart = Cart::new()
            .with_added(&ProductDescriptor::new(1, "A", 10.0, "x"), 2, &limits())
            .unwrap();

        assert_eq!(cart.len(), 1);
        assert_eq!(qty(&cart, 1), Some(2));
        let totals = aggregate(&cart);
        assert_eq!(totals.cart_total, Amount::new(20.0));
        assert_eq!(totals.item_count, 2);
    }

    #[test]
    fn test_add_is_additive() {
        let p = product(1, 9.99);
        let twice = Cart::new()
            .with_added(&p, 2, &limits())
            .unwrap()
            .with_added(&p, 3, &limits())
            .unwrap();
        let once = Cart::new().with_added(&p, 5, &limits()).unwrap();

        assert_eq!(twice, once);
        assert_eq!(twice.len(), 1);
    }

    #[test]
    fn test_add_preserves_order() {
        let cart = Cart::new()
            .with_added(&product(3, 1.0), 1, &limits())
            .unwrap()
            .with_added(&product(1, 1.0), 1, &limits())
            .unwrap()
            .with_added(&product(3, 1.0), 4, &limits())
            .unwrap();

        let ids: Vec<_> = cart.items().iter().map(|i| i.id.clone()).collect();
        assert_eq!(ids, vec![ProductId::from(3), ProductId::from(1)]);
    }

    #[test]
    fn test_add_rejects_zero_and_malformed() {
        let cart = Cart::new();
        assert!(matches!(
            cart.with_added(&product(1, 1.0), 0, &limits()),
            Err(CoreError::InvalidInput(_))
        ));
        assert!(matches!(
            cart.with_added(&ProductDescriptor::new(1, "", 1.0, "x"), 1, &limits()),
            Err(CoreError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_add_respects_limits() {
        let tight = CartLimits {
            max_item_quantity: 5,
            max_line_items: 1,
        };
        let cart = Cart::new().with_added(&product(1, 1.0), 4, &tight).unwrap();

        assert!(matches!(
            cart.with_added(&product(1, 1.0), 2, &tight),
            Err(CoreError::QuantityTooLarge { requested: 6, max: 5 })
        ));
        assert!(matches!(
            cart.with_added(&product(2, 1.0), 1, &tight),
            Err(CoreError::CartTooLarge { max: 1 })
        ));
    }

    #[test]
    fn test_transitions_do_not_touch_original() {
        let original = Cart::new().with_added(&product(1, 10.0), 2, &limits()).unwrap();
        let _ = original.with_incremented(&ProductId::from(1), &limits()).unwrap();
        let _ = original.with_removed_unit(&ProductId::from(1)).unwrap();
        assert_eq!(qty(&original, 1), Some(2));
    }

    #[test]
    fn test_increment() {
        let cart = Cart::new().with_added(&product(1, 10.0), 1, &limits()).unwrap();
        let cart = cart.with_incremented(&ProductId::from(1), &limits()).unwrap();
        assert_eq!(qty(&cart, 1), Some(2));

        assert!(matches!(
            cart.with_incremented(&ProductId::from(42), &limits()),
            Err(CoreError::NotFound { .. })
        ));
    }

    #[test]
    fn test_decrement_floors_at_one() {
        let cart = Cart::new().with_added(&product(1, 10.0), 2, &limits()).unwrap();

        let cart = cart
            .with_decremented(&ProductId::from(1))
            .unwrap()
            .expect("2 → 1 changes the cart");
        assert_eq!(qty(&cart, 1), Some(1));
        assert_eq!(aggregate(&cart).cart_total, Amount::new(10.0));

        assert_eq!(cart.with_decremented(&ProductId::from(1)).unwrap(), None);
        assert_eq!(qty(&cart, 1), Some(1));
    }

    #[test]
    fn test_remove_unit_drops_at_zero() {
        let cart = Cart::new().with_added(&product(1, 10.0), 2, &limits()).unwrap();

        let cart = cart.with_removed_unit(&ProductId::from(1)).unwrap();
        assert_eq!(qty(&cart, 1), Some(1));

        let cart = cart.with_removed_unit(&ProductId::from(1)).unwrap();
        assert!(cart.is_empty());
        let totals = aggregate(&cart);
        assert!(totals.cart_total.is_zero());
        assert_eq!(totals.item_count, 0);

        assert!(matches!(
            cart.with_removed_unit(&ProductId::from(1)),
            Err(CoreError::NotFound { .. })
        ));
    }

    #[test]
    fn test_checkout_line() {
        let cart = Cart::new()
            .with_added(&product(1, 10.0), 3, &limits())
            .unwrap()
            .with_added(&product(2, 5.0), 1, &limits())
            .unwrap();

        let (after, settled) = cart.checkout_line(&ProductId::from(1)).unwrap();
        assert_eq!(settled.subtotal, Amount::new(30.0));
        assert_eq!(settled.quantity, 3);
        assert_eq!(after.len(), 1);
        assert_eq!(qty(&after, 2), Some(1));
        assert_eq!(after.items()[0].price, Price::from(5.0));
    }

    #[test]
    fn test_checkout_line_refuses_unpriceable() {
        let mut odd = product(1, 0.0);
        odd.price = Price::Raw(serde_json::Value::Null);
        let cart = Cart::new().with_added(&odd, 2, &limits()).unwrap();

        assert!(matches!(
            cart.checkout_line(&ProductId::from(1)),
            Err(CoreError::NotPriceable { .. })
        ));
        assert!(matches!(
            cart.checkout_line(&ProductId::from(9)),
            Err(CoreError::NotFound { .. })
        ));
    }

    #[test]
    fn test_checkout_all() {
        let cart = Cart::new()
            .with_added(&product(1, 10.0), 3, &limits())
            .unwrap()
            .with_added(&product(2, 5.0), 1, &limits())
            .unwrap();

        let settled = cart.checkout_all().unwrap();
        assert_eq!(settled.len(), 2);
        let charged: Amount = settled.iter().map(|l| l.subtotal).sum();
        assert_eq!(charged, aggregate(&cart).cart_total);

        assert!(Cart::new().checkout_all().unwrap().is_empty());
    }

    #[test]
    fn test_from_stored_repairs() {
        let a = CartLineItem::from_product(&product(1, 1.0), 2);
        let zero = CartLineItem::from_product(&product(2, 1.0), 0);
        let dup = CartLineItem::from_product(&product(1, 1.0), 3);

        let (cart, report) = Cart::from_stored(vec![a, zero, dup], &limits());
        assert_eq!(cart.len(), 1);
        assert_eq!(qty(&cart, 1), Some(5));
        assert_eq!(report.dropped_non_positive, vec![ProductId::from(2)]);
        assert_eq!(report.merged_duplicates, vec![ProductId::from(1)]);
        assert!(report.clamped.is_empty());
        assert!(!report.is_clean());
    }

    #[test]
    fn test_from_stored_clamps_merged_quantity() {
        let a = CartLineItem::from_product(&product(1, 1.0), 999);
        let dup = CartLineItem::from_product(&product(1, 1.0), 999);
        let big = CartLineItem::from_product(&product(2, 1.0), 5000);

        let (cart, report) = Cart::from_stored(vec![a, dup, big], &limits());
        assert_eq!(qty(&cart, 1), Some(999));
        assert_eq!(qty(&cart, 2), Some(999));
        assert_eq!(report.clamped, vec![ProductId::from(1), ProductId::from(2)]);
    }

    #[test]
    fn test_negative_stored_quantity_is_dropped() {
        let records: Vec<CartLineItem> = serde_json::from_value(serde_json::json!([
            { "id": 1, "title": "A", "price": 1, "image": "", "quantity": -1 },
            { "id": 2, "title": "B", "price": 1, "image": "", "quantity": 4 }
        ]))
        .unwrap();

        let (cart, report) = Cart::from_stored(records, &limits());
        assert_eq!(cart.len(), 1);
        assert_eq!(qty(&cart, 2), Some(4));
        assert_eq!(report.dropped_non_positive, vec![ProductId::from(1)]);
    }

    #[test]
    fn test_serializes_as_array() {
        let cart = Cart::new().with_added(&product(1, 10.0), 1, &limits()).unwrap();
        let json = serde_json::to_value(&cart).unwrap();
        assert!(json.is_array());

        let records: Vec<CartLineItem> = serde_json::from_value(json).unwrap();
        let (back, report) = Cart::from_stored(records, &limits());
        assert_eq!(back, cart);
        assert!(report.is_clean());
    }

    #[test]
    fn test_overflowing_subtotal_blocks_checkout() {
        let cart = Cart::new()
            .with_added(&product(1, 1e308), 2, &limits())
            .unwrap();

        assert!(matches!(
            cart.checkout_line(&ProductId::from(1)),
            Err(CoreError::NotPriceable { .. })
        ));
        assert!(matches!(cart.checkout_all(), Err(CoreError::NotPriceable { .. })));

        let totals = aggregate(&cart);
        assert_eq!(totals.unpriceable, vec![ProductId::from(1)]);
        assert_eq!(totals.cart_total, Amount::zero());
    }
}
