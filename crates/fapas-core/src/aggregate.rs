//! # Aggregate Engine
//!
//! Pure functions deriving subtotals, the cart total and the item count
//! from a cart snapshot. Nothing here is ever persisted.
//!
//! ```text
//! itemSubtotal(item) = price × quantity          (0 if not priceable)
//! cartTotal(cart)    = Σ itemSubtotal            (cart order)
//! itemCount(cart)    = Σ quantity                (badge number)
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::amount::Amount;
use crate::cart::Cart;
use crate::types::{CartLineItem, ProductId};

/// Subtotal for a single line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineSubtotal {
    pub id: ProductId,
    pub subtotal: Amount,
    /// False when the line's price is not a usable number; `subtotal` is then 0.
    pub priceable: bool,
}

/// Everything derived from a cart snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartTotals {
    /// Per-line subtotals in cart order.
    pub lines: Vec<LineSubtotal>,
    pub cart_total: Amount,
    /// Sum of quantities (what the badge shows).
    pub item_count: u64,
    /// Number of distinct lines.
    pub line_count: usize,
    /// Lines that cannot be checked out.
    pub unpriceable: Vec<ProductId>,
}

impl CartTotals {
    /// Looks up the subtotal for a product id.
    pub fn subtotal_of(&self, id: &ProductId) -> Option<Amount> {
        self.lines.iter().find(|l| &l.id == id).map(|l| l.subtotal)
    }

    /// Returns true if every line can be checked out.
    pub fn is_fully_priceable(&self) -> bool {
        self.unpriceable.is_empty()
    }
}

/// `price × quantity`, or `None` if the price is not a usable number or
/// the product overflows to infinity.
pub fn item_subtotal(item: &CartLineItem) -> Option<Amount> {
    item.price
        .amount()
        .map(|price| price.multiply_quantity(item.quantity))
        .filter(Amount::is_valid_price)
}

/// Sum of priceable subtotals; unpriceable lines contribute zero.
pub fn cart_total(cart: &Cart) -> Amount {
    cart.items()
        .iter()
        .map(|item| item_subtotal(item).unwrap_or_default())
        .sum()
}

/// Sum of quantities.
pub fn item_count(cart: &Cart) -> u64 {
    cart.items().iter().map(|item| u64::from(item.quantity)).sum()
}

/// Computes all aggregates for a snapshot in one pass.
pub fn aggregate(cart: &Cart) -> CartTotals {
    let mut lines = Vec::with_capacity(cart.len());
    let mut unpriceable = Vec::new();
    let mut total = Amount::zero();
    let mut count = 0u64;

    for item in cart.items() {
        let subtotal = item_subtotal(item);
        if subtotal.is_none() {
            unpriceable.push(item.id.clone());
        }
        let subtotal_value = subtotal.unwrap_or_default();
        total += subtotal_value;
        count += u64::from(item.quantity);
        lines.push(LineSubtotal {
            id: item.id.clone(),
            subtotal: subtotal_value,
            priceable: subtotal.is_some(),
        });
    }

    CartTotals {
        lines,
        cart_total: total,
        item_count: count,
        line_count: cart.len(),
        unpriceable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Price, ProductDescriptor};
    use crate::cart::CartLimits;

    fn cart_of(lines: &[(i64, f64, u32)]) -> Cart {
        let limits = CartLimits::default();
        lines.iter().fold(Cart::new(), |cart, &(id, price, qty)| {
            cart.with_added(
                &ProductDescriptor::new(id, format!("Product {}", id), price, "img"),
                qty,
                &limits,
            )
            .unwrap()
        })
    }

    #[test]
    fn test_empty_cart() {
        let totals = aggregate(&Cart::new());
        assert!(totals.cart_total.is_zero());
        assert_eq!(totals.item_count, 0);
        assert_eq!(totals.line_count, 0);
        assert!(totals.lines.is_empty());
    }

    #[test]
    fn test_totals_match_definitions() {
        let cart = cart_of(&[(1, 10.0, 3), (2, 5.0, 1), (3, 0.1, 7)]);
        let totals = aggregate(&cart);

        let expected_total = 10.0 * 3.0 + 5.0 * 1.0 + 0.1 * 7.0;
        assert_eq!(totals.cart_total.value(), expected_total);
        assert_eq!(totals.cart_total, cart_total(&cart));
        assert_eq!(totals.item_count, 11);
        assert_eq!(totals.item_count, item_count(&cart));
        assert_eq!(totals.line_count, 3);
        assert_eq!(totals.subtotal_of(&ProductId::from(1)), Some(Amount::new(30.0)));
        assert!(totals.is_fully_priceable());
    }

    #[test]
    fn test_unpriceable_line_contributes_zero() {
        let limits = CartLimits::default();
        let mut odd = ProductDescriptor::new(2, "Gift card", 0.0, "img");
        odd.price = Price::Raw(serde_json::json!("N/A"));

        let cart = cart_of(&[(1, 10.0, 2)]).with_added(&odd, 4, &limits).unwrap();
        let totals = aggregate(&cart);

        assert_eq!(totals.cart_total, Amount::new(20.0));
        assert_eq!(totals.item_count, 6);
        assert_eq!(totals.unpriceable, vec![ProductId::from(2)]);
        assert!(!totals.is_fully_priceable());
        assert_eq!(item_subtotal(&cart.items()[1]), None);
    }
}
