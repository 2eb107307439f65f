//! # fapas-core: Pure Cart Logic for the FAPAS Storefront
//!
//! This crate holds the cart rules as pure functions with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      FAPAS Storefront Architecture                      │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  Mobile screens (external)                      │   │
//! │  │   Home ──► Product detail ──► Cart screen ──► Badge            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              fapas-cart (CartController, CountPublisher)        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ fapas-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │  amount   │  │   cart    │  │ aggregate │  │   │
//! │  │   │ LineItem  │  │  Amount   │  │   Cart    │  │  totals   │  │   │
//! │  │   │ Product   │  │  format   │  │ Limits    │  │  count    │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO STORE • NO NETWORK • PURE FUNCTIONS              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Product ids, prices, line items, receipts
//! - [`amount`] - Unrounded amount type, rounded only for display
//! - [`cart`] - The cart value and its transitions
//! - [`aggregate`] - Subtotals, total, item count
//! - [`validation`] - Quantity and product checks
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use fapas_core::{aggregate, Cart, CartLimits, ProductDescriptor};
//!
//! let product = ProductDescriptor::new(1, "A", 10.0, "x");
//! let cart = Cart::new().with_added(&product, 2, &CartLimits::default()).unwrap();
//!
//! let totals = aggregate(&cart);
//! assert_eq!(totals.cart_total.value(), 20.0);
//! assert_eq!(totals.item_count, 2);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod aggregate;
pub mod amount;
pub mod cart;
pub mod error;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use aggregate::{aggregate, CartTotals, LineSubtotal};
pub use amount::Amount;
pub use cart::{Cart, CartLimits, RepairReport};
pub use error::{CoreError, CoreResult, ValidationError};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Store key holding the serialized cart.
pub const DEFAULT_CART_KEY: &str = "cartItems";

/// Maximum distinct lines allowed in a cart.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single line.
///
/// Guards against typing 1000 instead of 10 in the quantity box.
pub const MAX_ITEM_QUANTITY: u32 = 999;
