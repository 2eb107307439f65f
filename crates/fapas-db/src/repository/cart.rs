//! # Cart Repository
//!
//! Stores the whole cart as one JSON array under a single key.
//!
//! ## Stored Format
//! ```text
//! cartItems → [
//!   { "id": 1,   "title": "Backpack", "price": 109.95, "image": "https://...", "quantity": 2 },
//!   { "id": "7", "title": "Ring",     "price": 9.99,   "image": "https://...", "quantity": 1 }
//! ]
//! ```
//!
//! Every save rewrites the whole value. An absent key reads as an empty
//! cart; bytes that don't decode are reported, never replaced.

use std::sync::Arc;

use tracing::{debug, warn};

use fapas_core::{Cart, CartLimits, CartLineItem};

use crate::error::{DbError, DbResult};
use crate::kv::KeyValueStore;

/// Loads and saves the cart through a [`KeyValueStore`].
#[derive(Debug, Clone)]
pub struct CartRepository {
    store: Arc<dyn KeyValueStore>,
    key: String,
    limits: CartLimits,
}

impl CartRepository {
    /// Creates a repository storing the cart under `key`.
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        CartRepository {
            store,
            key: key.into(),
            limits: CartLimits::default(),
        }
    }

    /// Sets the limits stored quantities are clamped to on load.
    pub fn with_limits(mut self, limits: CartLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Store key holding the cart.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Reads the stored cart.
    ///
    /// ## Returns
    /// - Absent key: an empty cart
    /// - Stored array: the cart, with zero or negative quantity lines
    ///   dropped, duplicate ids merged and quantities clamped to the
    ///   limit (each repair logged at WARN)
    ///
    /// ## Errors
    /// `CorruptValue` if the bytes are not a JSON array of line items.
    pub async fn load(&self) -> DbResult<Cart> {
        let Some(bytes) = self.store.get(&self.key).await? else {
            debug!(key = %self.key, "No stored cart, starting empty");
            return Ok(Cart::new());
        };

        let records: Vec<CartLineItem> = serde_json::from_slice(&bytes)
            .map_err(|e| DbError::corrupt(&self.key, e.to_string()))?;

        let (cart, report) = Cart::from_stored(records, &self.limits);

        for id in &report.dropped_non_positive {
            warn!(key = %self.key, product_id = %id, "Dropped stored line without quantity");
        }
        for id in &report.merged_duplicates {
            warn!(key = %self.key, product_id = %id, "Merged duplicate stored line");
        }
        for id in &report.clamped {
            warn!(
                key = %self.key,
                product_id = %id,
                max = self.limits.max_item_quantity,
                "Clamped stored quantity"
            );
        }

        debug!(key = %self.key, lines = cart.len(), "Loaded cart");
        Ok(cart)
    }

    /// Replaces the stored cart.
    pub async fn save(&self, cart: &Cart) -> DbResult<()> {
        let bytes = serde_json::to_vec(cart)?;
        self.store.set(&self.key, &bytes).await
    }

    /// Removes the stored cart entirely.
    pub async fn clear(&self) -> DbResult<()> {
        self.store.remove(&self.key).await
    }
}
