//! # Cart Controller
//!
//! The single writer of the cart snapshot.
//!
//! ## Mutation Cycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    One Cart Mutation                                    │
//! │                                                                         │
//! │  screen ──► controller.increment(id)                                   │
//! │                  │                                                      │
//! │                  ▼                                                      │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  lock snapshot (held until the end)                             │   │
//! │  │  1. next = cart.with_incremented(id)      ← pure, fapas-core    │   │
//! │  │  2. repo.save(&next)                      ← durable first       │   │
//! │  │  3. snapshot = next                       ← only after save     │   │
//! │  │  4. totals = aggregate(&next)                                   │   │
//! │  │  5. publisher.publish(totals.item_count)  ← badge everywhere    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                  │                                                      │
//! │                  ▼                                                      │
//! │  CartView { items, totals }                                            │
//! │                                                                         │
//! │  save fails ──► snapshot untouched, nothing published,                 │
//! │                 PersistenceFailure returned, store re-read next time   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Thread Safety
//! The snapshot sits behind a `tokio::sync::Mutex` held across the whole
//! read-modify-persist cycle, so two mutations never interleave and never
//! compute from a stale snapshot.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};
use ts_rs::TS;

use fapas_core::validation::{parse_quantity_input, validate_quantity};
use fapas_core::{
    aggregate, Cart, CartLimits, CartLineItem, CartTotals, CheckoutReceipt, CoreError,
    ProductDescriptor, ProductId, ValidationError,
};
use fapas_db::{CartRepository, DbError, KeyValueStore};

use crate::config::CartConfig;
use crate::error::{CartError, CartResult};
use crate::publisher::CountPublisher;

// =============================================================================
// Cart View
// =============================================================================

/// Cart contents plus everything derived from them.
///
/// This is what the cart screen renders after every call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartView {
    pub items: Vec<CartLineItem>,
    pub totals: CartTotals,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        CartView {
            items: cart.items().to_vec(),
            totals: aggregate(cart),
        }
    }
}

// =============================================================================
// Controller
// =============================================================================

#[derive(Debug)]
struct Snapshot {
    cart: Cart,
    /// Set after a failed write: the store may not match `cart`.
    needs_reload: bool,
}

/// Owns the in-memory cart and applies every mutation to it.
///
/// ## Usage
/// ```rust,ignore
/// let publisher = Arc::new(CountPublisher::new());
/// let controller = CartController::open(store, publisher.clone(), &config).await?;
///
/// let view = controller.add_or_increment(&product, 2).await?;
/// let receipt = controller.checkout_one(&product.id).await?;
/// ```
#[derive(Debug)]
pub struct CartController {
    snapshot: Mutex<Snapshot>,
    repo: CartRepository,
    publisher: Arc<CountPublisher>,
    limits: CartLimits,
}

impl CartController {
    /// Loads the stored cart and publishes its item count.
    ///
    /// ## Errors
    /// `Persistence` if the store can't be read or holds an unreadable cart.
    pub async fn open(
        store: Arc<dyn KeyValueStore>,
        publisher: Arc<CountPublisher>,
        config: &CartConfig,
    ) -> CartResult<Self> {
        let repo = CartRepository::new(store, config.storage.cart_key.clone())
            .with_limits(config.cart_limits());
        let cart = repo.load().await?;
        let count = aggregate(&cart).item_count;

        info!(
            key = %repo.key(),
            lines = cart.len(),
            item_count = count,
            "Cart opened"
        );
        publisher.publish(count);

        Ok(CartController {
            snapshot: Mutex::new(Snapshot {
                cart,
                needs_reload: false,
            }),
            repo,
            publisher,
            limits: config.cart_limits(),
        })
    }

    /// Returns the current cart and totals without changing anything.
    pub async fn view(&self) -> CartView {
        CartView::from(&self.snapshot.lock().await.cart)
    }

    /// Re-reads the store into the snapshot and republishes the count.
    ///
    /// Used after a persistence failure or an external write to the store.
    pub async fn reload(&self) -> CartResult<CartView> {
        let mut snapshot = self.snapshot.lock().await;
        self.reload_locked(&mut snapshot).await?;
        Ok(CartView::from(&snapshot.cart))
    }

    // =========================================================================
    // Quantity Operations
    // =========================================================================

    /// Adds `quantity` units of a product, appending a new line if needed.
    ///
    /// ## Behavior
    /// - Product in cart: quantity grows by `quantity`
    /// - Product not in cart: new line at the end
    /// - `quantity <= 0`, over the limit, or malformed product: logged,
    ///   cart unchanged, current view returned
    pub async fn add_or_increment(
        &self,
        product: &ProductDescriptor,
        quantity: i64,
    ) -> CartResult<CartView> {
        debug!(product_id = %product.id, quantity, "add_or_increment");
        let parsed = validate_quantity(quantity, self.limits.max_item_quantity);
        self.add_parsed(product, parsed).await
    }

    /// Same as [`add_or_increment`](Self::add_or_increment) with the quantity
    /// as typed into the quantity box (digits only).
    pub async fn add_or_increment_input(
        &self,
        product: &ProductDescriptor,
        raw_quantity: &str,
    ) -> CartResult<CartView> {
        debug!(product_id = %product.id, raw_quantity, "add_or_increment_input");
        let parsed = parse_quantity_input(raw_quantity, self.limits.max_item_quantity);
        self.add_parsed(product, parsed).await
    }

    async fn add_parsed(
        &self,
        product: &ProductDescriptor,
        quantity: Result<u32, ValidationError>,
    ) -> CartResult<CartView> {
        let mut snapshot = self.lock_fresh().await?;

        let quantity = match quantity {
            Ok(q) => q,
            Err(e) => return Ok(self.ignore(&snapshot, &product.id, e.into())),
        };

        match snapshot.cart.with_added(product, quantity, &self.limits) {
            Ok(next) => self.commit(&mut snapshot, next).await,
            Err(e) => self.ignore_or_fail(&snapshot, &product.id, e),
        }
    }

    /// Adds one unit to an existing line. Unknown ids are ignored.
    pub async fn increment(&self, id: &ProductId) -> CartResult<CartView> {
        debug!(product_id = %id, "increment");
        let mut snapshot = self.lock_fresh().await?;

        match snapshot.cart.with_incremented(id, &self.limits) {
            Ok(next) => self.commit(&mut snapshot, next).await,
            Err(e) => self.ignore_or_fail(&snapshot, id, e),
        }
    }

    /// Removes one unit, stopping at 1. Never deletes the line.
    pub async fn decrement(&self, id: &ProductId) -> CartResult<CartView> {
        debug!(product_id = %id, "decrement");
        let mut snapshot = self.lock_fresh().await?;

        match snapshot.cart.with_decremented(id) {
            Ok(Some(next)) => self.commit(&mut snapshot, next).await,
            Ok(None) => {
                debug!(product_id = %id, "Already at quantity 1, nothing to do");
                Ok(CartView::from(&snapshot.cart))
            }
            Err(e) => self.ignore_or_fail(&snapshot, id, e),
        }
    }

    /// Removes one unit; the line disappears when it reaches 0.
    pub async fn remove(&self, id: &ProductId) -> CartResult<CartView> {
        debug!(product_id = %id, "remove");
        let mut snapshot = self.lock_fresh().await?;

        match snapshot.cart.with_removed_unit(id) {
            Ok(next) => self.commit(&mut snapshot, next).await,
            Err(e) => self.ignore_or_fail(&snapshot, id, e),
        }
    }

    // =========================================================================
    // Checkout
    // =========================================================================

    /// Pays for one line and drops it from the cart.
    ///
    /// ## Errors
    /// - `NotFound`: the line isn't in the cart
    /// - `NotPriceable`: its price is not a usable number
    /// - `Persistence`: the store rejected the write
    ///
    /// The cart is unchanged on every error.
    pub async fn checkout_one(&self, id: &ProductId) -> CartResult<CheckoutReceipt> {
        debug!(product_id = %id, "checkout_one");
        let mut snapshot = self.lock_fresh().await?;

        let (next, settled) = snapshot.cart.checkout_line(id).map_err(|e| {
            warn!(product_id = %id, error = %e, "Checkout refused");
            CartError::from(e)
        })?;

        self.commit(&mut snapshot, next).await?;

        let receipt = CheckoutReceipt::new(vec![settled]);
        info!(
            receipt_id = %receipt.receipt_id,
            product_id = %id,
            charged = %receipt.charged,
            "Checked out line"
        );
        Ok(receipt)
    }

    /// Pays for every line and empties the cart.
    ///
    /// The stored key is removed and the published count drops to 0. An
    /// empty cart gives an empty receipt charging 0, so calling this twice
    /// is harmless.
    ///
    /// ## Errors
    /// - `NotPriceable`: some line can't be charged; nothing is settled
    /// - `Persistence`: the store rejected the removal
    pub async fn checkout_all(&self) -> CartResult<CheckoutReceipt> {
        debug!("checkout_all");
        let mut snapshot = self.lock_fresh().await?;

        let lines = snapshot.cart.checkout_all().map_err(|e| {
            warn!(error = %e, "Checkout refused");
            CartError::from(e)
        })?;

        if let Err(e) = self.repo.clear().await {
            return Err(self.persistence_failed(&mut snapshot, e));
        }

        snapshot.cart = Cart::new();
        self.publisher.publish(0);

        let receipt = CheckoutReceipt::new(lines);
        info!(
            receipt_id = %receipt.receipt_id,
            lines = receipt.lines.len(),
            charged = %receipt.charged,
            "Checked out cart"
        );
        Ok(receipt)
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Locks the snapshot, first re-reading the store if a write failed.
    async fn lock_fresh(&self) -> CartResult<tokio::sync::MutexGuard<'_, Snapshot>> {
        let mut snapshot = self.snapshot.lock().await;
        if snapshot.needs_reload {
            debug!("Re-reading cart after failed write");
            self.reload_locked(&mut snapshot).await?;
        }
        Ok(snapshot)
    }

    async fn reload_locked(&self, snapshot: &mut Snapshot) -> CartResult<()> {
        let cart = self.repo.load().await?;
        let count = aggregate(&cart).item_count;

        snapshot.cart = cart;
        snapshot.needs_reload = false;
        self.publisher.publish(count);

        info!(lines = snapshot.cart.len(), item_count = count, "Cart reloaded");
        Ok(())
    }

    /// Persists `next`, then makes it the snapshot and publishes its count.
    async fn commit(&self, snapshot: &mut Snapshot, next: Cart) -> CartResult<CartView> {
        if let Err(e) = self.repo.save(&next).await {
            return Err(self.persistence_failed(snapshot, e));
        }

        let view = CartView::from(&next);
        snapshot.cart = next;
        self.publisher.publish(view.totals.item_count);

        debug!(
            lines = view.totals.line_count,
            item_count = view.totals.item_count,
            "Cart saved"
        );
        Ok(view)
    }

    fn persistence_failed(&self, snapshot: &mut Snapshot, err: DbError) -> CartError {
        error!(key = %self.repo.key(), error = %err, "Failed to persist cart");
        snapshot.needs_reload = true;
        CartError::Persistence(err)
    }

    /// Swallows bad input and unknown ids; returns everything else.
    fn ignore_or_fail(
        &self,
        snapshot: &Snapshot,
        id: &ProductId,
        err: CoreError,
    ) -> CartResult<CartView> {
        if err.is_invalid_input() || matches!(err, CoreError::NotFound { .. }) {
            Ok(self.ignore(snapshot, id, err))
        } else {
            Err(err.into())
        }
    }

    fn ignore(&self, snapshot: &Snapshot, id: &ProductId, err: CoreError) -> CartView {
        warn!(product_id = %id, error = %err, "Ignoring cart operation");
        CartView::from(&snapshot.cart)
    }
}
