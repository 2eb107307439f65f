//! # fapas-cart: Cart Controller for the FAPAS Storefront
//!
//! The service layer screens talk to. It owns the cart snapshot, persists
//! every change through fapas-db and keeps the badge count current.
//!
//! ## Module Organization
//! ```text
//! fapas_cart/
//! ├── lib.rs          ◄─── You are here (exports, tracing setup)
//! ├── controller.rs   ◄─── CartController, CartView
//! ├── publisher.rs    ◄─── CountPublisher (badge count)
//! ├── config.rs       ◄─── CartConfig (cart.toml + env)
//! ├── error.rs        ◄─── CartError
//! └── bin/
//!     └── seed_cart.rs ◄── Seeds a cart from a product file
//! ```
//!
//! ## Wiring
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  CartConfig::load(None)                                                │
//! │       │                                                                 │
//! │       ├──► Database::new(config.db_config()) ──► Arc<dyn KeyValueStore>│
//! │       │                                                │                │
//! │       ▼                                                ▼                │
//! │  CartController::open(store, Arc<CountPublisher>, &config)             │
//! │       │                                                                 │
//! │       └──► every screen holds a CountSubscription for its badge        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The store and the publisher are passed in explicitly. Nothing here is a
//! process-wide global.

pub mod config;
pub mod controller;
pub mod error;
pub mod publisher;

use tracing_subscriber::EnvFilter;

pub use config::CartConfig;
pub use controller::{CartController, CartView};
pub use error::{CartError, CartResult, ErrorCode};
pub use publisher::{CountPublisher, CountSubscription};

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=fapas=trace` - Show trace for fapas crates only
/// - Default: `info,fapas=debug,sqlx=warn`
///
/// Does nothing if a subscriber is already installed.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,fapas=debug,sqlx=warn"));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
