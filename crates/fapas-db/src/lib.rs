//! # fapas-db: Durable Cart Store
//!
//! The key-value capability the cart is persisted through, and the
//! adapters that implement it.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      FAPAS Cart Data Flow                               │
//! │                                                                         │
//! │  CartController (fapas-cart)                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     fapas-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │CartRepository │    │ KeyValueStore │    │  Migrations  │  │   │
//! │  │   │ (repository)  │───►│  (kv.rs)      │    │  (embedded)  │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ JSON + repair │    │ Database      │    │ 001_kv.sql   │  │   │
//! │  │   │               │    │ MemoryStore   │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │   <data dir>/fapas.db                                           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`kv`] - The `KeyValueStore` trait
//! - [`pool`] - SQLite pool and its `KeyValueStore` impl
//! - [`memory`] - In-memory store for tests
//! - [`migrations`] - Embedded database migrations
//! - [`repository`] - Cart encoding on top of a store
//! - [`error`] - Store error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use fapas_db::{CartRepository, Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/fapas.db")).await?;
//! let repo = CartRepository::new(Arc::new(db), "cartItems");
//!
//! let cart = repo.load().await?;
//! repo.save(&cart).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod kv;
pub mod memory;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use kv::KeyValueStore;
pub use memory::MemoryStore;
pub use pool::{Database, DbConfig};

pub use repository::cart::CartRepository;
