//! # Repository Module
//!
//! Typed access to values kept in a [`crate::KeyValueStore`].
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  CartController                                                        │
//! │       │                                                                 │
//! │       │  repo.load() / repo.save(&cart) / repo.clear()                 │
//! │       ▼                                                                 │
//! │  CartRepository ← JSON encoding + stored-data repair                   │
//! │       │                                                                 │
//! │       │  get / set / remove ("cartItems")                              │
//! │       ▼                                                                 │
//! │  Arc<dyn KeyValueStore> (Database | MemoryStore)                       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`CartRepository`](cart::CartRepository) - The whole cart under one key

pub mod cart;
