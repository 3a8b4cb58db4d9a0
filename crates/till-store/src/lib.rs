//! # till-store: Basket Storage for Till
//!
//! This crate owns baskets between operations and guarantees that
//! concurrent operations on them never interleave halfway.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Till Data Flow                                   │
//! │                                                                         │
//! │  BasketService::add_product                                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   till-store (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │  BasketStore  │    │  MemoryStore  │    │  StoreError  │  │   │
//! │  │   │  (trait)      │◄───│  Mutex<Map>   │    │  NotFound    │  │   │
//! │  │   │  update(f)    │    │               │    │  Rejected    │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  till-core (Basket::add_unit, Basket::remove_item)                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`repository`] - The `BasketStore` trait
//! - [`memory`] - Process-local implementation
//! - [`error`] - Store error types
//!
//! ## Usage
//!
//! ```rust
//! use till_core::Catalog;
//! use till_store::{BasketStore, MemoryStore};
//!
//! let catalog = Catalog::standard();
//! let pants = catalog.lookup("PANTS").unwrap().clone();
//!
//! let store = MemoryStore::new();
//! store.create("b-1").unwrap();
//!
//! let basket = store
//!     .update("b-1", |basket| basket.add_unit(&pants).map(|_| ()))
//!     .unwrap();
//! assert_eq!(basket.total.cents(), 750);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod memory;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use repository::BasketStore;
