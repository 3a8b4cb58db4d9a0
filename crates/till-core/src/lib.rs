//! # till-core: Pure Business Logic for Till
//!
//! This crate is the **heart** of Till. It contains the basket model, the
//! promotion rules and the pricing engine as pure functions with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           Till Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Adapters (till shell, HTTP, ...)                │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │          till-service  ──►  till-store (MemoryStore)            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ till-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │  catalog  │  │   rules   │  │  pricing  │  │   │
//! │  │   │  Basket   │  │  Product  │  │   Rule    │  │  price()  │  │   │
//! │  │   │ LineItem  │  │  lookup   │  │  load()   │  │           │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, LineItem, Basket)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`catalog`] - The product catalog
//! - [`rules`] - Promotion rules and their configuration format
//! - [`pricing`] - The pricing engine applied at checkout
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation for configuration values
//!
//! ## Example Usage
//!
//! ```rust
//! use till_core::{pricing, Catalog, LineItem, RuleCatalog};
//!
//! let catalog = Catalog::standard();
//! let rules = RuleCatalog::standard(&catalog).unwrap();
//!
//! let tshirt = catalog.lookup("TSHIRT").unwrap().clone();
//! let item = LineItem::new(tshirt).with_quantity(3);
//!
//! // Three or more T-shirts cost 19.00 each
//! let priced = pricing::price(&item, &rules);
//! assert_eq!(priced.total.cents(), 5700);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod error;
pub mod money;
pub mod pricing;
pub mod rules;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use catalog::Catalog;
pub use error::{ConfigError, CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use rules::{EffectKind, Rule, RuleCatalog, RuleDefinition, RuleEffect};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum quantity of one product in a basket.
///
/// ## Business Reason
/// Prevents accidental over-scanning, and together with
/// [`MAX_PRICE_CENTS`] keeps every line and basket total far inside `i64`.
pub const MAX_LINE_QUANTITY: u32 = 999;

/// Highest unit price (in cents) a catalog entry or rule may configure:
/// 1,000,000.00.
pub const MAX_PRICE_CENTS: i64 = 100_000_000;
