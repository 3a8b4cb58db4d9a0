//! # till-service: Basket Operations for Till
//!
//! The basket state machine, and the error and view types adapters
//! translate to their own transport.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  till shell / HTTP / gRPC adapter                                       │
//! │       │  BasketView, ErrorResponse                                      │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 till-service (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   BasketService ── Arc<Catalog>, Arc<RuleCatalog>, S: Store     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                              │                                  │
//! │       ▼                              ▼                                  │
//! │  till-store (update, get, ...)   till-core (pricing::checkout)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use till_core::{Catalog, RuleCatalog};
//! use till_service::{BasketService, BasketView};
//!
//! let catalog = Catalog::standard();
//! let rules = RuleCatalog::standard(&catalog).unwrap();
//! let service = BasketService::in_memory(Arc::new(catalog), Arc::new(rules));
//!
//! let id = service.create_basket().unwrap().id;
//! for _ in 0..3 {
//!     service.add_product(&id, "TSHIRT").unwrap();
//! }
//! let view = BasketView::from(service.checkout_basket(&id).unwrap());
//! assert_eq!(view.total_cents, 5700);
//! ```

pub mod error;
pub mod service;
pub mod view;

pub use error::{ErrorKind, ErrorResponse, ServiceError, ServiceResult};
pub use service::BasketService;
pub use view::{BasketView, LineItemView};
