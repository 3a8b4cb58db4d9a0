//! # Service Error Type
//!
//! Unified error type for basket operations.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Till                                   │
//! │                                                                         │
//! │  Adapter                     BasketService                              │
//! │  ───────                     ─────────────                              │
//! │                                                                         │
//! │  service.add_product(id, code)                                          │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Store error? ─── StoreError::NotFound ───────► Store ─────┐     │  │
//! │  │         │                                                  │     │  │
//! │  │         ▼                                                  ▼     │  │
//! │  │  Domain refusal? ─ StoreError::Rejected(core) ─► Core ── kind() ─►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  { "code": "BASKET_CLOSED", "message": "Basket 3f2a... is closed" }    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every failure is terminal: retrying the same call yields the same error.

use serde::Serialize;
use thiserror::Error;
use till_core::CoreError;
use till_store::StoreError;
use ts_rs::TS;

/// Errors returned by [`BasketService`](crate::BasketService).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// The basket id is unknown or already taken.
    #[error(transparent)]
    Store(StoreError),

    /// The basket exists but refused the operation.
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Rejected store updates surface as [`ServiceError::Core`], so callers only
/// ever match one variant per failure kind.
impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Rejected(core) => ServiceError::Core(core),
            other => ServiceError::Store(other),
        }
    }
}

/// The flat failure taxonomy exposed to adapters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// No basket with this id.
    NotFound,
    /// Basket id collision on create.
    AlreadyExists,
    /// Mutation attempted on a checked-out basket.
    BasketClosed,
    /// Product code is not in the catalog.
    ProductNotFound,
    /// Product is not in the basket.
    ItemNotFound,
    /// The line already holds the maximum quantity.
    QuantityLimit,
}

impl ErrorKind {
    /// The wire code, as serialized.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::AlreadyExists => "ALREADY_EXISTS",
            ErrorKind::BasketClosed => "BASKET_CLOSED",
            ErrorKind::ProductNotFound => "PRODUCT_NOT_FOUND",
            ErrorKind::ItemNotFound => "ITEM_NOT_FOUND",
            ErrorKind::QuantityLimit => "QUANTITY_LIMIT",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn core_kind(err: &CoreError) -> ErrorKind {
    match err {
        CoreError::ProductNotFound(_) => ErrorKind::ProductNotFound,
        CoreError::ItemNotFound { .. } => ErrorKind::ItemNotFound,
        CoreError::BasketClosed(_) => ErrorKind::BasketClosed,
        CoreError::QuantityLimit { .. } => ErrorKind::QuantityLimit,
    }
}

impl ServiceError {
    /// Flattens the error to its [`ErrorKind`].
    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::Store(StoreError::NotFound(_)) => ErrorKind::NotFound,
            ServiceError::Store(StoreError::AlreadyExists(_)) => ErrorKind::AlreadyExists,
            ServiceError::Store(StoreError::Rejected(core)) => core_kind(core),
            ServiceError::Core(core) => core_kind(core),
        }
    }
}

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// What an adapter sends back when an operation fails.
///
/// ## Serialization
/// ```json
/// {
///   "code": "PRODUCT_NOT_FOUND",
///   "message": "Product not found: DRESS"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct ErrorResponse {
    /// Machine-readable failure kind
    pub code: ErrorKind,

    /// Human-readable message for display
    pub message: String,
}

impl From<&ServiceError> for ErrorResponse {
    fn from(err: &ServiceError) -> Self {
        ErrorResponse {
            code: err.kind(),
            message: err.to_string(),
        }
    }
}

impl From<ServiceError> for ErrorResponse {
    fn from(err: ServiceError) -> Self {
        ErrorResponse::from(&err)
    }
}
