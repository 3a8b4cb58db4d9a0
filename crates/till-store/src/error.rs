//! # Store Error Types
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  Missing / duplicate basket id ──► StoreError::NotFound/AlreadyExists   │
//! │                                                                         │
//! │  Domain refusal inside update() ─► StoreError::Rejected(CoreError)      │
//! │       (closed basket, item not in basket, unknown product)              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ServiceError (till-service) ← flattened to an ErrorKind                │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;
use till_core::CoreError;

/// Basket storage errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No basket with this id.
    #[error("Basket not found: {0}")]
    NotFound(String),

    /// A basket with this id already exists.
    ///
    /// ## When This Occurs
    /// Only if two creations pick the same id; with UUID v4 ids this is
    /// practically unreachable.
    #[error("Basket already exists: {0}")]
    AlreadyExists(String),

    /// The basket exists but the requested change violates a basket rule.
    /// The stored basket is unchanged.
    #[error(transparent)]
    Rejected(#[from] CoreError),
}

impl StoreError {
    /// Creates a NotFound error for a basket id.
    pub fn not_found(id: impl Into<String>) -> Self {
        StoreError::NotFound(id.into())
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
