//! # Error Types
//!
//! Domain-specific error types for till-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  till-core errors (this file)                                          │
//! │  ├── CoreError        - Basket/catalog rule violations                 │
//! │  ├── ConfigError      - Malformed catalog or rule configuration        │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  till-store errors (separate crate)                                    │
//! │  └── StoreError       - Missing/duplicate baskets                      │
//! │                                                                         │
//! │  till-service errors (separate crate)                                  │
//! │  └── ServiceError     - What adapters see, flattened to ErrorKind      │
//! │                                                                         │
//! │  Flow: CoreError → StoreError → ServiceError → adapter                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! None of these errors is retryable: every operation is an in-memory
//! computation, so the same input always fails the same way.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Basket and catalog rule violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// The product code is not in the catalog.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// The product is in the catalog but not in this basket.
    #[error("Product {code} is not in basket {basket_id}")]
    ItemNotFound { basket_id: String, code: String },

    /// The basket has been checked out.
    ///
    /// ## When This Occurs
    /// - Adding a product after checkout
    /// - Removing a product after checkout
    ///
    /// Reading a closed basket and checking it out again are both allowed.
    #[error("Basket {0} is closed")]
    BasketClosed(String),

    /// One more unit would take the line past [`MAX_LINE_QUANTITY`].
    ///
    /// [`MAX_LINE_QUANTITY`]: crate::MAX_LINE_QUANTITY
    #[error("Basket {basket_id} already holds the maximum of {max} units of {code}")]
    QuantityLimit {
        basket_id: String,
        code: String,
        max: u32,
    },
}

// =============================================================================
// Configuration Error
// =============================================================================

/// Malformed catalog or rule configuration.
///
/// Raised only while loading configuration at startup. The process treats
/// every variant as fatal.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The source is not valid TOML or does not match the expected shape.
    #[error("Could not parse rule configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// A rule points at a product code that is not in the catalog.
    #[error("Rule {rule} targets unknown product {product}")]
    UnknownProduct { rule: String, product: String },

    /// A `bulk_price` rule has neither `newPrice` nor `new_price_cents`.
    #[error("Rule {rule} has effect bulk_price but no newPrice")]
    MissingNewPrice { rule: String },

    /// A `free_unit` rule carries a new price it would ignore.
    #[error("Rule {rule} has effect free_unit but sets newPrice")]
    UnexpectedNewPrice { rule: String },

    /// A rule sets both `newPrice` and `new_price_cents`.
    #[error("Rule {rule} sets both newPrice and new_price_cents")]
    ConflictingNewPrice { rule: String },

    /// `newPrice` is not a whole number of cents (e.g. `19.005`), or is not
    /// a finite number.
    #[error("Rule {rule} has newPrice {value}, which is not an exact amount in cents")]
    InexactNewPrice { rule: String, value: f64 },

    /// Two rules are bound to the same product.
    ///
    /// Every product may carry at most one rule, so pricing never has to
    /// pick between competing discounts.
    #[error("Rules {first} and {second} both target product {product}")]
    OverlappingRules {
        product: String,
        first: String,
        second: String,
    },

    /// The catalog defines the same product code twice.
    #[error("Product {0} is defined more than once")]
    DuplicateProduct(String),

    /// A field failed validation.
    #[error("Invalid {entry}: {source}")]
    Invalid {
        entry: String,
        #[source]
        source: ValidationError,
    },
}

impl ConfigError {
    /// Wraps a validation failure with the rule or product it belongs to.
    pub fn invalid(entry: impl Into<String>, source: ValidationError) -> Self {
        ConfigError::Invalid {
            entry: entry.into(),
            source,
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid UUID, invalid product code).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::ItemNotFound {
            basket_id: "b-1".to_string(),
            code: "PANTS".to_string(),
        };
        assert_eq!(err.to_string(), "Product PANTS is not in basket b-1");

        let err = CoreError::BasketClosed("b-1".to_string());
        assert_eq!(err.to_string(), "Basket b-1 is closed");

        let err = CoreError::QuantityLimit {
            basket_id: "b-1".to_string(),
            code: "PANTS".to_string(),
            max: 999,
        };
        assert_eq!(
            err.to_string(),
            "Basket b-1 already holds the maximum of 999 units of PANTS"
        );
    }

    #[test]
    fn test_config_error_messages() {
        let err = ConfigError::OverlappingRules {
            product: "TSHIRT".to_string(),
            first: "a".to_string(),
            second: "b".to_string(),
        };
        assert_eq!(err.to_string(), "Rules a and b both target product TSHIRT");

        let err = ConfigError::invalid(
            "rule bulk",
            ValidationError::MustBePositive {
                field: "quantity".to_string(),
            },
        );
        assert_eq!(err.to_string(), "Invalid rule bulk: quantity must be positive");
    }
}
