//! # Validation Module
//!
//! Input validation for catalog entries and promotion rules.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Deserialization (serde/toml)                                 │
//! │  ├── Shape of the document, field types                                │
//! │  └── Known effect names                                                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Codes, names, prices, thresholds                                  │
//! │  └── Each value on its own                                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Catalog / RuleCatalog constructors                           │
//! │  ├── Duplicate product codes                                           │
//! │  ├── Rules pointing at unknown products                                │
//! │  └── Overlapping rules                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use till_core::validation::{validate_product_code, validate_threshold};
//!
//! assert!(validate_product_code("TSHIRT").is_ok());
//! assert!(validate_threshold(3).is_ok());
//! assert!(validate_threshold(0).is_err());
//! ```

use crate::error::ValidationError;
use crate::{MAX_LINE_QUANTITY, MAX_PRICE_CENTS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Highest quantity threshold a rule may declare; a line never grows past
/// [`MAX_LINE_QUANTITY`], so a higher threshold could never trigger.
pub const MAX_RULE_THRESHOLD: u32 = MAX_LINE_QUANTITY;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product code.
///
/// ## Rules
/// - Must not be empty
/// - At most 50 characters
/// - Only letters, digits, hyphens and underscores
///
/// ## Example
/// ```rust
/// use till_core::validation::validate_product_code;
///
/// assert!(validate_product_code("VOUCHER").is_ok());
/// assert!(validate_product_code("").is_err());
/// assert!(validate_product_code("GIFT CARD").is_err());
/// ```
pub fn validate_product_code(code: &str) -> ValidationResult<()> {
    validate_identifier("product code", code, 50)
}

/// Validates a rule name.
///
/// Same character set as product codes; rule names appear as TOML table
/// keys and in logs.
pub fn validate_rule_name(name: &str) -> ValidationResult<()> {
    validate_identifier("rule name", name, 100)
}

fn validate_identifier(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.len() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    if !value
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty
/// - At most 200 characters
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a free-text rule description. Empty is allowed.
pub fn validate_description(description: &str) -> ValidationResult<()> {
    if description.len() > 500 {
        return Err(ValidationError::TooLong {
            field: "description".to_string(),
            max: 500,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a price in cents.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (free items)
/// - Must not exceed [`MAX_PRICE_CENTS`]
///
/// ## Example
/// ```rust
/// use till_core::validation::validate_price_cents;
///
/// assert!(validate_price_cents(1900).is_ok());
/// assert!(validate_price_cents(0).is_ok());
/// assert!(validate_price_cents(-100).is_err());
/// assert!(validate_price_cents(i64::MAX).is_err());
/// ```
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if !(0..=MAX_PRICE_CENTS).contains(&cents) {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: MAX_PRICE_CENTS,
        });
    }

    Ok(())
}

/// Validates a rule's quantity threshold.
///
/// ## Rules
/// - Must be positive: a threshold of 0 would discount empty lines
/// - Must not exceed [`MAX_RULE_THRESHOLD`]
pub fn validate_threshold(quantity: u32) -> ValidationResult<()> {
    if quantity == 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if quantity > MAX_RULE_THRESHOLD {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_RULE_THRESHOLD as i64,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_product_code() {
        assert!(validate_product_code("TSHIRT").is_ok());
        assert!(validate_product_code("GIFT-CARD_50").is_ok());

        assert!(matches!(
            validate_product_code("   "),
            Err(ValidationError::Required { .. })
        ));
        assert!(matches!(
            validate_product_code("has space"),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert!(matches!(
            validate_product_code(&"A".repeat(51)),
            Err(ValidationError::TooLong { max: 50, .. })
        ));
    }

    #[test]
    fn test_validate_rule_name() {
        assert!(validate_rule_name("buy_three_or_more_new_price").is_ok());
        assert!(validate_rule_name("").is_err());
        assert!(validate_rule_name("two for one").is_err());
    }

    #[test]
    fn test_validate_product_name() {
        assert!(validate_product_name("Summer T-Shirt").is_ok());
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_description() {
        assert!(validate_description("").is_ok());
        assert!(validate_description("A 2-for-1 special on VOUCHER items.").is_ok());
        assert!(validate_description(&"x".repeat(501)).is_err());
    }

    #[test]
    fn test_validate_price_cents() {
        assert!(validate_price_cents(0).is_ok());
        assert!(validate_price_cents(750).is_ok());
        assert!(validate_price_cents(-1).is_err());
        assert!(validate_price_cents(MAX_PRICE_CENTS).is_ok());
        assert!(matches!(
            validate_price_cents(MAX_PRICE_CENTS + 1),
            Err(ValidationError::OutOfRange { .. })
        ));
        assert!(validate_price_cents(i64::MAX / 2 + 1).is_err());
    }

    #[test]
    fn test_validate_threshold() {
        assert!(validate_threshold(1).is_ok());
        assert!(validate_threshold(MAX_RULE_THRESHOLD).is_ok());
        assert!(matches!(
            validate_threshold(0),
            Err(ValidationError::MustBePositive { .. })
        ));
        assert!(matches!(
            validate_threshold(MAX_RULE_THRESHOLD + 1),
            Err(ValidationError::OutOfRange { .. })
        ));
    }
}
