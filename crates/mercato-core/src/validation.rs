//! # Validation Module
//!
//! Input validation for sale requests and product/customer fields.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Request layer (out of scope)                                 │
//! │  ├── Type validation (deserialization)                                 │
//! │  └── Required-field checks with immediate feedback                     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Quantities positive and finite                                    │
//! │  ├── Ids non-empty                                                     │
//! │  └── Prices and conversion factors well-formed                         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL constraints                                              │
//! │  ├── UNIQUE invoice_number index                                       │
//! │  └── Foreign key constraints                                           │
//! │                                                                         │
//! │  Defense in depth: multiple layers catch different errors              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::MAX_SALE_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Identifier Validators
// =============================================================================

/// Validates an entity-reference field (product id, customer id).
///
/// ## Rules
/// - Must not be empty or whitespace
///
/// Existence of the referenced entity is checked separately against storage;
/// this guards only the request shape.
pub fn validate_id(field: &str, id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a sale quantity.
///
/// ## Rules
/// - Must be finite (NaN/inf come straight out of JSON floats)
/// - Must be positive (> 0)
/// - Must not exceed [`MAX_SALE_QUANTITY`]
pub fn validate_quantity(qty: f64) -> ValidationResult<()> {
    if !qty.is_finite() {
        return Err(ValidationError::NotFinite {
            field: "quantity".to_string(),
        });
    }
    if qty <= 0.0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }
    if qty > MAX_SALE_QUANTITY {
        return Err(ValidationError::TooLarge {
            field: "quantity".to_string(),
            max: MAX_SALE_QUANTITY,
        });
    }
    Ok(())
}

/// Validates a monetary amount that may not be negative
/// (prices, paid-amount overrides, credit limits).
pub fn validate_amount(field: &str, amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::NegativeAmount {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates a case conversion factor (units per case, kg per case).
///
/// ## Rules
/// - Must be finite and strictly positive: the pricing table divides by
///   these, so zero would poison every dual-unit conversion
pub fn validate_conversion_factor(field: &str, factor: f64) -> ValidationResult<()> {
    if !factor.is_finite() {
        return Err(ValidationError::NotFinite {
            field: field.to_string(),
        });
    }
    if factor <= 0.0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
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
    fn test_validate_id() {
        assert!(validate_id("productId", "550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(validate_id("productId", "").is_err());
        assert!(validate_id("productId", "   ").is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1.0).is_ok());
        assert!(validate_quantity(2.5).is_ok());
        assert!(validate_quantity(10_000.0).is_ok());

        assert!(validate_quantity(0.0).is_err());
        assert!(validate_quantity(-1.0).is_err());
        assert!(validate_quantity(10_001.0).is_err());
        assert!(validate_quantity(f64::NAN).is_err());
        assert!(validate_quantity(f64::INFINITY).is_err());
    }

    #[test]
    fn test_validate_amount() {
        assert!(validate_amount("paidAmount", Money::from_cents(0)).is_ok());
        assert!(validate_amount("paidAmount", Money::from_cents(1099)).is_ok());
        assert!(validate_amount("paidAmount", Money::from_cents(-100)).is_err());
    }

    #[test]
    fn test_validate_conversion_factor() {
        assert!(validate_conversion_factor("unitsPerCase", 12.0).is_ok());
        assert!(validate_conversion_factor("unitsPerCase", 0.0).is_err());
        assert!(validate_conversion_factor("unitsPerCase", -6.0).is_err());
        assert!(validate_conversion_factor("kgPerCase", f64::NAN).is_err());
    }
}
