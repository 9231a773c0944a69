//! # Error Types
//!
//! Domain-specific error types for mercato-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  mercato-core errors (this file)                                       │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  mercato-db errors (separate crate)                                    │
//! │  ├── DbError          - Database operation failures                    │
//! │  └── EngineError      - Full sale-engine taxonomy (wraps the above)    │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → EngineError → caller              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (quantities, amounts)
//! 3. Errors are enum variants, never String
//! 4. Business errors carry their user-facing message verbatim

use thiserror::Error;

use crate::money::Money;

// =============================================================================
// Core Error
// =============================================================================

/// Core business rule violations.
///
/// These are the pre-write checks of the sale engine: every variant here is
/// detected against an immutable snapshot before anything is persisted.
#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    /// Requested quantity exceeds available stock under the chosen sale type.
    ///
    /// ## When This Occurs
    /// ```text
    /// Sell unit × 5
    ///      │
    ///      ▼
    /// Check stock: stock_units = 3
    ///      │
    ///      ▼
    /// InsufficientStock { requested: 5, available: 3, unit: "unit" }
    /// ```
    #[error("Insufficient stock: requested {requested} {unit}, available {available}")]
    InsufficientStock {
        requested: f64,
        available: f64,
        unit: &'static str,
    },

    /// A credit sale would breach the customer's credit ceiling.
    ///
    /// The message carries the headroom so the cashier can offer a smaller
    /// sale or a different payment method.
    #[error("Credit limit exceeded. Available credit: {available}")]
    CreditLimitExceeded { available: Money },

    /// Customer is suspended or blocked.
    #[error("Customer is {status}. Cannot process sale.")]
    CustomerInactive { status: &'static str },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when request fields don't meet basic requirements, before any
/// business logic runs.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must be a finite number.
    #[error("{field} must be a finite number")]
    NotFinite { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be at most {max}")]
    TooLarge { field: String, max: f64 },

    /// Monetary amount may not be negative.
    #[error("{field} may not be negative")]
    NegativeAmount { field: String },
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
    fn test_insufficient_stock_message() {
        let err = CoreError::InsufficientStock {
            requested: 5.0,
            available: 3.0,
            unit: "unit",
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock: requested 5 unit, available 3"
        );
    }

    #[test]
    fn test_credit_limit_message_formats_dollars() {
        let err = CoreError::CreditLimitExceeded {
            available: Money::from_cents(2000),
        };
        assert_eq!(
            err.to_string(),
            "Credit limit exceeded. Available credit: $20.00"
        );
    }

    #[test]
    fn test_customer_inactive_message() {
        let err = CoreError::CustomerInactive {
            status: "suspended",
        };
        assert_eq!(err.to_string(), "Customer is suspended. Cannot process sale.");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "productId".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
