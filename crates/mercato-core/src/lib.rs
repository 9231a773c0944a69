//! # mercato-core: Pure Business Logic for Mercato
//!
//! This crate is the **heart** of the Mercato retail back office. It contains
//! the sale-pricing rules, credit rules, and domain types as pure functions
//! with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Mercato Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Admin UI / HTTP layer (out of scope)            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              mercato-db: SaleEngine + repositories              │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ mercato-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  pricing  │  │ validation│  │   │
//! │  │   │  Product  │  │   Money   │  │  tables   │  │   rules   │  │   │
//! │  │   │ Customer  │  │  cents    │  │  payment  │  │  checks   │  │   │
//! │  │   │   Sale    │  │  (i64)    │  │ resolution│  │           │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Customer, Sale, enums)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`pricing`] - The sale-type pricing table and payment resolution
//! - [`invoice`] - Invoice number formatting (allocation lives in mercato-db)
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input = same output, always
//! 2. **No I/O**: database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: all monetary values are in cents (i64)
//! 4. **Decision Tables**: pricing and payment defaulting are explicit
//!    match tables, not branches scattered across field assignments
//!
//! ## Example Usage
//!
//! ```rust
//! use mercato_core::money::Money;
//! use mercato_core::pricing::price_sale;
//! use mercato_core::types::SaleType;
//!
//! # let product = mercato_core::types::ProductPricing {
//! #     price_per_unit: Money::from_cents(1000),
//! #     price_per_kg: Money::from_cents(450),
//! #     price_per_case: Money::from_cents(11000),
//! #     units_per_case: 12.0,
//! #     kg_per_case: 6.0,
//! # };
//! // Sell 5 units of a product priced $10.00/unit
//! let priced = price_sale(&product, SaleType::Unit, 5.0);
//! assert_eq!(priced.total_price, Money::from_cents(5000));
//! assert_eq!(priced.kg_sold, 2.5); // dual-unit equivalent
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod invoice;
pub mod money;
pub mod pricing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use mercato_core::Money` instead of
// `use mercato_core::money::Money`

pub use error::{CoreError, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum quantity accepted for a single sale line.
///
/// ## Business Reason
/// Prevents accidental over-selling (e.g., typing 1000 instead of 10).
/// Can be made configurable per store in future versions.
pub const MAX_SALE_QUANTITY: f64 = 10_000.0;

/// How many times the engine re-asks the numbering service for a fresh
/// invoice number when the unique index reports a collision.
pub const MAX_INVOICE_ATTEMPTS: u32 = 3;
