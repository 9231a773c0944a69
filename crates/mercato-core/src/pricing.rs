//! # Pricing & Payment Resolution
//!
//! The sale engine's decision tables, expressed as pure functions.
//!
//! ## The Pricing Table
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  saleType │ unitPrice    │ totalPrice     │ unitsSold      │ kgSold     │
//! │  ─────────┼──────────────┼────────────────┼────────────────┼──────────  │
//! │  unit     │ pricePerUnit │ qty × price    │ qty            │ qty×kg/u   │
//! │  kg       │ pricePerKg   │ qty × price    │ qty×u/kg       │ qty        │
//! │  case     │ pricePerCase │ qty × price    │ qty×unitsPerCs │ qty×kgPerCs│
//! │                                                                         │
//! │  (u = unitsPerCase, kg = kgPerCase)                                    │
//! │                                                                         │
//! │  Every sale is priced under ONE convention but bookkept in BOTH stock  │
//! │  units, so a unit sale still reduces stock_kg by its weight            │
//! │  equivalent and vice versa.                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Why a Decision Table?
//! The alternative is payment-method and sale-type branching sprinkled
//! across field assignments at persistence time. Centralizing the rules here
//! makes them exhaustively unit-testable and keeps the engine a straight
//! orchestration sequence.

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{PaymentMethod, PaymentStatus, ProductPricing, SaleType};

// =============================================================================
// Pricing
// =============================================================================

/// The derived, immutable pricing outcome of a sale line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricedSale {
    /// Price per one sale-type unit (frozen on the Sale record).
    pub unit_price: Money,
    /// `quantity × unit_price`, rounded to a cent.
    pub total_price: Money,
    /// Dual-unit equivalent of quantity in discrete units.
    pub units_sold: f64,
    /// Dual-unit equivalent of quantity in kilograms.
    pub kg_sold: f64,
}

/// Prices a sale according to the sale-type pricing table.
///
/// Conversion factors must be positive (validated at product creation); the
/// divisions here rely on that invariant.
pub fn price_sale(product: &ProductPricing, sale_type: SaleType, quantity: f64) -> PricedSale {
    match sale_type {
        SaleType::Unit => PricedSale {
            unit_price: product.price_per_unit,
            total_price: product.price_per_unit.multiply_quantity(quantity),
            units_sold: quantity,
            kg_sold: quantity * product.kg_per_case / product.units_per_case,
        },
        SaleType::Kg => PricedSale {
            unit_price: product.price_per_kg,
            total_price: product.price_per_kg.multiply_quantity(quantity),
            units_sold: quantity * product.units_per_case / product.kg_per_case,
            kg_sold: quantity,
        },
        SaleType::Case => PricedSale {
            unit_price: product.price_per_case,
            total_price: product.price_per_case.multiply_quantity(quantity),
            units_sold: quantity * product.units_per_case,
            kg_sold: quantity * product.kg_per_case,
        },
    }
}

// =============================================================================
// Stock Feasibility
// =============================================================================

/// Checks that the priced sale fits in the product's current stock.
///
/// The check runs against the dimension(s) the sale type actually consumes:
/// unit sales against `stock_units`, kg sales against `stock_kg`, case sales
/// against both. The secondary dual-unit decrement of the other dimension is
/// allowed to clamp at zero (matching the ledger's decrement rule).
pub fn check_stock(
    sale_type: SaleType,
    priced: &PricedSale,
    stock_units: f64,
    stock_kg: f64,
) -> CoreResult<()> {
    match sale_type {
        SaleType::Unit => {
            if priced.units_sold > stock_units {
                return Err(CoreError::InsufficientStock {
                    requested: priced.units_sold,
                    available: stock_units,
                    unit: "unit",
                });
            }
        }
        SaleType::Kg => {
            if priced.kg_sold > stock_kg {
                return Err(CoreError::InsufficientStock {
                    requested: priced.kg_sold,
                    available: stock_kg,
                    unit: "kg",
                });
            }
        }
        SaleType::Case => {
            if priced.units_sold > stock_units {
                return Err(CoreError::InsufficientStock {
                    requested: priced.units_sold,
                    available: stock_units,
                    unit: "unit",
                });
            }
            if priced.kg_sold > stock_kg {
                return Err(CoreError::InsufficientStock {
                    requested: priced.kg_sold,
                    available: stock_kg,
                    unit: "kg",
                });
            }
        }
    }
    Ok(())
}

// =============================================================================
// Credit Feasibility
// =============================================================================

/// Checks a credit sale against the customer's available headroom.
///
/// Snapshot check only; the engine's commit step re-asserts the ceiling with
/// a conditional draw to close the check-then-act window.
pub fn check_credit(available: Money, total: Money) -> CoreResult<()> {
    if total > available {
        return Err(CoreError::CreditLimitExceeded { available });
    }
    Ok(())
}

// =============================================================================
// Payment Resolution
// =============================================================================

/// The resolved payment figures of a new sale.
/// Invariant: `paid + remaining == total`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaymentResolution {
    pub paid: Money,
    pub remaining: Money,
    pub credit: Money,
    pub status: PaymentStatus,
}

/// Resolves the initial payment figures for a sale.
///
/// ## The Resolution Table
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  method  │ paid                    │ remaining │ credit │ status        │
/// │  ────────┼─────────────────────────┼───────────┼────────┼────────────── │
/// │  credit  │ 0 (override IGNORED)    │ total     │ total  │ pending       │
/// │  other   │ override, else total    │ total−paid│ 0      │ partial if    │
/// │          │                         │           │        │ remaining > 0 │
/// │          │                         │           │        │ else paid     │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
///
/// Credit sales start fully outstanding regardless of any paid-amount
/// override; the credit row wins over the generic rule.
pub fn resolve_payment(
    method: PaymentMethod,
    total: Money,
    paid_override: Option<Money>,
) -> PaymentResolution {
    if method.is_credit() {
        return PaymentResolution {
            paid: Money::zero(),
            remaining: total,
            credit: total,
            status: PaymentStatus::Pending,
        };
    }

    let paid = paid_override.unwrap_or(total);
    let remaining = total - paid;
    PaymentResolution {
        paid,
        remaining,
        credit: Money::zero(),
        status: if remaining.is_positive() {
            PaymentStatus::Partial
        } else {
            PaymentStatus::Paid
        },
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
