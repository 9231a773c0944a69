//! # Domain Types
//!
//! Core domain types used throughout Mercato.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │    Customer     │   │      Sale       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  3 price fields │   │  credit_limit   │   │  invoice_number │       │
//! │  │  2 conversions  │   │  current_credit │   │  sale_type      │       │
//! │  │  2 stock fields │   │  status         │   │  payment_status │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    SaleType     │   │ PaymentMethod   │   │ PaymentStatus   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  Unit           │   │  Cash           │   │  Pending        │       │
//! │  │  Kg             │   │  Card           │   │  Partial        │       │
//! │  │  Case           │   │  MobileMoney    │   │  Paid           │       │
//! │  └─────────────────┘   │  Credit         │   │  Cancelled      │       │
//! │                        └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Unit Stock
//! Products track stock in BOTH discrete units and weight. Every sale records
//! `units_sold` and `kg_sold` regardless of which convention it was priced
//! under, so stock bookkeeping is always dual-unit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Sale Type
// =============================================================================

/// The unit convention under which a sale's quantity and price are
/// interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum SaleType {
    /// Quantity counts discrete units.
    Unit,
    /// Quantity is a weight in kilograms.
    Kg,
    /// Quantity counts whole cases (converted to units and kg via the
    /// product's conversion factors).
    Case,
}

impl SaleType {
    /// Stable string form, matching the serialized representation.
    pub const fn as_str(&self) -> &'static str {
        match self {
            SaleType::Unit => "unit",
            SaleType::Kg => "kg",
            SaleType::Case => "case",
        }
    }
}

// =============================================================================
// Payment Method
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Physical cash payment.
    Cash,
    /// Card payment on external terminal.
    Card,
    /// Mobile money transfer.
    MobileMoney,
    /// Deferred payment against the customer's credit ceiling.
    Credit,
}

impl PaymentMethod {
    /// Whether this sale draws on the customer's credit line.
    #[inline]
    pub const fn is_credit(&self) -> bool {
        matches!(self, PaymentMethod::Credit)
    }
}

// =============================================================================
// Payment Status
// =============================================================================

/// The payment-status state machine of a sale.
///
/// ```text
/// pending ──► partial ──► paid
///    │           │          │
///    └───────────┴──────────┴──► cancelled  (terminal, via CancelSale only)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Fully outstanding (credit sales start here).
    Pending,
    /// Partially paid.
    Partial,
    /// Fully paid.
    Paid,
    /// Cancelled; compensating stock/credit writes have been applied.
    Cancelled,
}

// =============================================================================
// Customer Status
// =============================================================================

/// Gates a customer's eligibility to transact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum CustomerStatus {
    Active,
    Suspended,
    Blocked,
}

impl CustomerStatus {
    /// Stable string form, used in user-facing messages
    /// ("Customer is suspended. Cannot process sale.").
    pub const fn as_str(&self) -> &'static str {
        match self {
            CustomerStatus::Active => "active",
            CustomerStatus::Suspended => "suspended",
            CustomerStatus::Blocked => "blocked",
        }
    }
}

impl Default for CustomerStatus {
    fn default() -> Self {
        CustomerStatus::Active
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product available for sale, priced under three unit conventions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name.
    pub name: String,

    /// Optional category label.
    pub category: Option<String>,

    /// Price when sold by the unit.
    pub price_per_unit_cents: Money,

    /// Price when sold by the kilogram.
    pub price_per_kg_cents: Money,

    /// Price when sold by the case.
    pub price_per_case_cents: Money,

    /// How many discrete units one case holds (positive).
    pub units_per_case: f64,

    /// How many kilograms one case weighs (positive).
    pub kg_per_case: f64,

    /// Current stock in discrete units. Never negative; the stock adjustment
    /// clamps at zero on decrement.
    pub stock_units: f64,

    /// Current stock in kilograms. Same clamp rule.
    pub stock_kg: f64,

    /// When the product was created.
    pub created_at: DateTime<Utc>,

    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// The pricing-relevant snapshot handed to the pure pricing table.
    pub fn pricing(&self) -> ProductPricing {
        ProductPricing {
            price_per_unit: self.price_per_unit_cents,
            price_per_kg: self.price_per_kg_cents,
            price_per_case: self.price_per_case_cents,
            units_per_case: self.units_per_case,
            kg_per_case: self.kg_per_case,
        }
    }
}

/// The five product fields the pricing table reads. Copied out of a
/// [`Product`] so pricing stays a pure function over plain values.
#[derive(Debug, Clone, Copy)]
pub struct ProductPricing {
    pub price_per_unit: Money,
    pub price_per_kg: Money,
    pub price_per_case: Money,
    pub units_per_case: f64,
    pub kg_per_case: f64,
}

// =============================================================================
// Customer
// =============================================================================

/// A customer with a credit line.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub address: String,

    /// Credit ceiling (non-negative).
    pub credit_limit_cents: Money,

    /// Credit currently drawn (non-negative; released on cancellation).
    pub current_credit_cents: Money,

    pub status: CustomerStatus,
    pub registration_date: DateTime<Utc>,
    pub last_purchase_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Customer {
    /// Credit headroom: `max(0, credit_limit - current_credit)`.
    pub fn available_credit(&self) -> Money {
        (self.credit_limit_cents - self.current_credit_cents).clamp_zero()
    }

    /// Whether this customer may transact at all.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.status == CustomerStatus::Active
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A sale transaction, owned by the sale engine.
///
/// Append-only after creation: the only permitted mutation is the single
/// `payment_status` transition to [`PaymentStatus::Cancelled`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Sale {
    pub id: String,
    pub product_id: String,
    pub customer_id: String,

    /// Unit convention, fixed at creation.
    pub sale_type: SaleType,

    /// Quantity in the sale-type's unit (positive real).
    pub quantity: f64,

    /// Price per one `sale_type` unit, frozen at sale time.
    pub unit_price_cents: Money,

    /// `quantity × unit_price`, frozen at sale time.
    pub total_price_cents: Money,

    /// Dual-unit equivalent of `quantity` in discrete units.
    /// Used for stock bookkeeping regardless of sale type.
    pub units_sold: f64,

    /// Dual-unit equivalent of `quantity` in kilograms.
    pub kg_sold: f64,

    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,

    /// Amount collected up front. `paid + remaining == total` always.
    pub paid_cents: Money,

    /// Amount still owed.
    pub remaining_cents: Money,

    /// Equals `total` for credit sales, zero otherwise.
    pub credit_cents: Money,

    /// Human-readable invoice identifier, `INV-YYYYMMDD-NNNN`.
    /// Unique; assigned once at creation.
    pub invoice_number: String,

    pub notes: Option<String>,

    /// When the sale happened (drives the invoice day-bucket).
    pub sale_date: DateTime<Utc>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Sale {
    /// Whether compensating writes have already been applied.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.payment_status == PaymentStatus::Cancelled
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
