//! # Sale Transaction Engine
//!
//! Orchestrates the full lifecycle of a sale across the product, customer,
//! and invoice ledgers.
//!
//! ## Creation Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        create_sale                                      │
//! │                                                                         │
//! │  validate request ──► load product + customer ──► active check         │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  price (unit convention) ──► stock check ──► credit snapshot check     │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  allocate invoice number ──► INSERT sale  (retry on number collision)  │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  stock decrement (atomic, clamped)                                     │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  history append + last-purchase stamp                                  │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  conditional credit draw ──► lost the race? compensate:                │
//! │                              restore stock, cancel sale,               │
//! │                              surface CreditLimitExceeded               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All checks run against snapshots; every commit step is a single atomic
//! statement, so concurrent sales never read-modify-write a ledger. The one
//! constraint a snapshot check cannot hold (the credit ceiling) is
//! re-asserted by the conditional draw at commit time.

use chrono::Utc;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::error::DbError;
use crate::invoice::InvoiceNumberService;
use crate::pool::Database;
use crate::repository::customer::CustomerRepository;
use crate::repository::product::ProductRepository;
use crate::repository::sale::{generate_sale_id, SaleRepository};
use mercato_core::pricing::{
    check_credit, check_stock, price_sale, resolve_payment,
};
use mercato_core::validation::{validate_amount, validate_id, validate_quantity};
use mercato_core::{
    CoreError, Money, PaymentMethod, Sale, SaleType, ValidationError, MAX_INVOICE_ATTEMPTS,
};

// =============================================================================
// Errors
// =============================================================================

/// Errors surfaced by the sale engine.
///
/// Storage failures are wrapped in `Internal` with a generic message; the
/// underlying `DbError` stays attached as the source for logs.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Request failed field validation before any lookup ran.
    #[error("Validation error: {0}")]
    InvalidInput(#[from] ValidationError),

    /// Referenced product does not exist.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Referenced customer does not exist.
    #[error("Customer not found: {0}")]
    CustomerNotFound(String),

    /// Referenced sale does not exist.
    #[error("Sale not found: {0}")]
    SaleNotFound(String),

    /// Customer is suspended or blocked.
    #[error("Customer is {status}. Cannot process sale.")]
    CustomerInactive { status: &'static str },

    /// Requested quantity exceeds available stock.
    #[error("Insufficient stock: requested {requested} {unit}, available {available}")]
    InsufficientStock {
        requested: f64,
        available: f64,
        unit: &'static str,
    },

    /// A credit sale would breach the customer's credit ceiling.
    #[error("Credit limit exceeded. Available credit: {available}")]
    CreditLimitExceeded { available: Money },

    /// Invoice allocation kept colliding after retries.
    #[error("Could not allocate a unique invoice number")]
    NumberingConflict,

    /// Storage-layer failure.
    #[error("Internal storage error")]
    Internal(#[from] DbError),
}

impl From<CoreError> for EngineError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InsufficientStock {
                requested,
                available,
                unit,
            } => EngineError::InsufficientStock {
                requested,
                available,
                unit,
            },
            CoreError::CreditLimitExceeded { available } => {
                EngineError::CreditLimitExceeded { available }
            }
            CoreError::CustomerInactive { status } => EngineError::CustomerInactive { status },
            CoreError::Validation(v) => EngineError::InvalidInput(v),
        }
    }
}

pub type EngineResult<T> = Result<T, EngineError>;

// =============================================================================
// Requests
// =============================================================================

/// Request payload for creating a sale.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSaleRequest {
    pub product_id: String,
    pub customer_id: String,
    pub sale_type: SaleType,
    /// Quantity in the sale-type's unit.
    pub quantity: f64,
    pub payment_method: PaymentMethod,
    /// Up-front collection override for non-credit sales. Ignored for
    /// credit sales, which always start fully outstanding.
    #[serde(default)]
    pub paid_amount: Option<Money>,
    #[serde(default)]
    pub notes: Option<String>,
}

// =============================================================================
// Engine
// =============================================================================

/// The sale transaction engine.
#[derive(Debug, Clone)]
pub struct SaleEngine {
    products: ProductRepository,
    customers: CustomerRepository,
    sales: SaleRepository,
    invoices: InvoiceNumberService,
}

impl SaleEngine {
    /// Creates an engine over the given database handle.
    pub fn new(db: &Database) -> Self {
        SaleEngine {
            products: db.products(),
            customers: db.customers(),
            sales: db.sales(),
            invoices: db.invoices(),
        }
    }

    /// Creates a sale: prices it, checks feasibility, assigns an invoice
    /// number, and commits the ledger effects.
    ///
    /// ## Errors
    /// * `InvalidInput` - empty ids, non-positive or absurd quantity,
    ///   negative or over-total paid amount
    /// * `ProductNotFound` / `CustomerNotFound`
    /// * `CustomerInactive` - suspended or blocked customer
    /// * `InsufficientStock` - quantity exceeds the checked dimension(s)
    /// * `CreditLimitExceeded` - credit headroom too small, at snapshot
    ///   time or at commit time (lost the draw race)
    /// * `NumberingConflict` - invoice allocation kept colliding
    pub async fn create_sale(&self, request: CreateSaleRequest) -> EngineResult<Sale> {
        validate_id("productId", &request.product_id)?;
        validate_id("customerId", &request.customer_id)?;
        validate_quantity(request.quantity)?;
        if let Some(paid) = request.paid_amount {
            validate_amount("paidAmount", paid)?;
        }

        let product = self
            .products
            .get_by_id(&request.product_id)
            .await?
            .ok_or_else(|| EngineError::ProductNotFound(request.product_id.clone()))?;
        let customer = self
            .customers
            .get_by_id(&request.customer_id)
            .await?
            .ok_or_else(|| EngineError::CustomerNotFound(request.customer_id.clone()))?;

        if !customer.is_active() {
            return Err(EngineError::CustomerInactive {
                status: customer.status.as_str(),
            });
        }

        let priced = price_sale(&product.pricing(), request.sale_type, request.quantity);
        check_stock(
            request.sale_type,
            &priced,
            product.stock_units,
            product.stock_kg,
        )?;

        if request.payment_method.is_credit() {
            // Snapshot check; re-asserted by the conditional draw below
            check_credit(customer.available_credit(), priced.total_price)?;
        } else if let Some(paid) = request.paid_amount {
            if paid > priced.total_price {
                return Err(ValidationError::TooLarge {
                    field: "paidAmount".to_string(),
                    max: priced.total_price.cents() as f64 / 100.0,
                }
                .into());
            }
        }

        let resolution = resolve_payment(
            request.payment_method,
            priced.total_price,
            request.paid_amount,
        );

        let now = Utc::now();
        let day = now.date_naive();

        // Allocation and insert can collide with a number written outside
        // the counter (restores, imports). The unique index is the arbiter;
        // on collision we allocate again, a bounded number of times.
        let mut attempt = 0;
        let sale = loop {
            attempt += 1;
            let invoice_number = self.invoices.next_invoice_number(day).await?;

            let sale = Sale {
                id: generate_sale_id(),
                product_id: product.id.clone(),
                customer_id: customer.id.clone(),
                sale_type: request.sale_type,
                quantity: request.quantity,
                unit_price_cents: priced.unit_price,
                total_price_cents: priced.total_price,
                units_sold: priced.units_sold,
                kg_sold: priced.kg_sold,
                payment_method: request.payment_method,
                payment_status: resolution.status,
                paid_cents: resolution.paid,
                remaining_cents: resolution.remaining,
                credit_cents: resolution.credit,
                invoice_number,
                notes: request.notes.clone(),
                sale_date: now,
                created_at: now,
                updated_at: now,
            };

            match self.sales.insert(&sale).await {
                Ok(()) => break sale,
                Err(e) if e.is_unique_violation_on("invoice_number") => {
                    if attempt >= MAX_INVOICE_ATTEMPTS {
                        warn!(attempts = attempt, "Invoice allocation kept colliding");
                        return Err(EngineError::NumberingConflict);
                    }
                    debug!(
                        invoice = %sale.invoice_number,
                        attempt, "Invoice number collision, reallocating"
                    );
                }
                Err(e) => return Err(e.into()),
            }
        };

        // Ledger effects. Stock first so a failed credit draw can restore it.
        self.products
            .adjust_stock(&product.id, -sale.units_sold, -sale.kg_sold)
            .await?;

        self.customers
            .append_sale_history(&customer.id, &sale.id)
            .await?;
        self.customers.touch_last_purchase(&customer.id).await?;

        if sale.payment_method.is_credit() {
            let drawn = self
                .customers
                .try_draw_credit(&customer.id, sale.total_price_cents)
                .await?;

            if !drawn {
                // A concurrent credit sale consumed the headroom between our
                // snapshot check and the draw. Undo this sale's effects and
                // report the fresh availability.
                warn!(
                    sale_id = %sale.id,
                    customer_id = %customer.id,
                    "Credit draw lost the race, compensating"
                );
                self.products
                    .adjust_stock(&product.id, sale.units_sold, sale.kg_sold)
                    .await?;
                self.sales.claim_cancellation(&sale.id).await?;

                let fresh = self
                    .customers
                    .get_by_id(&customer.id)
                    .await?
                    .ok_or_else(|| EngineError::CustomerNotFound(customer.id.clone()))?;
                return Err(EngineError::CreditLimitExceeded {
                    available: fresh.available_credit(),
                });
            }
        }

        info!(
            sale_id = %sale.id,
            invoice = %sale.invoice_number,
            total = %sale.total_price_cents,
            method = ?sale.payment_method,
            "Sale created"
        );

        Ok(sale)
    }

    /// Cancels a sale, applying the exact compensating inverse of its
    /// ledger effects.
    ///
    /// Restores come from the sale's stored `units_sold` / `kg_sold` and
    /// `credit_cents`, not from re-derived figures, so a product whose
    /// conversion factors changed since the sale still round-trips exactly.
    ///
    /// Idempotent: cancelling an already-cancelled sale is a no-op that
    /// returns the sale unchanged.
    pub async fn cancel_sale(&self, id: &str) -> EngineResult<Sale> {
        let sale = self
            .sales
            .get_by_id(id)
            .await?
            .ok_or_else(|| EngineError::SaleNotFound(id.to_string()))?;

        if sale.is_cancelled() {
            return Ok(sale);
        }

        // The claim decides which caller compensates; a lost claim means
        // someone else already did.
        if !self.sales.claim_cancellation(id).await? {
            return self.reload(id).await;
        }

        self.compensate(&sale).await?;

        info!(
            sale_id = %sale.id,
            invoice = %sale.invoice_number,
            "Sale cancelled"
        );

        self.reload(id).await
    }

    /// Deletes a sale record, cancelling it first if still live so the
    /// ledgers are restored before the row disappears.
    pub async fn delete_sale(&self, id: &str) -> EngineResult<()> {
        let sale = self
            .sales
            .get_by_id(id)
            .await?
            .ok_or_else(|| EngineError::SaleNotFound(id.to_string()))?;

        if !sale.is_cancelled() && self.sales.claim_cancellation(id).await? {
            self.compensate(&sale).await?;
        }

        self.sales.delete(id).await?;
        info!(sale_id = %id, "Sale deleted");
        Ok(())
    }

    /// Gets a sale by ID.
    pub async fn get_sale(&self, id: &str) -> EngineResult<Sale> {
        self.reload(id).await
    }

    /// Gets a sale by its invoice number.
    pub async fn get_by_invoice(&self, invoice_number: &str) -> EngineResult<Sale> {
        self.sales
            .get_by_invoice(invoice_number)
            .await?
            .ok_or_else(|| EngineError::SaleNotFound(invoice_number.to_string()))
    }

    /// Restores the ledger effects of a claimed sale.
    async fn compensate(&self, sale: &Sale) -> EngineResult<()> {
        self.products
            .adjust_stock(&sale.product_id, sale.units_sold, sale.kg_sold)
            .await?;

        if sale.payment_method.is_credit() {
            self.customers
                .release_credit(&sale.customer_id, sale.credit_cents)
                .await?;
        }

        Ok(())
    }

    async fn reload(&self, id: &str) -> EngineResult<Sale> {
        self.sales
            .get_by_id(id)
            .await?
            .ok_or_else(|| EngineError::SaleNotFound(id.to_string()))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
