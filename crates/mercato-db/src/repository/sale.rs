//! # Sale Repository
//!
//! Database operations for sale records. Sales are immutable after creation
//! except for the one-way `payment_status` transition to `cancelled`, which
//! is claimed here atomically so each sale is compensated at most once.

use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use mercato_core::Sale;

/// Column list shared by every sale SELECT.
const SALE_COLUMNS: &str = "id, product_id, customer_id, sale_type, quantity, \
     unit_price_cents, total_price_cents, units_sold, kg_sold, \
     payment_method, payment_status, paid_cents, remaining_cents, credit_cents, \
     invoice_number, notes, sale_date, created_at, updated_at";

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Inserts a new sale record.
    ///
    /// ## Errors
    /// * `DbError::UniqueViolation` - invoice number already taken (the
    ///   engine retries allocation on this)
    /// * `DbError::ForeignKeyViolation` - unknown product or customer
    pub async fn insert(&self, sale: &Sale) -> DbResult<()> {
        debug!(id = %sale.id, invoice = %sale.invoice_number, "Inserting sale");

        sqlx::query(
            r#"
            INSERT INTO sales (
                id, product_id, customer_id, sale_type, quantity,
                unit_price_cents, total_price_cents, units_sold, kg_sold,
                payment_method, payment_status, paid_cents, remaining_cents, credit_cents,
                invoice_number, notes, sale_date, created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5,
                ?6, ?7, ?8, ?9,
                ?10, ?11, ?12, ?13, ?14,
                ?15, ?16, ?17, ?18, ?19
            )
            "#,
        )
        .bind(&sale.id)
        .bind(&sale.product_id)
        .bind(&sale.customer_id)
        .bind(sale.sale_type)
        .bind(sale.quantity)
        .bind(sale.unit_price_cents)
        .bind(sale.total_price_cents)
        .bind(sale.units_sold)
        .bind(sale.kg_sold)
        .bind(sale.payment_method)
        .bind(sale.payment_status)
        .bind(sale.paid_cents)
        .bind(sale.remaining_cents)
        .bind(sale.credit_cents)
        .bind(&sale.invoice_number)
        .bind(&sale.notes)
        .bind(sale.sale_date)
        .bind(sale.created_at)
        .bind(sale.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets a sale by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Sale>> {
        let sale = sqlx::query_as::<_, Sale>(&format!(
            "SELECT {SALE_COLUMNS} FROM sales WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sale)
    }

    /// Gets a sale by its invoice number.
    pub async fn get_by_invoice(&self, invoice_number: &str) -> DbResult<Option<Sale>> {
        let sale = sqlx::query_as::<_, Sale>(&format!(
            "SELECT {SALE_COLUMNS} FROM sales WHERE invoice_number = ?1"
        ))
        .bind(invoice_number)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sale)
    }

    /// Atomically claims a sale for cancellation.
    ///
    /// The conditional UPDATE flips `payment_status` to `cancelled` only if
    /// it is not already. Exactly one concurrent caller observes `true` and
    /// runs the compensating restores; everyone else sees the no-op.
    ///
    /// ## Returns
    /// * `Ok(true)` - this caller won the claim
    /// * `Ok(false)` - already cancelled (no rows affected)
    pub async fn claim_cancellation(&self, id: &str) -> DbResult<bool> {
        debug!(id = %id, "Claiming sale cancellation");

        let result = sqlx::query(
            r#"
            UPDATE sales
            SET payment_status = 'cancelled', updated_at = ?2
            WHERE id = ?1 AND payment_status != 'cancelled'
            "#,
        )
        .bind(id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Deletes a sale row.
    ///
    /// The engine cancels first so the ledgers are restored; deletion then
    /// removes the record and its history back-references (FK cascade).
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM sales WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Sale", id));
        }

        Ok(())
    }

    /// Counts sales dated on the given day (cancelled included).
    pub async fn count_for_day(&self, day: NaiveDate) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sales WHERE date(sale_date) = ?1",
        )
        .bind(day.format("%Y-%m-%d").to_string())
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}

/// Helper to generate a new sale ID.
pub fn generate_sale_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::repository::customer::generate_customer_id;
    use crate::repository::product::generate_product_id;
    use mercato_core::{
        Customer, CustomerStatus, Money, PaymentMethod, PaymentStatus, Product, SaleType,
    };

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn seed_refs(db: &Database) -> (String, String) {
        let now = Utc::now();
        let product = Product {
            id: generate_product_id(),
            name: "Basmati Rice 25kg".to_string(),
            category: Some("Grains".to_string()),
            price_per_unit_cents: Money::from_cents(1000),
            price_per_kg_cents: Money::from_cents(450),
            price_per_case_cents: Money::from_cents(9000),
            units_per_case: 10.0,
            kg_per_case: 25.0,
            stock_units: 100.0,
            stock_kg: 250.0,
            created_at: now,
            updated_at: now,
        };
        db.products().insert(&product).await.unwrap();

        let customer = Customer {
            id: generate_customer_id(),
            name: "Musa Ceesay".to_string(),
            phone: format!("+220{}", &Uuid::new_v4().simple().to_string()[..9]),
            address: "Serrekunda".to_string(),
            credit_limit_cents: Money::from_cents(50000),
            current_credit_cents: Money::zero(),
            status: CustomerStatus::Active,
            registration_date: now,
            last_purchase_date: None,
            notes: None,
            created_at: now,
            updated_at: now,
        };
        db.customers().insert(&customer).await.unwrap();

        (product.id, customer.id)
    }

    fn sample_sale(product_id: &str, customer_id: &str, invoice: &str) -> Sale {
        let now = Utc::now();
        Sale {
            id: generate_sale_id(),
            product_id: product_id.to_string(),
            customer_id: customer_id.to_string(),
            sale_type: SaleType::Unit,
            quantity: 5.0,
            unit_price_cents: Money::from_cents(1000),
            total_price_cents: Money::from_cents(5000),
            units_sold: 5.0,
            kg_sold: 12.5,
            payment_method: PaymentMethod::Cash,
            payment_status: PaymentStatus::Paid,
            paid_cents: Money::from_cents(5000),
            remaining_cents: Money::zero(),
            credit_cents: Money::zero(),
            invoice_number: invoice.to_string(),
            notes: None,
            sale_date: now,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_insert_and_lookup() {
        let db = test_db().await;
        let (product_id, customer_id) = seed_refs(&db).await;
        let repo = db.sales();

        let sale = sample_sale(&product_id, &customer_id, "INV-20260830-0001");
        repo.insert(&sale).await.unwrap();

        let by_id = repo.get_by_id(&sale.id).await.unwrap().unwrap();
        assert_eq!(by_id.total_price_cents.cents(), 5000);
        assert_eq!(by_id.payment_status, PaymentStatus::Paid);

        let by_invoice = repo
            .get_by_invoice("INV-20260830-0001")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_invoice.id, sale.id);
    }

    #[tokio::test]
    async fn test_duplicate_invoice_rejected() {
        let db = test_db().await;
        let (product_id, customer_id) = seed_refs(&db).await;
        let repo = db.sales();

        let a = sample_sale(&product_id, &customer_id, "INV-20260830-0007");
        let b = sample_sale(&product_id, &customer_id, "INV-20260830-0007");
        repo.insert(&a).await.unwrap();

        let err = repo.insert(&b).await.unwrap_err();
        assert!(err.is_unique_violation_on("invoice_number"));
    }

    #[tokio::test]
    async fn test_claim_cancellation_is_one_shot() {
        let db = test_db().await;
        let (product_id, customer_id) = seed_refs(&db).await;
        let repo = db.sales();

        let sale = sample_sale(&product_id, &customer_id, "INV-20260830-0002");
        repo.insert(&sale).await.unwrap();

        assert!(repo.claim_cancellation(&sale.id).await.unwrap());
        assert!(!repo.claim_cancellation(&sale.id).await.unwrap());

        let cancelled = repo.get_by_id(&sale.id).await.unwrap().unwrap();
        assert_eq!(cancelled.payment_status, PaymentStatus::Cancelled);
    }

    #[tokio::test]
    async fn test_delete_missing_sale() {
        let db = test_db().await;
        let result = db.sales().delete("no-such-sale").await;
        assert!(matches!(result, Err(DbError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_count_for_day() {
        let db = test_db().await;
        let (product_id, customer_id) = seed_refs(&db).await;
        let repo = db.sales();

        repo.insert(&sample_sale(&product_id, &customer_id, "INV-20260830-0003"))
            .await
            .unwrap();
        repo.insert(&sample_sale(&product_id, &customer_id, "INV-20260830-0004"))
            .await
            .unwrap();

        let today = Utc::now().date_naive();
        assert_eq!(repo.count_for_day(today).await.unwrap(), 2);
    }
}
