//! # Sale Reports
//!
//! Read-only aggregate queries over the sale records. Cancelled sales are
//! excluded everywhere: a cancelled sale keeps its row (and its retired
//! invoice number) but contributes nothing to revenue figures.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::error::DbResult;
use mercato_core::Money;

/// Revenue summary for a date range.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesSummary {
    pub total_cents: Money,
    pub count: i64,
    pub average_cents: Money,
}

/// Per-product revenue within a date range.
#[derive(Debug, Clone, PartialEq, serde::Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ProductSales {
    pub product_id: String,
    pub product_name: String,
    pub sale_count: i64,
    /// Discrete units moved, summed over the dual-unit equivalents.
    pub units_sold: f64,
    pub total_cents: Money,
}

/// Revenue for one calendar day.
#[derive(Debug, Clone, PartialEq, serde::Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DailySales {
    /// `YYYY-MM-DD`.
    pub day: String,
    pub sale_count: i64,
    pub total_cents: Money,
}

/// Read-only sale query surface.
#[derive(Debug, Clone)]
pub struct SaleReports {
    pool: SqlitePool,
}

impl SaleReports {
    /// Creates a new SaleReports.
    pub fn new(pool: SqlitePool) -> Self {
        SaleReports { pool }
    }

    /// Total, count, and average over the range (inclusive bounds).
    pub async fn summary(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> DbResult<SalesSummary> {
        let (total, count): (i64, i64) = sqlx::query_as(
            r#"
            SELECT COALESCE(SUM(total_price_cents), 0), COUNT(*)
            FROM sales
            WHERE sale_date BETWEEN ?1 AND ?2
              AND payment_status != 'cancelled'
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_one(&self.pool)
        .await?;

        let average = if count > 0 { total / count } else { 0 };

        Ok(SalesSummary {
            total_cents: Money::from_cents(total),
            count,
            average_cents: Money::from_cents(average),
        })
    }

    /// Products ranked by revenue over the range.
    pub async fn top_products(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        limit: u32,
    ) -> DbResult<Vec<ProductSales>> {
        let rows = sqlx::query_as::<_, ProductSales>(
            r#"
            SELECT
                s.product_id AS product_id,
                p.name AS product_name,
                COUNT(*) AS sale_count,
                SUM(s.units_sold) AS units_sold,
                SUM(s.total_price_cents) AS total_cents
            FROM sales s
            JOIN products p ON p.id = s.product_id
            WHERE s.sale_date BETWEEN ?1 AND ?2
              AND s.payment_status != 'cancelled'
            GROUP BY s.product_id, p.name
            ORDER BY total_cents DESC
            LIMIT ?3
            "#,
        )
        .bind(from)
        .bind(to)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Revenue per calendar day over the range, oldest first.
    pub async fn daily_totals(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> DbResult<Vec<DailySales>> {
        let rows = sqlx::query_as::<_, DailySales>(
            r#"
            SELECT
                date(sale_date) AS day,
                COUNT(*) AS sale_count,
                SUM(total_price_cents) AS total_cents
            FROM sales
            WHERE sale_date BETWEEN ?1 AND ?2
              AND payment_status != 'cancelled'
            GROUP BY date(sale_date)
            ORDER BY day
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::CreateSaleRequest;
    use crate::pool::{Database, DbConfig};
    use crate::repository::customer::generate_customer_id;
    use crate::repository::product::generate_product_id;
    use chrono::Duration;
    use mercato_core::{
        Customer, CustomerStatus, PaymentMethod, Product, Sale, SaleType,
    };
    use uuid::Uuid;

    async fn seeded_db() -> (Database, Product, Customer) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let now = Utc::now();

        let product = Product {
            id: generate_product_id(),
            name: "Sugar 1kg".to_string(),
            category: Some("Staples".to_string()),
            price_per_unit_cents: Money::from_cents(200),
            price_per_kg_cents: Money::from_cents(200),
            price_per_case_cents: Money::from_cents(2000),
            units_per_case: 10.0,
            kg_per_case: 10.0,
            stock_units: 1000.0,
            stock_kg: 1000.0,
            created_at: now,
            updated_at: now,
        };
        db.products().insert(&product).await.unwrap();

        let customer = Customer {
            id: generate_customer_id(),
            name: "Lamin Sowe".to_string(),
            phone: format!("+220{}", &Uuid::new_v4().simple().to_string()[..9]),
            address: "Brikama".to_string(),
            credit_limit_cents: Money::zero(),
            current_credit_cents: Money::zero(),
            status: CustomerStatus::Active,
            registration_date: now,
            last_purchase_date: None,
            notes: None,
            created_at: now,
            updated_at: now,
        };
        db.customers().insert(&customer).await.unwrap();

        (db, product, customer)
    }

    async fn sell_units(db: &Database, product: &Product, customer: &Customer, qty: f64) -> Sale {
        db.engine()
            .create_sale(CreateSaleRequest {
                product_id: product.id.clone(),
                customer_id: customer.id.clone(),
                sale_type: SaleType::Unit,
                quantity: qty,
                payment_method: PaymentMethod::Cash,
                paid_amount: None,
                notes: None,
            })
            .await
            .unwrap()
    }

    fn full_range() -> (DateTime<Utc>, DateTime<Utc>) {
        let now = Utc::now();
        (now - Duration::days(1), now + Duration::days(1))
    }

    #[tokio::test]
    async fn test_summary_totals_and_average() {
        let (db, product, customer) = seeded_db().await;
        sell_units(&db, &product, &customer, 10.0).await; // $20.00
        sell_units(&db, &product, &customer, 20.0).await; // $40.00

        let (from, to) = full_range();
        let summary = db.reports().summary(from, to).await.unwrap();
        assert_eq!(summary.count, 2);
        assert_eq!(summary.total_cents.cents(), 6000);
        assert_eq!(summary.average_cents.cents(), 3000);
    }

    #[tokio::test]
    async fn test_summary_of_empty_range_is_zero() {
        let (db, _, _) = seeded_db().await;
        let (from, to) = full_range();
        let summary = db.reports().summary(from, to).await.unwrap();
        assert_eq!(summary.count, 0);
        assert_eq!(summary.total_cents, Money::zero());
        assert_eq!(summary.average_cents, Money::zero());
    }

    #[tokio::test]
    async fn test_cancelled_sales_are_excluded() {
        let (db, product, customer) = seeded_db().await;
        sell_units(&db, &product, &customer, 10.0).await;
        let cancelled = sell_units(&db, &product, &customer, 20.0).await;
        db.engine().cancel_sale(&cancelled.id).await.unwrap();

        let (from, to) = full_range();
        let summary = db.reports().summary(from, to).await.unwrap();
        assert_eq!(summary.count, 1);
        assert_eq!(summary.total_cents.cents(), 2000);

        let daily = db.reports().daily_totals(from, to).await.unwrap();
        assert_eq!(daily.len(), 1);
        assert_eq!(daily[0].sale_count, 1);
        assert_eq!(daily[0].total_cents.cents(), 2000);
    }

    #[tokio::test]
    async fn test_top_products_ranked_by_revenue() {
        let (db, product, customer) = seeded_db().await;
        sell_units(&db, &product, &customer, 10.0).await;

        let (from, to) = full_range();
        let top = db.reports().top_products(from, to, 5).await.unwrap();
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].product_id, product.id);
        assert_eq!(top[0].product_name, "Sugar 1kg");
        assert_eq!(top[0].sale_count, 1);
        assert_eq!(top[0].units_sold, 10.0);
        assert_eq!(top[0].total_cents.cents(), 2000);
    }
}
