//! # Product Repository
//!
//! Database operations for products, most importantly the atomic dual-unit
//! stock adjustment.
//!
//! ## The Stock Adjustment Statement
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Stock Update Strategy                                │
//! │                                                                         │
//! │  ❌ WRONG: read-modify-write in the caller (races under concurrency)   │
//! │     let p = get(id); p.stock_units -= 3; update(p);                    │
//! │                                                                         │
//! │  ✅ CORRECT: one atomic conditional UPDATE                             │
//! │     UPDATE products SET stock_units = MAX(0, stock_units - 3)          │
//! │                                                                         │
//! │  Two concurrent sales of the same product each apply their own delta   │
//! │  inside the database; neither can observe the other's pre-decrement    │
//! │  value. The MAX(0, ..) clamp is the never-negative stock invariant.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use mercato_core::Product;

/// Column list shared by every product SELECT.
const PRODUCT_COLUMNS: &str = "id, name, category, \
     price_per_unit_cents, price_per_kg_cents, price_per_case_cents, \
     units_per_case, kg_per_case, stock_units, stock_kg, \
     created_at, updated_at";

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Inserts a new product.
    ///
    /// Products are created by inventory management; the engine itself only
    /// ever adjusts stock. The id should be generated beforehand.
    pub async fn insert(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, name = %product.name, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, name, category,
                price_per_unit_cents, price_per_kg_cents, price_per_case_cents,
                units_per_case, kg_per_case, stock_units, stock_kg,
                created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3,
                ?4, ?5, ?6,
                ?7, ?8, ?9, ?10,
                ?11, ?12
            )
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.category)
        .bind(product.price_per_unit_cents)
        .bind(product.price_per_kg_cents)
        .bind(product.price_per_case_cents)
        .bind(product.units_per_case)
        .bind(product.kg_per_case)
        .bind(product.stock_units)
        .bind(product.stock_kg)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Atomically adjusts both stock quantities, clamping each at zero.
    ///
    /// This is the ONLY statement in the system that writes `stock_units` /
    /// `stock_kg`. The whole read-modify-write happens inside one UPDATE, so
    /// concurrent adjustments on the same product serialize in the database.
    ///
    /// ## Arguments
    /// * `delta_units` - Change in unit stock (negative for sales,
    ///   positive for cancellation restores)
    /// * `delta_kg` - Change in kg stock, same sign convention
    ///
    /// ## Returns
    /// The product as persisted after the adjustment.
    pub async fn adjust_stock(&self, id: &str, delta_units: f64, delta_kg: f64) -> DbResult<Product> {
        debug!(id = %id, delta_units = %delta_units, delta_kg = %delta_kg, "Adjusting stock");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE products
            SET
                stock_units = MAX(0, stock_units + ?2),
                stock_kg = MAX(0, stock_kg + ?3),
                updated_at = ?4
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(delta_units)
        .bind(delta_kg)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        // Re-read for the caller; the UPDATE above is the atomic step
        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))
    }

    /// Counts total products (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Helper to generate a new product ID.
pub fn generate_product_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use mercato_core::Money;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn sample_product() -> Product {
        let now = Utc::now();
        Product {
            id: generate_product_id(),
            name: "Basmati Rice 5kg".to_string(),
            category: Some("Grains".to_string()),
            price_per_unit_cents: Money::from_cents(1000),
            price_per_kg_cents: Money::from_cents(450),
            price_per_case_cents: Money::from_cents(11000),
            units_per_case: 12.0,
            kg_per_case: 6.0,
            stock_units: 100.0,
            stock_kg: 50.0,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = test_db().await;
        let repo = db.products();
        let product = sample_product();

        repo.insert(&product).await.unwrap();

        let fetched = repo.get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, product.name);
        assert_eq!(fetched.price_per_unit_cents.cents(), 1000);
        assert_eq!(fetched.stock_units, 100.0);

        assert!(repo.get_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_category_is_optional() {
        let db = test_db().await;
        let repo = db.products();
        let mut product = sample_product();
        product.category = None;

        repo.insert(&product).await.unwrap();

        let fetched = repo.get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(fetched.category, None);
    }

    #[tokio::test]
    async fn test_adjust_stock_decrements_both_dimensions() {
        let db = test_db().await;
        let repo = db.products();
        let product = sample_product();
        repo.insert(&product).await.unwrap();

        let updated = repo.adjust_stock(&product.id, -5.0, -2.5).await.unwrap();
        assert_eq!(updated.stock_units, 95.0);
        assert_eq!(updated.stock_kg, 47.5);
    }

    #[tokio::test]
    async fn test_adjust_stock_clamps_at_zero() {
        let db = test_db().await;
        let repo = db.products();
        let mut product = sample_product();
        product.stock_units = 3.0;
        product.stock_kg = 1.0;
        repo.insert(&product).await.unwrap();

        let updated = repo.adjust_stock(&product.id, -10.0, -5.0).await.unwrap();
        assert_eq!(updated.stock_units, 0.0);
        assert_eq!(updated.stock_kg, 0.0);
    }

    #[tokio::test]
    async fn test_adjust_stock_missing_product() {
        let db = test_db().await;
        let err = db.products().adjust_stock("missing", -1.0, -1.0).await;
        assert!(matches!(err, Err(DbError::NotFound { .. })));
    }
}
