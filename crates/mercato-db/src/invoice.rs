//! # Invoice Number Service
//!
//! Allocates day-scoped invoice sequence numbers from the `invoice_counters`
//! table.
//!
//! ## Allocation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  One row per calendar day. Allocation is a single upsert:              │
//! │                                                                         │
//! │     INSERT INTO invoice_counters (day, next_seq) VALUES (?, 1)         │
//! │     ON CONFLICT(day) DO UPDATE SET next_seq = next_seq + 1             │
//! │     RETURNING next_seq                                                 │
//! │                                                                         │
//! │  Concurrent allocators each receive a distinct sequence, so numbers    │
//! │  within a day are contiguous: 0001, 0002, 0003, ...                    │
//! │                                                                         │
//! │  Counters advance monotonically and are never reset, even when the     │
//! │  sale that consumed a number is cancelled: a cancelled invoice leaves  │
//! │  its number retired, not reusable.                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use mercato_core::invoice::format_invoice_number;

/// Allocator for `INV-YYYYMMDD-NNNN` invoice numbers.
#[derive(Debug, Clone)]
pub struct InvoiceNumberService {
    pool: SqlitePool,
}

impl InvoiceNumberService {
    /// Creates a new InvoiceNumberService.
    pub fn new(pool: SqlitePool) -> Self {
        InvoiceNumberService { pool }
    }

    /// Allocates the next invoice number for the given day.
    pub async fn next_invoice_number(&self, day: NaiveDate) -> DbResult<String> {
        let seq: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO invoice_counters (day, next_seq) VALUES (?1, 1)
            ON CONFLICT(day) DO UPDATE SET next_seq = next_seq + 1
            RETURNING next_seq
            "#,
        )
        .bind(day.format("%Y-%m-%d").to_string())
        .fetch_one(&self.pool)
        .await?;

        let seq = u32::try_from(seq)
            .map_err(|_| DbError::Internal(format!("invoice counter out of range: {seq}")))?;
        let invoice = format_invoice_number(day, seq);
        debug!(day = %day, seq, invoice = %invoice, "Allocated invoice number");

        Ok(invoice)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    #[tokio::test]
    async fn test_sequence_starts_at_one_and_increments() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let service = db.invoices();
        let day = NaiveDate::from_ymd_opt(2026, 8, 30).unwrap();

        assert_eq!(
            service.next_invoice_number(day).await.unwrap(),
            "INV-20260830-0001"
        );
        assert_eq!(
            service.next_invoice_number(day).await.unwrap(),
            "INV-20260830-0002"
        );
        assert_eq!(
            service.next_invoice_number(day).await.unwrap(),
            "INV-20260830-0003"
        );
    }

    #[tokio::test]
    async fn test_days_count_independently() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let service = db.invoices();
        let monday = NaiveDate::from_ymd_opt(2026, 8, 31).unwrap();
        let tuesday = NaiveDate::from_ymd_opt(2026, 9, 1).unwrap();

        service.next_invoice_number(monday).await.unwrap();
        service.next_invoice_number(monday).await.unwrap();

        assert_eq!(
            service.next_invoice_number(tuesday).await.unwrap(),
            "INV-20260901-0001"
        );
        assert_eq!(
            service.next_invoice_number(monday).await.unwrap(),
            "INV-20260831-0003"
        );
    }
}
