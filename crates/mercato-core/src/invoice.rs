//! # Invoice Number Formatting
//!
//! Pure formatting for the day-scoped invoice identifier. Allocation of the
//! per-day sequence lives in mercato-db; this module only renders it.
//!
//! ## Format (bit-exact for downstream reconciliation)
//! ```text
//! INV-YYYYMMDD-NNNN
//!     │        └── 4-digit zero-padded daily sequence, 1-based
//!     └── UTC calendar day of the sale
//! ```

use chrono::{Datelike, NaiveDate};

/// Renders an invoice number for the given day-bucket and sequence.
///
/// ## Example
/// ```rust
/// use chrono::NaiveDate;
/// use mercato_core::invoice::format_invoice_number;
///
/// let day = NaiveDate::from_ymd_opt(2026, 8, 30).unwrap();
/// assert_eq!(format_invoice_number(day, 7), "INV-20260830-0007");
/// ```
pub fn format_invoice_number(day: NaiveDate, seq: u32) -> String {
    format!(
        "INV-{:04}{:02}{:02}-{:04}",
        day.year(),
        day.month(),
        day.day(),
        seq
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_pads_all_fields() {
        let day = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        assert_eq!(format_invoice_number(day, 1), "INV-20260105-0001");
    }

    #[test]
    fn test_format_large_sequence() {
        let day = NaiveDate::from_ymd_opt(2026, 12, 31).unwrap();
        assert_eq!(format_invoice_number(day, 9999), "INV-20261231-9999");
        // Sequences past 4 digits widen rather than wrap
        assert_eq!(format_invoice_number(day, 10000), "INV-20261231-10000");
    }
}
