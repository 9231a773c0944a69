//! # Repository Layer
//!
//! One repository per aggregate. Each repository owns the only statements
//! that may mutate its entity's guarded fields:
//!
//! - [`product::ProductRepository`] — the stock-adjustment statement
//! - [`customer::CustomerRepository`] — the credit draw/release statements
//! - [`sale::SaleRepository`] — sale rows and the cancellation claim
//!
//! The engine composes these; it never touches stock or credit columns
//! directly.

pub mod customer;
pub mod product;
pub mod sale;
