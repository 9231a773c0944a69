//! # mercato-db: Storage and Transaction Layer for Mercato
//!
//! This crate provides SQLite persistence and the sale transaction engine
//! for the Mercato back office. It uses sqlx for async database access.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Mercato Data Flow                                 │
//! │                                                                         │
//! │  Caller (back-office API, seed tool, tests)                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    mercato-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐   ┌────────────────┐   ┌───────────────┐  │   │
//! │  │   │  SaleEngine   │   │  Repositories  │   │ InvoiceNumber │  │   │
//! │  │   │  (engine.rs)  │──►│  product       │   │ Service       │  │   │
//! │  │   │               │   │  customer      │◄──│ (invoice.rs)  │  │   │
//! │  │   │  create_sale  │   │  sale          │   └───────────────┘  │   │
//! │  │   │  cancel_sale  │   └────────────────┘   ┌───────────────┐  │   │
//! │  │   │  delete_sale  │                        │  SaleReports  │  │   │
//! │  │   └───────────────┘                        │  (reports.rs) │  │   │
//! │  │           │                                └───────────────┘  │   │
//! │  │           ▼                                                    │   │
//! │  │   ┌───────────────┐    ┌──────────────┐                       │   │
//! │  │   │   Database    │    │  Migrations  │                       │   │
//! │  │   │   (pool.rs)   │    │  (embedded)  │                       │   │
//! │  │   └───────────────┘    └──────────────┘                       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite database file (WAL mode)                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Per-entity repositories (product, customer, sale)
//! - [`invoice`] - Day-scoped invoice number allocation
//! - [`engine`] - The sale transaction engine
//! - [`reports`] - Read-only sale aggregates
//!
//! ## Usage
//!
//! ```rust,ignore
//! use mercato_db::{CreateSaleRequest, Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/mercato.db")).await?;
//!
//! let sale = db.engine().create_sale(request).await?;
//! let summary = db.reports().summary(from, to).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod engine;
pub mod error;
pub mod invoice;
pub mod migrations;
pub mod pool;
pub mod reports;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use engine::{CreateSaleRequest, EngineError, EngineResult, SaleEngine};
pub use error::{DbError, DbResult};
pub use invoice::InvoiceNumberService;
pub use pool::{Database, DbConfig};
pub use reports::{DailySales, ProductSales, SaleReports, SalesSummary};

// Repository re-exports for convenience
pub use repository::customer::CustomerRepository;
pub use repository::product::ProductRepository;
pub use repository::sale::SaleRepository;
