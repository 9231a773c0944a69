//! # Seed Data Generator
//!
//! Populates a database with wholesale products and credit customers for
//! development.
//!
//! ## Usage
//! ```bash
//! cargo run -p mercato-db --bin seed
//!
//! # Specify database path
//! cargo run -p mercato-db --bin seed -- --db ./data/mercato.db
//! ```

use chrono::Utc;
use std::env;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use mercato_core::{Customer, CustomerStatus, Money, Product};
use mercato_db::{Database, DbConfig};

/// (name, category, unit ¢, kg ¢, case ¢, units/case, kg/case, stock units, stock kg)
const PRODUCTS: &[(&str, &str, i64, i64, i64, f64, f64, f64, f64)] = &[
    ("Basmati Rice 5kg", "Grains", 850, 170, 7650, 10.0, 50.0, 200.0, 1000.0),
    ("Wheat Flour 500g", "Baking", 120, 240, 2700, 25.0, 12.5, 500.0, 250.0),
    ("Sugar 1kg", "Staples", 210, 210, 4800, 24.0, 24.0, 480.0, 480.0),
    ("Palm Oil 1L", "Oils", 390, 430, 4200, 12.0, 10.9, 144.0, 130.8),
    ("Powdered Milk 400g", "Dairy", 520, 1300, 11500, 24.0, 9.6, 96.0, 38.4),
    ("Black Tea 100ct", "Beverages", 310, 1550, 7100, 24.0, 4.8, 240.0, 48.0),
    ("Tomato Paste 70g", "Canned", 45, 640, 2100, 50.0, 3.5, 1000.0, 70.0),
    ("Dried Beans 1kg", "Staples", 280, 280, 6400, 24.0, 24.0, 240.0, 240.0),
];

/// (name, phone, address, credit limit ¢)
const CUSTOMERS: &[(&str, &str, &str, i64)] = &[
    ("Awa Diallo", "+2207001001", "Market Road 4, Banjul", 50000),
    ("Musa Ceesay", "+2207001002", "Kairaba Avenue, Serrekunda", 100000),
    ("Fatou Jallow", "+2207001003", "Bakau New Town", 25000),
    ("Lamin Sowe", "+2207001004", "Brikama Market", 0),
    ("Isatou Njie", "+2207001005", "Westfield Junction", 75000),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();
    let mut db_path = String::from("./mercato_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Mercato Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./mercato_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Mercato Seed Data Generator");
    println!("==============================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    let now = Utc::now();

    let products = db.products();
    for &(name, category, unit, kg, case, units_per_case, kg_per_case, stock_u, stock_kg) in
        PRODUCTS
    {
        products
            .insert(&Product {
                id: Uuid::new_v4().to_string(),
                name: name.to_string(),
                category: Some(category.to_string()),
                price_per_unit_cents: Money::from_cents(unit),
                price_per_kg_cents: Money::from_cents(kg),
                price_per_case_cents: Money::from_cents(case),
                units_per_case,
                kg_per_case,
                stock_units: stock_u,
                stock_kg,
                created_at: now,
                updated_at: now,
            })
            .await?;
    }
    println!("✓ {} products", PRODUCTS.len());

    let customers = db.customers();
    for &(name, phone, address, limit) in CUSTOMERS {
        customers
            .insert(&Customer {
                id: Uuid::new_v4().to_string(),
                name: name.to_string(),
                phone: phone.to_string(),
                address: address.to_string(),
                credit_limit_cents: Money::from_cents(limit),
                current_credit_cents: Money::zero(),
                status: CustomerStatus::Active,
                registration_date: now,
                last_purchase_date: None,
                notes: None,
                created_at: now,
                updated_at: now,
            })
            .await?;
    }
    println!("✓ {} customers", CUSTOMERS.len());

    db.close().await;
    println!();
    println!("Done.");
    Ok(())
}
