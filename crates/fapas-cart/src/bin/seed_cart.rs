//! # Cart Seeder
//!
//! Fills the cart from a catalog dump, one unit per product.
//!
//! ## Usage
//! ```bash
//! # Seed from a product file using cart.toml / env settings
//! cargo run -p fapas-cart --bin seed-cart -- products.json
//!
//! # Explicit database and config
//! cargo run -p fapas-cart --bin seed-cart -- products.json --db ./fapas_dev.db --config ./cart.toml
//! ```
//!
//! ## Input Format
//! A JSON array of product descriptors as served by the catalog:
//! ```json
//! [
//!   { "id": 1, "title": "Backpack", "price": 109.95, "image": "https://...",
//!     "description": "...", "rating": { "rate": 3.9, "count": 120 } }
//! ]
//! ```

use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use fapas_cart::{init_tracing, CartConfig, CartController, CountPublisher};
use fapas_core::ProductDescriptor;
use fapas_db::Database;

fn print_help() {
    println!("FAPAS Cart Seeder");
    println!();
    println!("Usage: seed-cart <PRODUCTS.json> [OPTIONS]");
    println!();
    println!("Options:");
    println!("  -d, --db <PATH>        Database file path (overrides config)");
    println!("  -c, --config <PATH>    Config file path (default: platform config dir)");
    println!("  -h, --help             Show this help message");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let args: Vec<String> = env::args().collect();

    let mut products_path: Option<PathBuf> = None;
    let mut db_path: Option<PathBuf> = None;
    let mut config_path: Option<PathBuf> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    config_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            other => products_path = Some(PathBuf::from(other)),
        }
        i += 1;
    }

    let Some(products_path) = products_path else {
        print_help();
        return Err("missing product file".into());
    };

    let mut config = CartConfig::load(config_path)?;
    if let Some(path) = db_path {
        config.storage.database_path = path;
    }

    let contents = std::fs::read_to_string(&products_path)?;
    let products: Vec<ProductDescriptor> = serde_json::from_str(&contents)?;
    info!(path = ?products_path, count = products.len(), "Read product file");

    let db = Database::new(config.db_config()).await?;
    let publisher = Arc::new(CountPublisher::new());
    let controller = CartController::open(Arc::new(db.clone()), publisher.clone(), &config).await?;

    for product in &products {
        controller.add_or_increment(product, 1).await?;
    }

    let view = controller.view().await;
    info!(
        lines = view.totals.line_count,
        item_count = view.totals.item_count,
        badge = publisher.current(),
        total = %config.format_amount(view.totals.cart_total),
        "Cart seeded"
    );

    println!("Lines:  {}", view.totals.line_count);
    println!("Items:  {}", view.totals.item_count);
    println!("Total:  {}", config.format_amount(view.totals.cart_total));
    if !view.totals.is_fully_priceable() {
        println!("Unpriceable: {} line(s)", view.totals.unpriceable.len());
    }

    db.close().await;
    Ok(())
}
