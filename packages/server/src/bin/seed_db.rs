//! Seed the database with sample customers, products and orders.
//!
//! Everything goes through the same actions the GraphQL API uses, so the seed
//! data is validated like real input. Re-running is safe: existing customers
//! come back as per-record errors and products are only added to an empty
//! catalog.

use anyhow::{Context, Result};
use clap::Parser;
use crm_core::config::Config;
use crm_core::domains::customers::actions::bulk_create_customers;
use crm_core::domains::customers::data::CustomerInput;
use crm_core::domains::orders::actions::create_order;
use crm_core::domains::products::actions::create_product;
use crm_core::domains::products::data::ProductInput;
use crm_core::domains::products::models::ProductFilter;
use crm_core::kernel::ServerDeps;
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::postgres::PgPoolOptions;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Parser)]
#[command(name = "seed_db")]
#[command(about = "Load sample CRM data")]
struct Cli {
    /// JSON file with `customers`, `products` and `orders`; built-in sample if omitted
    #[arg(long)]
    file: Option<PathBuf>,

    /// Run schema migrations before seeding
    #[arg(long)]
    migrate: bool,

    /// Only seed customers and products
    #[arg(long)]
    skip_orders: bool,
}

#[derive(Debug, Deserialize)]
struct SeedData {
    customers: Vec<SeedCustomer>,
    products: Vec<SeedProduct>,
    #[serde(default)]
    orders: Vec<SeedOrder>,
}

#[derive(Debug, Deserialize)]
struct SeedCustomer {
    name: String,
    email: String,
    phone: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SeedProduct {
    name: String,
    /// Decimal string, e.g. "2499.99"
    price: String,
    stock: Option<i32>,
}

/// Order by customer email and product names
#[derive(Debug, Deserialize)]
struct SeedOrder {
    customer_email: String,
    products: Vec<String>,
}

const SAMPLE_DATA: &str = r#"{
  "customers": [
    { "name": "Alice", "email": "alice@example.com", "phone": "+1234567890" },
    { "name": "Bob", "email": "bob@example.com", "phone": "123-456-7890" },
    { "name": "Carol", "email": "carol@example.com" },
    { "name": "Natalia", "email": "natalia@example.com" }
  ],
  "products": [
    { "name": "Laptop", "price": "2499.99", "stock": 10 },
    { "name": "Phone", "price": "999.99", "stock": 5 },
    { "name": "Mouse", "price": "99.99", "stock": 3 },
    { "name": "Keyboard", "price": "149.50" }
  ],
  "orders": [
    { "customer_email": "alice@example.com", "products": ["Laptop", "Mouse"] },
    { "customer_email": "bob@example.com", "products": ["Phone"] }
  ]
}"#;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;

    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    println!("✓ Connected to database");

    if cli.migrate {
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("Failed to run migrations")?;
        println!("✓ Migrations applied");
    }

    let raw = match &cli.file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read seed file {}", path.display()))?,
        None => SAMPLE_DATA.to_string(),
    };
    let seed: SeedData = serde_json::from_str(&raw).context("Failed to parse seed data")?;

    let deps = ServerDeps::postgres(pool);

    // Customers
    let inputs = seed
        .customers
        .into_iter()
        .map(|c| CustomerInput {
            name: c.name,
            email: c.email,
            phone: c.phone,
        })
        .collect();
    let outcome = bulk_create_customers(inputs, &deps).await;
    println!("✓ Created {} customers", outcome.customers.len());
    for error in &outcome.errors {
        println!("  ⊘ {}", error);
    }

    // Products
    let existing = deps
        .store
        .count_products(&ProductFilter::default())
        .await
        .context("Failed to count products")?;
    if existing > 0 {
        println!("⊘ Skipping products ({} already present)", existing);
    } else {
        for product in seed.products {
            let price = Decimal::from_str(&product.price)
                .with_context(|| format!("Invalid price for {}", product.name))?;
            let input = ProductInput {
                name: product.name.clone(),
                price,
                stock: product.stock,
            };
            match create_product(input, &deps).await {
                Ok(created) => println!("✓ Created product {} ({})", created.name, created.id),
                Err(e) => println!("  ⊘ Product {}: {}", product.name, e),
            }
        }
    }

    if cli.skip_orders || existing > 0 {
        println!("\nDone.");
        return Ok(());
    }

    // Orders
    for order in seed.orders {
        match seed_order(&order, &deps).await {
            Ok(total) => println!(
                "✓ Created order for {} (total {})",
                order.customer_email, total
            ),
            Err(e) => println!("  ⊘ Order for {}: {:#}", order.customer_email, e),
        }
    }

    println!("\nDone.");
    Ok(())
}

/// Resolve emails and product names to ids, then place the order.
async fn seed_order(order: &SeedOrder, deps: &ServerDeps) -> Result<Decimal> {
    use crm_core::common::ValidatedPaginationArgs;
    use crm_core::domains::customers::models::CustomerFilter;

    let customers = deps
        .store
        .list_customers(
            &CustomerFilter {
                email_icontains: Some(order.customer_email.clone()),
                ..Default::default()
            },
            &ValidatedPaginationArgs::default(),
        )
        .await?;
    let customer = customers
        .items
        .into_iter()
        .find(|c| c.email == order.customer_email)
        .context("customer not found")?;

    let mut product_ids = Vec::with_capacity(order.products.len());
    for name in &order.products {
        let matches = deps
            .store
            .list_products(
                &ProductFilter {
                    name_icontains: Some(name.clone()),
                    ..Default::default()
                },
                Default::default(),
                &ValidatedPaginationArgs::default(),
            )
            .await?;
        let product = matches
            .items
            .into_iter()
            .find(|p| &p.name == name)
            .with_context(|| format!("product {} not found", name))?;
        product_ids.push(product.id.to_string());
    }

    let created = create_order(&customer.id.to_string(), &product_ids, deps).await?;
    Ok(created.total_amount)
}
