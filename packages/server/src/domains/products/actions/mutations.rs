use tracing::info;

use crate::common::validation::{validate_name, validate_price, validate_stock};
use crate::common::CrmResult;
use crate::domains::products::data::ProductInput;
use crate::domains::products::models::{CreateProduct, Product, RESTOCK_AMOUNT};
use crate::kernel::ServerDeps;

/// Threshold used by `updateLowStockProducts` when none is given.
pub const DEFAULT_LOW_STOCK_THRESHOLD: i32 = 10;

pub fn validate_product(input: ProductInput) -> CrmResult<CreateProduct> {
    Ok(CreateProduct {
        name: validate_name("name", &input.name)?,
        price: validate_price(input.price)?,
        stock: validate_stock(input.stock)?,
    })
}

pub async fn create_product(input: ProductInput, deps: &ServerDeps) -> CrmResult<Product> {
    let new_product = validate_product(input)?;

    info!(name = %new_product.name, price = %new_product.price, "Creating product");

    let product = deps.store.insert_product(new_product).await?;

    info!(product_id = %product.id, "Product created");

    Ok(product)
}

/// Restock every product whose stock is below `threshold` by `RESTOCK_AMOUNT`.
///
/// Returns the updated products and a summary message.
pub async fn update_low_stock_products(
    threshold: i32,
    deps: &ServerDeps,
) -> CrmResult<(Vec<Product>, String)> {
    info!(threshold, amount = RESTOCK_AMOUNT, "Restocking low-stock products");

    let updated = deps
        .store
        .restock_products_below(threshold, RESTOCK_AMOUNT)
        .await?;

    let message = format!(
        "Updated {} low-stock products (threshold: {}).",
        updated.len(),
        threshold
    );
    info!(updated = updated.len(), "Restock finished");

    Ok((updated, message))
}
