use tracing::info;

use crate::common::{build_page_info, CrmResult, Cursor, ProductId, ValidatedPaginationArgs};
use crate::domains::products::data::{ProductConnection, ProductData, ProductEdge};
use crate::domains::products::models::{Product, ProductFilter, ProductSort};
use crate::kernel::ServerDeps;

/// Get a single product by ID. A malformed ID finds nothing.
pub async fn get_product(product_id: &str, deps: &ServerDeps) -> CrmResult<Option<Product>> {
    let Ok(id) = ProductId::parse(product_id) else {
        return Ok(None);
    };
    Ok(deps.store.find_product(id).await?)
}

/// Get paginated products, keyed on `(sort key, id)`
pub async fn get_products_paginated(
    filter: &ProductFilter,
    sort: ProductSort,
    args: &ValidatedPaginationArgs,
    deps: &ServerDeps,
) -> CrmResult<ProductConnection> {
    info!(filter = ?filter, sort = ?sort, limit = args.limit, "Listing products");

    let page = deps.store.list_products(filter, sort, args).await?;
    let total_count = deps.store.count_products(filter).await? as i32;

    let edges: Vec<ProductEdge> = page
        .items
        .into_iter()
        .map(|product| {
            let cursor = Cursor::encode_uuid(product.id.into_uuid());
            ProductEdge {
                node: ProductData::from(product),
                cursor,
            }
        })
        .collect();

    let page_info = build_page_info(
        page.has_more,
        args,
        edges.first().map(|e| e.cursor.clone()),
        edges.last().map(|e| e.cursor.clone()),
    );

    Ok(ProductConnection {
        edges,
        page_info,
        total_count,
    })
}
