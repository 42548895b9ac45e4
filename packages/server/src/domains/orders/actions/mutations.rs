//! Order mutation actions

use std::collections::{HashMap, HashSet};

use rust_decimal::Decimal;
use tracing::info;

use crate::common::validation::validate_order_total;
use crate::common::{CrmError, CrmResult, CustomerId, ProductId};
use crate::domains::customers::data::CustomerData;
use crate::domains::orders::data::OrderData;
use crate::domains::orders::models::CreateOrder;
use crate::domains::products::data::ProductData;
use crate::domains::products::models::Product;
use crate::kernel::ServerDeps;

/// Parsed product references: distinct ids in first-seen order, plus the
/// raw strings that were not ids at all.
#[derive(Debug, Default)]
struct ProductRefs {
    ids: Vec<ProductId>,
    malformed: Vec<String>,
}

fn parse_product_refs(raw_ids: &[String]) -> ProductRefs {
    let mut refs = ProductRefs::default();
    let mut seen = HashSet::new();
    for raw in raw_ids {
        match ProductId::parse(raw) {
            Ok(id) => {
                if seen.insert(id) {
                    refs.ids.push(id);
                }
            }
            Err(_) => {
                if !refs.malformed.contains(raw) {
                    refs.malformed.push(raw.clone());
                }
            }
        }
    }
    refs
}

/// Exact decimal sum of the prices.
pub fn order_total(products: &[Product]) -> Decimal {
    products.iter().map(|p| p.price).sum()
}

/// Place an order for an existing customer over existing products.
///
/// Every missing or malformed product ID is reported at once. Duplicate IDs
/// are collapsed. The total is fixed from the prices read here.
pub async fn create_order(
    customer_id: &str,
    product_ids: &[String],
    deps: &ServerDeps,
) -> CrmResult<OrderData> {
    let customer_not_found = || CrmError::not_found(format!("customer not found: {}", customer_id));

    let customer_id = CustomerId::parse(customer_id).map_err(|_| customer_not_found())?;
    let customer = deps
        .store
        .find_customer(customer_id)
        .await?
        .ok_or_else(customer_not_found)?;

    if product_ids.is_empty() {
        return Err(CrmError::validation(
            "productIds",
            "at least one product is required",
        ));
    }

    let refs = parse_product_refs(product_ids);
    let found = deps.store.find_products_by_ids(&refs.ids).await?;
    let mut by_id: HashMap<ProductId, Product> = found.into_iter().map(|p| (p.id, p)).collect();

    let mut missing: Vec<String> = Vec::new();
    let mut products = Vec::with_capacity(refs.ids.len());
    for id in &refs.ids {
        match by_id.remove(id) {
            Some(product) => products.push(product),
            None => missing.push(id.to_string()),
        }
    }
    missing.extend(refs.malformed);

    if !missing.is_empty() {
        return Err(CrmError::not_found(format!(
            "product not found: {}",
            missing.join(", ")
        )));
    }

    let total_amount = validate_order_total(order_total(&products))?;

    info!(
        customer_id = %customer.id,
        products = products.len(),
        total_amount = %total_amount,
        "Creating order"
    );

    let order = deps
        .store
        .insert_order(CreateOrder {
            customer_id: customer.id,
            product_ids: products.iter().map(|p| p.id).collect(),
            total_amount,
        })
        .await?;

    info!(order_id = %order.id, "Order created");

    Ok(OrderData::from(order).with_relations(
        CustomerData::from(customer),
        products.into_iter().map(ProductData::from).collect(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::customers::actions::create_customer;
    use crate::domains::customers::data::CustomerInput;
    use crate::domains::products::actions::create_product;
    use crate::domains::products::data::ProductInput;
    use crate::domains::products::models::CreateProduct;
    use crate::kernel::{BaseCrmStore, TestDependencies};

    async fn customer(deps: &ServerDeps) -> String {
        create_customer(
            CustomerInput {
                name: "Alice".to_string(),
                email: "alice@example.com".to_string(),
                phone: None,
            },
            deps,
        )
        .await
        .unwrap()
        .id
        .to_string()
    }

    async fn product(deps: &ServerDeps, name: &str, cents: i64) -> String {
        create_product(
            ProductInput {
                name: name.to_string(),
                price: Decimal::new(cents, 2),
                stock: Some(5),
            },
            deps,
        )
        .await
        .unwrap()
        .id
        .to_string()
    }

    #[tokio::test]
    async fn total_is_exact_sum_of_prices() {
        let deps = TestDependencies::new().into_server_deps();
        let customer_id = customer(&deps).await;
        let laptop = product(&deps, "Laptop", 249999).await;
        let mouse = product(&deps, "Mouse", 9999).await;

        let order = create_order(&customer_id, &[laptop, mouse], &deps)
            .await
            .unwrap();

        assert_eq!(order.total_amount, Decimal::new(259998, 2));
        assert_eq!(order.total_amount.to_string(), "2599.98");
        assert_eq!(order.customer.as_ref().unwrap().name, "Alice");
        let names: Vec<_> = order
            .products
            .as_ref()
            .unwrap()
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(names, ["Laptop", "Mouse"]);
    }

    #[tokio::test]
    async fn duplicate_products_count_once() {
        let deps = TestDependencies::new().into_server_deps();
        let customer_id = customer(&deps).await;
        let mouse = product(&deps, "Mouse", 9999).await;

        let order = create_order(&customer_id, &[mouse.clone(), mouse], &deps)
            .await
            .unwrap();

        assert_eq!(order.total_amount, Decimal::new(9999, 2));
        assert_eq!(order.products.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn unknown_customer_persists_nothing() {
        let test_deps = TestDependencies::new();
        let deps = test_deps.into_server_deps();
        let mouse = product(&deps, "Mouse", 9999).await;
        let ghost = CustomerId::new().to_string();

        let err = create_order(&ghost, &[mouse], &deps).await.unwrap_err();

        assert_eq!(err.code(), "NOT_FOUND");
        assert_eq!(err.to_string(), format!("customer not found: {}", ghost));
        assert_eq!(test_deps.store.order_count(), 0);
    }

    #[tokio::test]
    async fn all_missing_products_are_listed() {
        let test_deps = TestDependencies::new();
        let deps = test_deps.into_server_deps();
        let customer_id = customer(&deps).await;
        let mouse = product(&deps, "Mouse", 9999).await;
        let ghost = ProductId::new().to_string();

        let err = create_order(
            &customer_id,
            &[mouse, ghost.clone(), "bogus".to_string()],
            &deps,
        )
        .await
        .unwrap_err();

        assert_eq!(
            err.to_string(),
            format!("product not found: {}, bogus", ghost)
        );
        assert_eq!(test_deps.store.order_count(), 0);
    }

    #[tokio::test]
    async fn empty_product_list_is_rejected() {
        let deps = TestDependencies::new().into_server_deps();
        let customer_id = customer(&deps).await;

        let err = create_order(&customer_id, &[], &deps).await.unwrap_err();

        assert_eq!(err.to_string(), "at least one product is required");
        assert_eq!(err.code(), "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn total_beyond_column_range_is_rejected() {
        let test_deps = TestDependencies::new();
        let deps = test_deps.into_server_deps();
        let customer_id = customer(&deps).await;

        // 101 products at the highest storable price sum past 10^12
        let mut product_ids = Vec::new();
        for i in 0..101 {
            let product = test_deps
                .store
                .insert_product(CreateProduct {
                    name: format!("Yacht {}", i),
                    price: Decimal::new(999_999_999_999, 2),
                    stock: 1,
                })
                .await
                .unwrap();
            product_ids.push(product.id.to_string());
        }

        let err = create_order(&customer_id, &product_ids, &deps)
            .await
            .unwrap_err();

        assert_eq!(err.code(), "VALIDATION_ERROR");
        assert_eq!(err.to_string(), "order total must be less than 1000000000000");
        assert_eq!(test_deps.store.order_count(), 0);
    }
}
