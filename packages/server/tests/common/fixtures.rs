//! Test fixtures for creating test data.
//!
//! These fixtures go through the store directly, skipping the GraphQL layer.

#![allow(dead_code)]

use anyhow::Result;
use crm_core::domains::customers::models::{CreateCustomer, Customer};
use crm_core::domains::products::models::{CreateProduct, Product};
use crm_core::kernel::ServerDeps;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Create a customer without a phone number
pub async fn create_test_customer(deps: &ServerDeps, name: &str, email: &str) -> Result<Customer> {
    let customer = deps
        .store
        .insert_customer(CreateCustomer {
            name: name.to_string(),
            email: email.to_string(),
            phone: None,
        })
        .await?;
    Ok(customer)
}

/// Create a product; `price` is a decimal string such as "2499.99"
pub async fn create_test_product(
    deps: &ServerDeps,
    name: &str,
    price: &str,
    stock: i32,
) -> Result<Product> {
    let product = deps
        .store
        .insert_product(CreateProduct {
            name: name.to_string(),
            price: Decimal::from_str(price)?,
            stock,
        })
        .await?;
    Ok(product)
}
