//! Postgres-backed `BaseCrmStore`.
//!
//! Thin adapter: every method delegates to the model's SQL.

use async_trait::async_trait;
use sqlx::PgPool;

use super::BaseCrmStore;
use crate::common::{CustomerId, OrderId, Page, ProductId, StoreResult, ValidatedPaginationArgs};
use crate::domains::customers::models::{CreateCustomer, Customer, CustomerFilter};
use crate::domains::orders::models::{CreateOrder, Order, OrderFilter, ProductWithOrderId};
use crate::domains::products::models::{CreateProduct, Product, ProductFilter, ProductSort};

#[derive(Clone)]
pub struct PgCrmStore {
    pool: PgPool,
}

impl PgCrmStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl BaseCrmStore for PgCrmStore {
    async fn insert_customer(&self, input: CreateCustomer) -> StoreResult<Customer> {
        Customer::create(input, &self.pool).await
    }

    async fn find_customer(&self, id: CustomerId) -> StoreResult<Option<Customer>> {
        Customer::find_by_id(id, &self.pool).await
    }

    async fn find_customers_by_ids(&self, ids: &[CustomerId]) -> StoreResult<Vec<Customer>> {
        Customer::find_by_ids(ids, &self.pool).await
    }

    async fn customer_email_exists(&self, email: &str) -> StoreResult<bool> {
        Customer::email_exists(email, &self.pool).await
    }

    async fn list_customers(
        &self,
        filter: &CustomerFilter,
        args: &ValidatedPaginationArgs,
    ) -> StoreResult<Page<Customer>> {
        Customer::find_paginated(filter, args, &self.pool).await
    }

    async fn count_customers(&self, filter: &CustomerFilter) -> StoreResult<i64> {
        Customer::count_with_filters(filter, &self.pool).await
    }

    async fn insert_product(&self, input: CreateProduct) -> StoreResult<Product> {
        Product::create(input, &self.pool).await
    }

    async fn find_product(&self, id: ProductId) -> StoreResult<Option<Product>> {
        Product::find_by_id(id, &self.pool).await
    }

    async fn find_products_by_ids(&self, ids: &[ProductId]) -> StoreResult<Vec<Product>> {
        Product::find_by_ids(ids, &self.pool).await
    }

    async fn list_products(
        &self,
        filter: &ProductFilter,
        sort: ProductSort,
        args: &ValidatedPaginationArgs,
    ) -> StoreResult<Page<Product>> {
        Product::find_paginated(filter, sort, args, &self.pool).await
    }

    async fn count_products(&self, filter: &ProductFilter) -> StoreResult<i64> {
        Product::count_with_filters(filter, &self.pool).await
    }

    async fn restock_products_below(
        &self,
        threshold: i32,
        amount: i32,
    ) -> StoreResult<Vec<Product>> {
        Product::restock_below(threshold, amount, &self.pool).await
    }

    async fn insert_order(&self, input: CreateOrder) -> StoreResult<Order> {
        Order::create(input, &self.pool).await
    }

    async fn find_order(&self, id: OrderId) -> StoreResult<Option<Order>> {
        Order::find_by_id(id, &self.pool).await
    }

    async fn find_products_for_orders(
        &self,
        ids: &[OrderId],
    ) -> StoreResult<Vec<ProductWithOrderId>> {
        Order::find_products_for_orders(ids, &self.pool).await
    }

    async fn list_orders(
        &self,
        filter: &OrderFilter,
        args: &ValidatedPaginationArgs,
    ) -> StoreResult<Page<Order>> {
        Order::find_paginated(filter, args, &self.pool).await
    }

    async fn count_orders(&self, filter: &OrderFilter) -> StoreResult<i64> {
        Order::count_with_filters(filter, &self.pool).await
    }

    async fn health_check(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
