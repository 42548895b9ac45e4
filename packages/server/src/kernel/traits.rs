// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Validation, duplicate detection and order totals live in the domain actions.
//
// Naming convention: Base* for trait names (e.g., BaseCrmStore)

use async_trait::async_trait;

use crate::common::{CustomerId, OrderId, Page, ProductId, StoreResult, ValidatedPaginationArgs};
use crate::domains::customers::models::{CreateCustomer, Customer, CustomerFilter};
use crate::domains::orders::models::{CreateOrder, Order, OrderFilter, ProductWithOrderId};
use crate::domains::products::models::{CreateProduct, Product, ProductFilter, ProductSort};

// =============================================================================
// CRM Store Trait (Infrastructure - persistence of customers/products/orders)
// =============================================================================

/// Durable storage for CRM entities.
///
/// Every write is committed before the call returns; there is no
/// caller-visible transaction spanning several calls.
#[async_trait]
pub trait BaseCrmStore: Send + Sync {
    // ---- customers ----

    /// Insert a customer. A duplicate email must fail with
    /// `StoreError::UniqueViolation`.
    async fn insert_customer(&self, input: CreateCustomer) -> StoreResult<Customer>;

    async fn find_customer(&self, id: CustomerId) -> StoreResult<Option<Customer>>;

    /// Customers with the given ids; unknown ids are skipped.
    async fn find_customers_by_ids(&self, ids: &[CustomerId]) -> StoreResult<Vec<Customer>>;

    async fn customer_email_exists(&self, email: &str) -> StoreResult<bool>;

    /// Customers in creation order.
    async fn list_customers(
        &self,
        filter: &CustomerFilter,
        args: &ValidatedPaginationArgs,
    ) -> StoreResult<Page<Customer>>;

    async fn count_customers(&self, filter: &CustomerFilter) -> StoreResult<i64>;

    // ---- products ----

    async fn insert_product(&self, input: CreateProduct) -> StoreResult<Product>;

    async fn find_product(&self, id: ProductId) -> StoreResult<Option<Product>>;

    /// Products with the given ids; unknown ids are skipped.
    async fn find_products_by_ids(&self, ids: &[ProductId]) -> StoreResult<Vec<Product>>;

    async fn list_products(
        &self,
        filter: &ProductFilter,
        sort: ProductSort,
        args: &ValidatedPaginationArgs,
    ) -> StoreResult<Page<Product>>;

    async fn count_products(&self, filter: &ProductFilter) -> StoreResult<i64>;

    /// Add `amount` to the stock of every product whose stock is below `threshold`.
    async fn restock_products_below(&self, threshold: i32, amount: i32)
        -> StoreResult<Vec<Product>>;

    // ---- orders ----

    /// Insert an order and its product links atomically.
    async fn insert_order(&self, input: CreateOrder) -> StoreResult<Order>;

    async fn find_order(&self, id: OrderId) -> StoreResult<Option<Order>>;

    /// Products attached to each of the given orders, grouped by order and
    /// in the order they were listed.
    async fn find_products_for_orders(
        &self,
        ids: &[OrderId],
    ) -> StoreResult<Vec<ProductWithOrderId>>;

    /// Orders in placement order.
    async fn list_orders(
        &self,
        filter: &OrderFilter,
        args: &ValidatedPaginationArgs,
    ) -> StoreResult<Page<Order>>;

    async fn count_orders(&self, filter: &OrderFilter) -> StoreResult<i64>;

    // ---- infrastructure ----

    /// Liveness check of the backing store.
    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }
}
