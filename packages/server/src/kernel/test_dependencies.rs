// In-memory CRM store for tests
//
// Mirrors the Postgres store's observable behaviour (unique emails, keyset
// pagination, restock) so actions and resolvers can be tested without Docker.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

use super::{BaseCrmStore, ServerDeps};
use crate::common::{
    trim_results, CustomerId, OrderId, Page, PaginationDirection, ProductId, StoreError,
    StoreResult, ValidatedPaginationArgs,
};
use crate::domains::customers::models::{CreateCustomer, Customer, CustomerFilter};
use crate::domains::orders::models::{CreateOrder, Order, OrderFilter, ProductWithOrderId};
use crate::domains::products::models::{CreateProduct, Product, ProductFilter, ProductSort};

/// Constraint name reported for duplicate emails, same as the Postgres schema.
pub const EMAIL_UNIQUE_CONSTRAINT: &str = "customers_email_key";

#[derive(Default)]
struct State {
    customers: Vec<Customer>,
    products: Vec<Product>,
    orders: Vec<Order>,
    order_products: HashMap<OrderId, Vec<ProductId>>,
}

impl State {
    fn customer(&self, id: CustomerId) -> Option<&Customer> {
        self.customers.iter().find(|c| c.id == id)
    }

    fn product(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    fn products_of(&self, order_id: OrderId) -> Vec<Product> {
        self.order_products
            .get(&order_id)
            .map(|ids| ids.iter().filter_map(|id| self.product(*id).cloned()).collect())
            .unwrap_or_default()
    }

    fn order_matches(&self, filter: &OrderFilter, order: &Order) -> bool {
        let customer_name = self
            .customer(order.customer_id)
            .map(|c| c.name.as_str())
            .unwrap_or_default();
        let products = self.products_of(order.id);
        let product_names: Vec<&str> = products.iter().map(|p| p.name.as_str()).collect();
        filter.matches(order, customer_name, &product_names)
    }
}

/// Mutex-guarded `BaseCrmStore` holding everything in memory.
#[derive(Default)]
pub struct InMemoryCrmStore {
    state: Mutex<State>,
    fail_writes: Mutex<bool>,
    batch_lookups: AtomicUsize,
}

impl InMemoryCrmStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write fail with an internal store error.
    pub fn fail_writes(&self) {
        if let Ok(mut flag) = self.fail_writes.lock() {
            *flag = true;
        }
    }

    /// Calls made to `find_customers_by_ids` and `find_products_for_orders`.
    pub fn batch_lookups(&self) -> usize {
        self.batch_lookups.load(Ordering::SeqCst)
    }

    pub fn customer_count(&self) -> usize {
        self.state.lock().map(|s| s.customers.len()).unwrap_or(0)
    }

    pub fn order_count(&self) -> usize {
        self.state.lock().map(|s| s.orders.len()).unwrap_or(0)
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, State>> {
        self.state
            .lock()
            .map_err(|_| StoreError::Internal(anyhow::anyhow!("in-memory store poisoned")))
    }

    fn lock_for_write(&self) -> StoreResult<MutexGuard<'_, State>> {
        let failing = self.fail_writes.lock().map(|flag| *flag).unwrap_or(true);
        if failing {
            return Err(StoreError::Internal(anyhow::anyhow!(
                "in-memory store rejected write"
            )));
        }
        self.lock()
    }
}

/// Keyset pagination over rows already sorted in display order.
///
/// An unknown cursor yields an empty page, like the SQL subselect does.
fn paginate<T: Clone>(
    sorted: &[T],
    key: impl Fn(&T) -> Uuid,
    args: &ValidatedPaginationArgs,
) -> Page<T> {
    let window: Vec<T> = match args.cursor {
        None => sorted.to_vec(),
        Some(cursor) => match sorted.iter().position(|row| key(row) == cursor) {
            Some(pos) => match args.direction {
                PaginationDirection::Forward => sorted[pos + 1..].to_vec(),
                PaginationDirection::Backward => sorted[..pos].to_vec(),
            },
            None => return Page::empty(),
        },
    };

    let fetch = usize::try_from(args.fetch_limit()).unwrap_or(usize::MAX);
    let rows: Vec<T> = match args.direction {
        PaginationDirection::Forward => window.into_iter().take(fetch).collect(),
        PaginationDirection::Backward => window.into_iter().rev().take(fetch).collect(),
    };
    trim_results(rows, args)
}

#[async_trait]
impl BaseCrmStore for InMemoryCrmStore {
    async fn insert_customer(&self, input: CreateCustomer) -> StoreResult<Customer> {
        let mut state = self.lock_for_write()?;
        if state.customers.iter().any(|c| c.email == input.email) {
            return Err(StoreError::UniqueViolation {
                constraint: EMAIL_UNIQUE_CONSTRAINT.to_string(),
            });
        }
        let customer = Customer {
            id: CustomerId::new(),
            name: input.name,
            email: input.email,
            phone: input.phone,
            created_at: Utc::now(),
        };
        state.customers.push(customer.clone());
        Ok(customer)
    }

    async fn find_customer(&self, id: CustomerId) -> StoreResult<Option<Customer>> {
        Ok(self.lock()?.customer(id).cloned())
    }

    async fn find_customers_by_ids(&self, ids: &[CustomerId]) -> StoreResult<Vec<Customer>> {
        self.batch_lookups.fetch_add(1, Ordering::SeqCst);
        let state = self.lock()?;
        Ok(state
            .customers
            .iter()
            .filter(|c| ids.contains(&c.id))
            .cloned()
            .collect())
    }

    async fn customer_email_exists(&self, email: &str) -> StoreResult<bool> {
        Ok(self.lock()?.customers.iter().any(|c| c.email == email))
    }

    async fn list_customers(
        &self,
        filter: &CustomerFilter,
        args: &ValidatedPaginationArgs,
    ) -> StoreResult<Page<Customer>> {
        let state = self.lock()?;
        let mut rows: Vec<Customer> = state
            .customers
            .iter()
            .filter(|c| filter.matches(c))
            .cloned()
            .collect();
        rows.sort_by_key(|c| c.id);
        Ok(paginate(&rows, |c| c.id.into_uuid(), args))
    }

    async fn count_customers(&self, filter: &CustomerFilter) -> StoreResult<i64> {
        let state = self.lock()?;
        Ok(state.customers.iter().filter(|c| filter.matches(c)).count() as i64)
    }

    async fn insert_product(&self, input: CreateProduct) -> StoreResult<Product> {
        let mut state = self.lock_for_write()?;
        let product = Product {
            id: ProductId::new(),
            name: input.name,
            price: input.price,
            stock: input.stock,
            created_at: Utc::now(),
        };
        state.products.push(product.clone());
        Ok(product)
    }

    async fn find_product(&self, id: ProductId) -> StoreResult<Option<Product>> {
        Ok(self.lock()?.product(id).cloned())
    }

    async fn find_products_by_ids(&self, ids: &[ProductId]) -> StoreResult<Vec<Product>> {
        let state = self.lock()?;
        Ok(state
            .products
            .iter()
            .filter(|p| ids.contains(&p.id))
            .cloned()
            .collect())
    }

    async fn list_products(
        &self,
        filter: &ProductFilter,
        sort: ProductSort,
        args: &ValidatedPaginationArgs,
    ) -> StoreResult<Page<Product>> {
        let state = self.lock()?;
        let mut rows: Vec<Product> = state
            .products
            .iter()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect();
        rows.sort_by(|a, b| sort.compare(a, b));
        Ok(paginate(&rows, |p| p.id.into_uuid(), args))
    }

    async fn count_products(&self, filter: &ProductFilter) -> StoreResult<i64> {
        let state = self.lock()?;
        Ok(state.products.iter().filter(|p| filter.matches(p)).count() as i64)
    }

    async fn restock_products_below(
        &self,
        threshold: i32,
        amount: i32,
    ) -> StoreResult<Vec<Product>> {
        let mut state = self.lock_for_write()?;
        let mut updated = Vec::new();
        for product in state.products.iter_mut().filter(|p| p.stock < threshold) {
            if let Some(stock) = product.stock.checked_add(amount) {
                product.stock = stock;
                updated.push(product.clone());
            }
        }
        updated.sort_by_key(|p| p.id);
        Ok(updated)
    }

    async fn insert_order(&self, input: CreateOrder) -> StoreResult<Order> {
        let mut state = self.lock_for_write()?;
        if state.customer(input.customer_id).is_none() {
            return Err(StoreError::Internal(anyhow::anyhow!(
                "orders_customer_id_fkey violated"
            )));
        }
        let order = Order {
            id: OrderId::new(),
            customer_id: input.customer_id,
            total_amount: input.total_amount,
            order_date: Utc::now(),
        };
        state.orders.push(order.clone());
        state.order_products.insert(order.id, input.product_ids);
        Ok(order)
    }

    async fn find_order(&self, id: OrderId) -> StoreResult<Option<Order>> {
        Ok(self.lock()?.orders.iter().find(|o| o.id == id).cloned())
    }

    async fn find_products_for_orders(
        &self,
        ids: &[OrderId],
    ) -> StoreResult<Vec<ProductWithOrderId>> {
        self.batch_lookups.fetch_add(1, Ordering::SeqCst);
        let state = self.lock()?;
        Ok(ids
            .iter()
            .flat_map(|order_id| {
                state
                    .products_of(*order_id)
                    .into_iter()
                    .map(move |product| ProductWithOrderId {
                        order_id: *order_id,
                        product,
                    })
            })
            .collect())
    }

    async fn list_orders(
        &self,
        filter: &OrderFilter,
        args: &ValidatedPaginationArgs,
    ) -> StoreResult<Page<Order>> {
        let state = self.lock()?;
        let mut rows: Vec<Order> = state
            .orders
            .iter()
            .filter(|o| state.order_matches(filter, o))
            .cloned()
            .collect();
        rows.sort_by_key(|o| o.id);
        Ok(paginate(&rows, |o| o.id.into_uuid(), args))
    }

    async fn count_orders(&self, filter: &OrderFilter) -> StoreResult<i64> {
        let state = self.lock()?;
        Ok(state
            .orders
            .iter()
            .filter(|o| state.order_matches(filter, o))
            .count() as i64)
    }
}

// =============================================================================
// TestDependencies
// =============================================================================

/// Bundles an in-memory store with the `ServerDeps` that wrap it.
///
/// Keeps a typed handle to the store so tests can inspect it directly.
pub struct TestDependencies {
    pub store: Arc<InMemoryCrmStore>,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self {
            store: Arc::new(InMemoryCrmStore::new()),
        }
    }

    pub fn into_server_deps(&self) -> ServerDeps {
        ServerDeps::new(self.store.clone())
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}
