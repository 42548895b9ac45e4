use dataloader::non_cached::Loader;
use std::sync::Arc;

use crate::common::{CustomerId, OrderId, SharedStoreResult};
use crate::domains::customers::loader::CustomerLoader;
use crate::domains::customers::models::Customer;
use crate::domains::orders::loader::OrderProductsLoader;
use crate::domains::products::models::Product;
use crate::kernel::BaseCrmStore;

pub struct DataLoaders {
    pub customer: Loader<CustomerId, SharedStoreResult<Option<Customer>>, CustomerLoader>,
    pub order_products: Loader<OrderId, SharedStoreResult<Vec<Product>>, OrderProductsLoader>,
}

impl DataLoaders {
    pub fn new(store: Arc<dyn BaseCrmStore>) -> Self {
        Self {
            customer: Loader::new(CustomerLoader::new(store.clone())),
            order_products: Loader::new(OrderProductsLoader::new(store)),
        }
    }
}
