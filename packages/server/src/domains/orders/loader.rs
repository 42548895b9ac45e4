use dataloader::BatchFn;
use std::collections::HashMap;
use std::sync::Arc;

use crate::common::{OrderId, SharedStoreResult};
use crate::domains::products::models::Product;
use crate::kernel::BaseCrmStore;

/// Batches product lookups by order ID.
pub struct OrderProductsLoader {
    pub store: Arc<dyn BaseCrmStore>,
}

impl OrderProductsLoader {
    pub fn new(store: Arc<dyn BaseCrmStore>) -> Self {
        Self { store }
    }
}

impl BatchFn<OrderId, SharedStoreResult<Vec<Product>>> for OrderProductsLoader {
    fn load(
        &mut self,
        keys: &[OrderId],
    ) -> impl std::future::Future<Output = HashMap<OrderId, SharedStoreResult<Vec<Product>>>> {
        let store = self.store.clone();
        let keys = keys.to_vec();
        async move {
            match store.find_products_for_orders(&keys).await {
                Ok(rows) => {
                    let mut products_by_order: HashMap<OrderId, Vec<Product>> = HashMap::new();
                    for row in rows {
                        products_by_order
                            .entry(row.order_id)
                            .or_default()
                            .push(row.product);
                    }
                    // Ensure every requested key has an entry
                    keys.iter()
                        .map(|id| (*id, Ok(products_by_order.remove(id).unwrap_or_default())))
                        .collect()
                }
                Err(err) => {
                    let err = Arc::new(err);
                    keys.iter().map(|id| (*id, Err(err.clone()))).collect()
                }
            }
        }
    }
}
