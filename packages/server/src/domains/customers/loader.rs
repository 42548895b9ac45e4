use dataloader::BatchFn;
use std::collections::HashMap;
use std::sync::Arc;

use crate::common::{CustomerId, SharedStoreResult};
use crate::domains::customers::models::Customer;
use crate::kernel::BaseCrmStore;

/// Batches customer lookups by customer ID.
pub struct CustomerLoader {
    pub store: Arc<dyn BaseCrmStore>,
}

impl CustomerLoader {
    pub fn new(store: Arc<dyn BaseCrmStore>) -> Self {
        Self { store }
    }
}

impl BatchFn<CustomerId, SharedStoreResult<Option<Customer>>> for CustomerLoader {
    fn load(
        &mut self,
        keys: &[CustomerId],
    ) -> impl std::future::Future<Output = HashMap<CustomerId, SharedStoreResult<Option<Customer>>>>
    {
        let store = self.store.clone();
        let keys = keys.to_vec();
        async move {
            match store.find_customers_by_ids(&keys).await {
                Ok(customers) => {
                    let mut by_id: HashMap<CustomerId, SharedStoreResult<Option<Customer>>> =
                        keys.iter().map(|id| (*id, Ok(None))).collect();
                    for customer in customers {
                        by_id.insert(customer.id, Ok(Some(customer)));
                    }
                    by_id
                }
                Err(err) => {
                    let err = Arc::new(err);
                    keys.iter().map(|id| (*id, Err(err.clone()))).collect()
                }
            }
        }
    }
}
