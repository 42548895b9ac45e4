use std::sync::Arc;

use super::loaders::DataLoaders;
use crate::kernel::ServerDeps;

/// GraphQL request context
///
/// Contains shared resources available to all resolvers. Built once per
/// request, so the loaders only batch within a single request.
#[derive(Clone)]
pub struct GraphQLContext {
    pub deps: Arc<ServerDeps>,
    pub loaders: Arc<DataLoaders>,
}

impl juniper::Context for GraphQLContext {}

impl GraphQLContext {
    pub fn new(deps: Arc<ServerDeps>) -> Self {
        let loaders = Arc::new(DataLoaders::new(deps.store.clone()));
        Self { deps, loaders }
    }

    pub fn deps(&self) -> &ServerDeps {
        &self.deps
    }
}
