//! Server dependencies (using traits for testability)
//!
//! This module provides the central dependency container used by all domain actions.
//! Persistence goes through a trait object so tests can swap in an in-memory store.

use std::sync::Arc;

use sqlx::PgPool;

use super::{BaseCrmStore, PgCrmStore};

// =============================================================================
// ServerDeps
// =============================================================================

/// Server dependencies accessible to actions and resolvers
#[derive(Clone)]
pub struct ServerDeps {
    pub store: Arc<dyn BaseCrmStore>,
}

impl ServerDeps {
    pub fn new(store: Arc<dyn BaseCrmStore>) -> Self {
        Self { store }
    }

    /// Dependencies backed by Postgres.
    pub fn postgres(pool: PgPool) -> Self {
        Self::new(Arc::new(PgCrmStore::new(pool)))
    }
}
