//! Customer domain actions - business logic functions
//!
//! Actions are async functions called directly from GraphQL resolvers.
//! They validate input, talk to the store through `ServerDeps` and return models.

mod mutations;
mod queries;

pub use mutations::*;
pub use queries::*;
