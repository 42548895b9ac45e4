// GraphQL schema, context and batch loaders
pub mod context;
pub mod loaders;
pub mod schema;

pub use context::*;
pub use loaders::DataLoaders;
pub use schema::*;
