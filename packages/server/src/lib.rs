// CRM API - Core
//
// GraphQL API over customers, products and orders, backed by Postgres.
// Each domain keeps its models (SQL), data (GraphQL types) and actions
// (business logic) under domains/*/.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
