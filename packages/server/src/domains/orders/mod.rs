//! Orders domain - orders placed by customers over a set of products

pub mod actions;
pub mod data;
pub mod loader;
pub mod models;

pub use data::{OrderConnection, OrderData};
pub use models::{Order, OrderFilter};
