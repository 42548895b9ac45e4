//! Products domain - catalog entries, pricing and stock

pub mod actions;
pub mod data;
pub mod models;

pub use data::{ProductConnection, ProductData};
pub use models::{Product, ProductFilter, ProductSort};
