//! Customers domain - customer records, single and bulk creation

pub mod actions;
pub mod data;
pub mod loader;
pub mod models;

pub use data::{CustomerConnection, CustomerData};
pub use models::{Customer, CustomerFilter};
