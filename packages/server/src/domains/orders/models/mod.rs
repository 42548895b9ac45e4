pub mod order;

pub use order::{CreateOrder, Order, OrderFilter, ProductWithOrderId};
