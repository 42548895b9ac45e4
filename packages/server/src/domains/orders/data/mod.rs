pub mod order;

pub use order::{CreateOrderPayload, OrderConnection, OrderData, OrderEdge, OrderFilterInput};
