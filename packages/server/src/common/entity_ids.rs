//! Typed ID definitions for the CRM entities.

pub use super::id::Id;

/// Marker type for Customer entities.
pub struct Customer;

/// Marker type for Product entities.
pub struct Product;

/// Marker type for Order entities.
pub struct Order;

pub type CustomerId = Id<Customer>;

pub type ProductId = Id<Product>;

pub type OrderId = Id<Order>;
