//! Order data types for GraphQL.

use chrono::{DateTime, Utc};
use juniper::{FieldResult, GraphQLInputObject, ID};
use rust_decimal::Decimal;

use crate::common::{CrmError, CustomerId, OrderId, PageInfo};
use crate::domains::customers::data::CustomerData;
use crate::domains::orders::models::{Order, OrderFilter};
use crate::domains::products::data::ProductData;
use crate::server::graphql::context::GraphQLContext;
use crate::server::graphql::schema::{shared_store_error, to_field_error};

/// GraphQL-friendly representation of an order
///
/// `customer` and `products` go through the request's batch loaders unless
/// the order was built with them already attached (as `createOrder` does).
#[derive(Debug, Clone)]
pub struct OrderData {
    pub id: OrderId,
    pub customer_id: CustomerId,
    pub total_amount: Decimal,
    pub order_date: DateTime<Utc>,
    pub customer: Option<CustomerData>,
    pub products: Option<Vec<ProductData>>,
}

impl From<Order> for OrderData {
    fn from(order: Order) -> Self {
        Self {
            id: order.id,
            customer_id: order.customer_id,
            total_amount: order.total_amount,
            order_date: order.order_date,
            customer: None,
            products: None,
        }
    }
}

impl OrderData {
    pub fn with_relations(mut self, customer: CustomerData, products: Vec<ProductData>) -> Self {
        self.customer = Some(customer);
        self.products = Some(products);
        self
    }
}

#[juniper::graphql_object(name = "Order", Context = GraphQLContext)]
impl OrderData {
    fn id(&self) -> ID {
        self.id.to_graphql()
    }

    /// Sum of product prices when the order was placed
    fn total_amount(&self) -> Decimal {
        self.total_amount
    }

    fn order_date(&self) -> DateTime<Utc> {
        self.order_date
    }

    async fn customer(&self, context: &GraphQLContext) -> FieldResult<CustomerData> {
        if let Some(customer) = &self.customer {
            return Ok(customer.clone());
        }
        let customer = context
            .loaders
            .customer
            .load(self.customer_id)
            .await
            .map_err(shared_store_error)?
            .ok_or_else(|| {
                to_field_error(CrmError::not_found(format!(
                    "customer not found: {}",
                    self.customer_id
                )))
            })?;
        Ok(CustomerData::from(customer))
    }

    /// Products on the order, in the order they were listed
    async fn products(&self, context: &GraphQLContext) -> FieldResult<Vec<ProductData>> {
        if let Some(products) = &self.products {
            return Ok(products.clone());
        }
        let products = context
            .loaders
            .order_products
            .load(self.id)
            .await
            .map_err(shared_store_error)?;
        Ok(products.into_iter().map(ProductData::from).collect())
    }
}

// ============================================================================
// Inputs
// ============================================================================

#[derive(Debug, Clone, Default, GraphQLInputObject)]
pub struct OrderFilterInput {
    /// Case-insensitive substring of the customer's name
    pub customer_name_icontains: Option<String>,
    /// Case-insensitive substring of any product's name on the order
    pub product_name_icontains: Option<String>,
    pub total_amount_gte: Option<Decimal>,
    pub total_amount_lte: Option<Decimal>,
    pub order_date_gte: Option<DateTime<Utc>>,
    pub order_date_lte: Option<DateTime<Utc>>,
}

impl From<OrderFilterInput> for OrderFilter {
    fn from(input: OrderFilterInput) -> Self {
        Self {
            customer_name_icontains: input.customer_name_icontains,
            product_name_icontains: input.product_name_icontains,
            total_amount_gte: input.total_amount_gte,
            total_amount_lte: input.total_amount_lte,
            order_date_gte: input.order_date_gte,
            order_date_lte: input.order_date_lte,
        }
    }
}

// ============================================================================
// Mutation payloads
// ============================================================================

#[derive(Debug, Clone)]
pub struct CreateOrderPayload {
    pub order: OrderData,
}

#[juniper::graphql_object(Context = GraphQLContext)]
impl CreateOrderPayload {
    fn order(&self) -> &OrderData {
        &self.order
    }
}

// ============================================================================
// Relay Pagination Types
// ============================================================================

#[derive(Debug, Clone)]
pub struct OrderEdge {
    pub node: OrderData,
    pub cursor: String,
}

#[juniper::graphql_object(Context = GraphQLContext)]
impl OrderEdge {
    fn node(&self) -> &OrderData {
        &self.node
    }
    fn cursor(&self) -> &str {
        &self.cursor
    }
}

#[derive(Debug, Clone)]
pub struct OrderConnection {
    pub edges: Vec<OrderEdge>,
    pub page_info: PageInfo,
    pub total_count: i32,
}

#[juniper::graphql_object(Context = GraphQLContext)]
impl OrderConnection {
    fn edges(&self) -> &[OrderEdge] {
        &self.edges
    }
    fn page_info(&self) -> &PageInfo {
        &self.page_info
    }
    fn total_count(&self) -> i32 {
        self.total_count
    }
    fn nodes(&self) -> Vec<&OrderData> {
        self.edges.iter().map(|e| &e.node).collect()
    }
}
