//! Product data types for GraphQL.

use chrono::{DateTime, Utc};
use juniper::{GraphQLEnum, GraphQLInputObject, ID};
use rust_decimal::Decimal;

use crate::common::{PageInfo, ProductId};
use crate::domains::products::models::{
    Product, ProductFilter, ProductSort, ProductSortField, SortDirection,
};
use crate::server::graphql::context::GraphQLContext;

/// GraphQL-friendly representation of a product
#[derive(Debug, Clone)]
pub struct ProductData {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub stock: i32,
    pub created_at: DateTime<Utc>,
}

impl From<Product> for ProductData {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            price: product.price,
            stock: product.stock,
            created_at: product.created_at,
        }
    }
}

#[juniper::graphql_object(name = "Product", Context = GraphQLContext)]
impl ProductData {
    fn id(&self) -> ID {
        self.id.to_graphql()
    }

    fn name(&self) -> &str {
        &self.name
    }

    /// Unit price, serialized as an exact decimal string
    fn price(&self) -> Decimal {
        self.price
    }

    fn stock(&self) -> i32 {
        self.stock
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

// ============================================================================
// Inputs
// ============================================================================

#[derive(Debug, Clone, GraphQLInputObject)]
pub struct ProductInput {
    pub name: String,
    pub price: Decimal,
    /// Defaults to 0
    pub stock: Option<i32>,
}

#[derive(Debug, Clone, Default, GraphQLInputObject)]
pub struct ProductFilterInput {
    pub name_icontains: Option<String>,
    pub price_gte: Option<Decimal>,
    pub price_lte: Option<Decimal>,
    pub stock_gte: Option<i32>,
    pub stock_lte: Option<i32>,
}

impl From<ProductFilterInput> for ProductFilter {
    fn from(input: ProductFilterInput) -> Self {
        Self {
            name_icontains: input.name_icontains,
            price_gte: input.price_gte,
            price_lte: input.price_lte,
            stock_gte: input.stock_gte,
            stock_lte: input.stock_lte,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, GraphQLEnum)]
pub enum ProductOrderField {
    Name,
    Price,
    Stock,
    CreatedAt,
}

impl From<ProductOrderField> for ProductSortField {
    fn from(field: ProductOrderField) -> Self {
        match field {
            ProductOrderField::Name => ProductSortField::Name,
            ProductOrderField::Price => ProductSortField::Price,
            ProductOrderField::Stock => ProductSortField::Stock,
            ProductOrderField::CreatedAt => ProductSortField::CreatedAt,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, GraphQLEnum)]
pub enum OrderDirection {
    Asc,
    Desc,
}

impl From<OrderDirection> for SortDirection {
    fn from(direction: OrderDirection) -> Self {
        match direction {
            OrderDirection::Asc => SortDirection::Asc,
            OrderDirection::Desc => SortDirection::Desc,
        }
    }
}

/// Sort for `allProducts`; ties are broken by id.
#[derive(Debug, Clone, GraphQLInputObject)]
pub struct ProductOrderBy {
    pub field: ProductOrderField,
    pub direction: Option<OrderDirection>,
}

impl From<ProductOrderBy> for ProductSort {
    fn from(order_by: ProductOrderBy) -> Self {
        Self {
            field: order_by.field.into(),
            direction: order_by.direction.map(Into::into).unwrap_or_default(),
        }
    }
}

// ============================================================================
// Mutation payloads
// ============================================================================

#[derive(Debug, Clone)]
pub struct CreateProductPayload {
    pub product: ProductData,
}

#[juniper::graphql_object(Context = GraphQLContext)]
impl CreateProductPayload {
    fn product(&self) -> &ProductData {
        &self.product
    }
}

#[derive(Debug, Clone)]
pub struct UpdateLowStockProductsPayload {
    pub updated_products: Vec<ProductData>,
    pub message: String,
}

#[juniper::graphql_object(Context = GraphQLContext)]
impl UpdateLowStockProductsPayload {
    /// Products after restocking
    fn updated_products(&self) -> &[ProductData] {
        &self.updated_products
    }

    fn message(&self) -> &str {
        &self.message
    }
}

// ============================================================================
// Relay Pagination Types
// ============================================================================

#[derive(Debug, Clone)]
pub struct ProductEdge {
    pub node: ProductData,
    pub cursor: String,
}

#[juniper::graphql_object(Context = GraphQLContext)]
impl ProductEdge {
    fn node(&self) -> &ProductData {
        &self.node
    }
    fn cursor(&self) -> &str {
        &self.cursor
    }
}

/// Connection type for paginated products (Relay spec)
#[derive(Debug, Clone)]
pub struct ProductConnection {
    pub edges: Vec<ProductEdge>,
    pub page_info: PageInfo,
    pub total_count: i32,
}

#[juniper::graphql_object(Context = GraphQLContext)]
impl ProductConnection {
    fn edges(&self) -> &[ProductEdge] {
        &self.edges
    }
    fn page_info(&self) -> &PageInfo {
        &self.page_info
    }
    /// Total count of products matching the filter
    fn total_count(&self) -> i32 {
        self.total_count
    }
    fn nodes(&self) -> Vec<&ProductData> {
        self.edges.iter().map(|e| &e.node).collect()
    }
}
