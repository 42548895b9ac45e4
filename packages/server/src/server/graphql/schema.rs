//! GraphQL schema definition.

use super::context::GraphQLContext;
use juniper::{EmptySubscription, FieldError, FieldResult, Object, RootNode, Value, ID};
use std::sync::Arc;
use tracing::error;

// Common types
use crate::common::{CrmError, PaginationArgs, StoreError};

// Domain actions
use crate::domains::customers::actions as customer_actions;
use crate::domains::orders::actions as order_actions;
use crate::domains::products::actions as product_actions;

// Domain data types (GraphQL types)
use crate::domains::customers::data::{
    BulkCreateCustomersPayload, CreateCustomerPayload, CustomerConnection, CustomerData,
    CustomerFilterInput, CustomerInput,
};
use crate::domains::orders::data::{
    CreateOrderPayload, OrderConnection, OrderData, OrderFilterInput,
};
use crate::domains::products::data::{
    CreateProductPayload, ProductConnection, ProductData, ProductFilterInput, ProductInput,
    ProductOrderBy, UpdateLowStockProductsPayload,
};
use crate::domains::products::actions::DEFAULT_LOW_STOCK_THRESHOLD;

/// Convert a domain error into a GraphQL error with `extensions.code`.
///
/// Store failures are logged here and reported without their details.
pub fn to_field_error(err: CrmError) -> FieldError {
    let mut extensions = Object::with_capacity(2);
    extensions.add_field("code", Value::scalar(err.code().to_string()));
    if let CrmError::Validation { field, .. } = &err {
        extensions.add_field("field", Value::scalar(field.to_string()));
    }

    let message = if err.is_client_error() {
        err.to_string()
    } else {
        error!(error = %err, "Store operation failed");
        "internal error".to_string()
    };

    FieldError::new(message, Value::Object(extensions))
}

/// GraphQL error for a store failure shared by every key of a batch load.
pub fn shared_store_error(err: Arc<StoreError>) -> FieldError {
    error!(error = %err, "Batch load failed");
    let mut extensions = Object::with_capacity(1);
    extensions.add_field("code", Value::scalar("INTERNAL_ERROR".to_string()));
    FieldError::new("internal error", Value::Object(extensions))
}

fn pagination(
    first: Option<i32>,
    after: Option<String>,
    last: Option<i32>,
    before: Option<String>,
) -> FieldResult<crate::common::ValidatedPaginationArgs> {
    PaginationArgs {
        first,
        after,
        last,
        before,
    }
    .validate()
    .map_err(to_field_error)
}

pub struct Query;

#[juniper::graphql_object(context = GraphQLContext)]
impl Query {
    /// Customers in creation order, filtered and paginated
    async fn all_customers(
        ctx: &GraphQLContext,
        filter: Option<CustomerFilterInput>,
        first: Option<i32>,
        after: Option<String>,
        last: Option<i32>,
        before: Option<String>,
    ) -> FieldResult<CustomerConnection> {
        let validated = pagination(first, after, last, before)?;
        let filter = filter.unwrap_or_default().into();

        customer_actions::get_customers_paginated(&filter, &validated, ctx.deps())
            .await
            .map_err(to_field_error)
    }

    async fn customer(ctx: &GraphQLContext, id: ID) -> FieldResult<Option<CustomerData>> {
        let customer = customer_actions::get_customer(&id, ctx.deps())
            .await
            .map_err(to_field_error)?;
        Ok(customer.map(CustomerData::from))
    }

    /// Products, filtered, optionally sorted, and paginated
    async fn all_products(
        ctx: &GraphQLContext,
        filter: Option<ProductFilterInput>,
        order_by: Option<ProductOrderBy>,
        first: Option<i32>,
        after: Option<String>,
        last: Option<i32>,
        before: Option<String>,
    ) -> FieldResult<ProductConnection> {
        let validated = pagination(first, after, last, before)?;
        let filter = filter.unwrap_or_default().into();
        let sort = order_by.map(Into::into).unwrap_or_default();

        product_actions::get_products_paginated(&filter, sort, &validated, ctx.deps())
            .await
            .map_err(to_field_error)
    }

    async fn product(ctx: &GraphQLContext, id: ID) -> FieldResult<Option<ProductData>> {
        let product = product_actions::get_product(&id, ctx.deps())
            .await
            .map_err(to_field_error)?;
        Ok(product.map(ProductData::from))
    }

    /// Orders in placement order, filtered and paginated
    async fn all_orders(
        ctx: &GraphQLContext,
        filter: Option<OrderFilterInput>,
        first: Option<i32>,
        after: Option<String>,
        last: Option<i32>,
        before: Option<String>,
    ) -> FieldResult<OrderConnection> {
        let validated = pagination(first, after, last, before)?;
        let filter = filter.unwrap_or_default().into();

        order_actions::get_orders_paginated(&filter, &validated, ctx.deps())
            .await
            .map_err(to_field_error)
    }

    async fn order(ctx: &GraphQLContext, id: ID) -> FieldResult<Option<OrderData>> {
        let order = order_actions::get_order(&id, ctx.deps())
            .await
            .map_err(to_field_error)?;
        Ok(order.map(OrderData::from))
    }
}

pub struct Mutation;

#[juniper::graphql_object(context = GraphQLContext)]
impl Mutation {
    async fn create_customer(
        ctx: &GraphQLContext,
        input: CustomerInput,
    ) -> FieldResult<CreateCustomerPayload> {
        let customer = customer_actions::create_customer(input, ctx.deps())
            .await
            .map_err(to_field_error)?;

        Ok(CreateCustomerPayload {
            customer: CustomerData::from(customer),
            message: customer_actions::CUSTOMER_CREATED_MESSAGE.to_string(),
        })
    }

    /// Create many customers; invalid records are reported in `errors`
    /// instead of failing the whole batch.
    async fn bulk_create_customers(
        ctx: &GraphQLContext,
        input: Vec<CustomerInput>,
    ) -> FieldResult<BulkCreateCustomersPayload> {
        Ok(customer_actions::bulk_create_customers(input, ctx.deps()).await)
    }

    async fn create_product(
        ctx: &GraphQLContext,
        input: ProductInput,
    ) -> FieldResult<CreateProductPayload> {
        let product = product_actions::create_product(input, ctx.deps())
            .await
            .map_err(to_field_error)?;

        Ok(CreateProductPayload {
            product: ProductData::from(product),
        })
    }

    async fn create_order(
        ctx: &GraphQLContext,
        customer_id: ID,
        product_ids: Vec<ID>,
    ) -> FieldResult<CreateOrderPayload> {
        let product_ids: Vec<String> = product_ids.iter().map(|id| id.to_string()).collect();
        let order = order_actions::create_order(&customer_id, &product_ids, ctx.deps())
            .await
            .map_err(to_field_error)?;

        Ok(CreateOrderPayload { order })
    }

    /// Restock every product whose stock is below `threshold`
    async fn update_low_stock_products(
        ctx: &GraphQLContext,
        threshold: Option<i32>,
    ) -> FieldResult<UpdateLowStockProductsPayload> {
        let threshold = threshold.unwrap_or(DEFAULT_LOW_STOCK_THRESHOLD);
        let (updated, message) = product_actions::update_low_stock_products(threshold, ctx.deps())
            .await
            .map_err(to_field_error)?;

        Ok(UpdateLowStockProductsPayload {
            updated_products: updated.into_iter().map(ProductData::from).collect(),
            message,
        })
    }
}

pub type Schema = RootNode<'static, Query, Mutation, EmptySubscription<GraphQLContext>>;

pub fn create_schema() -> Schema {
    Schema::new(Query, Mutation, EmptySubscription::new())
}
