//! Customer data types for GraphQL.

use chrono::{DateTime, Utc};
use juniper::{GraphQLInputObject, ID};

use crate::common::{CustomerId, PageInfo};
use crate::domains::customers::models::{CreateCustomer, Customer, CustomerFilter};
use crate::server::graphql::context::GraphQLContext;

/// GraphQL-friendly representation of a customer
#[derive(Debug, Clone)]
pub struct CustomerData {
    pub id: CustomerId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Customer> for CustomerData {
    fn from(customer: Customer) -> Self {
        Self {
            id: customer.id,
            name: customer.name,
            email: customer.email,
            phone: customer.phone,
            created_at: customer.created_at,
        }
    }
}

#[juniper::graphql_object(name = "Customer", Context = GraphQLContext)]
impl CustomerData {
    fn id(&self) -> ID {
        self.id.to_graphql()
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn email(&self) -> &str {
        &self.email
    }

    fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

// ============================================================================
// Inputs
// ============================================================================

/// Input for creating a customer (single or bulk)
#[derive(Debug, Clone, GraphQLInputObject)]
pub struct CustomerInput {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

impl From<CustomerInput> for CreateCustomer {
    fn from(input: CustomerInput) -> Self {
        Self {
            name: input.name,
            email: input.email,
            phone: input.phone,
        }
    }
}

/// Filter for `allCustomers`. All set fields must match.
#[derive(Debug, Clone, Default, GraphQLInputObject)]
pub struct CustomerFilterInput {
    /// Case-insensitive substring of the name
    pub name_icontains: Option<String>,
    /// Case-insensitive substring of the email
    pub email_icontains: Option<String>,
    pub created_at_gte: Option<DateTime<Utc>>,
    pub created_at_lte: Option<DateTime<Utc>>,
    /// Substring of the phone number, e.g. "+1"
    pub phone_pattern: Option<String>,
}

impl From<CustomerFilterInput> for CustomerFilter {
    fn from(input: CustomerFilterInput) -> Self {
        Self {
            name_icontains: input.name_icontains,
            email_icontains: input.email_icontains,
            created_at_gte: input.created_at_gte,
            created_at_lte: input.created_at_lte,
            phone_pattern: input.phone_pattern,
        }
    }
}

// ============================================================================
// Mutation payloads
// ============================================================================

#[derive(Debug, Clone)]
pub struct CreateCustomerPayload {
    pub customer: CustomerData,
    pub message: String,
}

#[juniper::graphql_object(Context = GraphQLContext)]
impl CreateCustomerPayload {
    fn customer(&self) -> &CustomerData {
        &self.customer
    }

    fn message(&self) -> &str {
        &self.message
    }
}

/// Outcome of a bulk create: what was persisted and why the rest was not.
#[derive(Debug, Clone, Default)]
pub struct BulkCreateCustomersPayload {
    pub customers: Vec<CustomerData>,
    /// "Record <n>: <reason>", in input order
    pub errors: Vec<String>,
}

#[juniper::graphql_object(Context = GraphQLContext)]
impl BulkCreateCustomersPayload {
    /// Customers created, in input order
    fn customers(&self) -> &[CustomerData] {
        &self.customers
    }

    fn errors(&self) -> &[String] {
        &self.errors
    }
}

// ============================================================================
// Relay Pagination Types
// ============================================================================

/// Edge containing a customer and its cursor (Relay spec)
#[derive(Debug, Clone)]
pub struct CustomerEdge {
    pub node: CustomerData,
    pub cursor: String,
}

#[juniper::graphql_object(Context = GraphQLContext)]
impl CustomerEdge {
    /// The customer at the end of the edge
    fn node(&self) -> &CustomerData {
        &self.node
    }
    /// A cursor for pagination
    fn cursor(&self) -> &str {
        &self.cursor
    }
}

/// Connection type for paginated customers (Relay spec)
#[derive(Debug, Clone)]
pub struct CustomerConnection {
    pub edges: Vec<CustomerEdge>,
    pub page_info: PageInfo,
    pub total_count: i32,
}

#[juniper::graphql_object(Context = GraphQLContext)]
impl CustomerConnection {
    /// A list of edges (customer + cursor pairs)
    fn edges(&self) -> &[CustomerEdge] {
        &self.edges
    }
    /// Information about pagination
    fn page_info(&self) -> &PageInfo {
        &self.page_info
    }
    /// Total count of customers matching the filter
    fn total_count(&self) -> i32 {
        self.total_count
    }
    /// Convenience: direct access to nodes (for simpler queries)
    fn nodes(&self) -> Vec<&CustomerData> {
        self.edges.iter().map(|e| &e.node).collect()
    }
}
