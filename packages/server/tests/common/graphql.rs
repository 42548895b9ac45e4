//! GraphQL client for integration testing.
//!
//! Executes GraphQL queries directly against the schema without HTTP overhead.

#![allow(dead_code)]

use crm_core::kernel::ServerDeps;
use crm_core::server::graphql::{create_schema, GraphQLContext, Schema};
use juniper::{InputValue, Variables};
use serde_json::Value;
use std::sync::Arc;

/// GraphQL client for executing queries and mutations in tests.
pub struct GraphQLClient {
    schema: Schema,
    context: GraphQLContext,
}

/// Result of a GraphQL execution.
#[derive(Debug)]
pub struct GraphQLResult {
    pub data: Option<Value>,
    pub errors: Vec<String>,
    /// `extensions.code` of each error, in the same order as `errors`
    pub error_codes: Vec<String>,
}

impl GraphQLResult {
    /// Returns true if the execution had no errors.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Unwraps the data, panicking if there were errors.
    pub fn unwrap(self) -> Value {
        if !self.errors.is_empty() {
            panic!("GraphQL errors: {:?}", self.errors);
        }
        self.data.expect("No data returned")
    }

    /// Gets a value at the given JSON path. Numeric segments index arrays.
    ///
    /// # Example
    /// ```ignore
    /// let name = result.get("createCustomer.customer.name");
    /// let first = result.get("allCustomers.nodes.0.name");
    /// ```
    pub fn get(&self, path: &str) -> Value {
        let data = self.data.as_ref().expect("No data returned");
        let mut current = data;
        for key in path.split('.') {
            current = match key.parse::<usize>() {
                Ok(index) => &current[index],
                Err(_) => &current[key],
            };
        }
        current.clone()
    }
}

impl GraphQLClient {
    pub fn new(deps: ServerDeps) -> Self {
        Self {
            schema: create_schema(),
            context: GraphQLContext::new(Arc::new(deps)),
        }
    }

    /// Execute a GraphQL query/mutation.
    pub async fn execute(&self, query: &str) -> GraphQLResult {
        self.execute_with_vars(query, Variables::new()).await
    }

    /// Execute with variables given as a JSON object (lists, input objects).
    pub async fn execute_with_json(&self, query: &str, variables: Value) -> GraphQLResult {
        let variables: Variables = serde_json::from_value::<InputValue>(variables)
            .expect("Variables must be valid GraphQL input")
            .to_object_value()
            .map(|fields| {
                fields
                    .into_iter()
                    .map(|(k, v)| (k.to_string(), v.clone()))
                    .collect()
            })
            .unwrap_or_default();
        self.execute_with_vars(query, variables).await
    }

    /// Execute a GraphQL query/mutation with variables.
    pub async fn execute_with_vars(&self, query: &str, variables: Variables) -> GraphQLResult {
        let (result, errors) =
            juniper::execute(query, None, &self.schema, &variables, &self.context)
                .await
                .expect("GraphQL execution failed");

        // Convert juniper::Value to serde_json::Value
        let data = Some(serde_json::to_value(&result).expect("Failed to serialize GraphQL result"));

        let error_messages: Vec<String> = errors
            .iter()
            .map(|e| e.error().message().to_string())
            .collect();

        let error_codes: Vec<String> = errors
            .iter()
            .map(|e| {
                let json = serde_json::to_value(e).expect("Failed to serialize GraphQL error");
                json["extensions"]["code"].as_str().unwrap_or_default().to_string()
            })
            .collect();

        GraphQLResult {
            data,
            errors: error_messages,
            error_codes,
        }
    }

    /// Execute a query and expect success, returning the data.
    pub async fn query(&self, query: &str) -> Value {
        self.execute(query).await.unwrap()
    }

    /// Execute a query with JSON variables and expect success.
    pub async fn query_with_json(&self, query: &str, variables: Value) -> Value {
        self.execute_with_json(query, variables).await.unwrap()
    }
}
