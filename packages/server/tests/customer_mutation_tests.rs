//! Integration tests for customer mutations: createCustomer and bulkCreateCustomers

mod common;

use crate::common::{create_test_customer, TestHarness};
use serde_json::json;
use test_context::test_context;

const CREATE_CUSTOMER: &str = r#"
    mutation CreateCustomer($input: CustomerInput!) {
        createCustomer(input: $input) {
            customer { id name email phone createdAt }
            message
        }
    }
"#;

const BULK_CREATE_CUSTOMERS: &str = r#"
    mutation BulkCreate($input: [CustomerInput!]!) {
        bulkCreateCustomers(input: $input) {
            customers { name email }
            errors
        }
    }
"#;

// =============================================================================
// createCustomer
// =============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn create_customer_returns_customer_and_message(ctx: &TestHarness) {
    let client = ctx.graphql();

    let result = client
        .execute_with_json(
            CREATE_CUSTOMER,
            json!({
                "input": { "name": "Alice", "email": "alice@example.com", "phone": "+1234567890" }
            }),
        )
        .await;

    assert!(result.is_ok(), "errors: {:?}", result.errors);
    assert_eq!(result.get("createCustomer.customer.name"), "Alice");
    assert_eq!(result.get("createCustomer.customer.email"), "alice@example.com");
    assert_eq!(result.get("createCustomer.customer.phone"), "+1234567890");
    assert!(result.get("createCustomer.customer.id").is_string());
    assert!(result.get("createCustomer.customer.createdAt").is_string());
    assert_eq!(
        result.get("createCustomer.message"),
        "Customer created successfully."
    );
    assert_eq!(ctx.test_deps.store.customer_count(), 1);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn create_customer_accepts_dashed_phone(ctx: &TestHarness) {
    let result = ctx
        .graphql()
        .execute_with_json(
            CREATE_CUSTOMER,
            json!({
                "input": { "name": "Bob", "email": "bob@example.com", "phone": "123-456-7890" }
            }),
        )
        .await;

    assert!(result.is_ok(), "errors: {:?}", result.errors);
    assert_eq!(result.get("createCustomer.customer.phone"), "123-456-7890");
}

#[test_context(TestHarness)]
#[tokio::test]
async fn create_customer_rejects_duplicate_email(ctx: &TestHarness) {
    create_test_customer(&ctx.deps, "Alice", "alice@example.com")
        .await
        .unwrap();

    let result = ctx
        .graphql()
        .execute_with_json(
            CREATE_CUSTOMER,
            json!({ "input": { "name": "Alice Again", "email": "alice@example.com" } }),
        )
        .await;

    assert!(!result.is_ok());
    assert_eq!(result.errors, ["email already exists: alice@example.com"]);
    assert_eq!(result.error_codes, ["CONFLICT"]);
    assert!(result.get("createCustomer").is_null());
    assert_eq!(ctx.test_deps.store.customer_count(), 1);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn create_customer_rejects_short_phone(ctx: &TestHarness) {
    let result = ctx
        .graphql()
        .execute_with_json(
            CREATE_CUSTOMER,
            json!({ "input": { "name": "Carol", "email": "carol@example.com", "phone": "12345" } }),
        )
        .await;

    assert_eq!(result.error_codes, ["VALIDATION_ERROR"]);
    assert!(result.errors[0].starts_with("invalid phone format: 12345"));
    assert_eq!(ctx.test_deps.store.customer_count(), 0);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn create_customer_rejects_malformed_email(ctx: &TestHarness) {
    let result = ctx
        .graphql()
        .execute_with_json(
            CREATE_CUSTOMER,
            json!({ "input": { "name": "Dave", "email": "not-an-email" } }),
        )
        .await;

    assert_eq!(result.errors, ["invalid email format: not-an-email"]);
    assert_eq!(ctx.test_deps.store.customer_count(), 0);
}

// =============================================================================
// bulkCreateCustomers
// =============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn bulk_create_is_partial_success(ctx: &TestHarness) {
    let data = ctx
        .graphql()
        .query_with_json(
            BULK_CREATE_CUSTOMERS,
            json!({
                "input": [
                    { "name": "Bob", "email": "bob@x.com", "phone": "123-456-7890" },
                    { "name": "Carol", "email": "carol@x.com" },
                    { "name": "Dave", "email": "bob@x.com" }
                ]
            }),
        )
        .await;

    let payload = &data["bulkCreateCustomers"];
    assert_eq!(payload["customers"].as_array().unwrap().len(), 2);
    assert_eq!(payload["customers"][0]["name"], "Bob");
    assert_eq!(payload["customers"][1]["name"], "Carol");
    assert_eq!(
        payload["errors"],
        json!(["Record 3: email already exists: bob@x.com"])
    );
    assert_eq!(ctx.test_deps.store.customer_count(), 2);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn bulk_create_checks_previously_stored_emails(ctx: &TestHarness) {
    create_test_customer(&ctx.deps, "Existing", "taken@x.com")
        .await
        .unwrap();

    let data = ctx
        .graphql()
        .query_with_json(
            BULK_CREATE_CUSTOMERS,
            json!({
                "input": [
                    { "name": "Taken", "email": "taken@x.com" },
                    { "name": "  ", "email": "blank@x.com" },
                    { "name": "Fresh", "email": "fresh@x.com", "phone": "+44123" }
                ]
            }),
        )
        .await;

    let payload = &data["bulkCreateCustomers"];
    assert_eq!(payload["customers"], json!([{ "name": "Fresh", "email": "fresh@x.com" }]));
    assert_eq!(
        payload["errors"],
        json!([
            "Record 1: email already exists: taken@x.com",
            "Record 2: name must not be empty"
        ])
    );
    assert_eq!(ctx.test_deps.store.customer_count(), 2);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn bulk_create_with_empty_input_does_nothing(ctx: &TestHarness) {
    let data = ctx
        .graphql()
        .query_with_json(BULK_CREATE_CUSTOMERS, json!({ "input": [] }))
        .await;

    assert_eq!(data["bulkCreateCustomers"]["customers"], json!([]));
    assert_eq!(data["bulkCreateCustomers"]["errors"], json!([]));
}
