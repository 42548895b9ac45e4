//! Router-level tests: /health, /graphql and /graphql/batch over HTTP

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use crm_core::kernel::TestDependencies;
use crm_core::server::app::build_app;
use serde_json::{json, Value};
use tower::ServiceExt;

fn app() -> Router {
    build_app(TestDependencies::new().into_server_deps(), &[])
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn health_reports_store_ok() {
    let request = Request::get("/health").body(Body::empty()).unwrap();

    let (status, body) = send(app(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "healthy", "store": { "status": "ok" } }));
}

#[tokio::test]
async fn graphql_post_executes_mutation() {
    let request = post_json(
        "/graphql",
        json!({
            "query": "mutation { createCustomer(input: { name: \"Alice\", email: \"alice@example.com\" }) { message } }"
        }),
    );

    let (status, body) = send(app(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"]["createCustomer"]["message"],
        "Customer created successfully."
    );
}

#[tokio::test]
async fn resolver_errors_keep_status_ok() {
    let request = post_json(
        "/graphql",
        json!({
            "query": "mutation { createProduct(input: { name: \"X\", price: \"0\" }) { product { id } } }"
        }),
    );

    let (status, body) = send(app(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["errors"][0]["message"], "price must be positive");
    assert_eq!(body["errors"][0]["extensions"]["code"], "VALIDATION_ERROR");
    assert_eq!(body["errors"][0]["extensions"]["field"], "price");
}

#[tokio::test]
async fn invalid_document_is_bad_request() {
    let request = post_json("/graphql", json!({ "query": "query { noSuchField }" }));

    let (status, body) = send(app(), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["errors"].is_array());
}

#[tokio::test]
async fn batch_endpoint_runs_each_operation() {
    let request = post_json(
        "/graphql/batch",
        json!([
            { "query": "query { allCustomers { totalCount } }" },
            { "query": "query { allProducts { totalCount } }" }
        ]),
    );

    let (status, body) = send(app(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["data"]["allCustomers"]["totalCount"], 0);
    assert_eq!(body[1]["data"]["allProducts"]["totalCount"], 0);
}

#[tokio::test]
async fn price_beyond_column_range_is_a_validation_error() {
    let request = post_json(
        "/graphql",
        json!({
            "query": "mutation { createProduct(input: { name: \"Yacht\", price: \"10000000000.00\" }) { product { id } } }"
        }),
    );

    let (status, body) = send(app(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["errors"][0]["message"],
        "price must be less than 10000000000"
    );
    assert_eq!(body["errors"][0]["extensions"]["code"], "VALIDATION_ERROR");
}
