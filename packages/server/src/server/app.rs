//! Application setup and server configuration.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Extension, Request},
    http::{header::CONTENT_TYPE, HeaderValue, Method},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::kernel::ServerDeps;
use crate::server::graphql::{create_schema, GraphQLContext};
use crate::server::routes::{
    graphql_batch_handler, graphql_handler, graphql_playground, health_handler,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Middleware to create GraphQLContext per-request
async fn create_graphql_context(
    Extension(deps): Extension<ServerDeps>,
    mut request: Request,
    next: Next,
) -> Response {
    let context = GraphQLContext::new(Arc::new(deps));
    request.extensions_mut().insert(context);
    next.run(request).await
}

/// CORS for the configured origins; any origin when none are configured.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE]);

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if origins.is_empty() {
        cors.allow_origin(Any)
    } else {
        cors.allow_origin(origins)
    }
}

/// Build the Axum application router
pub fn build_app(deps: ServerDeps, allowed_origins: &[String]) -> Router {
    // Create GraphQL schema (singleton)
    let schema = Arc::new(create_schema());

    Router::new()
        .route("/graphql", post(graphql_handler).get(graphql_playground))
        .route("/graphql/batch", post(graphql_batch_handler))
        .route("/health", get(health_handler))
        // Layers run top to bottom
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(allowed_origins))
                .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
                .layer(Extension(deps))
                .layer(middleware::from_fn(create_graphql_context)),
        )
        // State (schema for GraphQL handlers)
        .with_state(schema)
}
