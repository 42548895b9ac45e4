use crate::server::graphql::{GraphQLContext, Schema};
use axum::{
    extract::{Extension, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use juniper::http::{graphiql::graphiql_source, GraphQLBatchRequest, GraphQLRequest};
use std::sync::Arc;
use tracing::debug;

/// Validation and parse failures are 400; resolver errors still return 200
/// with the errors in the body.
fn status_for(ok: bool) -> StatusCode {
    if ok {
        StatusCode::OK
    } else {
        StatusCode::BAD_REQUEST
    }
}

/// GraphQL POST endpoint
pub async fn graphql_handler(
    State(schema): State<Arc<Schema>>,
    Extension(context): Extension<GraphQLContext>,
    Json(request): Json<GraphQLRequest>,
) -> Response {
    debug!(operation = ?request.operation_name, "Executing GraphQL request");

    let response = request.execute(&schema, &context).await;

    (status_for(response.is_ok()), Json(response)).into_response()
}

/// GraphQL batch POST endpoint
pub async fn graphql_batch_handler(
    State(schema): State<Arc<Schema>>,
    Extension(context): Extension<GraphQLContext>,
    Json(batch): Json<GraphQLBatchRequest>,
) -> Response {
    let response = batch.execute(&schema, &context).await;

    (status_for(response.is_ok()), Json(response)).into_response()
}

/// GraphiQL explorer
pub async fn graphql_playground() -> Html<String> {
    Html(graphiql_source("/graphql", None))
}
