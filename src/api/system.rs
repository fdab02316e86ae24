//! System endpoints: index page and health check.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::app_state::AppState;

/// Placeholder client page. The production deployment puts the real map
/// frontend (tiles, geocoder, routing UI) in front of this service; the
/// embedded page only documents the endpoint.
const INDEX_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>waypoint-relay</title></head>
<body>
  <h1>waypoint-relay</h1>
  <p>Connect a location-sharing client to <code>/ws</code>.
     Select a room with the <code>?room=</code> query parameter.</p>
</body>
</html>
"#;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct HealthResponse {
    status: String,
    timestamp: String,
    version: String,
}

/// `GET /` — Serve the client page.
pub async fn index_handler() -> impl IntoResponse {
    Html(INDEX_PAGE)
}

/// `GET /health` — Service health status.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    description = "Returns service health status, version, and current timestamp.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

/// OpenAPI document for the HTTP surface.
#[derive(Debug, utoipa::OpenApi)]
#[openapi(paths(health_handler), components(schemas(HealthResponse)))]
pub struct ApiDoc;

/// System routes mounted at the root level.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
}
