//! HTTP surface: index page, health check, and router composition.
//!
//! The HTTP side is deliberately thin — the relay's real interface is the
//! WebSocket endpoint; static assets and map rendering live outside this
//! service.

pub mod system;

use axum::Router;

use crate::app_state::AppState;

/// Builds the HTTP router.
pub fn build_router() -> Router<AppState> {
    let router = system::routes();

    #[cfg(feature = "swagger-ui")]
    let router = {
        use utoipa::OpenApi;
        router.merge(
            utoipa_swagger_ui::SwaggerUi::new("/docs")
                .url("/api-docs/openapi.json", system::ApiDoc::openapi()),
        )
    };

    router
}
