//! Route definitions and router construction.

use axum::Router;
use axum::http::HeaderValue;
use axum::routing::get;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::bootstrap::{AxumContext, CorsConfig};
use crate::handlers;
use crate::state::AppState;

/// Version prefix of every API route.
pub const API_VERSION: &str = "v1";

/// Parse allowed origins, skipping and reporting the ones that are not valid
/// header values.
fn parse_origins(origins: &[String]) -> Vec<HeaderValue> {
    origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(origin = %origin, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect()
}

/// Build CORS layer from configuration.
fn build_cors_layer(config: &CorsConfig) -> CorsLayer {
    match config {
        CorsConfig::AllowAll => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
        CorsConfig::AllowOrigins(origins) => {
            CorsLayer::new()
                .allow_origin(parse_origins(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        }
    }
}

/// Build all API routes without the version prefix.
pub(crate) fn api_routes() -> Router<AppState> {
    use handlers::{events, parameters, ui_parameters};

    Router::new()
        // Flat user scope
        .route(
            "/parameters",
            get(parameters::list).put(parameters::update),
        )
        .route(
            "/parameters/{name}",
            get(parameters::get).put(parameters::update_named),
        )
        .route(
            "/multiple-parameters",
            axum::routing::put(parameters::update_many),
        )
        // Application scopes
        .route(
            "/applications/{app_name}/parameters",
            get(parameters::list_app).put(parameters::update_app),
        )
        .route(
            "/applications/{app_name}/parameters/{name}",
            get(parameters::get_app).put(parameters::update_app_named),
        )
        .route(
            "/applications/{app_name}/multiple-parameters",
            axum::routing::put(parameters::update_app_many),
        )
        // Fixed-schema UI preferences
        .route(
            "/ui-parameters",
            get(ui_parameters::get)
                .put(ui_parameters::update)
                .patch(ui_parameters::update),
        )
        // Change events (SSE)
        .route("/events", get(events::stream))
}

/// Create the main router with API routes under `/v1` and a health check.
pub fn create_router(ctx: AxumContext, cors_config: &CorsConfig) -> Router {
    let state: AppState = Arc::new(ctx);
    let cors = build_cors_layer(cors_config);

    Router::new()
        .route("/health", get(health_check))
        .nest(
            &format!("/{API_VERSION}"),
            api_routes().with_state(state).layer(cors),
        )
        .layer(TraceLayer::new_for_http())
}

/// Health check endpoint.
pub(crate) async fn health_check() -> &'static str {
    "OK"
}
