//! HTTP adapters - REST API implementations.
//!
//! `app_router` assembles the workflow routes with the cross-cutting layers
//! (request tracing, CORS, request timeout).

pub mod workflow;

pub use workflow::{workflow_routes, WorkflowAppState};

use std::time::Duration;

use http::HeaderValue;
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::config::AppConfig;

/// Builds the full application router.
pub fn app_router(state: WorkflowAppState, config: &AppConfig) -> Router {
    workflow_routes(state, config.services.upload_limit_bytes)
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(cors_layer(&config.server.cors_origins_list()))
        .layer(TraceLayer::new_for_http())
}

/// CORS for the configured origins; any origin when none are configured.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let allow_origin = if allowed.is_empty() {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(allowed)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}
