//! HTTP handler setup.
//!
//! # Responsibilities
//! - Provide the default handler (`/`, `/time`)
//! - Wire up middleware (request id, tracing, request timeout)
//!
//! Binding and serving belong to the lifecycle orchestrator.

use axum::{routing::get, Json, Router};
use serde_json::{json, Value};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::ListenerConfig;
use crate::http::request::{propagate_request_id, set_request_id};

/// Handler used when the application does not supply its own.
pub fn default_router() -> Router {
    Router::new()
        .route("/", get(hello))
        .route("/time", get(current_time))
}

/// Wrap `router` with the standard middleware stack.
#[allow(deprecated)]
pub fn with_middleware(router: Router, config: &ListenerConfig) -> Router {
    router
        .layer(TimeoutLayer::new(config.request_timeout()))
        .layer(propagate_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(set_request_id())
}

async fn hello() -> &'static str {
    "Hello World"
}

async fn current_time() -> Json<Value> {
    Json(json!({ "time": chrono::Utc::now().timestamp() }))
}
