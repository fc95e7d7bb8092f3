//! HTTP query surface
//!
//! Exposes the query service over axum. Errors map to status codes as
//! `NotFound` → 404, `InvalidArgument` → 400, `Uninitialized` → 503.

mod routes;

pub use routes::{SearchResults, StatsResponse};

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;

use crate::error::{Result, UdbError};
use crate::query::QueryService;

/// Shared state for request handlers
#[derive(Clone)]
pub struct AppState {
    queries: Arc<QueryService>,
    search_limit: usize,
}

impl AppState {
    pub fn new(queries: Arc<QueryService>, search_limit: usize) -> Self {
        Self {
            queries,
            search_limit,
        }
    }
}

/// Build the router with every route mounted
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/search/{application}", get(routes::search))
        .route("/get/{application}", get(routes::get_app))
        .route("/random", get(routes::random))
        .route("/all", get(routes::all))
        .route("/stats", get(routes::stats))
        .route("/v0/search/{application}", get(routes::search_v0))
        .route("/health", get(routes::health))
        .route("/ready", get(routes::ready))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve until `shutdown` is cancelled
pub async fn serve(listener: TcpListener, state: AppState, shutdown: CancellationToken) -> Result<()> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, "Serving catalog API");
    }

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    tracing::info!("HTTP server stopped");
    Ok(())
}

impl IntoResponse for UdbError {
    fn into_response(self) -> Response {
        let (status, detail) = match &self {
            UdbError::NotFound(_) => (StatusCode::NOT_FOUND, "Application not found".to_string()),
            UdbError::InvalidArgument(message) => (StatusCode::BAD_REQUEST, message.clone()),
            UdbError::Uninitialized => (StatusCode::SERVICE_UNAVAILABLE, self.to_string()),
            other => {
                tracing::error!(error = %other, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(serde_json::json!({ "detail": detail }))).into_response()
    }
}
