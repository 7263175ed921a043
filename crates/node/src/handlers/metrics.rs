//! Prometheus metrics handler.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::error;

use crate::metrics::{gather_metrics, update_pool_metrics};
use crate::state::NodeState;

/// Prometheus metrics endpoint.
///
/// GET /metrics
pub async fn metrics_handler(State(state): State<Arc<NodeState>>) -> Response {
    update_pool_metrics(&state.pool.stats());

    match gather_metrics() {
        Ok(metrics) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            metrics,
        )
            .into_response(),
        Err(e) => {
            error!("Failed to gather metrics: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to gather metrics: {}", e),
            )
                .into_response()
        }
    }
}
