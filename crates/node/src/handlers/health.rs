//! Health and pool status handlers.

use std::sync::Arc;

use axum::{extract::State, Json};
use tracing::trace;

use crate::state::NodeState;

/// Health check endpoint.
///
/// GET /health
pub async fn health_check(State(state): State<Arc<NodeState>>) -> Json<serde_json::Value> {
    trace!("Health check endpoint called");

    let status = state.status();
    Json(serde_json::json!({
        "status": "healthy",
        "service": "preparams-node",
        "node_id": status.node_id.to_string(),
        "party_index": status.party_index + 1,
        "ready": status.is_ready,
        "pool_size": status.pool_size,
        "pool_capacity": status.pool_capacity
    }))
}

/// Pre-parameters pool status.
///
/// GET /pool/status
pub async fn pool_status(State(state): State<Arc<NodeState>>) -> Json<serde_json::Value> {
    trace!("Pool status check");

    let stats = state.pool.stats();
    Json(serde_json::json!({
        "party_index": state.party_index,
        "healthy": stats.is_healthy(),
        "critical": stats.is_critical(),
        "stats": stats
    }))
}
