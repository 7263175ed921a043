//! Node-level types.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Status of a node as reported by its health endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeStatus {
    pub node_id: Uuid,
    pub party_index: u16,
    /// Whether at least one pre-parameter set is ready to be served.
    pub is_ready: bool,
    pub pool_size: usize,
    pub pool_capacity: usize,
}

/// Error types for the node.
#[derive(Debug, thiserror::Error)]
pub enum NodeError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Pool error: {0}")]
    Pool(String),

    #[error("Chain error: {0}")]
    Chain(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_status_serialization() {
        let status = NodeStatus {
            node_id: Uuid::new_v4(),
            party_index: 1,
            is_ready: true,
            pool_size: 2,
            pool_capacity: 2,
        };

        let json = serde_json::to_string(&status).unwrap();
        let deserialized: NodeStatus = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized.node_id, status.node_id);
        assert_eq!(deserialized.party_index, 1);
        assert!(deserialized.is_ready);
        assert_eq!(deserialized.pool_capacity, 2);
    }

    #[test]
    fn test_error_display() {
        let err = NodeError::Configuration("pool size must be positive".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: pool size must be positive"
        );
    }
}
