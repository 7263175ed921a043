//! Node state management.

use common::NodeStatus;
use protocols::{PreParamsPool, StoredPrimes};
use uuid::Uuid;

/// State shared by the node's HTTP handlers.
pub struct NodeState {
    /// Unique node identifier.
    pub node_id: Uuid,
    /// Party index (0-based).
    pub party_index: u16,
    /// Pool of pregenerated primes.
    pub pool: PreParamsPool<StoredPrimes>,
}

impl NodeState {
    pub fn new(node_id: Uuid, party_index: u16, pool: PreParamsPool<StoredPrimes>) -> Self {
        Self {
            node_id,
            party_index,
            pool,
        }
    }

    /// The node is ready once at least one pre-parameter set is available.
    pub fn is_ready(&self) -> bool {
        self.pool.size() > 0
    }

    pub fn status(&self) -> NodeStatus {
        NodeStatus {
            node_id: self.node_id,
            party_index: self.party_index,
            is_ready: self.is_ready(),
            pool_size: self.pool.size(),
            pool_capacity: self.pool.capacity(),
        }
    }
}
