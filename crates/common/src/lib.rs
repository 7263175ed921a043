//! Common types shared between the pre-parameters node components.

pub mod types;

pub use types::{NodeError, NodeStatus};

/// Number of pre-parameter sets kept ready by default.
pub const DEFAULT_POOL_SIZE: usize = 2;

/// Default HTTP port of the node status server.
pub const DEFAULT_PORT: u16 = 3000;
