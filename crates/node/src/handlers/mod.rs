//! HTTP handlers for the node.

pub mod health;
pub mod metrics;

pub use health::*;
pub use metrics::*;
