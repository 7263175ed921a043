//! Ethereum chain support.
//!
//! Includes:
//! - Address parsing and validation
//! - Stake monitor that validates addresses before querying the client

pub mod address;
pub mod stake;

pub use address::*;
pub use stake::*;
