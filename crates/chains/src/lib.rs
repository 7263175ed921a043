//! Chain boundary of the pre-parameters node.
//!
//! This crate provides:
//! - Ethereum address validation and the stake monitor wrapper
//! - tBTC application hooks (deposit created notifications)
//! - Event subscriptions
//! - A local in-memory chain for development and tests

pub mod error;
pub mod ethereum;
pub mod local;
pub mod subscription;
pub mod tbtc;

pub use error::{ChainError, ChainResult};
pub use ethereum::{Address, EthereumStakeMonitor, StakeMonitor, Staker, StakingClient};
pub use local::LocalChain;
pub use subscription::EventSubscription;
pub use tbtc::{DepositCreatedEvent, DepositCreatedHandler, TbtcHandle, TbtcSystem};
