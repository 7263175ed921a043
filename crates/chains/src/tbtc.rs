//! tBTC application hooks.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::ethereum::StakeMonitor;
use crate::subscription::EventSubscription;

/// On-chain notification that a new deposit was created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositCreatedEvent {
    pub deposit_address: String,
    pub keep_address: String,
    /// Block timestamp (Unix seconds)
    pub timestamp: u64,
}

/// Callback invoked for each deposit created notification.
pub type DepositCreatedHandler = Arc<dyn Fn(DepositCreatedEvent) + Send + Sync>;

/// Access to the TBTCSystem contract.
pub trait TbtcSystem: Send + Sync {
    /// Install a handler invoked whenever a new deposit creation is seen.
    fn on_deposit_created(&self, handler: DepositCreatedHandler) -> EventSubscription;
}

/// Chain handle extended with tBTC-specific capabilities.
pub trait TbtcHandle: TbtcSystem {
    fn stake_monitor(&self) -> Arc<dyn StakeMonitor>;
}
