//! Local in-memory chain.
//!
//! Used for development runs of the node and in tests. Stakes are set
//! directly and deposit notifications are emitted on demand.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, Weak};

use async_trait::async_trait;
use tracing::{debug, info};

use crate::error::ChainResult;
use crate::ethereum::{Address, EthereumStakeMonitor, StakeMonitor, StakingClient};
use crate::subscription::EventSubscription;
use crate::tbtc::{DepositCreatedEvent, DepositCreatedHandler, TbtcHandle, TbtcSystem};

#[derive(Default)]
struct LocalChainState {
    minimum_stake: u128,
    stakes: RwLock<HashMap<Address, u128>>,
    deposit_handlers: Mutex<HashMap<u64, DepositCreatedHandler>>,
    next_handler_id: AtomicU64,
}

impl LocalChainState {
    fn deposit_handlers(&self) -> MutexGuard<'_, HashMap<u64, DepositCreatedHandler>> {
        self.deposit_handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// In-memory chain. Clones share state.
#[derive(Clone, Default)]
pub struct LocalChain {
    state: Arc<LocalChainState>,
}

impl LocalChain {
    pub fn new(minimum_stake: u128) -> Self {
        Self {
            state: Arc::new(LocalChainState {
                minimum_stake,
                ..LocalChainState::default()
            }),
        }
    }

    pub fn minimum_stake(&self) -> u128 {
        self.state.minimum_stake
    }

    pub fn set_stake(&self, address: Address, amount: u128) {
        debug!("Setting stake of {} to {}", address, amount);
        self.state
            .stakes
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(address, amount);
    }

    fn stake_of(&self, address: &Address) -> u128 {
        self.state
            .stakes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(address)
            .copied()
            .unwrap_or(0)
    }

    /// Emit a deposit created notification to every installed handler.
    ///
    /// Returns the number of handlers notified.
    pub fn create_deposit(
        &self,
        deposit_address: &str,
        keep_address: &str,
        timestamp: u64,
    ) -> usize {
        let event = DepositCreatedEvent {
            deposit_address: deposit_address.to_string(),
            keep_address: keep_address.to_string(),
            timestamp,
        };

        // Handlers run outside the lock so they may subscribe or unsubscribe.
        let handlers: Vec<DepositCreatedHandler> =
            self.state.deposit_handlers().values().cloned().collect();

        info!(
            "Deposit {} created for keep {}, notifying {} handler(s)",
            event.deposit_address,
            event.keep_address,
            handlers.len()
        );
        for handler in &handlers {
            handler(event.clone());
        }
        handlers.len()
    }
}

#[async_trait]
impl StakingClient for LocalChain {
    async fn has_minimum_stake(&self, address: Address) -> ChainResult<bool> {
        Ok(self.stake_of(&address) >= self.state.minimum_stake)
    }

    async fn balance_of(&self, address: Address) -> ChainResult<u128> {
        Ok(self.stake_of(&address))
    }
}

impl TbtcSystem for LocalChain {
    fn on_deposit_created(&self, handler: DepositCreatedHandler) -> EventSubscription {
        let id = self.state.next_handler_id.fetch_add(1, Ordering::Relaxed);
        self.state.deposit_handlers().insert(id, handler);
        debug!("Installed deposit created handler {}", id);

        let state: Weak<LocalChainState> = Arc::downgrade(&self.state);
        EventSubscription::new(move || {
            if let Some(state) = state.upgrade() {
                state.deposit_handlers().remove(&id);
                debug!("Removed deposit created handler {}", id);
            }
        })
    }
}

impl TbtcHandle for LocalChain {
    fn stake_monitor(&self) -> Arc<dyn StakeMonitor> {
        Arc::new(EthereumStakeMonitor::new(Arc::new(self.clone())))
    }
}
