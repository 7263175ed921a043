//! tBTC-specific node actions.

use std::sync::Arc;

use chains::{DepositCreatedEvent, EventSubscription, TbtcSystem};
use tracing::info;

use crate::metrics::TBTC_DEPOSITS_SEEN;

/// Register the node's reactions to tBTC system events.
///
/// The returned subscription removes the handler when unsubscribed; dropping
/// it leaves the handler installed for the lifetime of the chain handle.
pub fn initialize_actions(tbtc: &dyn TbtcSystem) -> EventSubscription {
    info!("Initializing tbtc-specific actions");

    let subscription = tbtc.on_deposit_created(Arc::new(|event: DepositCreatedEvent| {
        TBTC_DEPOSITS_SEEN.inc();
        info!(
            "New deposit {} created for keep {} at {}",
            event.deposit_address, event.keep_address, event.timestamp
        );
    }));

    info!("Initialized tbtc-specific actions");
    subscription
}

#[cfg(test)]
mod tests {
    use super::*;
    use chains::LocalChain;

    #[test]
    fn test_initialize_actions_registers_deposit_handler() {
        let chain = LocalChain::new(0);
        let before = TBTC_DEPOSITS_SEEN.get();

        let subscription = initialize_actions(&chain);
        assert_eq!(chain.create_deposit("0xdeposit", "0xkeep", 1_600_000_000), 1);
        assert!(TBTC_DEPOSITS_SEEN.get() > before);

        subscription.unsubscribe();
        assert_eq!(chain.create_deposit("0xdeposit", "0xkeep", 1_600_000_001), 0);
    }
}
