//! Stake queries against an Ethereum staking contract.
//!
//! The monitor only validates addresses and delegates to a [`StakingClient`];
//! it has no knowledge of the RPC behind it.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::address::Address;
use crate::error::ChainResult;

/// Client of the staking contract.
#[async_trait]
pub trait StakingClient: Send + Sync {
    /// Whether `address` holds at least the minimum stake.
    async fn has_minimum_stake(&self, address: Address) -> ChainResult<bool>;

    /// Staked balance of `address`.
    async fn balance_of(&self, address: Address) -> ChainResult<u128>;
}

/// Stake checks keyed by string addresses.
#[async_trait]
pub trait StakeMonitor: Send + Sync {
    async fn has_minimum_stake(&self, address: &str) -> ChainResult<bool>;

    fn staker_for(&self, address: &str) -> ChainResult<Box<dyn Staker>>;
}

/// An account that can hold stake.
#[async_trait]
pub trait Staker: Send + Sync {
    fn address(&self) -> Address;

    async fn stake(&self) -> ChainResult<u128>;
}

/// Stake monitor that rejects malformed addresses before reaching the client.
pub struct EthereumStakeMonitor<C> {
    client: Arc<C>,
}

impl<C> EthereumStakeMonitor<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self { client }
    }
}

impl<C> Clone for EthereumStakeMonitor<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
        }
    }
}

#[async_trait]
impl<C: StakingClient + 'static> StakeMonitor for EthereumStakeMonitor<C> {
    async fn has_minimum_stake(&self, address: &str) -> ChainResult<bool> {
        let address: Address = address.parse()?;
        debug!("Checking minimum stake of {}", address);
        self.client.has_minimum_stake(address).await
    }

    fn staker_for(&self, address: &str) -> ChainResult<Box<dyn Staker>> {
        let address: Address = address.parse()?;
        Ok(Box::new(EthereumStaker {
            address,
            client: Arc::clone(&self.client),
        }))
    }
}

struct EthereumStaker<C> {
    address: Address,
    client: Arc<C>,
}

#[async_trait]
impl<C: StakingClient + 'static> Staker for EthereumStaker<C> {
    fn address(&self) -> Address {
        self.address
    }

    async fn stake(&self) -> ChainResult<u128> {
        self.client.balance_of(self.address).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ChainError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const STAKER: &str = "0x65ea55c1f10491038425725dc00dffeab2a1e28a";

    /// Client that records how often it was queried.
    #[derive(Default)]
    struct CountingClient {
        queries: AtomicUsize,
    }

    #[async_trait]
    impl StakingClient for CountingClient {
        async fn has_minimum_stake(&self, _address: Address) -> ChainResult<bool> {
            self.queries.fetch_add(1, Ordering::SeqCst);
            Ok(true)
        }

        async fn balance_of(&self, address: Address) -> ChainResult<u128> {
            self.queries.fetch_add(1, Ordering::SeqCst);
            Ok(address.as_bytes()[0] as u128 * 1_000)
        }
    }

    #[tokio::test]
    async fn test_has_minimum_stake_delegates_valid_address() {
        let client = Arc::new(CountingClient::default());
        let monitor = EthereumStakeMonitor::new(Arc::clone(&client));

        assert!(monitor.has_minimum_stake(STAKER).await.unwrap());
        assert_eq!(client.queries.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_invalid_address_never_reaches_client() {
        let client = Arc::new(CountingClient::default());
        let monitor = EthereumStakeMonitor::new(Arc::clone(&client));

        let err = monitor.has_minimum_stake("not-an-address").await.unwrap_err();
        assert_eq!(err, ChainError::InvalidAddress("not-an-address".to_string()));

        assert!(matches!(
            monitor.staker_for("0x1234"),
            Err(ChainError::InvalidAddress(_))
        ));
        assert_eq!(client.queries.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_staker_queries_balance_lazily() {
        let client = Arc::new(CountingClient::default());
        let monitor = EthereumStakeMonitor::new(Arc::clone(&client));

        let staker = monitor.staker_for(STAKER).unwrap();
        assert_eq!(staker.address().to_string(), STAKER);
        assert_eq!(client.queries.load(Ordering::SeqCst), 0);

        assert_eq!(staker.stake().await.unwrap(), 0x65 * 1_000);
        assert_eq!(client.queries.load(Ordering::SeqCst), 1);
    }
}
