//! Pre-parameters Node
//!
//! A node that keeps a small pool of pregenerated primes ready for
//! threshold key generation, and registers its reactions to tBTC system
//! events.

mod handlers;
mod metrics;
mod state;
mod tbtc;

use std::sync::Arc;
use std::time::Duration;

use axum::{routing::get, Router};
use chains::{LocalChain, TbtcHandle};
use clap::Parser;
use common::{NodeError, DEFAULT_POOL_SIZE, DEFAULT_PORT};
use protocols::{PoolConfig, PreParamsPool, PrimesGenerator, StoredPrimes};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::state::NodeState;

/// Node CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "preparams-node")]
#[command(author, version, about = "TSS Pre-parameters Node")]
struct Args {
    /// Port to listen on.
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Party index (1-based, will be converted to 0-based internally).
    #[arg(long, default_value = "1", value_parser = clap::value_parser!(u16).range(1..))]
    party_index: u16,

    /// Number of pre-parameter sets to keep ready.
    #[arg(long, env = "POOL_SIZE", default_value_t = DEFAULT_POOL_SIZE)]
    pool_size: usize,

    /// Generator calls per refill pass before the pass gives up.
    #[arg(long, env = "GENERATION_ATTEMPTS", default_value = "1")]
    generation_attempts: u32,

    /// Delay between generator retries, in milliseconds.
    #[arg(long, env = "RETRY_BACKOFF_MS", default_value = "0")]
    retry_backoff_ms: u64,

    /// Operator address whose stake is checked at startup.
    #[arg(long, env = "OPERATOR_ADDRESS")]
    operator_address: Option<String>,

    /// Minimum stake required by the local chain.
    #[arg(long, env = "MINIMUM_STAKE", default_value = "0")]
    minimum_stake: u128,
}

impl Args {
    fn pool_config(&self) -> Result<PoolConfig, NodeError> {
        let config = PoolConfig::with_capacity(self.pool_size).with_retries(
            self.generation_attempts,
            Duration::from_millis(self.retry_backoff_ms),
        );
        config
            .validate()
            .map_err(|e| NodeError::Configuration(e.to_string()))?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing with RUST_LOG environment variable
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("info".parse()?),
        )
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    info!("========================================");
    info!("  Pre-parameters Node Starting");
    info!("========================================");
    debug!("CLI arguments: {:?}", args);

    let node_id = Uuid::new_v4();

    // Convert to 0-based index for internal use.
    let party_index = args.party_index - 1;

    info!("Node configuration:");
    info!("  - Node ID: {}", node_id);
    info!("  - Party index: {} (0-based: {})", args.party_index, party_index);
    info!("  - Pool size: {}", args.pool_size);
    info!("  - Generation attempts: {}", args.generation_attempts);

    let config = args.pool_config().map_err(|e| {
        error!("{}", e);
        e
    })?;

    let pool: PreParamsPool<StoredPrimes> =
        PreParamsPool::initialize(config, PrimesGenerator::new(party_index))
            .map_err(|e| {
                error!("Failed to initialize pre-parameters pool: {}", e);
                NodeError::Pool(e.to_string())
            })?;

    let chain = LocalChain::new(args.minimum_stake);

    if let Some(operator) = &args.operator_address {
        let stake_monitor = chain.stake_monitor();
        match stake_monitor.has_minimum_stake(operator).await {
            Ok(true) => info!("Operator {} has the minimum stake", operator),
            Ok(false) => warn!("Operator {} does not have the minimum stake", operator),
            Err(e) => {
                error!("Stake check failed: {}", e);
                return Err(NodeError::from(e).into());
            }
        }
    }

    // Handler stays installed for the lifetime of the chain.
    let _deposit_subscription = tbtc::initialize_actions(&chain);

    let state = Arc::new(NodeState::new(node_id, party_index, pool));

    debug!("Building router...");
    let app = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/pool/status", get(handlers::pool_status))
        .route("/metrics", get(handlers::metrics_handler))
        .with_state(state);
    debug!("Router built successfully");

    let addr = format!("0.0.0.0:{}", args.port);
    debug!("Binding TCP listener to {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("========================================");
    info!("  Node {} listening on {}", node_id, addr);
    info!("========================================");

    axum::serve(listener, app).await?;

    Ok(())
}
