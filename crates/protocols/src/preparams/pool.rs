//! Pre-parameters pool.
//!
//! Keeps up to `capacity` pre-parameter sets ready for signing ceremonies.
//! A pump pass is started when the pool is initialized and after every
//! withdrawal; passes are serialized so at most one generator call runs at
//! any time.
//!
//! # Locking
//!
//! - **Queue guard**: protects the ready entries, held only for queue operations
//! - **Pump guard**: owns the generator, held for a whole pump pass
//!
//! Generation takes seconds, so readers never wait on the pump guard.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::runtime::Handle;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, error, info, warn};

use super::generator::{GenerationError, ParamsGenerator};
use super::queue::ParamsQueue;

type SharedGenerator<P> = Arc<Mutex<Box<dyn ParamsGenerator<P>>>>;
type GeneratorGuard<P> = OwnedMutexGuard<Box<dyn ParamsGenerator<P>>>;

/// Pool configuration.
///
/// The defaults match the plain refill policy: two entries, a single
/// generator call per attempt and no backoff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Target number of ready pre-parameter sets.
    pub capacity: usize,
    /// Generator calls a pump pass makes before giving up on one entry.
    pub generation_attempts: u32,
    /// Pause between attempts within a pass, in milliseconds.
    pub retry_backoff_ms: u64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            capacity: common::DEFAULT_POOL_SIZE,
            generation_attempts: 1,
            retry_backoff_ms: 0,
        }
    }
}

impl PoolConfig {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }

    /// Allow `attempts` generator calls per entry within one pump pass.
    pub fn with_retries(mut self, attempts: u32, backoff: Duration) -> Self {
        self.generation_attempts = attempts;
        self.retry_backoff_ms = backoff.as_millis() as u64;
        self
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }

    pub fn validate(&self) -> Result<(), PoolError> {
        if self.capacity == 0 {
            return Err(PoolError::InvalidConfig(
                "capacity must be at least 1".to_string(),
            ));
        }
        if self.generation_attempts == 0 {
            return Err(PoolError::InvalidConfig(
                "generation_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Errors surfaced by the pool facade.
///
/// Generation failures are not among them: they are handled by the pump.
#[derive(Debug, thiserror::Error)]
pub enum PoolError {
    #[error("invalid pool configuration: {0}")]
    InvalidConfig(String),

    #[error("pool must be initialized within a tokio runtime: {0}")]
    NoRuntime(#[from] tokio::runtime::TryCurrentError),

    #[error("no pre-parameters became available within {0:?}")]
    Timeout(Duration),
}

/// Fill level of the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PoolState {
    Empty,
    Partial,
    Full,
}

impl PoolState {
    pub fn from_size(size: usize, capacity: usize) -> Self {
        if size == 0 {
            PoolState::Empty
        } else if size < capacity {
            PoolState::Partial
        } else {
            PoolState::Full
        }
    }
}

/// How a pump pass ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PumpOutcome {
    /// The queue is at capacity.
    Full,
    /// The generator returned an error; the queue is left below capacity.
    GenerationFailed,
    /// The generator panicked; the queue is left below capacity.
    GeneratorPanicked,
    /// The runtime shut down while the generator was running.
    Cancelled,
}

/// Statistics about the pre-parameters pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolStats {
    pub current_size: usize,
    pub target_size: usize,
    pub utilization: u32, // percentage
    pub state: PoolState,
    pub total_generated: u64,
    pub total_failed: u64,
    pub total_served: u64,
}

impl PoolStats {
    /// Check if the pool is healthy (at least 50% full).
    pub fn is_healthy(&self) -> bool {
        self.utilization >= 50
    }

    /// Check if the pool is critically low (less than 25% full).
    pub fn is_critical(&self) -> bool {
        self.utilization < 25
    }
}

struct PoolShared<P> {
    queue: ParamsQueue<P>,
    generator: SharedGenerator<P>,
    config: PoolConfig,
    /// Runtime the pool was initialized on; pump passes are spawned here.
    runtime: Handle,
    total_generated: AtomicU64,
    total_failed: AtomicU64,
    total_served: AtomicU64,
}

/// Pool of pre-parameter sets refilled in the background.
///
/// Cloning yields another handle to the same pool.
pub struct PreParamsPool<P> {
    shared: Arc<PoolShared<P>>,
}

impl<P> Clone for PreParamsPool<P> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<P: Send + 'static> PreParamsPool<P> {
    /// Create the pool and start filling it in the background.
    ///
    /// Must be called from within a tokio runtime.
    pub fn initialize<G>(config: PoolConfig, generator: G) -> Result<Self, PoolError>
    where
        G: ParamsGenerator<P>,
    {
        config.validate()?;
        let runtime = Handle::try_current()?;

        info!(
            "Initializing pre-parameters pool (capacity: {}, attempts per entry: {})",
            config.capacity, config.generation_attempts
        );

        let generator: Box<dyn ParamsGenerator<P>> = Box::new(generator);
        let pool = Self {
            shared: Arc::new(PoolShared {
                queue: ParamsQueue::new(),
                generator: Arc::new(Mutex::new(generator)),
                config,
                runtime,
                total_generated: AtomicU64::new(0),
                total_failed: AtomicU64::new(0),
                total_served: AtomicU64::new(0),
            }),
        };

        pool.trigger_pump();
        Ok(pool)
    }

    /// Take the oldest pre-parameter set, waiting while the pool is empty.
    ///
    /// Waits indefinitely; see [`get_timeout`](Self::get_timeout) for a
    /// bounded wait.
    pub async fn get(&self) -> P {
        let params = self.shared.queue.remove_head().await;
        self.on_withdrawn();
        params
    }

    /// Like [`get`](Self::get) but gives up after `timeout`.
    pub async fn get_timeout(&self, timeout: Duration) -> Result<P, PoolError> {
        match tokio::time::timeout(timeout, self.shared.queue.remove_head()).await {
            Ok(params) => {
                self.on_withdrawn();
                Ok(params)
            }
            Err(_) => {
                warn!("No pre-parameters available after {:?}", timeout);
                Err(PoolError::Timeout(timeout))
            }
        }
    }

    /// Take the oldest pre-parameter set if one is ready.
    pub fn try_get(&self) -> Option<P> {
        let params = self.shared.queue.try_remove_head()?;
        self.on_withdrawn();
        Some(params)
    }

    fn on_withdrawn(&self) {
        let served = self.shared.total_served.fetch_add(1, Ordering::Relaxed) + 1;
        debug!(
            "Took pre-parameters from pool, remaining: {}/{} (served: {})",
            self.size(),
            self.capacity(),
            served
        );
        self.trigger_pump();
    }

    /// Start a pump pass in the background.
    ///
    /// The pass waits for any running pass to finish first.
    pub fn trigger_pump(&self) -> JoinHandle<PumpOutcome> {
        let shared = Arc::clone(&self.shared);
        self.shared.runtime.spawn(async move { shared.pump().await })
    }

    /// Run a pump pass and wait for it to end.
    ///
    /// The pass runs as its own task: dropping the returned future stops the
    /// wait, not the pass, so generated entries still reach the queue.
    pub async fn pump(&self) -> PumpOutcome {
        match self.trigger_pump().await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("Pump pass did not complete: [{}]", e);
                PumpOutcome::Cancelled
            }
        }
    }

    pub fn size(&self) -> usize {
        self.shared.queue.size()
    }

    pub fn capacity(&self) -> usize {
        self.shared.config.capacity
    }

    pub fn config(&self) -> &PoolConfig {
        &self.shared.config
    }

    pub fn state(&self) -> PoolState {
        PoolState::from_size(self.size(), self.capacity())
    }

    /// Get pool statistics.
    pub fn stats(&self) -> PoolStats {
        let size = self.size();
        let capacity = self.capacity();
        PoolStats {
            current_size: size,
            target_size: capacity,
            utilization: (size as f64 / capacity as f64 * 100.0) as u32,
            state: PoolState::from_size(size, capacity),
            total_generated: self.shared.total_generated.load(Ordering::Relaxed),
            total_failed: self.shared.total_failed.load(Ordering::Relaxed),
            total_served: self.shared.total_served.load(Ordering::Relaxed),
        }
    }
}

impl<P: Send + 'static> PoolShared<P> {
    async fn pump(&self) -> PumpOutcome {
        let mut generator = Arc::clone(&self.generator).lock_owned().await;

        loop {
            let size = self.queue.size();
            if size >= self.config.capacity {
                debug!(
                    "Pre-parameters pool is pumped ({}/{})",
                    size, self.config.capacity
                );
                return PumpOutcome::Full;
            }

            let mut attempt = 1;
            let params = loop {
                let (returned, result) = match run_generator(generator).await {
                    Ok(done) => done,
                    Err(e) => {
                        self.total_failed.fetch_add(1, Ordering::Relaxed);
                        if e.is_panic() {
                            error!("Pre-parameters generator panicked: [{}]", e);
                            return PumpOutcome::GeneratorPanicked;
                        }
                        warn!("Pre-parameters generation was cancelled: [{}]", e);
                        return PumpOutcome::Cancelled;
                    }
                };
                generator = returned;

                match result {
                    Ok(params) => break params,
                    Err(e) => {
                        self.total_failed.fetch_add(1, Ordering::Relaxed);
                        if attempt >= self.config.generation_attempts {
                            warn!("Failed to generate pre-parameters: [{}]", e);
                            return PumpOutcome::GenerationFailed;
                        }
                        warn!(
                            "Failed to generate pre-parameters (attempt {}/{}), retrying in {:?}: [{}]",
                            attempt,
                            self.config.generation_attempts,
                            self.config.retry_backoff(),
                            e
                        );
                        attempt += 1;
                        tokio::time::sleep(self.config.retry_backoff()).await;
                    }
                }
            };

            let size = self.queue.insert(params);
            self.total_generated.fetch_add(1, Ordering::Relaxed);
            debug!(
                "Generated new pre-parameters, pool size: {}/{}",
                size, self.config.capacity
            );
        }
    }
}

/// Run one generator call on the blocking pool.
///
/// The guard travels with the call and is handed back with its result. If
/// the generator panics the guard is dropped, which releases the pump guard.
async fn run_generator<P: Send + 'static>(
    mut generator: GeneratorGuard<P>,
) -> Result<(GeneratorGuard<P>, Result<P, GenerationError>), JoinError> {
    tokio::task::spawn_blocking(move || {
        let result = generator.generate();
        (generator, result)
    })
    .await
}
