//! Shared fixtures for pre-parameters pool tests.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use protocols::{GenerationError, ParamsGenerator, PreParamsPool};

/// Observes generator calls from the test side.
#[derive(Debug, Default)]
pub struct GeneratorProbe {
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl GeneratorProbe {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

/// Yields 1, 2, 3, ... and fails on selected calls.
///
/// Failed calls do not consume a value, so successful outputs stay gapless.
pub struct SequenceGenerator {
    next: u64,
    delay: Duration,
    failing_calls: HashSet<usize>,
    probe: Arc<GeneratorProbe>,
}

impl SequenceGenerator {
    pub fn new() -> (Self, Arc<GeneratorProbe>) {
        let probe = Arc::new(GeneratorProbe::default());
        let generator = Self {
            next: 0,
            delay: Duration::ZERO,
            failing_calls: HashSet::new(),
            probe: Arc::clone(&probe),
        };
        (generator, probe)
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Fail the given call, counting calls from 1.
    pub fn failing_on(mut self, call: usize) -> Self {
        self.failing_calls.insert(call);
        self
    }
}

impl ParamsGenerator<u64> for SequenceGenerator {
    fn generate(&mut self) -> Result<u64, GenerationError> {
        let call = self.probe.calls.fetch_add(1, Ordering::SeqCst) + 1;
        let in_flight = self.probe.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.probe.max_in_flight.fetch_max(in_flight, Ordering::SeqCst);

        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }

        self.probe.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.failing_calls.contains(&call) {
            return Err(GenerationError::Failed(format!("call {} rejected", call)));
        }
        self.next += 1;
        Ok(self.next)
    }
}

/// Poll until `condition` holds, panicking after five seconds.
pub async fn wait_until<F>(what: &str, mut condition: F)
where
    F: FnMut() -> bool,
{
    let deadline = Instant::now() + Duration::from_secs(5);
    while !condition() {
        if Instant::now() > deadline {
            panic!("timed out waiting for {}", what);
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}

/// Wait until the pool holds `size` entries.
pub async fn wait_for_size<P: Send + 'static>(pool: &PreParamsPool<P>, size: usize) {
    wait_until(&format!("pool size {}", size), || pool.size() == size).await;
}
