//! Pre-parameter supply for threshold signing.
//!
//! Generating the pre-parameters of a threshold key-generation ceremony is
//! slow (tens of seconds for safe primes) while ceremonies must start quickly.
//! The [`preparams`] module keeps a small pool of ready pre-parameter sets that
//! is refilled in the background after each withdrawal.

pub mod preparams;

// Re-export commonly used types
pub use preparams::{
    GenerationError, ParamsGenerator, ParamsQueue, PoolConfig, PoolError, PoolState, PoolStats,
    PreParamsPool, PrimesGenerator, PumpOutcome, StoredPrimes,
};
