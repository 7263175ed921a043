//! Background-replenished pool of pre-parameter sets.
//!
//! This module contains:
//! - The generator seam (`ParamsGenerator`) and its CGGMP24 primes adapter
//! - A FIFO queue with wake-on-insert semantics
//! - The pool facade with its serialized pump passes

pub mod generator;
pub mod pool;
pub mod primes;
pub mod queue;

pub use generator::*;
pub use pool::*;
pub use primes::*;
pub use queue::*;
