//! Prometheus metrics for the node.

use lazy_static::lazy_static;
use prometheus::{register_int_counter, register_int_gauge, Encoder, IntCounter, IntGauge, TextEncoder};
use protocols::PoolStats;

lazy_static! {
    /// Pre-parameters pool size (number of ready sets)
    pub static ref PREPARAMS_POOL_SIZE: IntGauge = register_int_gauge!(
        "preparams_pool_size",
        "Number of pre-parameter sets ready in the pool"
    )
    .expect("Failed to register preparams_pool_size metric");

    /// Pre-parameters pool target size
    pub static ref PREPARAMS_POOL_TARGET: IntGauge = register_int_gauge!(
        "preparams_pool_target",
        "Target number of pre-parameter sets in the pool"
    )
    .expect("Failed to register preparams_pool_target metric");

    /// Pre-parameter sets generated, as last reported by the pool
    pub static ref PREPARAMS_GENERATED: IntGauge = register_int_gauge!(
        "preparams_generated",
        "Total number of pre-parameter sets generated since startup"
    )
    .expect("Failed to register preparams_generated metric");

    /// Failed generator calls, as last reported by the pool
    pub static ref PREPARAMS_FAILED: IntGauge = register_int_gauge!(
        "preparams_failed",
        "Total number of failed pre-parameters generator calls since startup"
    )
    .expect("Failed to register preparams_failed metric");

    /// Pre-parameter sets handed out, as last reported by the pool
    pub static ref PREPARAMS_SERVED: IntGauge = register_int_gauge!(
        "preparams_served",
        "Total number of pre-parameter sets taken from the pool"
    )
    .expect("Failed to register preparams_served metric");

    /// Deposit created notifications seen by the tbtc actions
    pub static ref TBTC_DEPOSITS_SEEN: IntCounter = register_int_counter!(
        "tbtc_deposits_created_total",
        "Number of deposit created notifications received"
    )
    .expect("Failed to register tbtc_deposits_created_total metric");
}

/// Update pre-parameters pool metrics
pub fn update_pool_metrics(stats: &PoolStats) {
    PREPARAMS_POOL_SIZE.set(stats.current_size as i64);
    PREPARAMS_POOL_TARGET.set(stats.target_size as i64);
    PREPARAMS_GENERATED.set(stats.total_generated as i64);
    PREPARAMS_FAILED.set(stats.total_failed as i64);
    PREPARAMS_SERVED.set(stats.total_served as i64);
}

/// Gather and encode all metrics in Prometheus text format
pub fn gather_metrics() -> Result<String, Box<dyn std::error::Error>> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}
