use loadburst_common::{LoadburstError, OutcomeRecord, Result};
use serde::Serialize;

/// Aggregate latency statistics over the successful records of a run.
/// Pure and idempotent: identical input always yields identical output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LatencyStats {
    pub mean_ms: f64,
    pub median_ms: f64,
    pub p99_ms: u64,
    pub min_ms: u64,
    pub max_ms: u64,
}

impl LatencyStats {
    /// Compute mean/median/p99/min/max over the latencies of successful
    /// records only. p99 uses the nearest-rank estimator
    /// (`ceil(0.99 × n) − 1` into the ascending sort), not interpolation.
    ///
    /// Zero successful records is invalid input, surfaced as
    /// `EmptyDataset` rather than a division fault or out-of-range index.
    pub fn compute(records: &[OutcomeRecord]) -> Result<Self> {
        let mut latencies: Vec<u64> = records
            .iter()
            .filter(|r| r.is_success())
            .map(|r| r.latency_ms)
            .collect();

        if latencies.is_empty() {
            return Err(LoadburstError::EmptyDataset);
        }

        latencies.sort_unstable();
        let n = latencies.len();

        let sum: u64 = latencies.iter().sum();
        let mean_ms = sum as f64 / n as f64;

        let middle = n / 2;
        let median_ms = if n % 2 == 0 {
            (latencies[middle - 1] + latencies[middle]) as f64 / 2.0
        } else {
            latencies[middle] as f64
        };

        let p99_index = ((0.99 * n as f64).ceil() as usize).saturating_sub(1);
        let p99_ms = latencies[p99_index.min(n - 1)];

        Ok(LatencyStats {
            mean_ms,
            median_ms,
            p99_ms,
            min_ms: latencies[0],
            max_ms: latencies[n - 1],
        })
    }
}
