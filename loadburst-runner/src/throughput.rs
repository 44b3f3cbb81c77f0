use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use loadburst_common::{LoadburstError, Result};

/// Re-derive per-second request-arrival counts from recorded start
/// timestamps. The table is dense: every second index in
/// `0..=duration_secs` is present, zero-filled when no request started in
/// it. Events before the phase start or at/after the duration boundary are
/// pre/post-phase noise and are dropped, never clamped into an edge bucket.
pub fn bucketize(start_timestamps: &[u64], phase_start_ms: u64, duration_secs: u64) -> Vec<u64> {
    let mut buckets = vec![0u64; duration_secs as usize + 1];
    for &ts in start_timestamps {
        if ts < phase_start_ms {
            continue;
        }
        let bucket = (ts - phase_start_ms) / 1000;
        if bucket < duration_secs {
            buckets[bucket as usize] += 1;
        }
    }
    buckets
}

/// Write the throughput table fresh (previous report overwritten), one
/// `<second_index>,<count>` line per second in ascending, gap-free order.
pub fn write_report(path: &Path, buckets: &[u64]) -> Result<()> {
    let mut report = String::new();
    for (second, count) in buckets.iter().enumerate() {
        // Writing to a String cannot fail.
        let _ = writeln!(report, "{second},{count}");
    }

    fs::write(path, report).map_err(|e| {
        LoadburstError::Persistence(format!("cannot write {}: {e}", path.display()))
    })
}
