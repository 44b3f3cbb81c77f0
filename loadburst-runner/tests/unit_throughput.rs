use std::fs;

use loadburst_runner::throughput::{bucketize, write_report};
use tempfile::tempdir;

#[test]
fn test_reference_bucketization() {
    // phase start 0, duration 2s: 500→bucket 0, 1500 and 1999→bucket 1,
    // 2500→bucket 2 which is past the duration and dropped. The table is
    // still dense through index 2.
    let buckets = bucketize(&[500, 1500, 1999, 2500], 0, 2);
    assert_eq!(buckets, vec![1, 2, 0]);
}

#[test]
fn test_pre_phase_events_are_dropped() {
    let buckets = bucketize(&[4_000, 5_500, 6_200], 5_000, 3);
    assert_eq!(buckets, vec![1, 1, 0, 0]);
}

#[test]
fn test_table_is_dense_and_zero_filled() {
    // Events only in seconds 0 and 4; seconds 1-3 must still be present.
    let buckets = bucketize(&[100, 4_500], 0, 5);
    assert_eq!(buckets, vec![1, 0, 0, 0, 1, 0]);
}

#[test]
fn test_empty_timestamps_yield_all_zero_table() {
    assert_eq!(bucketize(&[], 1_000, 3), vec![0, 0, 0, 0]);
}

#[test]
fn test_zero_duration_drops_everything() {
    assert_eq!(bucketize(&[1_000, 1_500], 1_000, 0), vec![0]);
}

#[test]
fn test_bucketization_is_idempotent() {
    let timestamps = [500, 1_500, 1_999, 2_500];
    assert_eq!(bucketize(&timestamps, 0, 2), bucketize(&timestamps, 0, 2));
}

#[test]
fn test_report_format_is_dense_ascending_csv() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("throughput.csv");

    write_report(&path, &[3, 0, 7]).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "0,3\n1,0\n2,7\n");
}

#[test]
fn test_report_overwrites_a_previous_run() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("throughput.csv");

    write_report(&path, &[1, 1, 1, 1]).unwrap();
    write_report(&path, &[2, 2]).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "0,2\n1,2\n");
}
