use std::fs;
use std::sync::Arc;
use std::thread;

use loadburst_common::{LoadburstError, OpKind, OutcomeRecord};
use loadburst_runner::log_writer::{read_outcome_log, BatchedLogWriter};
use tempfile::tempdir;

fn record(n: u64) -> OutcomeRecord {
    OutcomeRecord {
        start_timestamp_ms: 1_000 + n,
        op: if n % 2 == 0 { OpKind::Write } else { OpKind::Read },
        latency_ms: n,
        status_code: 200,
    }
}

#[test]
fn test_below_threshold_stays_buffered_until_forced_flush() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("outcomes.csv");
    let writer = BatchedLogWriter::with_batch_size(&path, 10).unwrap();

    for n in 0..4 {
        writer.append(record(n));
    }
    assert_eq!(writer.buffered_len(), 4);
    assert_eq!(fs::read_to_string(&path).unwrap(), "");

    writer.flush();
    assert_eq!(writer.buffered_len(), 0);
    assert_eq!(read_outcome_log(&path).unwrap().len(), 4);
}

#[test]
fn test_reaching_threshold_flushes_and_clears() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("outcomes.csv");
    let writer = BatchedLogWriter::with_batch_size(&path, 3).unwrap();

    writer.append(record(0));
    writer.append(record(1));
    assert_eq!(writer.buffered_len(), 2);

    writer.append(record(2));
    assert_eq!(writer.buffered_len(), 0);
    assert_eq!(read_outcome_log(&path).unwrap().len(), 3);
}

#[test]
fn test_every_record_appears_exactly_once_across_batches() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("outcomes.csv");
    let writer = BatchedLogWriter::with_batch_size(&path, 5).unwrap();

    for n in 0..12 {
        writer.append(record(n));
    }
    writer.flush();

    let records = read_outcome_log(&path).unwrap();
    assert_eq!(records.len(), 12);
    let mut latencies: Vec<u64> = records.iter().map(|r| r.latency_ms).collect();
    latencies.sort_unstable();
    assert_eq!(latencies, (0..12).collect::<Vec<u64>>());
}

#[test]
fn test_concurrent_appends_lose_nothing() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("outcomes.csv");
    let writer = Arc::new(BatchedLogWriter::with_batch_size(&path, 7).unwrap());

    let mut handles = Vec::new();
    for t in 0..4u64 {
        let writer = Arc::clone(&writer);
        handles.push(thread::spawn(move || {
            for n in 0..250u64 {
                writer.append(record(t * 1_000 + n));
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }
    writer.flush();

    let records = read_outcome_log(&path).unwrap();
    assert_eq!(records.len(), 1_000);
    let mut latencies: Vec<u64> = records.iter().map(|r| r.latency_ms).collect();
    latencies.sort_unstable();
    latencies.dedup();
    assert_eq!(latencies.len(), 1_000, "duplicated or lost records");
}

#[test]
fn test_create_truncates_a_previous_runs_log() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("outcomes.csv");
    fs::write(&path, "123,WRITE,1,200\n").unwrap();

    let writer = BatchedLogWriter::create(&path).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "");

    writer.append(record(1));
    writer.flush();
    assert_eq!(read_outcome_log(&path).unwrap().len(), 1);
}

#[test]
fn test_create_fails_fast_on_unwritable_destination() {
    let dir = tempdir().unwrap();
    // The directory itself is not a writable file destination.
    let err = BatchedLogWriter::create(dir.path()).unwrap_err();
    assert!(matches!(err, LoadburstError::Persistence(_)), "got {err:?}");
}

#[test]
fn test_read_back_reports_malformed_line_with_its_number() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("outcomes.csv");
    fs::write(&path, "1000,WRITE,5,200\nnot,a,record\n1002,READ,7,200\n").unwrap();

    let err = read_outcome_log(&path).unwrap_err();
    assert!(
        matches!(err, LoadburstError::MalformedRecord { line: 2, .. }),
        "got {err:?}"
    );
}
