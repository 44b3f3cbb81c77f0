use std::sync::Arc;
use std::thread;

use loadburst_runner::counters::RunCounters;

#[test]
fn test_counters_start_at_zero() {
    let counters = RunCounters::new();
    assert_eq!(counters.success(), 0);
    assert_eq!(counters.failure(), 0);
}

#[test]
fn test_add_n_accumulates_independently() {
    let counters = RunCounters::new();
    counters.add_success(5);
    counters.add_success(3);
    counters.add_failure(2);

    assert_eq!(counters.success(), 8);
    assert_eq!(counters.failure(), 2);
}

#[test]
fn test_no_lost_updates_under_concurrent_writers() {
    let counters = Arc::new(RunCounters::new());
    let mut handles = Vec::new();

    for _ in 0..8 {
        let counters = Arc::clone(&counters);
        handles.push(thread::spawn(move || {
            for _ in 0..1_000 {
                counters.add_success(1);
                counters.add_failure(2);
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    // Read after all writers have quiesced: exact totals, no torn reads.
    assert_eq!(counters.success(), 8_000);
    assert_eq!(counters.failure(), 16_000);
}
