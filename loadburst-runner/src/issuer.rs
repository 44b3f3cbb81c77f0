use std::sync::Arc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use loadburst_client::{Client, RecordPayload};
use loadburst_common::{OpKind, OutcomeRecord, STATUS_SUCCESS, STATUS_UNAVAILABLE};
use rand::Rng;

use crate::config::{DEFAULT_READ_ID, PAYLOAD_MAX_BYTES, PAYLOAD_MIN_BYTES};
use crate::counters::RunCounters;
use crate::log_writer::BatchedLogWriter;

/// Where a measured task reports its outcomes. Warm-up tasks run without
/// one, which is what keeps warm-up traffic out of the counters and the log.
#[derive(Clone)]
pub struct RunRecorder {
    pub counters: Arc<RunCounters>,
    pub log: Arc<BatchedLogWriter>,
}

/// One timed issuance: the record destined for the log plus whether it
/// counts as a success. Remote failures arrive here as ordinary `Err`
/// values from the client, never as unwinding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issuance {
    pub record: OutcomeRecord,
    pub success: bool,
}

/// Wall-clock now, Unix epoch milliseconds.
pub fn epoch_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Generate a random record payload for write operations.
pub fn generate_payload(rng: &mut impl Rng) -> RecordPayload {
    let len: usize = rng.gen_range(PAYLOAD_MIN_BYTES..=PAYLOAD_MAX_BYTES);
    RecordPayload {
        name: format!("record_{}", rng.gen::<u32>()),
        data: (0..len).map(|_| rng.gen::<u8>()).collect(),
    }
}

/// Issue one write, timed wall-clock around the call boundary. Returns the
/// issuance and, on success, the identifier the store assigned (so the
/// paired read can fetch something that exists).
pub async fn issue_write(client: &Client, payload: &RecordPayload) -> (Issuance, Option<String>) {
    let start_timestamp_ms = epoch_ms();
    let started = Instant::now();
    let result = client.create(payload).await;
    let latency_ms = started.elapsed().as_millis() as u64;

    match result {
        Ok(created) => (
            Issuance {
                record: OutcomeRecord {
                    start_timestamp_ms,
                    op: OpKind::Write,
                    latency_ms,
                    status_code: STATUS_SUCCESS,
                },
                success: true,
            },
            Some(created.id),
        ),
        Err(e) => (
            Issuance {
                record: OutcomeRecord {
                    start_timestamp_ms,
                    op: OpKind::Write,
                    latency_ms,
                    status_code: e.status_code().unwrap_or(STATUS_UNAVAILABLE),
                },
                success: false,
            },
            None,
        ),
    }
}

/// Issue one read, timed the same way as the write.
pub async fn issue_read(client: &Client, id: &str) -> Issuance {
    let start_timestamp_ms = epoch_ms();
    let started = Instant::now();
    let result = client.fetch(id).await;
    let latency_ms = started.elapsed().as_millis() as u64;

    match result {
        Ok(_) => Issuance {
            record: OutcomeRecord {
                start_timestamp_ms,
                op: OpKind::Read,
                latency_ms,
                status_code: STATUS_SUCCESS,
            },
            success: true,
        },
        Err(e) => Issuance {
            record: OutcomeRecord {
                start_timestamp_ms,
                op: OpKind::Read,
                latency_ms,
                status_code: e.status_code().unwrap_or(STATUS_UNAVAILABLE),
            },
            success: false,
        },
    }
}

/// One worker task: a fixed-size loop of paired write-then-read operations.
/// Every issuance produces exactly one record and one tally; task-local
/// tallies are folded into the shared counters with a single atomic add per
/// counter when the loop finishes.
pub async fn run_task(client: Arc<Client>, iterations: u32, recorder: Option<RunRecorder>) {
    let payload = generate_payload(&mut rand::thread_rng());
    let mut read_id = DEFAULT_READ_ID.to_string();
    let mut local_success: u64 = 0;
    let mut local_failure: u64 = 0;

    for _ in 0..iterations {
        let (write, created_id) = issue_write(&client, &payload).await;
        if let Some(id) = created_id {
            read_id = id;
        }
        let read = issue_read(&client, &read_id).await;

        if let Some(recorder) = &recorder {
            for issuance in [write, read] {
                if issuance.success {
                    local_success += 1;
                } else {
                    local_failure += 1;
                }
                recorder.log.append(issuance.record);
            }
        }
    }

    if let Some(recorder) = &recorder {
        recorder.counters.add_success(local_success);
        recorder.counters.add_failure(local_failure);
    }
}
