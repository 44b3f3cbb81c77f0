/// Buffered records that trigger a flush of the outcome log.
pub const BATCH_SIZE: usize = 1000;

/// Warm-up bursts submitted before the paced phase begins.
pub const WARMUP_TASKS: u32 = 10;

/// Paired-operation iterations per warm-up burst.
pub const WARMUP_ITERATIONS: u32 = 100;

/// Default paired-operation iterations per paced-phase task.
pub const DEFAULT_TASK_ITERATIONS: u32 = 1000;

/// Identifier a task reads until one of its own writes has been acknowledged.
pub const DEFAULT_READ_ID: &str = "1";

/// Generated payload size bounds (bytes).
pub const PAYLOAD_MIN_BYTES: usize = 8;
pub const PAYLOAD_MAX_BYTES: usize = 64;
