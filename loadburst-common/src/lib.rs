use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Status recorded for an issuance whose failure exposes no HTTP status
/// (connection refused, timeout surfaced by the transport, and so on).
pub const STATUS_UNAVAILABLE: u16 = 0;

/// Canonical status recorded for a successful issuance.
pub const STATUS_SUCCESS: u16 = 200;

/// The kind of operation an issuance performed against the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OpKind {
    Write,
    Read,
}

impl OpKind {
    /// Name used for the operation-kind field in the durable log.
    pub fn as_str(&self) -> &'static str {
        match self {
            OpKind::Write => "WRITE",
            OpKind::Read => "READ",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "WRITE" => Some(OpKind::Write),
            "READ" => Some(OpKind::Read),
            _ => None,
        }
    }
}

/// One completed issuance: when it started, what it did, how long it took,
/// and the status it ended with. Immutable once created; appended to the
/// durable log and never mutated. Log order is append order, which under
/// concurrent workers is not timestamp order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutcomeRecord {
    /// Wall-clock start of the call, Unix epoch milliseconds.
    pub start_timestamp_ms: u64,
    pub op: OpKind,
    pub latency_ms: u64,
    pub status_code: u16,
}

impl OutcomeRecord {
    /// A record counts as successful when its status is 2xx.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    /// Serialize as one headerless CSV line:
    /// `<start_timestamp_ms>,<op>,<latency_ms>,<status_code>`.
    pub fn to_csv_line(&self) -> String {
        format!(
            "{},{},{},{}",
            self.start_timestamp_ms,
            self.op.as_str(),
            self.latency_ms,
            self.status_code
        )
    }

    /// Parse one log line. `line_number` (1-based) is carried into the error
    /// so a consumer can report where its input went bad.
    pub fn parse_csv_line(line: &str, line_number: usize) -> Result<Self> {
        let malformed = |reason: &str| LoadburstError::MalformedRecord {
            line: line_number,
            reason: reason.to_string(),
        };

        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() != 4 {
            return Err(malformed(&format!("expected 4 fields, got {}", fields.len())));
        }

        let start_timestamp_ms = fields[0]
            .parse::<u64>()
            .map_err(|_| malformed("start timestamp is not an unsigned integer"))?;
        let op = OpKind::from_name(fields[1])
            .ok_or_else(|| malformed(&format!("unknown operation kind {:?}", fields[1])))?;
        let latency_ms = fields[2]
            .parse::<u64>()
            .map_err(|_| malformed("latency is not an unsigned integer"))?;
        let status_code = fields[3]
            .parse::<u16>()
            .map_err(|_| malformed("status code is not a u16"))?;

        Ok(OutcomeRecord { start_timestamp_ms, op, latency_ms, status_code })
    }
}

/// Error types for loadburst operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LoadburstError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("HTTP {status}: {message}")]
    ServiceError { status: u16, message: String },

    #[error("Persistence failure: {0}")]
    Persistence(String),

    #[error("No successful records to aggregate")]
    EmptyDataset,

    #[error("Invalid run configuration: {0}")]
    InvalidConfig(String),

    #[error("Malformed record at line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },
}

impl LoadburstError {
    /// HTTP status carried by the failure, when it exposes one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            LoadburstError::ServiceError { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// JSON error envelope returned by the target service for error responses
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Result type for loadburst operations
pub type Result<T> = std::result::Result<T, LoadburstError>;
