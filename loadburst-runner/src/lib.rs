pub mod config;
pub mod counters;
pub mod driver;
pub mod issuer;
pub mod log_writer;
pub mod stats;
pub mod throughput;
