use std::path::PathBuf;
use std::process;
use std::time::Duration;

use clap::Parser;
use loadburst_client::{Client, ClientConfig};
use loadburst_common::Result;
use loadburst_runner::driver::{LoadDriver, LoadPlan, RunSummary};
use loadburst_runner::log_writer::{read_outcome_log, BatchedLogWriter};
use loadburst_runner::stats::LatencyStats;
use loadburst_runner::{config, throughput};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "loadburst", about = "Paced burst load generator for record-store services")]
struct Args {
    /// Base URL of the target record store, e.g. http://127.0.0.1:8080
    #[arg(long)]
    target_url: String,

    /// Worker pool size per phase
    #[arg(long, default_value_t = 10)]
    concurrency: usize,

    /// Number of paced groups
    #[arg(long, default_value_t = 10)]
    groups: u32,

    /// Idle delay between paced groups (seconds)
    #[arg(long, default_value_t = 2)]
    delay_secs: u64,

    /// Paired-operation loop iterations per task
    #[arg(long, default_value_t = config::DEFAULT_TASK_ITERATIONS)]
    iterations: u32,

    /// Destination for the per-request outcome log (CSV, overwritten per run)
    #[arg(long, default_value = "loadburst-outcomes.csv")]
    log_path: PathBuf,

    /// Destination for the per-second throughput report (CSV, overwritten per run)
    #[arg(long, default_value = "loadburst-throughput.csv")]
    throughput_path: PathBuf,

    /// Emit the final report as JSON instead of text
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let plan = LoadPlan {
        concurrency: args.concurrency,
        group_count: args.groups,
        inter_group_delay: Duration::from_secs(args.delay_secs),
        iterations_per_task: args.iterations,
    };

    let client = Client::new(ClientConfig { base_url: args.target_url.clone() });

    let log = match BatchedLogWriter::create(&args.log_path) {
        Ok(log) => log,
        Err(e) => {
            eprintln!("Failed to open outcome log: {e}");
            process::exit(3);
        }
    };

    let driver = LoadDriver::new(plan, client, log);
    let summary = match driver.run().await {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("Run failed: {e}");
            process::exit(2);
        }
    };

    let records = match read_outcome_log(&args.log_path) {
        Ok(records) => records,
        Err(e) => {
            eprintln!("Failed to read outcome log back: {e}");
            process::exit(3);
        }
    };

    let stats = LatencyStats::compute(&records);

    let starts: Vec<u64> = records.iter().map(|r| r.start_timestamp_ms).collect();
    let buckets = throughput::bucketize(
        &starts,
        summary.timing.phase_start_ms,
        summary.timing.duration_secs(),
    );
    if let Err(e) = throughput::write_report(&args.throughput_path, &buckets) {
        eprintln!("Failed to write throughput report: {e}");
    }

    if args.json {
        print_json_report(&summary, &stats);
    } else {
        print_report(&summary, &stats);
    }
}

fn print_report(summary: &RunSummary, stats: &Result<LatencyStats>) {
    println!("Loadburst Run Results");
    println!("=====================");
    println!("Wall time:             {:.1} s", summary.wall_time_ms as f64 / 1000.0);
    println!("Throughput:            {:.1} rps", summary.throughput_rps);
    println!("Successful requests:   {}", summary.success_count);
    println!("Failed requests:       {}", summary.failure_count);
    println!();

    match stats {
        Ok(stats) => {
            println!("Mean latency:          {:.1} ms", stats.mean_ms);
            println!("Median latency:        {:.1} ms", stats.median_ms);
            println!("P99 latency:           {} ms", stats.p99_ms);
            println!("Min latency:           {} ms", stats.min_ms);
            println!("Max latency:           {} ms", stats.max_ms);
        }
        Err(_) => println!("No successful requests; latency statistics skipped"),
    }
}

fn print_json_report(summary: &RunSummary, stats: &Result<LatencyStats>) {
    let report = serde_json::json!({
        "summary": summary,
        "latency": stats.as_ref().ok(),
    });
    match serde_json::to_string_pretty(&report) {
        Ok(text) => println!("{text}"),
        Err(e) => eprintln!("Failed to serialize report: {e}"),
    }
}
