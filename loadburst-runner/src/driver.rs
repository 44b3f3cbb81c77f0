use std::sync::Arc;
use std::time::{Duration, Instant};

use loadburst_client::Client;
use loadburst_common::{LoadburstError, Result};
use serde::Serialize;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::config::{WARMUP_ITERATIONS, WARMUP_TASKS};
use crate::counters::RunCounters;
use crate::issuer::{epoch_ms, run_task, RunRecorder};
use crate::log_writer::BatchedLogWriter;

/// Shape of one run: pool size, how many paced groups, the idle gap between
/// them, and the fixed loop length of each task.
#[derive(Debug, Clone)]
pub struct LoadPlan {
    pub concurrency: usize,
    pub group_count: u32,
    pub inter_group_delay: Duration,
    pub iterations_per_task: u32,
}

impl LoadPlan {
    /// Reject plans no worker should ever be started for.
    pub fn validate(&self) -> Result<()> {
        if self.concurrency == 0 {
            return Err(LoadburstError::InvalidConfig(
                "concurrency must be greater than zero".to_string(),
            ));
        }
        if self.iterations_per_task == 0 {
            return Err(LoadburstError::InvalidConfig(
                "iterations per task must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Boundaries of the paced (measured) phase, epoch milliseconds. Written
/// once by the driver after full pool drain; read-only afterward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunPhaseTiming {
    pub phase_start_ms: u64,
    pub phase_end_ms: u64,
}

impl RunPhaseTiming {
    /// Phase duration rounded up to whole seconds; the time axis of the
    /// throughput table.
    pub fn duration_secs(&self) -> u64 {
        self.phase_end_ms
            .saturating_sub(self.phase_start_ms)
            .div_ceil(1000)
    }
}

/// What a completed run reports, whether or not any issuance failed.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub success_count: u64,
    pub failure_count: u64,
    pub wall_time_ms: u64,
    pub throughput_rps: f64,
    pub timing: RunPhaseTiming,
}

/// Orchestrates one run: an unmeasured warm-up phase, then the paced load
/// phase over a bounded worker pool, then a forced flush of the outcome log.
pub struct LoadDriver {
    plan: LoadPlan,
    client: Arc<Client>,
    counters: Arc<RunCounters>,
    log: Arc<BatchedLogWriter>,
}

impl LoadDriver {
    pub fn new(plan: LoadPlan, client: Client, log: BatchedLogWriter) -> Self {
        Self {
            plan,
            client: Arc::new(client),
            counters: Arc::new(RunCounters::new()),
            log: Arc::new(log),
        }
    }

    /// Run warm-up and the paced phase to completion. Individual issuance
    /// failures never abort the run; only an invalid plan does.
    pub async fn run(&self) -> Result<RunSummary> {
        self.plan.validate()?;

        self.warm_up().await;

        tracing::info!(
            concurrency = self.plan.concurrency,
            groups = self.plan.group_count,
            delay_ms = self.plan.inter_group_delay.as_millis() as u64,
            "starting paced load phase"
        );

        let phase_start_ms = epoch_ms();
        let started = Instant::now();

        let pool = Arc::new(Semaphore::new(self.plan.concurrency));
        let mut tasks = JoinSet::new();

        for group in 0..self.plan.group_count {
            for _ in 0..self.plan.concurrency {
                self.submit(&mut tasks, &pool, self.plan.iterations_per_task, true);
            }
            if group + 1 < self.plan.group_count {
                tokio::time::sleep(self.plan.inter_group_delay).await;
            }
        }

        drain(&mut tasks).await;

        // Timing is taken only after every paced task has completed.
        let phase_end_ms = epoch_ms();
        let wall_time_ms = started.elapsed().as_millis() as u64;

        self.log.flush();

        let success_count = self.counters.success();
        let failure_count = self.counters.failure();
        let throughput_rps = if wall_time_ms == 0 {
            0.0
        } else {
            success_count as f64 * 1000.0 / wall_time_ms as f64
        };

        Ok(RunSummary {
            success_count,
            failure_count,
            wall_time_ms,
            throughput_rps,
            timing: RunPhaseTiming { phase_start_ms, phase_end_ms },
        })
    }

    /// Fixed bursts with no pacing delay and no recorder attached, so
    /// cold-start effects (connection setup, caches) settle before anything
    /// is measured.
    async fn warm_up(&self) {
        tracing::info!(
            tasks = WARMUP_TASKS,
            iterations = WARMUP_ITERATIONS,
            "starting warm-up phase"
        );

        let pool = Arc::new(Semaphore::new(self.plan.concurrency));
        let mut tasks = JoinSet::new();
        for _ in 0..WARMUP_TASKS {
            self.submit(&mut tasks, &pool, WARMUP_ITERATIONS, false);
        }
        drain(&mut tasks).await;
    }

    /// Queue one task on the phase's pool. Submission itself never blocks;
    /// boundedness comes from the pool permit each task acquires before it
    /// starts issuing.
    fn submit(
        &self,
        tasks: &mut JoinSet<()>,
        pool: &Arc<Semaphore>,
        iterations: u32,
        measured: bool,
    ) {
        let pool = Arc::clone(pool);
        let client = Arc::clone(&self.client);
        let recorder = measured.then(|| RunRecorder {
            counters: Arc::clone(&self.counters),
            log: Arc::clone(&self.log),
        });

        tasks.spawn(async move {
            // The pool semaphore lives as long as every task; acquisition
            // only fails on close, which never happens.
            let Ok(_permit) = pool.acquire_owned().await else {
                return;
            };
            run_task(client, iterations, recorder).await;
        });
    }
}

async fn drain(tasks: &mut JoinSet<()>) {
    while let Some(joined) = tasks.join_next().await {
        if let Err(e) = joined {
            tracing::error!("worker task failed: {e}");
        }
    }
}
