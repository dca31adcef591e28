use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use chrono::{DateTime, TimeZone};
use pacer_core::SweepReport;
use tracing::{debug, info, warn};

use crate::cron::is_due;
use crate::job::{Job, JobExecutor};
use crate::table::JobTable;

/// Longest single sleep while waiting for the next tick, so a stop request
/// is noticed promptly.
const STOP_POLL: Duration = Duration::from_millis(200);

/// One job executed by a tick. `report` is `None` if the job failed as a whole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRun {
    pub job: Job,
    pub report: Option<SweepReport>,
}

/// Polls a [`JobTable`] and runs whatever is due.
pub struct Runner<'a, Tz: TimeZone> {
    table: &'a JobTable,
    last_run: HashMap<Job, DateTime<Tz>>,
}

impl<'a, Tz: TimeZone> Runner<'a, Tz> {
    /// Every job counts as having last run at `started_at`, so nothing fires
    /// just because the runner started.
    pub fn new(table: &'a JobTable, started_at: DateTime<Tz>) -> Self {
        let last_run = table
            .entries()
            .iter()
            .map(|e| (e.job, started_at.clone()))
            .collect();
        Self { table, last_run }
    }

    pub fn last_run(&self, job: Job) -> Option<&DateTime<Tz>> {
        self.last_run.get(&job)
    }

    /// Jobs due at `now`, in table order.
    pub fn due_jobs(&self, now: &DateTime<Tz>) -> Vec<Job> {
        self.table
            .entries()
            .iter()
            .filter(|e| match self.last_run.get(&e.job) {
                Some(last) => is_due(&e.schedule, now, last),
                None => true,
            })
            .map(|e| e.job)
            .collect()
    }

    /// Run every due job once and record `now` as its last run.
    ///
    /// A failing job is logged and does not stop the others; it is not
    /// retried before its next scheduled tick.
    pub fn tick<E: JobExecutor + ?Sized>(&mut self, executor: &mut E, now: DateTime<Tz>) -> Vec<JobRun> {
        let wall_clock = now.naive_local();
        let mut runs = Vec::new();
        for job in self.due_jobs(&now) {
            let report = match executor.execute(job, wall_clock) {
                Ok(report) => {
                    info!(job = job.name(), %report, "job finished");
                    Some(report)
                }
                Err(e) => {
                    warn!(job = job.name(), error = %e, "job failed");
                    None
                }
            };
            self.last_run.insert(job, now.clone());
            runs.push(JobRun { job, report });
        }
        if runs.is_empty() {
            debug!(%wall_clock, "nothing due");
        }
        runs
    }

    /// Tick every `interval` until `stop` is set.
    pub fn run_until<E, F>(&mut self, executor: &mut E, stop: &AtomicBool, interval: Duration, mut clock: F)
    where
        E: JobExecutor + ?Sized,
        F: FnMut() -> DateTime<Tz>,
    {
        info!(interval_secs = interval.as_secs(), "scheduler started");
        while !stop.load(Ordering::SeqCst) {
            self.tick(executor, clock());
            // An interval too large for `Instant` means wait for the stop flag.
            let deadline = Instant::now().checked_add(interval);
            while !stop.load(Ordering::SeqCst) {
                let now = Instant::now();
                match deadline {
                    Some(deadline) if now >= deadline => break,
                    Some(deadline) => std::thread::sleep((deadline - now).min(STOP_POLL)),
                    None => std::thread::sleep(STOP_POLL),
                }
            }
        }
        info!("scheduler stopped");
    }
}
