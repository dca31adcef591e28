use std::str::FromStr;
use std::sync::OnceLock;

use ::cron::Schedule;
use chrono::{DateTime, TimeZone};
use pacer_ledger::PacerConfig;

use crate::cron::normalize_cron;
use crate::error::SchedError;
use crate::job::Job;

static JOB_TABLE: OnceLock<JobTable> = OnceLock::new();

/// One job and its parsed trigger.
#[derive(Debug, Clone)]
pub struct ScheduledJob {
    pub job: Job,
    /// Normalized 6-field cron expression (seconds prepended).
    pub expression: String,
    pub schedule: Schedule,
}

/// The fixed set of periodic jobs and their triggers.
#[derive(Debug, Clone)]
pub struct JobTable {
    entries: Vec<ScheduledJob>,
}

impl JobTable {
    /// Build the table from the workspace config, in [`Job::ALL`] order.
    pub fn from_config(config: &PacerConfig) -> Result<Self, SchedError> {
        let entries = Job::ALL
            .into_iter()
            .map(|job| -> Result<ScheduledJob, SchedError> {
                let raw = match job {
                    Job::EnforceCampaignStatus => &config.enforce_cron,
                    Job::ResetDaily => &config.reset_daily_cron,
                    Job::ResetMonthly => &config.reset_monthly_cron,
                };
                let expression = normalize_cron(raw);
                let schedule =
                    Schedule::from_str(&expression).map_err(|source| SchedError::InvalidCron {
                        job,
                        expression: raw.clone(),
                        source,
                    })?;
                Ok(ScheduledJob {
                    job,
                    expression,
                    schedule,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[ScheduledJob] {
        &self.entries
    }

    pub fn get(&self, job: Job) -> Option<&ScheduledJob> {
        self.entries.iter().find(|e| e.job == job)
    }

    /// Next time `job` fires strictly after `after`.
    pub fn next_fire<Tz: TimeZone>(&self, job: Job, after: &DateTime<Tz>) -> Option<DateTime<Tz>> {
        self.get(job)?.schedule.after(after).next()
    }
}

/// Initialize the process-wide job table. Fails if called twice.
pub fn init_global(config: &PacerConfig) -> Result<&'static JobTable, SchedError> {
    let table = JobTable::from_config(config)?;
    JOB_TABLE
        .set(table)
        .map_err(|_| SchedError::AlreadyInitialized)?;
    JOB_TABLE.get().ok_or(SchedError::AlreadyInitialized)
}

/// The process-wide job table, if initialized.
pub fn global() -> Option<&'static JobTable> {
    JOB_TABLE.get()
}
