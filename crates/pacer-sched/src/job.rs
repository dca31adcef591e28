use chrono::NaiveDateTime;
use pacer_core::SweepReport;
use pacer_ledger::SqliteStore;

/// The periodic jobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Job {
    ResetDaily,
    ResetMonthly,
    EnforceCampaignStatus,
}

impl Job {
    /// All jobs in the order a tick runs them. Resets go first so a campaign
    /// reactivated at midnight is re-checked against its window in the same tick.
    pub const ALL: [Job; 3] = [Job::ResetDaily, Job::ResetMonthly, Job::EnforceCampaignStatus];

    pub fn name(self) -> &'static str {
        match self {
            Job::EnforceCampaignStatus => "enforce-campaign-status-every-5-minutes",
            Job::ResetDaily => "reset-daily-spend-at-midnight",
            Job::ResetMonthly => "reset-monthly-spend-on-first",
        }
    }

    pub fn from_name(name: &str) -> Option<Job> {
        Job::ALL.into_iter().find(|j| j.name() == name)
    }
}

impl std::fmt::Display for Job {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Something that can carry out a job.
///
/// `now` is the local wall-clock time of the tick; the enforcement sweep reads
/// its hour for dayparting.
pub trait JobExecutor {
    fn execute(&mut self, job: Job, now: NaiveDateTime) -> pacer_ledger::Result<SweepReport>;
}

impl JobExecutor for SqliteStore {
    fn execute(&mut self, job: Job, now: NaiveDateTime) -> pacer_ledger::Result<SweepReport> {
        match job {
            Job::EnforceCampaignStatus => self.enforce_campaign_status(&now),
            Job::ResetDaily => self.reset_daily_budgets(),
            Job::ResetMonthly => self.reset_monthly_budgets(),
        }
    }
}
