//! Periodic job scheduling.
//!
//! Three jobs keep campaign state in line with the clock: the enforcement
//! sweep, the daily reset and the monthly reset. Their cron triggers live in a
//! process-wide [`JobTable`] that is built once from the workspace config. A
//! [`Runner`] polls the table, asks which jobs are due and hands them to a
//! [`JobExecutor`], normally the ledger store.

pub(crate) mod cron;
mod error;
mod job;
mod runner;
mod table;

pub use self::cron::{is_due, normalize_cron};
pub use self::error::SchedError;
pub use self::job::{Job, JobExecutor};
pub use self::runner::{JobRun, Runner};
pub use self::table::{global, init_global, JobTable, ScheduledJob};
