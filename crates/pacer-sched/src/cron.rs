//! Cron normalization and due-check helpers.

use chrono::{DateTime, TimeZone};
use cron::Schedule;

/// Normalize a 5-field cron expression to 6-field by prepending "0 " for seconds.
///
/// The `cron` crate requires 6 fields: `sec min hour day-of-month month day-of-week`.
/// Config uses standard 5-field cron: `min hour day-of-month month day-of-week`.
pub fn normalize_cron(cron_5field: &str) -> String {
    let trimmed = cron_5field.trim();
    let field_count = trimmed.split_whitespace().count();
    if field_count == 5 {
        format!("0 {}", trimmed)
    } else {
        // Already 6-field or non-standard; pass through as-is.
        trimmed.to_string()
    }
}

/// A job is due if its first scheduled tick after `last_run` is at or before `now`.
///
/// Several missed ticks collapse into a single run.
pub fn is_due<Tz: TimeZone>(schedule: &Schedule, now: &DateTime<Tz>, last_run: &DateTime<Tz>) -> bool {
    match schedule.after(last_run).next() {
        Some(next) => next <= *now,
        None => false,
    }
}
