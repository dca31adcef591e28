//! Time-of-day windows during which a campaign may run.

use crate::types::{Campaign, DaypartingWindow};
use chrono::Timelike;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HourError {
    #[error("{field} must be between 0 and 23, got {value}")]
    OutOfRange { field: &'static str, value: i64 },
}

impl DaypartingWindow {
    /// Build a window from raw hours. Only the 0-23 range is checked;
    /// a window whose end does not exceed its start is accepted and never matches.
    pub fn new(start_hour: i64, end_hour: i64) -> Result<Self, HourError> {
        Ok(Self {
            start_hour: check_hour("start_hour", start_hour)?,
            end_hour: check_hour("end_hour", end_hour)?,
        })
    }

    /// `start_hour <= hour < end_hour`.
    pub fn contains_hour(&self, hour: u32) -> bool {
        u32::from(self.start_hour) <= hour && hour < u32::from(self.end_hour)
    }
}

fn check_hour(field: &'static str, value: i64) -> Result<u8, HourError> {
    u8::try_from(value)
        .ok()
        .filter(|h| *h <= 23)
        .ok_or(HourError::OutOfRange { field, value })
}

/// Whether `now` falls inside the campaign's allowed hours.
///
/// Campaigns without a window are always allowed. Only the hour component of
/// `now` is inspected, in whatever timezone the caller supplied.
pub fn is_within_dayparting<T: Timelike>(campaign: &Campaign, now: &T) -> bool {
    match &campaign.dayparting {
        None => true,
        Some(window) => window.contains_hour(now.hour()),
    }
}
