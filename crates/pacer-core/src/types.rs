use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Number of fractional digits every stored amount carries.
pub const MONEY_SCALE: u32 = 2;

/// Row id of a brand (`brands.id`).
pub type BrandId = i64;

/// Row id of a campaign (`campaigns.id`).
pub type CampaignId = i64;

/// Row id of a spend log entry (`spend_logs.id`).
pub type SpendLogId = i64;

/// Owner of the budget limits shared by its campaigns.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Brand {
    pub id: BrandId,
    pub name: String,
    pub daily_budget: Decimal,
    pub monthly_budget: Decimal,
}

/// Daily and monthly limits copied from a campaign's brand.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BudgetLimits {
    pub daily: Decimal,
    pub monthly: Decimal,
}

/// Allowed hours `[start_hour, end_hour)` in local wall-clock time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DaypartingWindow {
    pub start_hour: u8,
    pub end_hour: u8,
}

/// A spend-tracked campaign together with its brand limits and optional window.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Campaign {
    pub id: CampaignId,
    pub brand_id: BrandId,
    pub brand_name: String,
    pub name: String,
    pub is_active: bool,
    pub current_daily_spend: Decimal,
    pub current_monthly_spend: Decimal,
    pub limits: BudgetLimits,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dayparting: Option<DaypartingWindow>,
}

impl Campaign {
    pub fn status_label(&self) -> &'static str {
        if self.is_active {
            "active"
        } else {
            "paused"
        }
    }
}

/// One immutable spend event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpendLog {
    pub id: SpendLogId,
    pub campaign_id: CampaignId,
    /// RFC 3339 UTC, assigned by the store.
    pub ts: String,
    pub amount: Decimal,
}

/// Selection for campaign listings. Empty filter selects everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CampaignFilter {
    pub is_active: Option<bool>,
    pub brand_id: Option<BrandId>,
}

/// Outcome of one sweep or reset pass over the campaign table.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SweepReport {
    /// Campaigns visited.
    pub examined: usize,
    /// Campaigns whose stored state was rewritten.
    pub changed: usize,
    /// Campaigns skipped because their update failed.
    pub failed: usize,
}

impl std::fmt::Display for SweepReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} examined, {} changed, {} failed",
            self.examined, self.changed, self.failed
        )
    }
}
