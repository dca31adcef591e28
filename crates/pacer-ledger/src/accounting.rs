//! Per-event spend accounting.
//!
//! `log_spend` is the only writer of the spend log and the only per-event
//! writer of campaign totals. Every call is one IMMEDIATE transaction: SQLite
//! takes the database write lock before the campaign row is read, so two
//! calls for the same campaign can never interleave between the read and the
//! update. Concurrent callers wait on `busy_timeout` and then see the
//! committed totals.

use crate::error::{LedgerError, Result};
use crate::sqlite_store::{load_campaign, now_rfc3339, SqliteStore};
use pacer_core::{exceeds_budget, validate_amount, Campaign, CampaignId, SpendLog};
use rusqlite::{params, TransactionBehavior};
use rust_decimal::Decimal;
use tracing::{debug, info};

/// Result of a successful `log_spend`.
#[derive(Debug, Clone, PartialEq)]
pub struct SpendOutcome {
    /// The appended ledger entry.
    pub log: SpendLog,
    /// Campaign state as committed.
    pub campaign: Campaign,
    /// This spend pushed the campaign over a limit and paused it.
    pub paused: bool,
}

impl SqliteStore {
    /// Record one spend event against `campaign_id`.
    ///
    /// Appends a ledger entry, adds `amount` to the daily and monthly totals
    /// and pauses the campaign if either total now strictly exceeds its brand
    /// limit. Fails without writing anything if the amount is not positive,
    /// the campaign does not exist, or the campaign is already paused.
    pub fn log_spend(&mut self, campaign_id: CampaignId, amount: Decimal) -> Result<SpendOutcome> {
        let amount = validate_amount(amount)?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let mut campaign =
            load_campaign(&tx, campaign_id)?.ok_or(LedgerError::CampaignNotFound(campaign_id))?;
        if !campaign.is_active {
            debug!(campaign_id, %amount, "rejected spend for paused campaign");
            return Err(LedgerError::InactiveCampaign(campaign_id));
        }

        let ts = now_rfc3339()?;
        tx.execute(
            "INSERT INTO spend_logs (campaign_id, ts, amount) VALUES (?1, ?2, ?3)",
            params![campaign_id, ts, amount.to_string()],
        )?;
        let log = SpendLog {
            id: tx.last_insert_rowid(),
            campaign_id,
            ts,
            amount,
        };

        campaign.current_daily_spend += amount;
        campaign.current_monthly_spend += amount;
        let paused = exceeds_budget(
            campaign.current_daily_spend,
            campaign.current_monthly_spend,
            &campaign.limits,
        );
        if paused {
            campaign.is_active = false;
        }

        tx.execute(
            "UPDATE campaigns
             SET current_daily_spend = ?2, current_monthly_spend = ?3, is_active = ?4
             WHERE id = ?1",
            params![
                campaign_id,
                campaign.current_daily_spend.to_string(),
                campaign.current_monthly_spend.to_string(),
                campaign.is_active
            ],
        )?;
        tx.commit()?;

        if paused {
            info!(
                campaign_id,
                daily = %campaign.current_daily_spend,
                monthly = %campaign.current_monthly_spend,
                "campaign paused: budget exceeded"
            );
        } else {
            debug!(campaign_id, %amount, "spend logged");
        }

        Ok(SpendOutcome {
            log,
            campaign,
            paused,
        })
    }
}
