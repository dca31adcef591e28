//! Periodic passes over the whole campaign table: the enforcement sweep and
//! the daily/monthly resets.
//!
//! Every campaign is handled in its own transaction. A failure on one
//! campaign is logged and counted in the [`SweepReport`]; the pass carries on
//! with the rest.

use crate::error::{LedgerError, Result};
use crate::sqlite_store::{load_campaign, SqliteStore};
use chrono::Timelike;
use pacer_core::{at_or_over_budget, is_within_dayparting, Campaign, CampaignId, SweepReport};
use rusqlite::{params, TransactionBehavior};
use tracing::{debug, info, warn};

/// What the enforcement sweep decided for one campaign.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Enforcement {
    /// Outside its dayparting window; paused.
    OutsideWindow,
    /// Inside its window but at or over a budget limit; paused.
    OverBudget,
    /// Left as it was.
    Unchanged,
}

impl SqliteStore {
    /// Re-evaluate every campaign against its dayparting window and budget.
    ///
    /// Never reactivates a campaign. `now` is used as given; only its hour
    /// matters.
    pub fn enforce_campaign_status<T: Timelike>(&mut self, now: &T) -> Result<SweepReport> {
        let report = self.for_each_campaign("enforce", |store, id| {
            store
                .enforce_one(id, now)
                .map(|e| e != Enforcement::Unchanged)
        })?;
        info!(%report, hour = now.hour(), "enforcement sweep finished");
        Ok(report)
    }

    /// Apply the sweep's rules to a single campaign.
    pub fn enforce_one<T: Timelike>(&mut self, id: CampaignId, now: &T) -> Result<Enforcement> {
        self.pause_if(id, |campaign| {
            if is_within_dayparting(campaign, now) {
                budget_decision(campaign)
            } else {
                Enforcement::OutsideWindow
            }
        })
    }

    /// Pause one campaign if either total is at or over its limit.
    /// Returns whether it was paused by this call.
    pub fn enforce_budget(&mut self, id: CampaignId) -> Result<bool> {
        let decision = self.pause_if(id, budget_decision)?;
        Ok(decision == Enforcement::OverBudget)
    }

    /// Load `id` in its own transaction and pause it if `decide` says so.
    /// An already paused campaign is reported as unchanged.
    fn pause_if<F>(&mut self, id: CampaignId, decide: F) -> Result<Enforcement>
    where
        F: FnOnce(&Campaign) -> Enforcement,
    {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let campaign = load_campaign(&tx, id)?.ok_or(LedgerError::CampaignNotFound(id))?;

        let decision = decide(&campaign);
        if decision == Enforcement::Unchanged || !campaign.is_active {
            return Ok(Enforcement::Unchanged);
        }

        tx.execute(
            "UPDATE campaigns SET is_active = FALSE WHERE id = ?1",
            params![id],
        )?;
        tx.commit()?;
        debug!(campaign_id = id, ?decision, "campaign paused by sweep");
        Ok(decision)
    }

    /// Zero every campaign's daily total and reactivate it, whatever paused it.
    pub fn reset_daily_budgets(&mut self) -> Result<SweepReport> {
        let report = self.for_each_campaign("reset_daily", |store, id| {
            let n = store.conn.execute(
                "UPDATE campaigns SET current_daily_spend = '0.00', is_active = TRUE
                 WHERE id = ?1",
                params![id],
            )?;
            Ok(n > 0)
        })?;
        info!(%report, "daily budgets reset");
        Ok(report)
    }

    /// Zero every campaign's monthly total. Active flags are untouched.
    pub fn reset_monthly_budgets(&mut self) -> Result<SweepReport> {
        let report = self.for_each_campaign("reset_monthly", |store, id| {
            let n = store.conn.execute(
                "UPDATE campaigns SET current_monthly_spend = '0.00' WHERE id = ?1",
                params![id],
            )?;
            Ok(n > 0)
        })?;
        info!(%report, "monthly budgets reset");
        Ok(report)
    }

    /// Run `f` for every campaign id, isolating failures.
    /// `f` returns whether it rewrote the campaign.
    fn for_each_campaign<F>(&mut self, job: &'static str, mut f: F) -> Result<SweepReport>
    where
        F: FnMut(&mut Self, CampaignId) -> Result<bool>,
    {
        let ids = self.campaign_ids()?;
        let mut report = SweepReport::default();
        for id in ids {
            report.examined += 1;
            match f(self, id) {
                Ok(true) => report.changed += 1,
                Ok(false) => {}
                Err(e) => {
                    report.failed += 1;
                    warn!(job, campaign_id = id, error = %e, "campaign skipped");
                }
            }
        }
        Ok(report)
    }
}

fn budget_decision(campaign: &Campaign) -> Enforcement {
    if at_or_over_budget(
        campaign.current_daily_spend,
        campaign.current_monthly_spend,
        &campaign.limits,
    ) {
        Enforcement::OverBudget
    } else {
        Enforcement::Unchanged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{force_state, tmp_store};
    use chrono::NaiveDate;
    use pacer_core::{CampaignFilter, DaypartingWindow};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn at_hour(hour: u32) -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn setup(store: &SqliteStore, daily: Decimal, monthly: Decimal) -> CampaignId {
        let b = store.create_brand("Brand1", dec!(100), dec!(1000)).unwrap();
        let c = store.create_campaign(b.id, "Camp").unwrap();
        force_state(store, c.id, daily, monthly, true);
        c.id
    }

    fn active(store: &SqliteStore, id: CampaignId) -> bool {
        store.get_campaign(id).unwrap().unwrap().is_active
    }

    #[test]
    fn pauses_outside_dayparting_even_under_budget() {
        let (_dir, mut store) = tmp_store();
        let id = setup(&store, dec!(0), dec!(0));
        store
            .set_dayparting(id, DaypartingWindow::new(9, 17).unwrap())
            .unwrap();

        let report = store.enforce_campaign_status(&at_hour(8)).unwrap();
        assert_eq!(
            report,
            SweepReport {
                examined: 1,
                changed: 1,
                failed: 0
            }
        );
        assert!(!active(&store, id));
    }

    #[test]
    fn enforces_budget_within_dayparting() {
        let (_dir, mut store) = tmp_store();
        let id = setup(&store, dec!(150), dec!(500));
        store
            .set_dayparting(id, DaypartingWindow::new(0, 23).unwrap())
            .unwrap();

        store.enforce_campaign_status(&at_hour(12)).unwrap();
        assert!(!active(&store, id));
    }

    #[test]
    fn budget_check_is_inclusive() {
        let (_dir, mut store) = tmp_store();
        let id = setup(&store, dec!(100.00), dec!(0));
        assert_eq!(
            store.enforce_one(id, &at_hour(12)).unwrap(),
            Enforcement::OverBudget
        );
        assert!(!active(&store, id));
    }

    #[test]
    fn under_budget_inside_window_is_left_alone() {
        let (_dir, mut store) = tmp_store();
        let running = setup(&store, dec!(50), dec!(500));
        let b = store.get_campaign(running).unwrap().unwrap().brand_id;
        let paused = store.create_campaign(b, "Paused").unwrap().id;
        force_state(&store, paused, dec!(0), dec!(0), false);

        let report = store.enforce_campaign_status(&at_hour(3)).unwrap();
        assert_eq!(report.examined, 2);
        assert_eq!(report.changed, 0);
        assert!(active(&store, running));
        // No reactivation.
        assert!(!active(&store, paused));
    }

    #[test]
    fn already_paused_outside_window_is_not_counted() {
        let (_dir, mut store) = tmp_store();
        let id = setup(&store, dec!(0), dec!(0));
        force_state(&store, id, dec!(0), dec!(0), false);
        store
            .set_dayparting(id, DaypartingWindow::new(9, 17).unwrap())
            .unwrap();
        assert_eq!(
            store.enforce_one(id, &at_hour(20)).unwrap(),
            Enforcement::Unchanged
        );
        assert!(!active(&store, id));
    }

    #[test]
    fn enforce_budget_single_campaign() {
        let (_dir, mut store) = tmp_store();
        let below = setup(&store, dec!(50.00), dec!(500.00));
        assert!(!store.enforce_budget(below).unwrap());
        assert!(active(&store, below));

        let b = store.get_campaign(below).unwrap().unwrap().brand_id;
        let at = store.create_campaign(b, "At").unwrap().id;
        force_state(&store, at, dec!(100.00), dec!(1000.00), true);
        assert!(store.enforce_budget(at).unwrap());
        assert!(!active(&store, at));

        assert!(matches!(
            store.enforce_budget(999),
            Err(LedgerError::CampaignNotFound(999))
        ));
    }

    #[test]
    fn budget_check_ignores_window_and_matches_sweep() {
        let (_dir, mut store) = tmp_store();
        let id = setup(&store, dec!(0), dec!(0));
        store
            .set_dayparting(id, DaypartingWindow::new(9, 17).unwrap())
            .unwrap();
        // Outside its hours but under budget: the budget check alone leaves it.
        assert!(!store.enforce_budget(id).unwrap());
        assert!(active(&store, id));

        force_state(&store, id, dec!(0), dec!(1000.00), true);
        assert!(store.enforce_budget(id).unwrap());
        assert!(!active(&store, id));
        // Already paused: nothing left to do.
        assert!(!store.enforce_budget(id).unwrap());
        assert_eq!(
            store.enforce_one(id, &at_hour(12)).unwrap(),
            Enforcement::Unchanged
        );
    }

    #[test]
    fn one_bad_row_does_not_stop_the_sweep() {
        let (_dir, mut store) = tmp_store();
        let good = setup(&store, dec!(0), dec!(0));
        let b = store.get_campaign(good).unwrap().unwrap().brand_id;
        let bad = store.create_campaign(b, "Broken").unwrap().id;
        let after = store.create_campaign(b, "After").unwrap().id;
        store
            .set_dayparting(good, DaypartingWindow::new(9, 17).unwrap())
            .unwrap();
        store
            .set_dayparting(after, DaypartingWindow::new(9, 17).unwrap())
            .unwrap();
        store
            .conn
            .execute(
                "UPDATE campaigns SET current_daily_spend = 'n/a' WHERE id = ?1",
                params![bad],
            )
            .unwrap();

        let report = store.enforce_campaign_status(&at_hour(22)).unwrap();
        assert_eq!(
            report,
            SweepReport {
                examined: 3,
                changed: 2,
                failed: 1
            }
        );
        assert!(!active(&store, good));
        assert!(!active(&store, after));
    }

    #[test]
    fn reset_daily_zeroes_and_reactivates() {
        let (_dir, mut store) = tmp_store();
        let c1 = setup(&store, dec!(50.00), dec!(500.00));
        let b = store.get_campaign(c1).unwrap().unwrap().brand_id;
        let c2 = store.create_campaign(b, "Campaign 2").unwrap().id;
        force_state(&store, c1, dec!(50.00), dec!(500.00), false);
        force_state(&store, c2, dec!(75.00), dec!(600.00), false);

        let report = store.reset_daily_budgets().unwrap();
        assert_eq!(report.changed, 2);

        for id in [c1, c2] {
            let c = store.get_campaign(id).unwrap().unwrap();
            assert_eq!(c.current_daily_spend.to_string(), "0.00");
            assert!(c.is_active);
        }
        // Monthly totals untouched.
        assert_eq!(
            store.get_campaign(c2).unwrap().unwrap().current_monthly_spend,
            dec!(600.00)
        );
    }

    #[test]
    fn reset_daily_is_idempotent() {
        let (_dir, mut store) = tmp_store();
        let id = setup(&store, dec!(30), dec!(300));
        force_state(&store, id, dec!(30), dec!(300), false);

        store.reset_daily_budgets().unwrap();
        let once = store.list_campaigns(&CampaignFilter::default()).unwrap();
        store.reset_daily_budgets().unwrap();
        let twice = store.list_campaigns(&CampaignFilter::default()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn reset_monthly_keeps_active_flag() {
        let (_dir, mut store) = tmp_store();
        let paused = setup(&store, dec!(20), dec!(500.00));
        force_state(&store, paused, dec!(20), dec!(500.00), false);
        let b = store.get_campaign(paused).unwrap().unwrap().brand_id;
        let running = store.create_campaign(b, "Running").unwrap().id;
        force_state(&store, running, dec!(0), dec!(750.00), true);

        store.reset_monthly_budgets().unwrap();

        let p = store.get_campaign(paused).unwrap().unwrap();
        assert_eq!(p.current_monthly_spend.to_string(), "0.00");
        assert_eq!(p.current_daily_spend, dec!(20.00));
        assert!(!p.is_active);

        let r = store.get_campaign(running).unwrap().unwrap();
        assert_eq!(r.current_monthly_spend.to_string(), "0.00");
        assert!(r.is_active);
    }

    #[test]
    fn spend_accepted_again_after_daily_reset() {
        let (_dir, mut store) = tmp_store();
        let id = setup(&store, dec!(0), dec!(0));
        assert!(store.log_spend(id, dec!(101)).unwrap().paused);
        store.reset_daily_budgets().unwrap();
        let out = store.log_spend(id, dec!(1)).unwrap();
        assert_eq!(out.campaign.current_daily_spend, dec!(1.00));
        assert_eq!(out.campaign.current_monthly_spend, dec!(102.00));
    }

    #[test]
    fn empty_table_sweeps_cleanly() {
        let (_dir, mut store) = tmp_store();
        assert_eq!(
            store.enforce_campaign_status(&at_hour(0)).unwrap(),
            SweepReport::default()
        );
        assert_eq!(store.reset_daily_budgets().unwrap(), SweepReport::default());
        assert_eq!(store.reset_monthly_budgets().unwrap(), SweepReport::default());
    }
}
