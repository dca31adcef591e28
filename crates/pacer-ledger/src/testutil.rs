use crate::sqlite_store::SqliteStore;
use pacer_core::CampaignId;
use rusqlite::params;
use rust_decimal::Decimal;

pub(crate) fn tmp_store() -> (tempfile::TempDir, SqliteStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = SqliteStore::open_or_create(&dir.path().join("ledger.db")).unwrap();
    (dir, store)
}

/// Overwrite a campaign's counters and flag directly, bypassing accounting.
pub(crate) fn force_state(
    store: &SqliteStore,
    id: CampaignId,
    daily: Decimal,
    monthly: Decimal,
    is_active: bool,
) {
    store
        .conn
        .execute(
            "UPDATE campaigns
             SET current_daily_spend = ?2, current_monthly_spend = ?3, is_active = ?4
             WHERE id = ?1",
            params![
                id,
                pacer_core::to_money(daily).to_string(),
                pacer_core::to_money(monthly).to_string(),
                is_active
            ],
        )
        .unwrap();
}
