//! SQLite-backed storage for brands, campaigns, dayparting windows and the
//! append-only spend log, in a single `ledger.db` file using WAL mode.

use crate::error::{LedgerError, Result};
use pacer_core::money::to_money;
use pacer_core::{
    validate_limit, Brand, BrandId, BudgetLimits, Campaign, CampaignFilter, CampaignId,
    DaypartingWindow, SpendLog,
};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;

const SCHEMA_SQL: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS brands (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    daily_budget TEXT NOT NULL,
    monthly_budget TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS campaigns (
    id INTEGER PRIMARY KEY,
    brand_id INTEGER NOT NULL REFERENCES brands(id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    current_daily_spend TEXT NOT NULL DEFAULT '0.00',
    current_monthly_spend TEXT NOT NULL DEFAULT '0.00'
);
CREATE INDEX IF NOT EXISTS idx_campaigns_brand ON campaigns(brand_id);
CREATE INDEX IF NOT EXISTS idx_campaigns_active ON campaigns(is_active);

CREATE TABLE IF NOT EXISTS spend_logs (
    id INTEGER PRIMARY KEY,
    campaign_id INTEGER NOT NULL REFERENCES campaigns(id) ON DELETE CASCADE,
    ts TEXT NOT NULL,
    amount TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_spend_logs_campaign ON spend_logs(campaign_id);
CREATE INDEX IF NOT EXISTS idx_spend_logs_ts ON spend_logs(ts);

CREATE TABLE IF NOT EXISTS dayparting_windows (
    campaign_id INTEGER PRIMARY KEY REFERENCES campaigns(id) ON DELETE CASCADE,
    start_hour INTEGER NOT NULL,
    end_hour INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS schema_meta (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
";

pub(crate) const CAMPAIGN_SELECT: &str = "
SELECT c.id, c.brand_id, b.name, c.name, c.is_active,
       c.current_daily_spend, c.current_monthly_spend,
       b.daily_budget, b.monthly_budget,
       d.start_hour, d.end_hour
FROM campaigns c
JOIN brands b ON b.id = c.brand_id
LEFT JOIN dayparting_windows d ON d.campaign_id = c.id";

/// SQLite-backed storage engine.
pub struct SqliteStore {
    pub(crate) conn: Connection,
}

impl SqliteStore {
    /// Open an existing ledger.db.
    pub fn open(db_path: &Path) -> Result<Self> {
        let conn = Connection::open(db_path)?;
        let store = Self { conn };
        store.apply_pragmas()?;
        Ok(store)
    }

    /// Open or create ledger.db with full schema.
    pub fn open_or_create(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(db_path)?;
        let store = Self { conn };
        store.apply_pragmas()?;
        store.apply_schema()?;
        Ok(store)
    }

    fn apply_pragmas(&self) -> Result<()> {
        self.conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA foreign_keys = ON;
             PRAGMA busy_timeout = 5000;",
        )?;
        Ok(())
    }

    fn apply_schema(&self) -> Result<()> {
        self.conn.execute_batch(SCHEMA_SQL)?;
        self.conn.execute(
            "INSERT OR IGNORE INTO schema_meta (key, value) VALUES ('version', '1')",
            [],
        )?;
        Ok(())
    }

    // ── Brands ──────────────────────────────────────────────────────

    pub fn create_brand(
        &self,
        name: &str,
        daily_budget: Decimal,
        monthly_budget: Decimal,
    ) -> Result<Brand> {
        let name = non_empty("brand name", name)?;
        let daily_budget = validate_limit(daily_budget)?;
        let monthly_budget = validate_limit(monthly_budget)?;
        self.conn.execute(
            "INSERT INTO brands (name, daily_budget, monthly_budget) VALUES (?1, ?2, ?3)",
            params![name, daily_budget.to_string(), monthly_budget.to_string()],
        )?;
        Ok(Brand {
            id: self.conn.last_insert_rowid(),
            name: name.to_string(),
            daily_budget,
            monthly_budget,
        })
    }

    pub fn get_brand(&self, id: BrandId) -> Result<Option<Brand>> {
        let brand = self
            .conn
            .query_row(
                "SELECT id, name, daily_budget, monthly_budget FROM brands WHERE id = ?1",
                params![id],
                map_brand_row,
            )
            .optional()?;
        Ok(brand)
    }

    pub fn list_brands(&self) -> Result<Vec<Brand>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, daily_budget, monthly_budget FROM brands ORDER BY id")?;
        let brands = stmt
            .query_map([], map_brand_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(brands)
    }

    // ── Campaigns ───────────────────────────────────────────────────

    /// Create an active campaign with zero spend under `brand_id`.
    pub fn create_campaign(&self, brand_id: BrandId, name: &str) -> Result<Campaign> {
        let name = non_empty("campaign name", name)?;
        if self.get_brand(brand_id)?.is_none() {
            return Err(LedgerError::BrandNotFound(brand_id));
        }
        self.conn.execute(
            "INSERT INTO campaigns (brand_id, name) VALUES (?1, ?2)",
            params![brand_id, name],
        )?;
        let id = self.conn.last_insert_rowid();
        self.get_campaign(id)?
            .ok_or(LedgerError::CampaignNotFound(id))
    }

    pub fn get_campaign(&self, id: CampaignId) -> Result<Option<Campaign>> {
        load_campaign(&self.conn, id)
    }

    /// Campaigns matching `filter`, ordered by id.
    pub fn list_campaigns(&self, filter: &CampaignFilter) -> Result<Vec<Campaign>> {
        let sql = format!(
            "{CAMPAIGN_SELECT}
             WHERE (?1 IS NULL OR c.is_active = ?1)
               AND (?2 IS NULL OR c.brand_id = ?2)
             ORDER BY c.id"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let campaigns = stmt
            .query_map(params![filter.is_active, filter.brand_id], map_campaign_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(campaigns)
    }

    /// Ids of every campaign, ordered. Sweeps iterate over this snapshot.
    pub fn campaign_ids(&self) -> Result<Vec<CampaignId>> {
        let mut stmt = self.conn.prepare("SELECT id FROM campaigns ORDER BY id")?;
        let ids = stmt
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(ids)
    }

    // ── Dayparting ──────────────────────────────────────────────────

    /// Attach or replace the campaign's window.
    pub fn set_dayparting(&self, campaign_id: CampaignId, window: DaypartingWindow) -> Result<()> {
        self.require_campaign(campaign_id)?;
        self.conn.execute(
            "INSERT INTO dayparting_windows (campaign_id, start_hour, end_hour)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(campaign_id) DO UPDATE SET
                start_hour = excluded.start_hour,
                end_hour = excluded.end_hour",
            params![campaign_id, window.start_hour, window.end_hour],
        )?;
        Ok(())
    }

    /// Remove the campaign's window. Returns whether one existed.
    pub fn clear_dayparting(&self, campaign_id: CampaignId) -> Result<bool> {
        self.require_campaign(campaign_id)?;
        let n = self.conn.execute(
            "DELETE FROM dayparting_windows WHERE campaign_id = ?1",
            params![campaign_id],
        )?;
        Ok(n > 0)
    }

    // ── Spend log ───────────────────────────────────────────────────

    /// Spend entries, newest first. `limit == 0` means unlimited.
    pub fn spend_logs(&self, campaign_id: Option<CampaignId>, limit: usize) -> Result<Vec<SpendLog>> {
        let limit = if limit == 0 { -1 } else { limit as i64 };
        let mut stmt = self.conn.prepare(
            "SELECT id, campaign_id, ts, amount FROM spend_logs
             WHERE (?1 IS NULL OR campaign_id = ?1)
             ORDER BY id DESC LIMIT ?2",
        )?;
        let logs = stmt
            .query_map(params![campaign_id, limit], |row| {
                Ok(SpendLog {
                    id: row.get(0)?,
                    campaign_id: row.get(1)?,
                    ts: row.get(2)?,
                    amount: get_decimal(row, 3)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(logs)
    }

    /// Sum and count of every spend entry recorded for a campaign.
    pub fn spend_totals(&self, campaign_id: CampaignId) -> Result<(Decimal, usize)> {
        let mut stmt = self
            .conn
            .prepare("SELECT amount FROM spend_logs WHERE campaign_id = ?1")?;
        let amounts = stmt
            .query_map(params![campaign_id], |row| get_decimal(row, 0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let total = amounts.iter().copied().sum::<Decimal>();
        Ok((to_money(total), amounts.len()))
    }

    fn require_campaign(&self, id: CampaignId) -> Result<()> {
        let exists: Option<i64> = self
            .conn
            .query_row("SELECT 1 FROM campaigns WHERE id = ?1", params![id], |row| {
                row.get(0)
            })
            .optional()?;
        match exists {
            Some(_) => Ok(()),
            None => Err(LedgerError::CampaignNotFound(id)),
        }
    }
}

impl Drop for SqliteStore {
    fn drop(&mut self) {
        // Merge WAL back into main DB so users see a single file when idle.
        let _ = self
            .conn
            .execute_batch("PRAGMA wal_checkpoint(TRUNCATE);");
    }
}

// ── Row helpers ─────────────────────────────────────────────────────

/// Load one campaign through any connection or open transaction.
pub(crate) fn load_campaign(conn: &Connection, id: CampaignId) -> Result<Option<Campaign>> {
    let sql = format!("{CAMPAIGN_SELECT} WHERE c.id = ?1");
    let campaign = conn
        .query_row(&sql, params![id], map_campaign_row)
        .optional()?;
    Ok(campaign)
}

fn map_brand_row(row: &Row<'_>) -> rusqlite::Result<Brand> {
    Ok(Brand {
        id: row.get(0)?,
        name: row.get(1)?,
        daily_budget: get_decimal(row, 2)?,
        monthly_budget: get_decimal(row, 3)?,
    })
}

fn map_campaign_row(row: &Row<'_>) -> rusqlite::Result<Campaign> {
    let start: Option<u8> = row.get(9)?;
    let end: Option<u8> = row.get(10)?;
    let dayparting = match (start, end) {
        (Some(start_hour), Some(end_hour)) => Some(DaypartingWindow {
            start_hour,
            end_hour,
        }),
        _ => None,
    };
    Ok(Campaign {
        id: row.get(0)?,
        brand_id: row.get(1)?,
        brand_name: row.get(2)?,
        name: row.get(3)?,
        is_active: row.get(4)?,
        current_daily_spend: get_decimal(row, 5)?,
        current_monthly_spend: get_decimal(row, 6)?,
        limits: BudgetLimits {
            daily: get_decimal(row, 7)?,
            monthly: get_decimal(row, 8)?,
        },
        dayparting,
    })
}

/// Decimals are stored as TEXT to keep exact cents.
pub(crate) fn get_decimal(row: &Row<'_>, idx: usize) -> rusqlite::Result<Decimal> {
    let raw: String = row.get(idx)?;
    Decimal::from_str(&raw)
        .map(to_money)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn non_empty<'a>(field: &'static str, value: &'a str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(LedgerError::EmptyName(field));
    }
    Ok(trimmed)
}

pub(crate) fn now_rfc3339() -> Result<String> {
    let now = time::OffsetDateTime::now_utc();
    Ok(now.format(&time::format_description::well_known::Rfc3339)?)
}
