//! Workspace configuration stored in `.pacer/config.json`.
//!
//! The file is a flat JSON object. Unknown keys are rejected on write so a
//! typo never silently falls back to a default.

use crate::error::{LedgerError, Result};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;

pub const DEFAULT_TICK_SECS: u64 = 30;
/// Longest accepted scheduler polling interval: one day.
pub const MAX_TICK_SECS: u64 = 86_400;
pub const DEFAULT_ENFORCE_CRON: &str = "*/5 * * * *";
pub const DEFAULT_RESET_DAILY_CRON: &str = "0 0 * * *";
pub const DEFAULT_RESET_MONTHLY_CRON: &str = "0 0 1 * *";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PacerConfig {
    /// Scheduler polling interval in seconds.
    pub tick_secs: u64,
    /// 5-field cron expression for the enforcement sweep.
    pub enforce_cron: String,
    /// 5-field cron expression for the daily reset.
    pub reset_daily_cron: String,
    /// 5-field cron expression for the monthly reset.
    pub reset_monthly_cron: String,
}

impl Default for PacerConfig {
    fn default() -> Self {
        Self {
            tick_secs: DEFAULT_TICK_SECS,
            enforce_cron: DEFAULT_ENFORCE_CRON.to_string(),
            reset_daily_cron: DEFAULT_RESET_DAILY_CRON.to_string(),
            reset_monthly_cron: DEFAULT_RESET_MONTHLY_CRON.to_string(),
        }
    }
}

impl PacerConfig {
    /// Load from `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let map = read_config(path)?;
        Self::from_map(map)
    }

    fn from_map(map: serde_json::Map<String, serde_json::Value>) -> Result<Self> {
        let config: Self = serde_json::from_value(serde_json::Value::Object(map))
            .map_err(|e| LedgerError::Config(e.to_string()))?;
        if config.tick_secs == 0 {
            return Err(LedgerError::Config("tick_secs must be at least 1".into()));
        }
        if config.tick_secs > MAX_TICK_SECS {
            return Err(LedgerError::Config(format!(
                "tick_secs must be at most {MAX_TICK_SECS}, got {}",
                config.tick_secs
            )));
        }
        Ok(config)
    }
}

/// Read the raw key/value map. Returns an empty map if the file doesn't exist.
pub fn read_config(path: &Path) -> Result<serde_json::Map<String, serde_json::Value>> {
    if !path.exists() {
        return Ok(serde_json::Map::new());
    }
    let content = std::fs::read_to_string(path)?;
    let val: serde_json::Value = serde_json::from_str(&content)?;
    match val {
        serde_json::Value::Object(map) => Ok(map),
        _ => Ok(serde_json::Map::new()),
    }
}

/// The config that would result from setting `key`, without writing it.
pub fn preview_value(path: &Path, key: &str, raw: &str) -> Result<PacerConfig> {
    let mut map = read_config(path)?;
    map.insert(key.to_string(), parse_value(raw));
    PacerConfig::from_map(map)
}

/// Set one key, validating the whole resulting config before it is written.
pub fn set_value(path: &Path, key: &str, raw: &str) -> Result<PacerConfig> {
    let mut map = read_config(path)?;
    map.insert(key.to_string(), parse_value(raw));
    let config = PacerConfig::from_map(map.clone())?;
    let json = serde_json::to_string_pretty(&map)?;
    write_atomic(path, json.as_bytes())?;
    Ok(config)
}

/// Parse a string value into an appropriate JSON value (bool/number/string).
fn parse_value(s: &str) -> serde_json::Value {
    match s {
        "true" => serde_json::Value::Bool(true),
        "false" => serde_json::Value::Bool(false),
        _ => match s.parse::<u64>() {
            Ok(n) => serde_json::Value::Number(n.into()),
            Err(_) => serde_json::Value::String(s.to_string()),
        },
    }
}

fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let parent = path.parent().ok_or_else(|| {
        LedgerError::Config(format!("no parent dir for {}", path.display()))
    })?;
    std::fs::create_dir_all(parent)?;
    let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
    tmp.write_all(data)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = PacerConfig::load(&tmp.path().join("config.json")).unwrap();
        assert_eq!(cfg, PacerConfig::default());
        assert_eq!(cfg.enforce_cron, "*/5 * * * *");
        assert_eq!(cfg.tick_secs, 30);
    }

    #[test]
    fn set_then_load() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.json");
        set_value(&path, "tick_secs", "5").unwrap();
        set_value(&path, "reset_daily_cron", "30 1 * * *").unwrap();

        let cfg = PacerConfig::load(&path).unwrap();
        assert_eq!(cfg.tick_secs, 5);
        assert_eq!(cfg.reset_daily_cron, "30 1 * * *");
        assert_eq!(cfg.reset_monthly_cron, DEFAULT_RESET_MONTHLY_CRON);
    }

    #[test]
    fn unknown_key_is_rejected_and_not_written() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.json");
        let err = set_value(&path, "tick_sec", "5").unwrap_err();
        assert!(matches!(err, LedgerError::Config(_)));
        assert!(!path.exists());
    }

    #[test]
    fn wrong_type_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.json");
        assert!(set_value(&path, "tick_secs", "soon").is_err());
        assert!(set_value(&path, "tick_secs", "0").is_err());
    }

    #[test]
    fn oversized_tick_is_rejected_and_not_written() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.json");
        let err = set_value(&path, "tick_secs", "18446744073709551615").unwrap_err();
        assert!(err.to_string().contains("at most 86400"), "{err}");
        assert!(!path.exists());
        assert!(set_value(&path, "tick_secs", "86401").is_err());
        assert_eq!(set_value(&path, "tick_secs", "86400").unwrap().tick_secs, 86_400);
    }
}
