use pacer_ledger::config::{preview_value, read_config, set_value};
use pacer_ledger::{Ledger, PacerConfig};
use std::path::Path;

/// `pacer config set <key> <value>`
pub fn set(cwd: &Path, key: &str, value: &str) -> anyhow::Result<()> {
    let ledger = Ledger::discover(cwd)?;
    // Cron values must parse before anything is written.
    let candidate = preview_value(&ledger.paths.config_json, key, value)?;
    pacer_sched::JobTable::from_config(&candidate)?;
    set_value(&ledger.paths.config_json, key, value)?;
    println!("{key} = {value}");
    Ok(())
}

/// `pacer config get <key>`
pub fn get(cwd: &Path, key: &str) -> anyhow::Result<()> {
    let ledger = Ledger::discover(cwd)?;
    let effective = serde_json::to_value(ledger.config()?)?;
    match effective.get(key) {
        Some(val) => println!("{val}"),
        None => println!("(not set)"),
    }
    Ok(())
}

/// `pacer config list`: effective values, with defaults marked.
pub fn list(cwd: &Path) -> anyhow::Result<()> {
    let ledger = Ledger::discover(cwd)?;
    let explicit = read_config(&ledger.paths.config_json)?;
    let effective = serde_json::to_value(ledger.config()?)?;
    let defaults = serde_json::to_value(PacerConfig::default())?;
    if let (Some(effective), Some(defaults)) = (effective.as_object(), defaults.as_object()) {
        for (k, v) in effective {
            if explicit.contains_key(k) {
                println!("{k} = {v}");
            } else {
                let d = defaults.get(k).unwrap_or(v);
                println!("{k} = {d} (default)");
            }
        }
    }
    Ok(())
}
