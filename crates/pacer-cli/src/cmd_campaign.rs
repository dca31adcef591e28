use pacer_core::{Campaign, CampaignFilter, DaypartingWindow};
use pacer_ledger::Ledger;
use std::path::Path;

pub fn add(cwd: &Path, brand_id: i64, name: &str) -> anyhow::Result<()> {
    let ledger = Ledger::discover(cwd)?;
    let c = ledger.store.create_campaign(brand_id, name)?;
    println!("Created campaign {} \"{}\" for brand {}", c.id, c.name, c.brand_name);
    Ok(())
}

pub fn list(
    cwd: &Path,
    is_active: Option<bool>,
    brand_id: Option<i64>,
    json: bool,
) -> anyhow::Result<()> {
    let ledger = Ledger::discover(cwd)?;
    let campaigns = ledger
        .store
        .list_campaigns(&CampaignFilter { is_active, brand_id })?;

    if json {
        for c in &campaigns {
            println!("{}", serde_json::to_string(c)?);
        }
        return Ok(());
    }
    if campaigns.is_empty() {
        println!("No campaigns match the filter.");
        return Ok(());
    }
    println!(
        "{:>5}  {:<20} {:<16} {:<7} {:>12} {:>12}  HOURS",
        "ID", "NAME", "BRAND", "STATUS", "DAILY", "MONTHLY"
    );
    for c in &campaigns {
        println!(
            "{:>5}  {:<20} {:<16} {:<7} {:>12} {:>12}  {}",
            c.id,
            c.name,
            c.brand_name,
            c.status_label(),
            c.current_daily_spend,
            c.current_monthly_spend,
            hours_label(c)
        );
    }
    println!("\n({} campaigns)", campaigns.len());
    Ok(())
}

pub fn show(cwd: &Path, id: i64) -> anyhow::Result<()> {
    let ledger = Ledger::discover(cwd)?;
    let c = ledger
        .store
        .get_campaign(id)?
        .ok_or(pacer_ledger::LedgerError::CampaignNotFound(id))?;
    let (logged, entries) = ledger.store.spend_totals(id)?;

    println!("Campaign {} \"{}\" ({})", c.id, c.name, c.status_label());
    println!("  Brand:   {} ({})", c.brand_name, c.brand_id);
    println!(
        "  Daily:   {} / {}",
        c.current_daily_spend, c.limits.daily
    );
    println!(
        "  Monthly: {} / {}",
        c.current_monthly_spend, c.limits.monthly
    );
    println!("  Hours:   {}", hours_label(&c));
    println!("  Ledger:  {entries} entries, {logged} total");
    Ok(())
}

pub fn set_daypart(cwd: &Path, id: i64, start: i64, end: i64) -> anyhow::Result<()> {
    let window = DaypartingWindow::new(start, end)?;
    let ledger = Ledger::discover(cwd)?;
    ledger.store.set_dayparting(id, window)?;
    if window.end_hour <= window.start_hour {
        eprintln!("Warning: end hour does not exceed start hour; campaign {id} will never be inside its window.");
    }
    println!(
        "Campaign {id} may run {:02}:00-{:02}:00",
        window.start_hour, window.end_hour
    );
    Ok(())
}

pub fn clear_daypart(cwd: &Path, id: i64) -> anyhow::Result<()> {
    let ledger = Ledger::discover(cwd)?;
    if ledger.store.clear_dayparting(id)? {
        println!("Campaign {id} may run at any hour");
    } else {
        println!("Campaign {id} had no dayparting window");
    }
    Ok(())
}

fn hours_label(c: &Campaign) -> String {
    match c.dayparting {
        Some(w) => format!("{:02}-{:02}", w.start_hour, w.end_hour),
        None => "any".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn workspace() -> (tempfile::TempDir, i64) {
        let tmp = tempfile::tempdir().unwrap();
        let (ledger, _) = Ledger::init(tmp.path()).unwrap();
        let b = ledger.store.create_brand("Acme", dec!(100), dec!(1000)).unwrap();
        (tmp, b.id)
    }

    #[test]
    fn add_list_show() {
        let (tmp, brand) = workspace();
        add(tmp.path(), brand, "Spring").unwrap();
        list(tmp.path(), None, None, false).unwrap();
        list(tmp.path(), Some(false), Some(brand), true).unwrap();
        show(tmp.path(), 1).unwrap();
        assert!(show(tmp.path(), 99).is_err());
        assert!(add(tmp.path(), brand + 1, "Orphan").is_err());
    }

    #[test]
    fn daypart_set_and_clear() {
        let (tmp, brand) = workspace();
        add(tmp.path(), brand, "Office hours").unwrap();
        set_daypart(tmp.path(), 1, 9, 17).unwrap();
        {
            let ledger = Ledger::open(tmp.path()).unwrap();
            let c = ledger.store.get_campaign(1).unwrap().unwrap();
            assert_eq!(hours_label(&c), "09-17");
        }
        assert!(set_daypart(tmp.path(), 1, 9, 24).is_err());
        clear_daypart(tmp.path(), 1).unwrap();
        let ledger = Ledger::open(tmp.path()).unwrap();
        let c = ledger.store.get_campaign(1).unwrap().unwrap();
        assert_eq!(hours_label(&c), "any");
    }
}
