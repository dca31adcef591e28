use pacer_core::parse_limit;
use pacer_ledger::Ledger;
use std::path::Path;

pub fn add(cwd: &Path, name: &str, daily: &str, monthly: &str) -> anyhow::Result<()> {
    let daily = parse_limit(daily)?;
    let monthly = parse_limit(monthly)?;
    let ledger = Ledger::discover(cwd)?;
    let brand = ledger.store.create_brand(name, daily, monthly)?;
    println!(
        "Created brand {} \"{}\" (daily {}, monthly {})",
        brand.id, brand.name, brand.daily_budget, brand.monthly_budget
    );
    Ok(())
}

pub fn list(cwd: &Path, json: bool) -> anyhow::Result<()> {
    let ledger = Ledger::discover(cwd)?;
    let brands = ledger.store.list_brands()?;
    if json {
        for b in &brands {
            println!("{}", serde_json::to_string(b)?);
        }
        return Ok(());
    }
    if brands.is_empty() {
        println!("No brands.");
        return Ok(());
    }
    println!("{:>5}  {:<24} {:>14} {:>14}", "ID", "NAME", "DAILY", "MONTHLY");
    for b in &brands {
        println!(
            "{:>5}  {:<24} {:>14} {:>14}",
            b.id, b.name, b.daily_budget, b.monthly_budget
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_validates_limits_before_touching_store() {
        let tmp = tempfile::tempdir().unwrap();
        Ledger::init(tmp.path()).unwrap();

        let err = add(tmp.path(), "Acme", "-5", "100").unwrap_err();
        assert_eq!(err.to_string(), "Budget limit must not be negative.");
        let err = add(tmp.path(), "Acme", "lots", "100").unwrap_err();
        assert_eq!(err.to_string(), "Invalid decimal amount: lots");

        add(tmp.path(), "Acme", "100", "1000.5").unwrap();
        let ledger = Ledger::open(tmp.path()).unwrap();
        let brands = ledger.store.list_brands().unwrap();
        assert_eq!(brands.len(), 1);
        assert_eq!(brands[0].monthly_budget.to_string(), "1000.50");
        list(tmp.path(), false).unwrap();
        list(tmp.path(), true).unwrap();
    }

    #[test]
    fn requires_workspace() {
        let tmp = tempfile::tempdir().unwrap();
        let err = list(tmp.path(), false).unwrap_err();
        assert!(err.to_string().contains("pacer init"));
    }
}
