use pacer_ledger::Ledger;
use std::path::Path;

pub fn execute(cwd: &Path, campaign: Option<i64>, limit: usize, json: bool) -> anyhow::Result<()> {
    let ledger = Ledger::discover(cwd)?;
    let logs = ledger.store.spend_logs(campaign, limit)?;

    if logs.is_empty() {
        println!("No spend recorded.");
        return Ok(());
    }
    if json {
        for l in &logs {
            println!("{}", serde_json::to_string(l)?);
        }
    } else {
        for l in &logs {
            println!("{}  campaign {:<5} {:>12}", l.ts, l.campaign_id, l.amount);
        }
        println!("\n({} entries shown)", logs.len());
    }
    Ok(())
}
