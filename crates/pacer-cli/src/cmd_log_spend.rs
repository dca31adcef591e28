use pacer_core::parse_amount;
use pacer_ledger::Ledger;
use std::path::Path;

/// `pacer log-spend <campaign_id> <amount>`: inject one spend record by hand.
pub fn execute(cwd: &Path, campaign_id: i64, amount: &str) -> anyhow::Result<()> {
    let parsed = parse_amount(amount)?;
    let mut ledger = Ledger::discover(cwd)?;
    let outcome = ledger
        .store
        .log_spend(campaign_id, parsed)
        .map_err(|e| anyhow::anyhow!("Error logging spend: {e}"))?;

    println!("{}", success_message(campaign_id, amount));
    if outcome.paused {
        println!(
            "Campaign {campaign_id} paused: daily {} / {}, monthly {} / {}",
            outcome.campaign.current_daily_spend,
            outcome.campaign.limits.daily,
            outcome.campaign.current_monthly_spend,
            outcome.campaign.limits.monthly
        );
    }
    Ok(())
}

/// Echoes the amount as the operator typed it.
fn success_message(campaign_id: i64, amount: &str) -> String {
    format!("Successfully logged spend of {amount} for campaign {campaign_id}")
}
