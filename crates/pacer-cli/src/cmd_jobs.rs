use pacer_ledger::Ledger;
use pacer_sched::{Job, JobExecutor};
use std::path::Path;

/// Run one periodic job immediately, against the local wall clock.
pub fn run_now(cwd: &Path, job: Job) -> anyhow::Result<()> {
    let mut ledger = Ledger::discover(cwd)?;
    let now = chrono::Local::now().naive_local();
    let report = ledger.store.execute(job, now)?;
    println!("{job}: {report}");
    Ok(())
}
