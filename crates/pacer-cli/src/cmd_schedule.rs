use pacer_ledger::{Ledger, WorkspaceLock};
use pacer_sched::{init_global, Runner};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// `pacer schedule list`
pub fn list(cwd: &Path) -> anyhow::Result<()> {
    let ledger = Ledger::discover(cwd)?;
    let table = init_global(&ledger.config()?)?;
    let now = chrono::Local::now();
    println!("{:<42} {:<16} NEXT", "JOB", "CRON");
    for entry in table.entries() {
        let next = table
            .next_fire(entry.job, &now)
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "(never)".to_string());
        println!("{:<42} {:<16} {}", entry.job.name(), entry.expression, next);
    }
    Ok(())
}

/// `pacer schedule run`: tick until Ctrl-C. Holds the workspace lock so a
/// second scheduler on the same workspace refuses to start.
pub fn run(cwd: &Path) -> anyhow::Result<()> {
    let mut ledger = Ledger::discover(cwd)?;
    let _lock = WorkspaceLock::acquire(&ledger.paths)?;
    let config = ledger.config()?;
    let table = init_global(&config)?;

    let stop = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&stop);
    ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst))?;

    eprintln!(
        "pacer scheduler running on {} (tick {}s). Press Ctrl-C to stop.",
        ledger.paths.root.display(),
        config.tick_secs
    );
    info!(
        root = %ledger.paths.root.display(),
        tick_secs = config.tick_secs,
        jobs = table.entries().len(),
        "scheduler lock acquired"
    );
    let mut runner = Runner::new(table, chrono::Local::now());
    runner.run_until(
        &mut ledger.store,
        &stop,
        Duration::from_secs(config.tick_secs),
        chrono::Local::now,
    );
    info!(root = %ledger.paths.root.display(), "scheduler stopping, releasing lock");
    Ok(())
}
