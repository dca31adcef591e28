use pacer_ledger::Ledger;
use std::path::Path;

pub fn execute(root: &Path) -> anyhow::Result<()> {
    let (ledger, created) = Ledger::init(root)?;
    if created {
        println!("Initialized {}", ledger.paths.pacer_dir.display());
    } else {
        println!("Already initialized at {}", ledger.paths.pacer_dir.display());
    }
    Ok(())
}
