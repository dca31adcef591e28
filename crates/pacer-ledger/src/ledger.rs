use crate::config::PacerConfig;
use crate::error::{LedgerError, Result};
use crate::paths::PacerPaths;
use crate::sqlite_store::SqliteStore;
use std::path::Path;

/// An opened `.pacer/` workspace: its paths plus the ledger database.
pub struct Ledger {
    pub paths: PacerPaths,
    pub store: SqliteStore,
}

impl Ledger {
    /// Open the workspace rooted at `root`. Fails if `.pacer/` does not exist.
    pub fn open(root: &Path) -> Result<Self> {
        let paths = PacerPaths::discover(root);
        if !paths.is_initialized() {
            return Err(LedgerError::NotInitialized(paths.root));
        }
        let store = SqliteStore::open_or_create(&paths.ledger_db)?;
        Ok(Self { paths, store })
    }

    /// Open the nearest workspace at or above `cwd`.
    pub fn discover(cwd: &Path) -> Result<Self> {
        match PacerPaths::find_root(cwd) {
            Some(root) => Self::open(&root),
            None => Err(LedgerError::NotInitialized(cwd.to_path_buf())),
        }
    }

    /// Create `.pacer/` and the schema under `root`. Idempotent.
    /// Returns the ledger and whether the workspace was newly created.
    pub fn init(root: &Path) -> Result<(Self, bool)> {
        let paths = PacerPaths::discover(root);
        let created = !paths.is_initialized();
        paths.ensure_layout()?;
        let ledger = Self::open(root)?;
        Ok((ledger, created))
    }

    pub fn config(&self) -> Result<PacerConfig> {
        PacerConfig::load(&self.paths.config_json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn open_without_init_fails() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(matches!(
            Ledger::open(tmp.path()),
            Err(LedgerError::NotInitialized(_))
        ));
        assert!(Ledger::discover(tmp.path()).is_err());
    }

    #[test]
    fn init_is_idempotent_and_keeps_data() {
        let tmp = tempfile::tempdir().unwrap();
        let (ledger, created) = Ledger::init(tmp.path()).unwrap();
        assert!(created);
        assert!(ledger.paths.ledger_db.exists());
        ledger.store.create_brand("Acme", dec!(10), dec!(100)).unwrap();
        drop(ledger);

        let (ledger, created) = Ledger::init(tmp.path()).unwrap();
        assert!(!created);
        assert_eq!(ledger.store.list_brands().unwrap().len(), 1);
        assert_eq!(ledger.config().unwrap(), PacerConfig::default());
    }

    #[test]
    fn discover_from_subdirectory() {
        let tmp = tempfile::tempdir().unwrap();
        Ledger::init(tmp.path()).unwrap();
        let sub = tmp.path().join("reports");
        std::fs::create_dir_all(&sub).unwrap();
        let ledger = Ledger::discover(&sub).unwrap();
        assert_eq!(ledger.paths.root, tmp.path());
    }
}
