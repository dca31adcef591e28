use std::path::{Path, PathBuf};

/// All well-known paths under `.pacer/`.
#[derive(Debug, Clone)]
pub struct PacerPaths {
    pub root: PathBuf,
    pub pacer_dir: PathBuf,
    pub ledger_db: PathBuf,
    pub config_json: PathBuf,
    pub lock_file: PathBuf,
}

impl PacerPaths {
    /// Derive all paths from a workspace root. Pure computation, no I/O.
    pub fn discover(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let pacer_dir = root.join(".pacer");
        Self {
            ledger_db: pacer_dir.join("ledger.db"),
            config_json: pacer_dir.join("config.json"),
            lock_file: pacer_dir.join("LOCK"),
            pacer_dir,
            root,
        }
    }

    /// Create `.pacer/`. Idempotent.
    pub fn ensure_layout(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.pacer_dir)
    }

    /// Check whether `.pacer/` exists.
    pub fn is_initialized(&self) -> bool {
        self.pacer_dir.is_dir()
    }

    /// Walk up from `start` looking for a directory containing `.pacer/`.
    /// Returns `None` if not found.
    pub fn find_root(start: &Path) -> Option<PathBuf> {
        let mut cur = start.to_path_buf();
        loop {
            if cur.join(".pacer").is_dir() {
                return Some(cur);
            }
            if !cur.pop() {
                return None;
            }
        }
    }
}
