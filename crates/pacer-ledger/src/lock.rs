use crate::error::{LedgerError, Result};
use crate::paths::PacerPaths;
use fs2::FileExt;
use std::fs::{File, OpenOptions};

/// Exclusive workspace lock backed by `.pacer/LOCK`.
/// Held by the scheduler so only one process fires periodic jobs.
/// Automatically released when dropped.
pub struct WorkspaceLock {
    _file: File,
}

impl WorkspaceLock {
    /// Try to acquire the workspace lock (non-blocking).
    /// Returns [`LedgerError::Locked`] if another process holds it.
    pub fn acquire(paths: &PacerPaths) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .read(true)
            .write(true)
            .open(&paths.lock_file)?;

        file.try_lock_exclusive()
            .map_err(|_| LedgerError::Locked(paths.lock_file.clone()))?;

        Ok(Self { _file: file })
    }
}
