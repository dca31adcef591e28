pub mod accounting;
pub mod config;
pub mod error;
pub mod ledger;
pub mod lock;
pub mod paths;
pub mod sqlite_store;
pub mod sweep;

#[cfg(test)]
mod testutil;

pub use accounting::SpendOutcome;
pub use config::PacerConfig;
pub use error::{LedgerError, Result};
pub use ledger::Ledger;
pub use lock::WorkspaceLock;
pub use paths::PacerPaths;
pub use sqlite_store::SqliteStore;
pub use sweep::Enforcement;
