use std::path::PathBuf;

use pacer_core::{AmountError, BrandId, CampaignId, HourError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, LedgerError>;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error(transparent)]
    InvalidAmount(#[from] AmountError),
    #[error(transparent)]
    InvalidHour(#[from] HourError),
    #[error("{0} must not be empty")]
    EmptyName(&'static str),
    #[error("campaign {0} does not exist")]
    CampaignNotFound(CampaignId),
    #[error("brand {0} does not exist")]
    BrandNotFound(BrandId),
    #[error("Cannot log spend for an inactive campaign ({0}).")]
    InactiveCampaign(CampaignId),
    #[error("store transaction failed: {0}")]
    Transaction(#[from] rusqlite::Error),
    #[error("timestamp formatting failed: {0}")]
    Timestamp(#[from] time::error::Format),
    #[error("not a pacer workspace ({}/.pacer not found). Run `pacer init` first.", .0.display())]
    NotInitialized(PathBuf),
    #[error("workspace is locked by another process ({})", .0.display())]
    Locked(PathBuf),
    #[error("invalid config: {0}")]
    Config(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LedgerError {
    /// Rejected before any transaction started.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidAmount(_) | Self::InvalidHour(_) | Self::EmptyName(_)
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::CampaignNotFound(_) | Self::BrandNotFound(_))
    }
}
