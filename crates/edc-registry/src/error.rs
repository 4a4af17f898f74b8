use crate::admin::AdminError;
use crate::pension::PensionError;
use crate::repository::StorageError;
use edc_core::ProfileError;
use edc_ledger::LedgerError;
use thiserror::Error;

/// Everything a card workflow can fail with. Failed operations leave the
/// stored snapshot untouched.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("No profile found. Please create a profile first.")]
    NoProfile,
    #[error("profile has not been attested on a ledger")]
    NotAttested,
    #[error("{check} check cannot be requested while {status}")]
    CheckNotRequestable { check: &'static str, status: String },
    #[error(transparent)]
    Profile(#[from] ProfileError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Pension(#[from] PensionError),
    #[error(transparent)]
    Admin(#[from] AdminError),
}
