use crate::config::LedgerNetwork;
use edc_core::{profile_hash, BlockchainRecord, EmployeeProfile, HashError};
use serde::{Deserialize, Serialize};
use std::future::Future;
use thiserror::Error;

/// Errors surfaced by ledger adapters. A failed call never yields a record.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("fingerprint error: {0}")]
    Hash(#[from] HashError),
    #[error("network {0} not yet implemented")]
    NetworkNotImplemented(LedgerNetwork),
    #[error("invalid transaction hash: {0}")]
    InvalidTransactionHash(String),
}

/// Outcome of recomputing a profile fingerprint against a stored record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IntegrityReport {
    pub valid: bool,
    pub expected_hash: String,
    pub actual_hash: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDetails {
    pub hash: String,
    pub status: String,
    pub confirmations: u64,
    pub gas_used: String,
    /// Epoch milliseconds.
    pub timestamp: i64,
}

/// Capability to anchor a profile fingerprint on a ledger.
pub trait Attester {
    fn network(&self) -> LedgerNetwork;

    /// Hashes the profile and returns the issued record.
    fn attest(
        &self,
        profile: &EmployeeProfile,
    ) -> impl Future<Output = Result<BlockchainRecord, LedgerError>> + Send;

    fn transaction_details(
        &self,
        transaction_hash: &str,
    ) -> impl Future<Output = Result<TransactionDetails, LedgerError>> + Send;

    /// Recomputes the fingerprint and compares it with the attested one.
    fn verify(
        &self,
        profile: &EmployeeProfile,
        record: &BlockchainRecord,
    ) -> Result<IntegrityReport, LedgerError> {
        let actual_hash = profile_hash(profile)?;
        let valid = actual_hash == record.data_hash.to_ascii_lowercase();
        let message = if valid {
            "Data integrity verified"
        } else {
            "Data has been tampered"
        };
        Ok(IntegrityReport {
            valid,
            expected_hash: record.data_hash.clone(),
            actual_hash,
            message: message.to_string(),
        })
    }
}
