//! Ledger attestation for profile fingerprints.
//!
//! The core never depends on this crate; it only supplies the hash function
//! that adapters anchor.

pub mod attester;
pub mod config;
pub mod mock;


pub use attester::{Attester, IntegrityReport, LedgerError, TransactionDetails};
pub use config::{LedgerConfig, LedgerNetwork};
pub use mock::MockLedger;
