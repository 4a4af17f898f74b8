use crate::attester::{Attester, LedgerError, TransactionDetails};
use crate::config::{LedgerConfig, LedgerNetwork};
use chrono::Utc;
use edc_core::{merkle_root, profile_hash, BlockchainRecord, EmployeeProfile, HashError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tracing::{debug, info};

const MOCK_CONFIRMATIONS: u64 = 127;
const MOCK_GAS_USED: &str = "21000";
const ONE_HOUR_MS: i64 = 3_600_000;

/// In-process ledger stand-in: random transaction hashes, fixed delay,
/// append-only log of every record it has issued.
pub struct MockLedger {
    cfg: LedgerConfig,
    rng: Mutex<StdRng>,
    issued: Mutex<Vec<BlockchainRecord>>,
}

impl MockLedger {
    pub fn new(cfg: LedgerConfig) -> Self {
        Self::with_rng(cfg, StdRng::from_entropy())
    }

    /// Reproducible transaction hashes and block numbers.
    pub fn with_seed(cfg: LedgerConfig, seed: u64) -> Self {
        Self::with_rng(cfg, StdRng::seed_from_u64(seed))
    }

    fn with_rng(cfg: LedgerConfig, rng: StdRng) -> Self {
        Self {
            cfg,
            rng: Mutex::new(rng),
            issued: Mutex::new(Vec::new()),
        }
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.cfg
    }

    /// Snapshot of issued records, oldest first.
    pub fn records(&self) -> Vec<BlockchainRecord> {
        self.issued
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Aggregate fingerprint over every data hash issued so far.
    pub fn batch_root(&self) -> Result<String, HashError> {
        let hashes: Vec<String> = self
            .records()
            .into_iter()
            .map(|record| record.data_hash)
            .collect();
        merkle_root(&hashes)
    }

    fn issue(&self, data_hash: String) -> BlockchainRecord {
        let (tx_bytes, offset) = {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            let tx_bytes: [u8; 32] = rng.gen();
            let offset = rng.gen_range(0..self.cfg.block_span.max(1));
            (tx_bytes, offset)
        };
        let record = BlockchainRecord {
            data_hash,
            transaction_hash: format!("0x{}", hex::encode(tx_bytes)),
            block_number: self.cfg.base_block_number + offset,
            timestamp: Utc::now().timestamp_millis(),
            network: self.cfg.network_label.clone(),
        };
        self.issued
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record.clone());
        record
    }

    async fn simulate_latency(&self, millis: u64) {
        if millis > 0 {
            tokio::time::sleep(Duration::from_millis(millis)).await;
        }
    }
}

impl Attester for MockLedger {
    fn network(&self) -> LedgerNetwork {
        self.cfg.network
    }

    async fn attest(&self, profile: &EmployeeProfile) -> Result<BlockchainRecord, LedgerError> {
        let data_hash = profile_hash(profile)?;
        debug!(%data_hash, network = %self.cfg.network, "submitting fingerprint");
        self.simulate_latency(self.cfg.latency_ms).await;

        if self.cfg.network != LedgerNetwork::Mock {
            return Err(LedgerError::NetworkNotImplemented(self.cfg.network));
        }

        let record = self.issue(data_hash);
        info!(
            data_hash = %record.data_hash,
            transaction_hash = %record.transaction_hash,
            block_number = record.block_number,
            "profile fingerprint attested"
        );
        Ok(record)
    }

    async fn transaction_details(
        &self,
        transaction_hash: &str,
    ) -> Result<TransactionDetails, LedgerError> {
        let well_formed = transaction_hash
            .strip_prefix("0x")
            .is_some_and(|h| h.len() == 64 && h.chars().all(|c| c.is_ascii_hexdigit()));
        if !well_formed {
            return Err(LedgerError::InvalidTransactionHash(
                transaction_hash.to_string(),
            ));
        }
        self.simulate_latency(self.cfg.latency_ms / 2).await;

        Ok(TransactionDetails {
            hash: transaction_hash.to_string(),
            status: "confirmed".to_string(),
            confirmations: MOCK_CONFIRMATIONS,
            gas_used: MOCK_GAS_USED.to_string(),
            timestamp: Utc::now().timestamp_millis() - ONE_HOUR_MS,
        })
    }
}
