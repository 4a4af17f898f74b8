use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LedgerNetwork {
    Ethereum,
    Hyperledger,
    Polygon,
    #[default]
    Mock,
}

impl fmt::Display for LedgerNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LedgerNetwork::Ethereum => "ethereum",
            LedgerNetwork::Hyperledger => "hyperledger",
            LedgerNetwork::Polygon => "polygon",
            LedgerNetwork::Mock => "mock",
        };
        f.write_str(name)
    }
}

/// Ledger adapter settings. Only the mock network is wired.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LedgerConfig {
    pub network: LedgerNetwork,
    /// Simulated confirmation delay per attestation.
    pub latency_ms: u64,
    pub base_block_number: u64,
    /// Issued block numbers fall in `base..base + span`.
    pub block_span: u64,
    /// Value written to `BlockchainRecord::network`.
    pub network_label: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            network: LedgerNetwork::Mock,
            latency_ms: 2_000,
            base_block_number: 15_000_000,
            block_span: 1_000_000,
            network_label: "Mock Blockchain".to_string(),
        }
    }
}

impl LedgerConfig {
    /// Same settings without the simulated delay.
    pub fn instant() -> Self {
        Self {
            latency_ms: 0,
            ..Self::default()
        }
    }
}
