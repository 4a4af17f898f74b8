//! Provident-fund lookup adapters.

use crate::config::PensionConfig;
use chrono::Utc;
use edc_core::EpfDetails;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

const UAN_DIGITS: usize = 12;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PensionError {
    #[error("Invalid UAN number format. UAN should be 12 digits.")]
    InvalidUan(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContributionMonth {
    pub month: String,
    pub employee_contribution: f64,
    pub employer_contribution: f64,
    pub pension_contribution: f64,
    pub total: f64,
}

/// Lookup of provident-fund records by Universal Account Number.
pub trait PensionLookup {
    fn fetch(&self, uan: &str) -> impl Future<Output = Result<EpfDetails, PensionError>> + Send;

    fn verify(
        &self,
        uan: &str,
        employee_name: &str,
    ) -> impl Future<Output = Result<bool, PensionError>> + Send;

    fn contribution_history(
        &self,
        uan: &str,
    ) -> impl Future<Output = Result<Vec<ContributionMonth>, PensionError>> + Send;
}

pub fn is_valid_uan(uan: &str) -> bool {
    uan.len() == UAN_DIGITS && uan.bytes().all(|b| b.is_ascii_digit())
}

fn check_uan(uan: &str) -> Result<(), PensionError> {
    if is_valid_uan(uan) {
        Ok(())
    } else {
        Err(PensionError::InvalidUan(uan.to_string()))
    }
}

/// Canned EPFO responses behind a configurable delay.
#[derive(Debug, Clone, Default)]
pub struct MockPensionLookup {
    cfg: PensionConfig,
}

impl MockPensionLookup {
    pub fn new(cfg: PensionConfig) -> Self {
        Self { cfg }
    }

    async fn pause(&self) {
        if self.cfg.latency_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.cfg.latency_ms)).await;
        }
    }
}

impl PensionLookup for MockPensionLookup {
    async fn fetch(&self, uan: &str) -> Result<EpfDetails, PensionError> {
        self.pause().await;
        check_uan(uan)?;
        debug!(uan, "pension record fetched");
        Ok(EpfDetails {
            uan_number: uan.to_string(),
            pf_account_number: Some(format!("MH/MUM/0{}/{}", &uan[..6], &uan[6..])),
            employee_name: "Sample Employee".to_string(),
            date_of_joining: Some("2020-01-15".to_string()),
            date_of_exit: None,
            previous_employer: Some("Previous Company Ltd.".to_string()),
            pf_balance: Some(125_000.0),
            is_verified: true,
            last_updated: Utc::now().to_rfc3339(),
        })
    }

    async fn verify(&self, uan: &str, employee_name: &str) -> Result<bool, PensionError> {
        self.pause().await;
        check_uan(uan)?;
        debug!(uan, employee_name, "pension record verified");
        Ok(true)
    }

    async fn contribution_history(&self, uan: &str) -> Result<Vec<ContributionMonth>, PensionError> {
        self.pause().await;
        check_uan(uan)?;
        Ok(["November 2024", "October 2024", "September 2024"]
            .into_iter()
            .map(|month| ContributionMonth {
                month: month.to_string(),
                employee_contribution: 1_800.0,
                employer_contribution: 1_800.0,
                pension_contribution: 1_250.0,
                total: 4_850.0,
            })
            .collect())
    }
}
