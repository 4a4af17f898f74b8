//! One-time-password identity check keyed by phone number.

use crate::clock::{Clock, SystemClock};
use crate::config::OtpConfig;
use chrono::{DateTime, Duration, Utc};
use edc_core::validation::digits_only;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use thiserror::Error;
use tracing::{info, warn};

const PHONE_DIGITS: usize = 10;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OtpError {
    #[error("Invalid phone number")]
    InvalidPhone,
    #[error("Phone number and OTP are required")]
    MissingCode,
    #[error("OTP expired or not found")]
    NotFound,
    #[error("OTP expired")]
    Expired,
    #[error("Invalid OTP")]
    Mismatch,
}

/// Issued code. Delivery is the caller's concern.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OtpChallenge {
    pub phone_number: String,
    pub code: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    pub phone_number: String,
    pub logged_in_at: DateTime<Utc>,
}

pub trait IdentityVerifier {
    fn issue(&self, phone: &str) -> Result<OtpChallenge, OtpError>;
    fn verify(&self, phone: &str, code: &str) -> Result<AuthSession, OtpError>;
}

#[derive(Debug, Clone)]
struct Pending {
    code: String,
    expires_at: DateTime<Utc>,
}

/// In-process code store. A newer code for the same phone replaces the older one.
pub struct OtpVerifier<C: Clock = SystemClock> {
    cfg: OtpConfig,
    clock: C,
    rng: Mutex<StdRng>,
    pending: Mutex<HashMap<String, Pending>>,
}

impl OtpVerifier<SystemClock> {
    pub fn new(cfg: OtpConfig) -> Self {
        Self::with_clock(cfg, SystemClock)
    }
}

impl<C: Clock> OtpVerifier<C> {
    pub fn with_clock(cfg: OtpConfig, clock: C) -> Self {
        Self::build(cfg, clock, StdRng::from_entropy())
    }

    pub fn with_seed(cfg: OtpConfig, clock: C, seed: u64) -> Self {
        Self::build(cfg, clock, StdRng::seed_from_u64(seed))
    }

    fn build(cfg: OtpConfig, clock: C, rng: StdRng) -> Self {
        Self {
            cfg,
            clock,
            rng: Mutex::new(rng),
            pending: Mutex::new(HashMap::new()),
        }
    }

    pub fn outstanding(&self) -> usize {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn next_code(&self) -> String {
        let len = self.cfg.code_length.clamp(1, 9);
        let low = 10u32.pow(len - 1);
        let high = 10u32.pow(len);
        let code = self
            .rng
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .gen_range(low..high);
        code.to_string()
    }
}

/// Keeps the last ten digits; fewer than ten digits is not a phone number.
pub fn normalize_phone(raw: &str) -> Result<String, OtpError> {
    let digits = digits_only(raw);
    if digits.len() < PHONE_DIGITS {
        return Err(OtpError::InvalidPhone);
    }
    Ok(digits[digits.len() - PHONE_DIGITS..].to_string())
}

impl<C: Clock> IdentityVerifier for OtpVerifier<C> {
    fn issue(&self, phone: &str) -> Result<OtpChallenge, OtpError> {
        let phone_number = normalize_phone(phone)?;
        let code = self.next_code();
        let now = self.clock.now();
        let expires_at = now + Duration::seconds(self.cfg.ttl_secs);

        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        pending.retain(|_, entry| entry.expires_at >= now);
        pending.insert(
            phone_number.clone(),
            Pending {
                code: code.clone(),
                expires_at,
            },
        );
        drop(pending);
        info!(phone = %phone_number, %expires_at, "otp issued");

        Ok(OtpChallenge {
            phone_number,
            code,
            expires_at,
        })
    }

    fn verify(&self, phone: &str, code: &str) -> Result<AuthSession, OtpError> {
        if code.trim().is_empty() {
            return Err(OtpError::MissingCode);
        }
        let phone_number = normalize_phone(phone)?;
        let now = self.clock.now();

        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        let entry = pending.get(&phone_number).ok_or(OtpError::NotFound)?;

        if now > entry.expires_at {
            pending.remove(&phone_number);
            warn!(phone = %phone_number, "otp expired");
            return Err(OtpError::Expired);
        }
        if entry.code != code.trim() {
            warn!(phone = %phone_number, "otp mismatch");
            return Err(OtpError::Mismatch);
        }

        pending.remove(&phone_number);
        info!(phone = %phone_number, "otp verified");
        Ok(AuthSession {
            phone_number,
            logged_in_at: now,
        })
    }
}
