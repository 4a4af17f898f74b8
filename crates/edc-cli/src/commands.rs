use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{bail, Context, Result};
use tracing::{info, warn};

use edc_core::{
    completion_breakdown, merkle_root, profile_hash, verify_profile, EmployeeProfile,
    PersonalDetails,
};
use edc_ledger::MockLedger;
use edc_metrics::EdcMetrics;
use edc_registry::{EdcConfig, EdcService, JsonFileProfileRepository, ServiceError};

fn read_profile(path: &Path) -> Result<EmployeeProfile> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    EmployeeProfile::from_json(&raw).with_context(|| format!("parsing {}", path.display()))
}

fn service(cfg: &EdcConfig) -> Result<EdcService<JsonFileProfileRepository>> {
    let repo = JsonFileProfileRepository::new(&cfg.storage.data_dir)
        .with_context(|| format!("opening {}", cfg.storage.data_dir.display()))?;
    Ok(EdcService::new(repo))
}

pub fn score<W: Write>(out: &mut W, file: &Path) -> Result<()> {
    let profile = read_profile(file)?;
    let breakdown = completion_breakdown(&profile);
    writeln!(out, "score: {}", breakdown.percent())?;
    writeln!(out, "{}", serde_json::to_string_pretty(&breakdown)?)?;
    Ok(())
}

pub fn hash<W: Write>(out: &mut W, file: &Path) -> Result<()> {
    writeln!(out, "{}", profile_hash(&read_profile(file)?)?)?;
    Ok(())
}

pub fn verify<W: Write>(out: &mut W, file: &Path, expected: &str) -> Result<()> {
    let profile = read_profile(file)?;
    if verify_profile(&profile, expected)? {
        writeln!(out, "valid")?;
        Ok(())
    } else {
        bail!("fingerprint mismatch for {}", file.display())
    }
}

pub fn merkle<W: Write>(out: &mut W, hashes: &[String]) -> Result<()> {
    writeln!(out, "{}", merkle_root(hashes)?)?;
    Ok(())
}

pub fn create<W: Write>(out: &mut W, cfg: &EdcConfig, personal: PersonalDetails) -> Result<()> {
    let card = service(cfg)?.create_card(personal)?;
    writeln!(out, "{}", card.edc_number().unwrap_or_default())?;
    Ok(())
}

pub fn show<W: Write>(out: &mut W, cfg: &EdcConfig) -> Result<()> {
    writeln!(out, "{}", service(cfg)?.export_json()?)?;
    Ok(())
}

pub async fn attest<W: Write>(out: &mut W, cfg: &EdcConfig) -> Result<()> {
    let ledger = MockLedger::new(cfg.ledger.clone());
    let record = service(cfg)?.save_to_blockchain(&ledger).await?;
    info!(transaction_hash = %record.transaction_hash, "stored card attested");
    writeln!(out, "{}", serde_json::to_string_pretty(&record)?)?;
    Ok(())
}

pub fn check_integrity<W: Write>(out: &mut W, cfg: &EdcConfig) -> Result<()> {
    let ledger = MockLedger::new(cfg.ledger.clone());
    let report = service(cfg)?.verify_integrity(&ledger)?;
    writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
    if !report.valid {
        bail!(report.message);
    }
    Ok(())
}

pub fn metrics<W: Write>(out: &mut W, cfg: &EdcConfig) -> Result<()> {
    let svc = service(cfg)?;
    let profile = svc.profile()?.ok_or(ServiceError::NoProfile)?;
    let metrics = EdcMetrics::new()?;

    metrics.observe_profile(&profile);
    if let Some(record) = &profile.blockchain_record {
        metrics.record_attestation(&record.network);
        if !verify_profile(&profile, &record.data_hash)? {
            warn!("stored card no longer matches its attestation");
            metrics.record_integrity_failure();
        }
    }

    write!(out, "{}", metrics.gather_text()?)?;
    Ok(())
}
