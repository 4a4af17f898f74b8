//! Card lifecycle over a [`ProfileRepository`].

use crate::clock::{Clock, SystemClock};
use crate::error::ServiceError;
use crate::pension::PensionLookup;
use crate::repository::{ProfileRepository, StorageError};
use chrono::Datelike;
use edc_core::edc_number::generate_edc_number_with;
use edc_core::{
    validate_personal_details, BlockchainRecord, CheckStatus, CriminalRecordStatus,
    EmployeeProfile, Patch, PersonalDetails, ProfilePatch,
};
use edc_ledger::{Attester, IntegrityReport};
use tracing::{info, warn};

pub struct EdcService<R, C = SystemClock> {
    repo: R,
    clock: C,
}

impl<R: ProfileRepository> EdcService<R, SystemClock> {
    pub fn new(repo: R) -> Self {
        Self::with_clock(repo, SystemClock)
    }
}

impl<R: ProfileRepository, C: Clock> EdcService<R, C> {
    pub fn with_clock(repo: R, clock: C) -> Self {
        Self { repo, clock }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Validates the details, assigns a fresh EDC number and stores a new card.
    /// An existing card is replaced.
    pub fn create_card(&self, personal: PersonalDetails) -> Result<EmployeeProfile, ServiceError> {
        validate_personal_details(&personal).into_result()?;

        let now = self.clock.now();
        let edc_number = generate_edc_number_with(&mut rand::thread_rng(), now.year());
        let personal = PersonalDetails {
            edc_number: Some(edc_number.clone()),
            ..personal
        };
        let profile = EmployeeProfile::new(personal, now);

        match self.repo.load() {
            Ok(Some(prior)) => warn!(
                %edc_number,
                prior = prior.edc_number().unwrap_or("N/A"),
                "replacing existing card"
            ),
            Ok(None) => {}
            Err(StorageError::Corrupt(error)) => {
                warn!(%edc_number, %error, "replacing unreadable stored card")
            }
            Err(error) => return Err(error.into()),
        }
        self.repo.replace(&profile)?;
        info!(
            %edc_number,
            completion = profile.profile_completion,
            "card created"
        );
        Ok(profile)
    }

    pub fn profile(&self) -> Result<Option<EmployeeProfile>, ServiceError> {
        Ok(self.repo.load()?)
    }

    fn current(&self) -> Result<EmployeeProfile, ServiceError> {
        self.repo.load()?.ok_or(ServiceError::NoProfile)
    }

    fn store(&self, mut profile: EmployeeProfile) -> Result<EmployeeProfile, ServiceError> {
        profile.updated_at = self.clock.now();
        profile.refresh_completion();
        self.repo.replace(&profile)?;
        Ok(profile)
    }

    /// Merges the patch, then recomputes completion and `updatedAt`.
    pub fn update_profile(&self, patch: ProfilePatch) -> Result<EmployeeProfile, ServiceError> {
        let prior = self.current()?;
        let before = prior.profile_completion;
        let updated = self.store(patch.apply(&prior))?;
        info!(
            edc_number = updated.edc_number().unwrap_or("N/A"),
            before,
            after = updated.profile_completion,
            "profile updated"
        );
        Ok(updated)
    }

    /// Attests the stored snapshot and records the receipt on it. On ledger
    /// failure nothing is written.
    pub async fn save_to_blockchain<A: Attester>(
        &self,
        attester: &A,
    ) -> Result<BlockchainRecord, ServiceError> {
        let mut profile = self.current()?;
        let record = attester.attest(&profile).await?;
        profile.blockchain_record = Some(record.clone());
        self.store(profile)?;
        Ok(record)
    }

    pub fn verify_integrity<A: Attester>(
        &self,
        attester: &A,
    ) -> Result<IntegrityReport, ServiceError> {
        let profile = self.current()?;
        let record = profile
            .blockchain_record
            .as_ref()
            .ok_or(ServiceError::NotAttested)?;
        let report = attester.verify(&profile, record)?;
        if !report.valid {
            warn!(
                expected = %report.expected_hash,
                actual = %report.actual_hash,
                "integrity mismatch"
            );
        }
        Ok(report)
    }

    pub fn export_json(&self) -> Result<String, ServiceError> {
        Ok(self.current()?.to_json_pretty()?)
    }

    /// Fetches provident-fund details by UAN and attaches them to the card.
    pub async fn link_epf<P: PensionLookup>(
        &self,
        lookup: &P,
        uan: &str,
    ) -> Result<EmployeeProfile, ServiceError> {
        let profile = self.current()?;
        let details = lookup.fetch(uan).await?;
        let linked = self.store(EmployeeProfile {
            epf_details: Some(details),
            ..profile
        })?;
        info!(uan, completion = linked.profile_completion, "epf linked");
        Ok(linked)
    }

    pub fn request_background_check(&self) -> Result<EmployeeProfile, ServiceError> {
        let mut profile = self.current()?;
        let check = &mut profile.verification_status.background_check;
        if check.status != CheckStatus::Pending {
            return Err(ServiceError::CheckNotRequestable {
                check: "background",
                status: format!("{:?}", check.status),
            });
        }
        check.status = CheckStatus::InProgress;
        info!("background check requested");
        self.store(profile)
    }

    pub fn request_criminal_check(&self) -> Result<EmployeeProfile, ServiceError> {
        let mut profile = self.current()?;
        let check = &mut profile.verification_status.criminal_record;
        if check.status != CriminalRecordStatus::Pending {
            return Err(ServiceError::CheckNotRequestable {
                check: "criminal record",
                status: format!("{:?}", check.status),
            });
        }
        check.status = CriminalRecordStatus::InProgress;
        info!("criminal record check requested");
        self.store(profile)
    }
}
