//! Weighted profile-completion scoring.
//!
//! Category weights sum to 100, so earned points are already a percentage.
//! The rounding step is kept so the weights can be re-tuned without touching
//! callers.

use crate::profile::{CheckStatus, CriminalRecordStatus, EmployeeProfile};
use serde::{Deserialize, Serialize};

pub const PERSONAL_FIELD_POINTS: u32 = 5;
pub const PERSONAL_WEIGHT: u32 = 40;
pub const WORK_EXPERIENCE_WEIGHT: u32 = 20;
pub const EDUCATION_WEIGHT: u32 = 20;
pub const EPF_WEIGHT: u32 = 10;
pub const BACKGROUND_CHECK_POINTS: u32 = 5;
pub const CRIMINAL_RECORD_POINTS: u32 = 5;
pub const VERIFICATION_WEIGHT: u32 = BACKGROUND_CHECK_POINTS + CRIMINAL_RECORD_POINTS;

pub const TOTAL_WEIGHT: u32 =
    PERSONAL_WEIGHT + WORK_EXPERIENCE_WEIGHT + EDUCATION_WEIGHT + EPF_WEIGHT + VERIFICATION_WEIGHT;

/// Points earned per category.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CompletionBreakdown {
    pub personal: u32,
    pub work_experience: u32,
    pub education: u32,
    pub epf: u32,
    pub verification: u32,
}

impl CompletionBreakdown {
    pub fn earned(&self) -> u32 {
        self.personal + self.work_experience + self.education + self.epf + self.verification
    }

    /// Earned points scaled to 0..=100, rounded half up.
    pub fn percent(&self) -> u8 {
        let scaled = (self.earned() * 100 + TOTAL_WEIGHT / 2) / TOTAL_WEIGHT;
        scaled.min(100) as u8
    }
}

fn present(value: &str) -> bool {
    !value.is_empty()
}

fn present_opt(value: Option<&String>) -> bool {
    value.is_some_and(|v| present(v))
}

pub fn completion_breakdown(profile: &EmployeeProfile) -> CompletionBreakdown {
    let pd = &profile.personal_details;
    let personal_checks = [
        present(&pd.first_name),
        present(&pd.last_name),
        present(&pd.date_of_birth),
        present(&pd.email),
        present(&pd.phone),
        present(&pd.address.city),
        present_opt(pd.aadhaar_number.as_ref()),
        present_opt(pd.photo.as_ref()),
    ];
    let personal = personal_checks.iter().filter(|ok| **ok).count() as u32 * PERSONAL_FIELD_POINTS;

    let work_experience = if profile.work_experience.is_empty() {
        0
    } else {
        WORK_EXPERIENCE_WEIGHT
    };
    let education = if profile.education.is_empty() {
        0
    } else {
        EDUCATION_WEIGHT
    };
    let epf = match &profile.epf_details {
        Some(epf) if epf.is_verified => EPF_WEIGHT,
        _ => 0,
    };

    let vs = &profile.verification_status;
    let mut verification = 0;
    if vs.background_check.status == CheckStatus::Verified {
        verification += BACKGROUND_CHECK_POINTS;
    }
    if vs.criminal_record.status == CriminalRecordStatus::Clear {
        verification += CRIMINAL_RECORD_POINTS;
    }

    CompletionBreakdown {
        personal,
        work_experience,
        education,
        epf,
        verification,
    }
}

/// Completion score in `0..=100`. Total over every typed profile.
pub fn profile_completion(profile: &EmployeeProfile) -> u8 {
    completion_breakdown(profile).percent()
}
