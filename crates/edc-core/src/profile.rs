use crate::error::ProfileError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
    #[default]
    Other,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub pin_code: String,
    pub country: String,
}

/// Identity block of the card. Field order here is the hashed key order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PersonalDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edc_number: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: String,
    pub gender: Gender,
    pub email: String,
    pub phone: String,
    pub address: Address,
    /// National identity number (12 digits).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aadhaar_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pan_number: Option<String>,
    /// Data URL or storage reference of the card photo.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}

impl PersonalDetails {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WorkExperience {
    pub id: String,
    pub company_name: String,
    pub designation: String,
    pub start_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    pub currently_working: bool,
    pub responsibilities: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub achievements: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    pub id: String,
    pub institution_name: String,
    pub degree: String,
    pub field_of_study: String,
    pub start_year: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percentage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SalaryHistory {
    pub id: String,
    pub company_name: String,
    pub designation: String,
    pub ctc: f64,
    pub base_pay: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bonuses: Option<f64>,
    pub start_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    /// Privacy control for shared views.
    pub is_visible: bool,
}

/// Provident-fund account linked through the pension lookup.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EpfDetails {
    pub uan_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pf_account_number: Option<String>,
    pub employee_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_joining: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_exit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_employer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pf_balance: Option<f64>,
    pub is_verified: bool,
    pub last_updated: String,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum CheckStatus {
    #[default]
    Pending,
    InProgress,
    Verified,
    Failed,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum CriminalRecordStatus {
    #[default]
    Pending,
    InProgress,
    Clear,
    IssuesFound,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BackgroundCheck {
    pub status: CheckStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CriminalRecordCheck {
    pub status: CriminalRecordStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DocumentVerification {
    pub status: CheckStatus,
    pub verified_documents: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}

/// Default value has every check pending.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VerificationStatus {
    pub background_check: BackgroundCheck,
    pub criminal_record: CriminalRecordCheck,
    pub document_verification: DocumentVerification,
}

/// Ledger attestation of a profile fingerprint. Never edited once issued.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BlockchainRecord {
    pub data_hash: String,
    pub transaction_hash: String,
    pub block_number: u64,
    /// Epoch milliseconds.
    pub timestamp: i64,
    pub network: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeProfile {
    pub personal_details: PersonalDetails,
    #[serde(default)]
    pub work_experience: Vec<WorkExperience>,
    #[serde(default)]
    pub education: Vec<Education>,
    #[serde(default)]
    pub salary_history: Vec<SalaryHistory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub epf_details: Option<EpfDetails>,
    pub verification_status: VerificationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blockchain_record: Option<BlockchainRecord>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub profile_completion: u8,
}

impl EmployeeProfile {
    /// Fresh card: no history, every verification pending.
    pub fn new(personal_details: PersonalDetails, now: DateTime<Utc>) -> Self {
        let mut profile = Self {
            personal_details,
            work_experience: Vec::new(),
            education: Vec::new(),
            salary_history: Vec::new(),
            epf_details: None,
            verification_status: VerificationStatus::default(),
            blockchain_record: None,
            created_at: now,
            updated_at: now,
            profile_completion: 0,
        };
        profile.refresh_completion();
        profile
    }

    /// Parses a stored snapshot. Missing structural fields are rejected.
    pub fn from_json(raw: &str) -> Result<Self, ProfileError> {
        serde_json::from_str(raw).map_err(ProfileError::Malformed)
    }

    pub fn to_json_pretty(&self) -> Result<String, ProfileError> {
        serde_json::to_string_pretty(self).map_err(ProfileError::Malformed)
    }

    pub fn refresh_completion(&mut self) {
        self.profile_completion = crate::completion::profile_completion(self);
    }

    pub fn edc_number(&self) -> Option<&str> {
        self.personal_details.edc_number.as_deref()
    }
}
