//! Typed partial updates.
//!
//! Every patch field is optional: a present field replaces the prior value,
//! an absent one keeps it. Patches never remove optional data.

use crate::profile::{
    Address, BackgroundCheck, BlockchainRecord, CriminalRecordCheck, DocumentVerification,
    Education, EmployeeProfile, EpfDetails, Gender, PersonalDetails, SalaryHistory,
    VerificationStatus, WorkExperience,
};
use serde::{Deserialize, Serialize};

/// Field-level merge of an incoming patch onto a prior value.
pub trait Patch<T> {
    fn apply(self, prior: &T) -> T;
}

fn pick<V: Clone>(incoming: Option<V>, prior: &V) -> V {
    incoming.unwrap_or_else(|| prior.clone())
}

fn pick_opt<V: Clone>(incoming: Option<V>, prior: &Option<V>) -> Option<V> {
    incoming.or_else(|| prior.clone())
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AddressPatch {
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub pin_code: Option<String>,
    pub country: Option<String>,
}

impl Patch<Address> for AddressPatch {
    fn apply(self, prior: &Address) -> Address {
        Address {
            street: pick(self.street, &prior.street),
            city: pick(self.city, &prior.city),
            state: pick(self.state, &prior.state),
            pin_code: pick(self.pin_code, &prior.pin_code),
            country: pick(self.country, &prior.country),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PersonalDetailsPatch {
    pub edc_number: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub date_of_birth: Option<String>,
    pub gender: Option<Gender>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<AddressPatch>,
    pub aadhaar_number: Option<String>,
    pub pan_number: Option<String>,
    pub photo: Option<String>,
}

impl Patch<PersonalDetails> for PersonalDetailsPatch {
    fn apply(self, prior: &PersonalDetails) -> PersonalDetails {
        PersonalDetails {
            edc_number: pick_opt(self.edc_number, &prior.edc_number),
            first_name: pick(self.first_name, &prior.first_name),
            last_name: pick(self.last_name, &prior.last_name),
            date_of_birth: pick(self.date_of_birth, &prior.date_of_birth),
            gender: pick(self.gender, &prior.gender),
            email: pick(self.email, &prior.email),
            phone: pick(self.phone, &prior.phone),
            address: match self.address {
                Some(patch) => patch.apply(&prior.address),
                None => prior.address.clone(),
            },
            aadhaar_number: pick_opt(self.aadhaar_number, &prior.aadhaar_number),
            pan_number: pick_opt(self.pan_number, &prior.pan_number),
            photo: pick_opt(self.photo, &prior.photo),
        }
    }
}

/// Replaces whole check records; sub-fields are not merged individually.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VerificationPatch {
    pub background_check: Option<BackgroundCheck>,
    pub criminal_record: Option<CriminalRecordCheck>,
    pub document_verification: Option<DocumentVerification>,
}

impl Patch<VerificationStatus> for VerificationPatch {
    fn apply(self, prior: &VerificationStatus) -> VerificationStatus {
        VerificationStatus {
            background_check: pick(self.background_check, &prior.background_check),
            criminal_record: pick(self.criminal_record, &prior.criminal_record),
            document_verification: pick(self.document_verification, &prior.document_verification),
        }
    }
}

/// Sequences replace the prior sequence wholesale.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePatch {
    pub personal_details: Option<PersonalDetailsPatch>,
    pub work_experience: Option<Vec<WorkExperience>>,
    pub education: Option<Vec<Education>>,
    pub salary_history: Option<Vec<SalaryHistory>>,
    pub epf_details: Option<EpfDetails>,
    pub verification_status: Option<VerificationPatch>,
    pub blockchain_record: Option<BlockchainRecord>,
}

impl ProfilePatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Timestamps and completion are left to the caller, which owns the clock.
impl Patch<EmployeeProfile> for ProfilePatch {
    fn apply(self, prior: &EmployeeProfile) -> EmployeeProfile {
        EmployeeProfile {
            personal_details: match self.personal_details {
                Some(patch) => patch.apply(&prior.personal_details),
                None => prior.personal_details.clone(),
            },
            work_experience: pick(self.work_experience, &prior.work_experience),
            education: pick(self.education, &prior.education),
            salary_history: pick(self.salary_history, &prior.salary_history),
            epf_details: pick_opt(self.epf_details, &prior.epf_details),
            verification_status: match self.verification_status {
                Some(patch) => patch.apply(&prior.verification_status),
                None => prior.verification_status.clone(),
            },
            blockchain_record: pick_opt(self.blockchain_record, &prior.blockchain_record),
            created_at: prior.created_at,
            updated_at: prior.updated_at,
            profile_completion: prior.profile_completion,
        }
    }
}
