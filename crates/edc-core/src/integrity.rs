//! Content addressing for profile snapshots.
//!
//! The fingerprint is SHA-256 over compact JSON. Key order comes from struct
//! declaration order, never from map iteration, so equal snapshots always
//! serialize to the same bytes.

use crate::error::HashError;
use crate::profile::{Education, EmployeeProfile, PersonalDetails, VerificationStatus, WorkExperience};
use serde::Serialize;
use sha2::{Digest, Sha256};

/// Hashed subset of a profile. Salary, EPF, ledger record and timestamps stay out.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HashableProfile<'a> {
    personal_details: &'a PersonalDetails,
    work_experience: &'a [WorkExperience],
    education: &'a [Education],
    verification_status: &'a VerificationStatus,
}

impl HashableProfile<'_> {
    /// JSON has no encoding for NaN or infinities; serde_json would write
    /// `null` and collide distinct snapshots.
    fn check_finite(&self) -> Result<(), HashError> {
        for (i, entry) in self.education.iter().enumerate() {
            if let Some(value) = entry.percentage.filter(|v| !v.is_finite()) {
                return Err(HashError::NonFinite {
                    field: format!("education[{i}].percentage"),
                    value,
                });
            }
        }
        Ok(())
    }
}

impl<'a> From<&'a EmployeeProfile> for HashableProfile<'a> {
    fn from(profile: &'a EmployeeProfile) -> Self {
        Self {
            personal_details: &profile.personal_details,
            work_experience: &profile.work_experience,
            education: &profile.education,
            verification_status: &profile.verification_status,
        }
    }
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// SHA-256 of the value's compact JSON form, lowercase hex (64 chars).
pub fn data_hash<T: Serialize + ?Sized>(value: &T) -> Result<String, HashError> {
    let json = serde_json::to_vec(value)?;
    Ok(sha256_hex(&json))
}

/// The exact string the profile fingerprint is computed over.
pub fn canonical_profile_json(profile: &EmployeeProfile) -> Result<String, HashError> {
    let hashable = HashableProfile::from(profile);
    hashable.check_finite()?;
    Ok(serde_json::to_string(&hashable)?)
}

/// Fails with [`HashError::NonFinite`] instead of hashing an unrepresentable float.
pub fn profile_hash(profile: &EmployeeProfile) -> Result<String, HashError> {
    Ok(sha256_hex(canonical_profile_json(profile)?.as_bytes()))
}

pub fn verify_data_integrity<T: Serialize + ?Sized>(
    value: &T,
    expected_hash: &str,
) -> Result<bool, HashError> {
    Ok(data_hash(value)? == expected_hash.to_ascii_lowercase())
}

pub fn verify_profile(profile: &EmployeeProfile, expected_hash: &str) -> Result<bool, HashError> {
    Ok(profile_hash(profile)? == expected_hash.to_ascii_lowercase())
}

/// Batch aggregate over fingerprints.
///
/// Not a binary Merkle tree: all hashes are concatenated in order and the
/// concatenation is hashed once, as a JSON string, like any other payload.
pub fn merkle_root<S: AsRef<str>>(hashes: &[S]) -> Result<String, HashError> {
    match hashes {
        [] => Ok(String::new()),
        [single] => Ok(single.as_ref().to_string()),
        many => {
            let combined: String = many.iter().map(AsRef::as_ref).collect();
            data_hash(&combined)
        }
    }
}
