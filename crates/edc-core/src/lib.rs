pub mod completion;
pub mod edc_number;
pub mod error;
pub mod integrity;
pub mod patch;
pub mod profile;
pub mod validation;

#[cfg(test)]
mod tests;

pub use completion::{completion_breakdown, profile_completion, CompletionBreakdown};
pub use error::{HashError, ProfileError};
pub use integrity::{
    canonical_profile_json, data_hash, merkle_root, profile_hash, verify_data_integrity,
    verify_profile,
};
pub use patch::{AddressPatch, Patch, PersonalDetailsPatch, ProfilePatch, VerificationPatch};
pub use profile::*;
pub use validation::{validate_personal_details, ValidationReport};
