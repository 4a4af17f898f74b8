use crate::error::ProfileError;
use crate::profile::PersonalDetails;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("static pattern"));

/// Field name → message. Empty means valid.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationReport {
    pub errors: BTreeMap<String, String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn reject(&mut self, field: &str, message: &str) {
        self.errors.insert(field.to_string(), message.to_string());
    }

    pub fn into_result(self) -> Result<(), ProfileError> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(ProfileError::Validation(self.errors))
        }
    }
}

pub fn digits_only(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

pub fn validate_personal_details(details: &PersonalDetails) -> ValidationReport {
    let mut report = ValidationReport::default();

    if details.first_name.trim().is_empty() {
        report.reject("firstName", "First name is required");
    }
    if details.last_name.trim().is_empty() {
        report.reject("lastName", "Last name is required");
    }

    let email = details.email.trim();
    if email.is_empty() {
        report.reject("email", "Email is required");
    } else if !EMAIL.is_match(email) {
        report.reject("email", "Invalid email format");
    }

    if details.phone.trim().is_empty() {
        report.reject("phone", "Phone number is required");
    } else if digits_only(&details.phone).len() != 10 {
        report.reject("phone", "Phone number must be 10 digits");
    }

    if details.date_of_birth.is_empty() {
        report.reject("dateOfBirth", "Date of birth is required");
    }

    if let Some(aadhaar) = details.aadhaar_number.as_deref().filter(|a| !a.is_empty()) {
        let compact: String = aadhaar.chars().filter(|c| !c.is_whitespace()).collect();
        if compact.len() != 12 || !compact.chars().all(|c| c.is_ascii_digit()) {
            report.reject("aadhaarNumber", "Aadhaar must be 12 digits");
        }
    }

    report
}
