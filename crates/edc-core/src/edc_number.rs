//! Card numbers of the form `EDC-YYYY-XXXXXXXX`.

use crate::error::ProfileError;
use chrono::{Datelike, Utc};
use once_cell::sync::Lazy;
use rand::Rng;
use regex::Regex;

static EDC_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^EDC-\d{4}-\d{8}$").expect("static pattern"));
static EDC_NUMBER_GROUPS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(EDC-\d{4}-\d{4})(\d{4})$").expect("static pattern"));

pub fn generate_edc_number() -> String {
    generate_edc_number_with(&mut rand::thread_rng(), Utc::now().year())
}

pub fn generate_edc_number_with<R: Rng + ?Sized>(rng: &mut R, year: i32) -> String {
    let serial: u32 = rng.gen_range(10_000_000..100_000_000);
    format!("EDC-{year:04}-{serial}")
}

pub fn validate_edc_number(edc_number: &str) -> bool {
    EDC_NUMBER.is_match(edc_number)
}

pub fn parse_edc_number(edc_number: &str) -> Result<&str, ProfileError> {
    if validate_edc_number(edc_number) {
        Ok(edc_number)
    } else {
        Err(ProfileError::InvalidEdcNumber(edc_number.to_string()))
    }
}

/// Display form with a space before the last four digits.
pub fn format_edc_number(edc_number: &str) -> String {
    match EDC_NUMBER_GROUPS.captures(edc_number) {
        Some(caps) => format!("{} {}", &caps[1], &caps[2]),
        None => edc_number.to_string(),
    }
}

/// Position-weighted digit sum mod 10; non-digits are skipped but still
/// advance the position.
pub fn check_digit(base: &str) -> u32 {
    base.chars()
        .enumerate()
        .filter_map(|(i, c)| c.to_digit(10).map(|d| (i, d)))
        .fold(0, |acc, (i, d)| (acc + d * (i % 10 + 1) as u32) % 10)
}
