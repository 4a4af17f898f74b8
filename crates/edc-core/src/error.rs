use std::collections::BTreeMap;
use thiserror::Error;

/// Errors raised while reading or building a profile snapshot.
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("malformed profile: {0}")]
    Malformed(#[source] serde_json::Error),
    #[error("invalid EDC number: {0}")]
    InvalidEdcNumber(String),
    #[error("personal details rejected: {}", describe(.0))]
    Validation(BTreeMap<String, String>),
}

/// The only failure mode of the integrity hasher.
#[derive(Debug, Error)]
pub enum HashError {
    #[error("payload serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("{field} is {value}, which has no JSON encoding")]
    NonFinite { field: String, value: f64 },
}

fn describe(errors: &BTreeMap<String, String>) -> String {
    errors
        .iter()
        .map(|(field, msg)| format!("{field}: {msg}"))
        .collect::<Vec<_>>()
        .join("; ")
}
