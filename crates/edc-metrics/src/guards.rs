use crate::EdcMetrics;
use edc_core::{profile_completion, EmployeeProfile};

/// Records the new completion and reports whether it dropped.
pub fn reject_if_completion_regresses(
    metrics: &EdcMetrics,
    edc_number: &str,
    before: &EmployeeProfile,
    after: &EmployeeProfile,
) -> bool {
    let before_pct = profile_completion(before);
    let after_pct = profile_completion(after);
    metrics.observe_completion(edc_number, after_pct);
    after_pct < before_pct
}
