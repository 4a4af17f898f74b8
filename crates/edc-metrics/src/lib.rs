pub mod guards;
pub mod metrics;


pub use guards::reject_if_completion_regresses;
pub use metrics::EdcMetrics;
