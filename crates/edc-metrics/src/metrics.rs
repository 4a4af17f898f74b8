use edc_core::{profile_completion, EmployeeProfile};
use prometheus::{Encoder, GaugeVec, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};

/// Card metrics on a private registry, so several instances can coexist.
pub struct EdcMetrics {
    registry: Registry,
    pub profile_completion_percent: GaugeVec,
    pub attestations_total: IntCounterVec,
    pub integrity_failures_total: IntCounter,
}

impl EdcMetrics {
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let profile_completion_percent = GaugeVec::new(
            Opts::new(
                "edc_profile_completion_percent",
                "Profile completion score per card",
            ),
            &["edc_number"],
        )?;
        let attestations_total = IntCounterVec::new(
            Opts::new(
                "edc_attestations_total",
                "Profile fingerprints attested per ledger network",
            ),
            &["network"],
        )?;
        let integrity_failures_total = IntCounter::new(
            "edc_integrity_failures_total",
            "Integrity checks whose fingerprint no longer matched",
        )?;

        registry.register(Box::new(profile_completion_percent.clone()))?;
        registry.register(Box::new(attestations_total.clone()))?;
        registry.register(Box::new(integrity_failures_total.clone()))?;

        Ok(Self {
            registry,
            profile_completion_percent,
            attestations_total,
            integrity_failures_total,
        })
    }

    pub fn observe_completion(&self, edc_number: &str, percent: u8) {
        self.profile_completion_percent
            .with_label_values(&[edc_number])
            .set(f64::from(percent));
    }

    pub fn observe_profile(&self, profile: &EmployeeProfile) {
        self.observe_completion(
            profile.edc_number().unwrap_or("unassigned"),
            profile_completion(profile),
        );
    }

    pub fn record_attestation(&self, network: &str) {
        self.attestations_total.with_label_values(&[network]).inc();
    }

    pub fn record_integrity_failure(&self) {
        self.integrity_failures_total.inc();
    }

    /// Text exposition format.
    pub fn gather_text(&self) -> anyhow::Result<String> {
        let mut buf = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buf)?;
        Ok(String::from_utf8(buf)?)
    }
}
