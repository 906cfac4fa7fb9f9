use crate::addon::{ResourceIdentifier, ResourceKind};
use crate::error::HealthError;
use crate::otel::ExporterSecrets;
use crate::Result;
use prometheus::{IntCounter, IntCounterVec, Opts, Registry};

/// Counters for health verdicts and exporter/secret matching.
#[derive(Clone)]
pub struct AddonMetrics {
    registry: Registry,
    health_checks: IntCounterVec,
    secrets_matched: IntCounter,
    unused_secrets: IntCounter,
}

impl AddonMetrics {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let health_checks = IntCounterVec::new(
            Opts::new("mcoa_health_checks_total", "Agent health evaluations by resource kind and outcome"),
            &["kind", "outcome"],
        )?;
        let secrets_matched = IntCounter::new(
            "mcoa_exporter_secrets_matched_total",
            "Secrets bound to an exporter's TLS configuration",
        )?;
        let unused_secrets = IntCounter::new(
            "mcoa_exporter_secrets_unused_total",
            "Mounted secrets no exporter refers to",
        )?;

        registry.register(Box::new(health_checks.clone()))?;
        registry.register(Box::new(secrets_matched.clone()))?;
        registry.register(Box::new(unused_secrets.clone()))?;

        Ok(Self {
            registry,
            health_checks,
            secrets_matched,
            unused_secrets,
        })
    }

    pub fn record_health(&self, identifier: &ResourceIdentifier, verdict: &std::result::Result<(), HealthError>) {
        let kind = ResourceKind::from_identifier(identifier).as_str();
        let outcome = if verdict.is_ok() { "healthy" } else { "unhealthy" };
        self.health_checks.with_label_values(&[kind, outcome]).inc();
    }

    pub fn record_match(&self, matched: &ExporterSecrets) {
        self.secrets_matched.inc_by(matched.secrets.len() as u64);
        self.unused_secrets.inc_by(matched.warnings.len() as u64);
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn health_checks(&self, kind: ResourceKind, healthy: bool) -> u64 {
        let outcome = if healthy { "healthy" } else { "unhealthy" };
        self.health_checks.with_label_values(&[kind.as_str(), outcome]).get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::addon::evaluate;
    use crate::addon::health::{FeedbackValue, FieldValue};

    #[test]
    fn test_record_health_outcomes() {
        let metrics = AddonMetrics::new().unwrap();
        let collector = ResourceIdentifier::collector();

        let ok = evaluate(&collector, &[FeedbackValue::new("replicas", FieldValue::integer(1))]);
        let failed = evaluate(&collector, &[]);
        metrics.record_health(&collector, &ok);
        metrics.record_health(&collector, &failed);
        metrics.record_health(&collector, &failed);

        assert_eq!(metrics.health_checks(ResourceKind::Collector, true), 1);
        assert_eq!(metrics.health_checks(ResourceKind::Collector, false), 2);
        assert_eq!(metrics.health_checks(ResourceKind::Forwarder, true), 0);
    }
}
