use crate::metrics::collector::AddonMetrics;
use crate::{AddonError, Result};
use prometheus::{Encoder, TextEncoder};

/// Renders the current metrics in the Prometheus text exposition format.
pub fn gather_text(metrics: &AddonMetrics) -> Result<String> {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder.encode(&metrics.registry().gather(), &mut buffer)?;

    String::from_utf8(buffer).map_err(|e| AddonError::Config(format!("metrics output is not UTF-8: {}", e)))
}
