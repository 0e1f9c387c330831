//! Prometheus export for batch runs.
//!
//! There is no HTTP endpoint; when `MARQUEE_METRICS_FILE` is set the text
//! exposition is written there after the batch.

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use prometheus::{Encoder, IntGauge, Registry, TextEncoder};
use tracing::warn;

/// Global metrics registry.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

/// Items listed in the manifest of the current run.
pub static MANIFEST_ITEMS: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "marquee_manifest_items",
        "Number of items in the batch manifest",
    )
    .unwrap()
});

fn register_metrics(registry: &Registry) {
    let mut collectors = marquee_core::metrics::all_metrics();
    collectors.push(Box::new(MANIFEST_ITEMS.clone()));
    for collector in collectors {
        if let Err(e) = registry.register(collector) {
            warn!(error = %e, "Failed to register metric");
        }
    }
}

/// Encode all metrics in the Prometheus text format.
pub fn encode_metrics() -> Result<String> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .context("Failed to encode metrics")?;
    String::from_utf8(buffer).context("Metrics output is not UTF-8")
}
