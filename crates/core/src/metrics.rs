//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Orchestrator (source attempts and their latency)
//! - Reconciler (cover candidates)
//! - Namer (title truncation)
//! - Batch driver (item outcomes)

use once_cell::sync::Lazy;
use prometheus::{Histogram, HistogramOpts, HistogramVec, IntCounterVec, Opts};

// =============================================================================
// Orchestrator
// =============================================================================

/// Source extraction attempts by source and outcome.
pub static SOURCE_ATTEMPTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "marquee_source_attempts_total",
            "Total source extraction attempts",
        ),
        &["source", "outcome"], // "success", error kind, or "abandoned"
    )
    .unwrap()
});

/// Duration of a single extraction attempt in seconds.
pub static SOURCE_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "marquee_source_duration_seconds",
            "Duration of a single source extraction attempt",
        )
        .buckets(vec![0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["source"],
    )
    .unwrap()
});

// =============================================================================
// Reconciler
// =============================================================================

/// Cover candidates left after a merge.
pub static COVER_CANDIDATES: Lazy<Histogram> = Lazy::new(|| {
    Histogram::with_opts(
        HistogramOpts::new(
            "marquee_cover_candidates",
            "Number of cover candidates per merged item",
        )
        .buckets(vec![0.0, 1.0, 2.0, 3.0, 5.0, 10.0]),
    )
    .unwrap()
});

// =============================================================================
// Namer
// =============================================================================

/// Naming plans by how much the titles had to be shortened.
pub static NAMING_TRUNCATIONS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "marquee_naming_truncations_total",
            "Naming plans by truncation kind",
        ),
        &["kind"], // "none", "chunked", "sliced"
    )
    .unwrap()
});

// =============================================================================
// Batch driver
// =============================================================================

/// Processed items by result.
pub static ITEMS_PROCESSED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("marquee_items_processed_total", "Total items processed"),
        &["result"], // "success", "no_source", "missing_field", "downstream_failed"
    )
    .unwrap()
});

/// Per-item processing time in seconds.
pub static ITEM_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "marquee_item_duration_seconds",
            "Duration of processing one item",
        )
        .buckets(vec![0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0, 120.0]),
        &["result"],
    )
    .unwrap()
});

/// Get all core metrics for registration.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(SOURCE_ATTEMPTS.clone()),
        Box::new(SOURCE_DURATION.clone()),
        Box::new(COVER_CANDIDATES.clone()),
        Box::new(NAMING_TRUNCATIONS.clone()),
        Box::new(ITEMS_PROCESSED.clone()),
        Box::new(ITEM_DURATION.clone()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_metrics_register() {
        let registry = prometheus::Registry::new();
        for metric in all_metrics() {
            registry.register(metric).unwrap();
        }
        SOURCE_ATTEMPTS
            .with_label_values(&["alpha", "success"])
            .inc();
        let families = registry.gather();
        assert!(families
            .iter()
            .any(|f| f.get_name() == "marquee_source_attempts_total"));
    }
}
