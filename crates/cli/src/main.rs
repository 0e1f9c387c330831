mod manifest;
mod metrics;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use marquee_core::{
    load_config, validate_config, AliasTable, HttpSourceAdapter, LogDownstream, LogNotifier,
    Namer, Pipeline, Reconciler, SanitizedConfig, SourceOrchestrator, SourceRegistry,
};

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());
    let json = std::env::var("MARQUEE_LOG_JSON").is_ok_and(|v| v == "1");

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn run() -> Result<()> {
    init_logging();
    info!("marquee {}", VERSION);

    // Determine config and manifest paths
    let config_path = std::env::var("MARQUEE_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));
    let manifest_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("manifest.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    let sanitized = SanitizedConfig::from(&config);
    let config_json = serde_json::to_string(&sanitized).unwrap_or_default();
    let config_hash = format!("{:x}", Sha256::digest(config_json.as_bytes()));
    info!(config_hash = &config_hash[..16], "Configuration loaded successfully");
    info!("Effective configuration: {}", config_json);

    // Alias table, immutable for the whole batch
    let aliases = match &config.merge.alias_file {
        Some(path) => {
            let table = AliasTable::load(path)
                .with_context(|| format!("Failed to load alias table {:?}", path))?;
            info!(aliases = table.len(), "Loaded alias table from {:?}", path);
            table
        }
        None => AliasTable::new(),
    };

    // Register HTTP sources
    let mut registry = SourceRegistry::new();
    for source in &config.http_sources {
        let adapter = HttpSourceAdapter::new(source.clone())
            .with_context(|| format!("Failed to create source {}", source.name))?;
        registry.register(Arc::new(adapter));
        info!(source = %source.name, "Registered HTTP source");
    }
    if registry.is_empty() {
        warn!("No sources registered; every item will fail");
    }

    let namer = Namer::new(config.naming.clone()).context("Invalid naming templates")?;
    let pipeline = Pipeline::new(
        SourceOrchestrator::new(config.sources.clone(), registry),
        Reconciler::new(config.merge.clone(), aliases),
        namer,
        config.batch.clone(),
    );

    let mut items = manifest::load_manifest(&manifest_path)?;
    metrics::MANIFEST_ITEMS.set(items.len() as i64);
    info!(items = items.len(), "Loaded manifest from {:?}", manifest_path);

    let summary = pipeline
        .run_batch(&mut items, &LogDownstream, &LogNotifier)
        .await;

    println!(
        "{}",
        serde_json::to_string_pretty(&summary).context("Failed to serialize summary")?
    );

    if let Ok(path) = std::env::var("MARQUEE_METRICS_FILE") {
        std::fs::write(&path, metrics::encode_metrics()?)
            .with_context(|| format!("Failed to write metrics to {}", path))?;
        info!("Metrics written to {}", path);
    }

    Ok(())
}
