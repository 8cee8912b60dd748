//! pattern-worker — runs the adaptive engine against a JSON fixture.
//!
//! Loads a fixture file mapping tenant ids to their record sets, runs a
//! full analysis pass for one tenant, and prints the snapshot, the
//! generated KPIs, and the adaptation report as JSON. Meant for local
//! inspection of engine output, not production serving.

use std::sync::Arc;

use clap::Parser;
use tracing::info;

use adaptive_core::config::load_dotenv;
use adaptive_core::EngineConfig;
use adaptive_engine::cache::InMemorySnapshotStore;
use adaptive_engine::provider::StaticProvider;
use adaptive_engine::AdaptiveEngine;

// ── CLI ─────────────────────────────────────────────────────────────

/// Adaptive pattern & rule engine worker.
#[derive(Parser, Debug)]
#[command(name = "pattern-worker", version, about)]
struct Cli {
    /// Path to the tenant fixture file (JSON object keyed by tenant id).
    #[arg(long, env = "TENANT_FIXTURE", default_value = "data/tenants.json")]
    fixture: String,

    /// Tenant to analyze.
    #[arg(long)]
    tenant: String,

    /// Also print the adaptation report.
    #[arg(long, default_value_t = false)]
    adaptations: bool,
}

// ── main ────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    load_dotenv();
    let cli = Cli::parse();

    let config = EngineConfig::from_env();
    config.log_summary();

    let provider = Arc::new(StaticProvider::from_json_file(&cli.fixture)?);
    let store = Arc::new(InMemorySnapshotStore::new());
    let engine = AdaptiveEngine::new(provider, store, config);

    info!(tenant = %cli.tenant, fixture = %cli.fixture, "analyzing tenant");

    let snapshot = engine.analyze_data_patterns(&cli.tenant).await?;
    println!("{}", serde_json::to_string_pretty(&snapshot)?);

    let kpis = engine.generate_adaptive_kpis(&cli.tenant).await?;
    println!("{}", serde_json::to_string_pretty(&kpis)?);

    if cli.adaptations {
        let report = engine.execute_adaptations(&cli.tenant).await?;
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(())
}
