//! Remittance gateway service
//!
//! ```text
//! ┌──────────┐    ┌──────────┐    ┌───────────┐    ┌──────────────┐
//! │  Config  │───▶│  Store   │───▶│ Adapters  │───▶│ Orchestrator │
//! │  (YAML)  │    │ (PG/mem) │    │ (partners)│    │  (registry)  │
//! └──────────┘    └──────────┘    └───────────┘    └──────────────┘
//! ```
//!
//! The caller-facing transport mounts on the orchestrator; this binary wires
//! the core and runs until interrupted.

use anyhow::Context;
use std::sync::Arc;

use remit_gateway::config::AppConfig;
use remit_gateway::db::Database;
use remit_gateway::logging::init_logging;
use remit_gateway::partners::build_from_config;
use remit_gateway::remit::RemitOrchestrator;
use remit_gateway::store::schema::init_schema;
use remit_gateway::store::{MemoryStore, PgStore, TransactionStore};

fn get_env() -> String {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if (args[i] == "--env" || args[i] == "-e") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }
    std::env::var("REMIT_ENV").unwrap_or_else(|_| "dev".to_string())
}

async fn open_store(config: &AppConfig) -> anyhow::Result<Arc<dyn TransactionStore>> {
    match &config.database {
        Some(db_config) => {
            let db = Database::connect(db_config)
                .await
                .context("Failed to connect to PostgreSQL")?;
            db.health_check().await.context("PostgreSQL health check failed")?;
            if db_config.init_schema {
                init_schema(db.pool())
                    .await
                    .context("Failed to initialize schema")?;
            }
            Ok(Arc::new(PgStore::new(db.pool().clone())))
        }
        None => {
            tracing::warn!("No database configured, using in-memory transaction store");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = get_env();
    let config = AppConfig::load(&env).with_context(|| format!("Failed to load {} config", env))?;
    let _log_guard = init_logging(&config);

    tracing::info!(
        env = %env,
        version = env!("GIT_HASH"),
        profile = env!("BUILD_PROFILE"),
        "Starting remit gateway"
    );

    let store = open_store(&config).await?;
    let adapters =
        build_from_config(&config, store.clone()).context("Failed to build partner adapters")?;
    let orchestrator = Arc::new(
        RemitOrchestrator::new(adapters, store).context("Failed to register partner adapters")?,
    );

    tracing::info!(partners = ?orchestrator.partners(), "Partners registered");

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;
    tracing::info!("Shutdown signal received, exiting");

    Ok(())
}
