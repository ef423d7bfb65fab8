//! AppState construction and background-task spawning.
//!
//! Every command that touches leads boots through [`build_app_state`];
//! only `simulate` also starts the background sweep.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use lq_domain::config::{Config, ConfigSeverity};
use lq_leads::{JsonLeadStore, LeadRegistry, LeadStore, MemoryLeadStore};

use crate::runtime::engine::ConversationEngine;
use crate::runtime::followup::FollowUpScheduler;
use crate::state::AppState;

/// Validate config, open the lead store and return a fully-wired
/// [`AppState`].
pub fn build_app_state(config: Arc<Config>) -> anyhow::Result<AppState> {
    // ── Config validation ────────────────────────────────────────────
    let issues = config.validate();
    for issue in &issues {
        match issue.severity {
            ConfigSeverity::Warning => tracing::warn!("config: {issue}"),
            ConfigSeverity::Error => tracing::error!("config: {issue}"),
        }
    }
    if issues.iter().any(|i| i.severity == ConfigSeverity::Error) {
        anyhow::bail!(
            "config validation failed with {} error(s)",
            issues
                .iter()
                .filter(|i| i.severity == ConfigSeverity::Error)
                .count()
        );
    }

    // ── Lead store + registry ────────────────────────────────────────
    let store: Arc<dyn LeadStore> = match JsonLeadStore::new(&config.store.state_path) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            tracing::warn!(
                error = %e,
                path = %config.store.state_path.display(),
                "lead store unavailable, leads will not survive this run"
            );
            Arc::new(MemoryLeadStore::new())
        }
    };
    let registry = Arc::new(LeadRegistry::load(store.clone()));
    tracing::info!(leads = registry.len(), store = %store.describe(), "lead registry ready");

    // ── Response generator ───────────────────────────────────────────
    let generator = lq_providers::from_config(&config.generator);
    tracing::info!(backend = generator.backend_id(), "response generator ready");

    // ── Runtime ──────────────────────────────────────────────────────
    let engine = Arc::new(ConversationEngine::new(registry.clone(), generator.clone()));
    let followup = Arc::new(FollowUpScheduler::new(registry.clone(), &config.followup));

    Ok(AppState {
        config,
        registry,
        generator,
        engine,
        followup,
    })
}

/// Spawn the long-running background tasks. They stop when `shutdown`
/// is cancelled; await the returned handle to wait for that.
pub fn spawn_background_tasks(
    state: &AppState,
    shutdown: CancellationToken,
) -> tokio::task::JoinHandle<()> {
    let handle = state.followup.clone().spawn(shutdown);
    tracing::info!("background tasks spawned");
    handle
}
