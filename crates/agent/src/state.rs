use std::sync::Arc;

use lq_domain::config::Config;
use lq_leads::LeadRegistry;
use lq_providers::ResponseGenerator;

use crate::runtime::engine::ConversationEngine;
use crate::runtime::followup::FollowUpScheduler;

/// Shared application state handed to every command.
///
/// Fields are grouped by concern:
/// - **Core services**: config, lead registry, response generator
/// - **Runtime**: conversation engine, follow-up scheduler
#[derive(Clone)]
pub struct AppState {
    // ── Core services ─────────────────────────────────────────────────
    pub config: Arc<Config>,
    pub registry: Arc<LeadRegistry>,
    pub generator: Arc<dyn ResponseGenerator>,

    // ── Runtime ───────────────────────────────────────────────────────
    pub engine: Arc<ConversationEngine>,
    /// Idle-lead sweep; only running once spawned.
    pub followup: Arc<FollowUpScheduler>,
}
