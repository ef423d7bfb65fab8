//! Response generation backends.
//!
//! The conversation engine runs a fixed script and never needs a backend to
//! make progress; a [`ResponseGenerator`] is only consulted for open-ended
//! replies, and every failure degrades to [`FALLBACK_REPLY`].

pub mod fallback;
pub mod google;
pub mod scripted;
pub mod traits;
mod util;

use std::sync::Arc;

use lq_domain::config::{GeneratorConfig, GeneratorKind};

pub use fallback::{generate_or_fallback, FALLBACK_REPLY};
pub use google::GeminiGenerator;
pub use scripted::ScriptedGenerator;
pub use traits::ResponseGenerator;

/// Build the configured generator.
///
/// A backend that cannot be constructed (e.g. missing API key) is replaced
/// by one that always fails, so callers fall back to the apology text.
pub fn from_config(cfg: &GeneratorConfig) -> Arc<dyn ResponseGenerator> {
    match cfg.provider {
        GeneratorKind::None => Arc::new(ScriptedGenerator::failing(
            "no response generator configured",
        )),
        GeneratorKind::Gemini => match GeminiGenerator::from_config(cfg) {
            Ok(generator) => Arc::new(generator),
            Err(e) => {
                tracing::warn!(error = %e, "gemini generator unavailable, using fallback replies");
                Arc::new(ScriptedGenerator::failing(e.to_string()))
            }
        },
    }
}
