use lq_domain::trace::TraceEvent;

use crate::traits::ResponseGenerator;

/// Reply used whenever a generator call fails.
pub const FALLBACK_REPLY: &str = "Sorry, I encountered an issue.";

/// Call `generator`, substituting [`FALLBACK_REPLY`] on any failure.
pub async fn generate_or_fallback(generator: &dyn ResponseGenerator, prompt: &str) -> String {
    match generator.generate(prompt).await {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(backend = %generator.backend_id(), error = %e, "generation failed, using fallback reply");
            TraceEvent::GenerationFallback {
                backend: generator.backend_id().to_owned(),
                reason: e.to_string(),
            }
            .emit();
            FALLBACK_REPLY.to_string()
        }
    }
}
