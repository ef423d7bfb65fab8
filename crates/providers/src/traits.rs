use lq_domain::error::Result;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Core generator trait
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A text-generation backend.
///
/// Implementations report any backend fault as
/// [`Error::Generation`](lq_domain::error::Error::Generation); callers are
/// expected to recover with [`generate_or_fallback`](crate::generate_or_fallback).
#[async_trait::async_trait]
pub trait ResponseGenerator: Send + Sync {
    /// Produce a reply for `prompt`.
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// A short identifier for logs (e.g. `"gemini"`).
    fn backend_id(&self) -> &str;
}
