use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Response generator
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeneratorKind {
    /// No backend; open-ended replies always use the fallback text.
    None,
    /// Google Gemini `generateContent`.
    Gemini,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    #[serde(default = "d_provider")]
    pub provider: GeneratorKind,
    #[serde(default = "d_model")]
    pub model: String,
    #[serde(default = "d_base_url")]
    pub base_url: String,
    /// Environment variable holding the API key.
    #[serde(default = "d_api_key_env")]
    pub api_key_env: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            provider: d_provider(),
            model: d_model(),
            base_url: d_base_url(),
            api_key_env: d_api_key_env(),
        }
    }
}

fn d_provider() -> GeneratorKind {
    GeneratorKind::None
}
fn d_model() -> String {
    "gemini-pro".into()
}
fn d_base_url() -> String {
    "https://generativelanguage.googleapis.com".into()
}
fn d_api_key_env() -> String {
    "GEMINI_API_KEY".into()
}
