/// Shared error type used across all LeadQual crates.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("timeout: {0}")]
    Timeout(String),

    #[error("lead store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("malformed lead store: {0}")]
    MalformedStore(String),

    #[error("generator {backend}: {message}")]
    Generation { backend: String, message: String },

    #[error("config: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
