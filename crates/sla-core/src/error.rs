use thiserror::Error;

#[derive(Debug, Error)]
pub enum SlaError {
    #[error("{0} missing: set the {0} environment variable")]
    MissingEnv(String),

    #[error("invalid {name}: {reason}")]
    InvalidConfig { name: String, reason: String },

    #[error("{status} {reason}: {body}")]
    Api {
        status: u16,
        reason: String,
        body: String,
    },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl SlaError {
    pub(crate) fn invalid(name: &str, reason: impl Into<String>) -> Self {
        SlaError::InvalidConfig {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SlaError>;
