use thiserror::Error;

/// Errors surfaced by quiz data sources.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SourceError {
    #[error("not authorized: {message}")]
    Unauthorized { message: String },

    #[error("quiz not found")]
    NotFound,

    #[error("maximum number of attempts reached")]
    AttemptLimit,

    #[error("request failed with status {status}: {message}")]
    Api {
        status: reqwest::StatusCode,
        message: String,
    },

    #[error("invalid source configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl SourceError {
    /// Message to show the learner.
    ///
    /// Uses the backend's own message when it sent one, `fallback` otherwise.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            SourceError::Api { message, .. } | SourceError::Unauthorized { message }
                if !message.trim().is_empty() =>
            {
                message.clone()
            }
            SourceError::AttemptLimit => {
                "You've reached the maximum number of attempts for this quiz.".to_string()
            }
            _ => fallback.to_string(),
        }
    }
}
