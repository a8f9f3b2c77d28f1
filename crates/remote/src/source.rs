use std::sync::Arc;

use async_trait::async_trait;
use quiz_core::model::{QuizAttempt, QuizId, QuizInfo, QuizResults, StartedAttempt, SubmitPayload};

use crate::auth::AuthSession;
use crate::error::SourceError;
use crate::fixture::FixtureQuizSource;
use crate::http::{HttpQuizSource, HttpSourceConfig};

/// Backend contract for quiz attempts.
///
/// Implemented by the live HTTP client and by the in-memory fixture source; the
/// choice is made once when the source is built.
#[async_trait]
pub trait QuizSource: Send + Sync {
    /// Descriptive metadata for the start screen, when the backend provides any.
    ///
    /// # Errors
    ///
    /// Returns `SourceError` if the lookup fails.
    async fn quiz_info(&self, quiz_id: QuizId) -> Result<Option<QuizInfo>, SourceError>;

    /// Open a new attempt and fetch its questions.
    ///
    /// # Errors
    ///
    /// Returns `SourceError::AttemptLimit`/`SourceError::Api` when the backend refuses,
    /// or transport errors.
    async fn start_attempt(&self, quiz_id: QuizId) -> Result<StartedAttempt, SourceError>;

    /// Submit answers for grading.
    ///
    /// # Errors
    ///
    /// Returns `SourceError` if the attempt cannot be graded.
    async fn submit_attempt(&self, payload: &SubmitPayload) -> Result<QuizResults, SourceError>;

    /// Past attempts of the current learner, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `SourceError` if the history cannot be fetched.
    async fn list_attempts(&self, quiz_id: QuizId) -> Result<Vec<QuizAttempt>, SourceError>;
}

/// Which backend to talk to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceKind {
    Live(HttpSourceConfig),
    Fixture,
}

impl SourceKind {
    /// Reads `LMS_USE_FIXTURES` and `LMS_API_BASE_URL`.
    ///
    /// # Errors
    ///
    /// Returns `SourceError::InvalidConfig` when the base URL does not parse.
    pub fn from_env() -> Result<Self, SourceError> {
        let use_fixtures = std::env::var("LMS_USE_FIXTURES")
            .ok()
            .is_some_and(|value| is_truthy(&value));
        if use_fixtures {
            return Ok(Self::Fixture);
        }
        Ok(Self::Live(HttpSourceConfig::from_env()?))
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes")
}

/// Source selection plus the credentials used by live sources.
#[derive(Debug, Clone)]
pub struct SourceConfig {
    pub kind: SourceKind,
    pub auth: AuthSession,
}

impl SourceConfig {
    /// # Errors
    ///
    /// Returns `SourceError::InvalidConfig` for an unusable base URL.
    pub fn from_env() -> Result<Self, SourceError> {
        Ok(Self {
            kind: SourceKind::from_env()?,
            auth: AuthSession::from_env(),
        })
    }

    #[must_use]
    pub fn fixture() -> Self {
        Self {
            kind: SourceKind::Fixture,
            auth: AuthSession::anonymous(),
        }
    }
}

/// Build the data source once; callers only ever see the trait object.
///
/// # Errors
///
/// Returns `SourceError::Http` if the HTTP client cannot be constructed.
pub fn build_source(config: SourceConfig) -> Result<Arc<dyn QuizSource>, SourceError> {
    let source: Arc<dyn QuizSource> = match config.kind {
        SourceKind::Live(http) => {
            tracing::info!(base_url = %http.base_url(), "using live quiz backend");
            Arc::new(HttpQuizSource::new(http, config.auth)?)
        }
        SourceKind::Fixture => {
            tracing::info!("using fixture quiz backend");
            Arc::new(FixtureQuizSource::sample())
        }
    };
    Ok(source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthy_values() {
        assert!(is_truthy("true"));
        assert!(is_truthy(" TRUE "));
        assert!(is_truthy("1"));
        assert!(!is_truthy("false"));
        assert!(!is_truthy(""));
    }

    #[tokio::test]
    async fn fixture_config_builds_working_source() {
        let source = build_source(SourceConfig::fixture()).unwrap();
        let info = source.quiz_info(QuizId::new(1)).await.unwrap();
        assert!(info.is_some());
    }
}
