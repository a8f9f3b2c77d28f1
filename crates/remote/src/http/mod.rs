mod wire;

use std::env;
use std::time::Duration;

use async_trait::async_trait;
use quiz_core::model::{
    QuizAttempt, QuizId, QuizInfo, QuizResults, StartedAttempt, SubmitPayload,
};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use url::Url;

use crate::auth::AuthSession;
use crate::error::SourceError;
use crate::source::QuizSource;
use wire::{ApiResponse, StartRequest, StartResponse, SubmitRequest, SubmitResponse};

const DEFAULT_BASE_URL: &str = "http://localhost:3000/api";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Where the live backend lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpSourceConfig {
    base_url: Url,
    timeout: Duration,
}

impl HttpSourceConfig {
    /// # Errors
    ///
    /// Returns `SourceError::InvalidConfig` unless `base_url` is an absolute http(s) URL.
    pub fn new(base_url: &str) -> Result<Self, SourceError> {
        let parsed = Url::parse(base_url.trim())
            .map_err(|e| SourceError::InvalidConfig(format!("{base_url}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(SourceError::InvalidConfig(format!(
                "{base_url}: expected an http or https URL"
            )));
        }
        Ok(Self {
            base_url: parsed,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Reads `LMS_API_BASE_URL`, defaulting to the local development backend.
    ///
    /// # Errors
    ///
    /// Returns `SourceError::InvalidConfig` when the variable holds an unusable URL.
    pub fn from_env() -> Result<Self, SourceError> {
        let base_url = env::var("LMS_API_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());
        Self::new(&base_url)
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

/// `QuizSource` backed by the LMS REST API.
#[derive(Clone)]
pub struct HttpQuizSource {
    client: Client,
    config: HttpSourceConfig,
    auth: AuthSession,
}

impl HttpQuizSource {
    /// # Errors
    ///
    /// Returns `SourceError::Http` if the underlying client cannot be built.
    pub fn new(config: HttpSourceConfig, auth: AuthSession) -> Result<Self, SourceError> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self {
            client,
            config,
            auth,
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let request = self.client.request(method, self.config.endpoint(path));
        match self.auth.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<(reqwest::StatusCode, ApiResponse<T>), SourceError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        let envelope = wire::decode_response(status, &body)?;
        Ok((status, envelope))
    }
}

#[async_trait]
impl QuizSource for HttpQuizSource {
    async fn quiz_info(&self, _quiz_id: QuizId) -> Result<Option<QuizInfo>, SourceError> {
        // The backend exposes no metadata endpoint; the start screen falls back to ids.
        Ok(None)
    }

    async fn start_attempt(&self, quiz_id: QuizId) -> Result<StartedAttempt, SourceError> {
        tracing::debug!(%quiz_id, "POST quiz/start");
        let request = self
            .request(Method::POST, "quiz/start")
            .json(&StartRequest { quiz_id });
        let (status, envelope) = self.send::<StartResponse>(request).await?;
        Ok(envelope.require_data(status)?.into())
    }

    async fn submit_attempt(&self, payload: &SubmitPayload) -> Result<QuizResults, SourceError> {
        tracing::debug!(attempt_id = %payload.attempt_id, answers = payload.answers.len(), "POST quiz/submit");
        let request = self
            .request(Method::POST, &format!("quiz/submit/{}", payload.attempt_id))
            .json(&SubmitRequest {
                quiz_id: payload.quiz_id,
                answers: &payload.answers,
                time_spent: payload.time_spent_seconds,
            });
        let (status, envelope) = self.send::<SubmitResponse>(request).await?;
        Ok(envelope.require_data(status)?.into())
    }

    async fn list_attempts(&self, quiz_id: QuizId) -> Result<Vec<QuizAttempt>, SourceError> {
        let request = self.request(Method::GET, &format!("quiz/{quiz_id}/attempts"));
        let (_status, envelope) = self.send::<Vec<QuizAttempt>>(request).await?;
        Ok(envelope.data.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_keeps_base_path() {
        let config = HttpSourceConfig::new("http://localhost:3000/api/").unwrap();
        assert_eq!(
            config.endpoint("/quiz/start"),
            "http://localhost:3000/api/quiz/start"
        );
    }

    #[test]
    fn rejects_non_http_scheme() {
        let err = HttpSourceConfig::new("ftp://example.com").unwrap_err();
        assert!(matches!(err, SourceError::InvalidConfig(_)));
    }

    #[test]
    fn rejects_relative_url() {
        assert!(HttpSourceConfig::new("/api").is_err());
    }

    #[test]
    fn default_timeout_is_thirty_seconds() {
        let config = HttpSourceConfig::new(DEFAULT_BASE_URL).unwrap();
        assert_eq!(config.timeout(), Duration::from_secs(30));
        let config = config.with_timeout(Duration::from_secs(5));
        assert_eq!(config.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn client_builds_with_token() {
        let config = HttpSourceConfig::new(DEFAULT_BASE_URL).unwrap();
        let source = HttpQuizSource::new(config, AuthSession::with_token("t")).unwrap();
        let request = source
            .request(Method::GET, "quiz/1/attempts")
            .build()
            .unwrap();
        assert_eq!(
            request.url().as_str(),
            "http://localhost:3000/api/quiz/1/attempts"
        );
        assert_eq!(
            request.headers().get(reqwest::header::AUTHORIZATION).unwrap(),
            "Bearer t"
        );
    }
}
