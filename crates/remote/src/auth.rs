use std::fmt;

/// Credentials of the signed-in learner, passed explicitly to live sources.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct AuthSession {
    token: Option<String>,
}

impl AuthSession {
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Blank tokens are treated as anonymous.
    #[must_use]
    pub fn with_token(token: impl Into<String>) -> Self {
        let token = token.into();
        if token.trim().is_empty() {
            return Self::anonymous();
        }
        Self { token: Some(token) }
    }

    #[must_use]
    pub fn from_env() -> Self {
        std::env::var("LMS_AUTH_TOKEN")
            .map(Self::with_token)
            .unwrap_or_default()
    }

    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }
}

impl fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSession")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_token_is_anonymous() {
        assert_eq!(AuthSession::with_token("   "), AuthSession::anonymous());
        assert!(AuthSession::with_token("   ").token().is_none());
    }

    #[test]
    fn debug_redacts_token() {
        let auth = AuthSession::with_token("secret");
        assert!(!format!("{auth:?}").contains("secret"));
        assert_eq!(auth.token(), Some("secret"));
    }
}
