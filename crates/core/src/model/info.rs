use serde::{Deserialize, Serialize};

use crate::model::ids::QuizId;

/// Passing threshold used when the quiz metadata does not carry one.
pub const DEFAULT_PASSING_SCORE: u32 = 70;

/// Descriptive metadata shown before an attempt starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizInfo {
    pub id: QuizId,
    pub title: String,
    pub description: Option<String>,
    pub question_count: u32,
    pub time_limit_minutes: u32,
    /// Percentage at or above which an attempt passes.
    pub passing_score: u32,
    /// `None` means unlimited attempts.
    pub max_attempts: Option<u32>,
}

impl QuizInfo {
    #[must_use]
    pub fn new(id: QuizId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            description: None,
            question_count: 0,
            time_limit_minutes: 0,
            passing_score: DEFAULT_PASSING_SCORE,
            max_attempts: None,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    #[must_use]
    pub fn with_passing_score(mut self, passing_score: u32) -> Self {
        self.passing_score = passing_score;
        self
    }

    #[must_use]
    pub fn with_shape(mut self, question_count: u32, time_limit_minutes: u32) -> Self {
        self.question_count = question_count;
        self.time_limit_minutes = time_limit_minutes;
        self
    }

    /// True when `attempt_count` has used up the configured maximum.
    #[must_use]
    pub fn max_attempts_reached(&self, attempt_count: usize) -> bool {
        self.max_attempts
            .is_some_and(|max| attempt_count >= usize::try_from(max).unwrap_or(usize::MAX))
    }
}
