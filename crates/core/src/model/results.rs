use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::ids::{AttemptId, QuestionId, QuizId};

/// Grading of a single question, as reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerResult {
    pub question_id: QuestionId,
    pub question: String,
    pub user_answer: String,
    pub correct_answer: String,
    pub is_correct: bool,
}

/// One-shot outcome of a submitted attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizResults {
    pub attempt_id: AttemptId,
    pub quiz_id: QuizId,
    pub score: u32,
    pub total_marks: u32,
    pub percentage: f64,
    pub passed: bool,
    pub coins_awarded: u32,
    pub submitted_at: DateTime<Utc>,
    pub answers: Vec<AnswerResult>,
}

impl QuizResults {
    #[must_use]
    pub fn correct_count(&self) -> usize {
        self.answers.iter().filter(|answer| answer.is_correct).count()
    }

    #[must_use]
    pub fn incorrect_count(&self) -> usize {
        self.answers.len() - self.correct_count()
    }
}
