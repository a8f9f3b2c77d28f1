//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{OptionId, QuestionId, QuizPhase};
use remote::SourceError;

/// Errors emitted by the quiz session and its controller.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizError {
    #[error("quiz is in the {actual} phase, expected {expected}")]
    WrongPhase {
        expected: QuizPhase,
        actual: QuizPhase,
    },
    #[error("a start request is already in flight")]
    StartInProgress,
    #[error("a submit request is already in flight")]
    SubmitInProgress,
    #[error("maximum of {max} attempts reached")]
    AttemptLimitReached { max: u32 },
    #[error("question {0} is not part of this attempt")]
    UnknownQuestion(QuestionId),
    #[error("option {option} does not belong to question {question}")]
    UnknownOption {
        question: QuestionId,
        option: OptionId,
    },
    #[error("no attempt is open")]
    NoAttempt,
    #[error("the session was reset before the response arrived")]
    Stale,
    #[error(transparent)]
    Source(#[from] SourceError),
}
