mod answers;
mod attempt;
mod ids;
mod info;
mod phase;
mod question;
mod results;

pub use answers::AnswerSheet;
pub use attempt::{QuizAttempt, StartedAttempt, SubmitPayload, best_attempt};
pub use ids::{AttemptId, OptionId, ParseIdError, QuestionId, QuizId};
pub use info::{DEFAULT_PASSING_SCORE, QuizInfo};
pub use phase::QuizPhase;
pub use question::{QuestionKind, QuizOption, QuizQuestion};
pub use results::{AnswerResult, QuizResults};
