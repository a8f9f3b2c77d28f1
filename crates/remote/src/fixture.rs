use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use quiz_core::Clock;
use quiz_core::model::{
    AnswerResult, AttemptId, OptionId, QuestionId, QuestionKind, QuizAttempt, QuizId, QuizInfo,
    QuizOption, QuizQuestion, QuizResults, StartedAttempt, SubmitPayload,
};
use reqwest::StatusCode;

use crate::error::SourceError;
use crate::source::QuizSource;

const COINS_PER_MARK: u32 = 10;

/// A question together with its answer key.
#[derive(Debug, Clone, PartialEq, Eq)]
struct FixtureQuestion {
    question: QuizQuestion,
    correct: OptionId,
}

/// A quiz served by `FixtureQuizSource`.
#[derive(Debug, Clone)]
pub struct FixtureQuiz {
    info: QuizInfo,
    time_limit_seconds: u32,
    questions: Vec<FixtureQuestion>,
}

impl FixtureQuiz {
    #[must_use]
    pub fn new(info: QuizInfo, time_limit_seconds: u32) -> Self {
        Self {
            info,
            time_limit_seconds,
            questions: Vec::new(),
        }
    }

    /// Append a one-mark question whose correct option is `correct`.
    #[must_use]
    pub fn question(mut self, question: QuizQuestion, correct: OptionId) -> Self {
        self.questions.push(FixtureQuestion { question, correct });
        self
    }

    #[must_use]
    pub fn id(&self) -> QuizId {
        self.info.id
    }

    /// Metadata with question count and minutes derived from the actual content.
    fn info(&self) -> QuizInfo {
        let count = u32::try_from(self.questions.len()).unwrap_or(u32::MAX);
        self.info
            .clone()
            .with_shape(count, self.time_limit_seconds.div_ceil(60))
    }

    fn grade(&self, payload: &SubmitPayload) -> (u32, u32, Vec<AnswerResult>) {
        let mut score = 0;
        let mut total = 0;
        let answers = self
            .questions
            .iter()
            .map(|entry| {
                let chosen = payload
                    .answers
                    .get(&entry.question.id.to_string())
                    .and_then(|raw| raw.parse::<OptionId>().ok());
                let is_correct = chosen == Some(entry.correct);
                total += 1;
                if is_correct {
                    score += 1;
                }
                AnswerResult {
                    question_id: entry.question.id,
                    question: entry.question.prompt.clone(),
                    user_answer: chosen
                        .and_then(|id| entry.question.option(id))
                        .map_or_else(|| "Not answered".to_string(), |o| o.text.clone()),
                    correct_answer: entry
                        .question
                        .option(entry.correct)
                        .map(|o| o.text.clone())
                        .unwrap_or_default(),
                    is_correct,
                }
            })
            .collect();
        (score, total, answers)
    }
}

#[derive(Debug, Default)]
struct FixtureState {
    next_attempt_id: u64,
    open: HashMap<AttemptId, QuizId>,
    history: HashMap<QuizId, Vec<QuizAttempt>>,
    submissions: Vec<SubmitPayload>,
}

/// In-memory `QuizSource` that grades locally.
///
/// Enforces `max_attempts` server-side, hands out sequential attempt ids and
/// records every submit payload it receives.
#[derive(Clone)]
pub struct FixtureQuizSource {
    clock: Clock,
    quizzes: Arc<HashMap<QuizId, FixtureQuiz>>,
    state: Arc<Mutex<FixtureState>>,
}

impl FixtureQuizSource {
    #[must_use]
    pub fn new(clock: Clock, quizzes: Vec<FixtureQuiz>) -> Self {
        Self {
            clock,
            quizzes: Arc::new(quizzes.into_iter().map(|q| (q.id(), q)).collect()),
            state: Arc::new(Mutex::new(FixtureState {
                next_attempt_id: 1,
                ..FixtureState::default()
            })),
        }
    }

    /// Small demo catalog used by fixture mode.
    #[must_use]
    pub fn sample() -> Self {
        let ownership = FixtureQuiz::new(
            QuizInfo::new(QuizId::new(1), "Rust Ownership Basics")
                .with_description("Moves, borrows and lifetimes.")
                .with_max_attempts(3),
            600,
        )
        .question(
            QuizQuestion::new(
                QuestionId::new(1),
                "What happens to a String after it is moved into a function?",
                QuestionKind::MultipleChoice,
                vec![
                    QuizOption::new(OptionId::new(11), "It is copied"),
                    QuizOption::new(OptionId::new(12), "The caller can no longer use it"),
                    QuizOption::new(OptionId::new(13), "It is leaked"),
                ],
            ),
            OptionId::new(12),
        )
        .question(
            QuizQuestion::true_false(
                QuestionId::new(2),
                "Any number of shared references may coexist with one mutable reference.",
            ),
            OptionId::new(2),
        )
        .question(
            QuizQuestion::new(
                QuestionId::new(3),
                "Which trait makes a type implicitly duplicated on assignment?",
                QuestionKind::MultipleChoice,
                vec![
                    QuizOption::new(OptionId::new(31), "Clone"),
                    QuizOption::new(OptionId::new(32), "Copy"),
                    QuizOption::new(OptionId::new(33), "Send"),
                ],
            ),
            OptionId::new(32),
        );

        let lightning = FixtureQuiz::new(
            QuizInfo::new(QuizId::new(2), "Lightning Round").with_passing_score(50),
            30,
        )
        .question(
            QuizQuestion::true_false(QuestionId::new(1), "Cargo is Rust's package manager."),
            OptionId::new(1),
        )
        .question(
            QuizQuestion::true_false(QuestionId::new(2), "Rust has a garbage collector."),
            OptionId::new(2),
        );

        Self::new(Clock::default(), vec![ownership, lightning])
    }

    /// Every payload received by `submit_attempt`, in order.
    #[must_use]
    pub fn submissions(&self) -> Vec<SubmitPayload> {
        self.lock().submissions.clone()
    }

    fn lock(&self) -> MutexGuard<'_, FixtureState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn quiz(&self, quiz_id: QuizId) -> Result<&FixtureQuiz, SourceError> {
        self.quizzes.get(&quiz_id).ok_or(SourceError::NotFound)
    }
}

#[async_trait]
impl QuizSource for FixtureQuizSource {
    async fn quiz_info(&self, quiz_id: QuizId) -> Result<Option<QuizInfo>, SourceError> {
        Ok(self.quizzes.get(&quiz_id).map(FixtureQuiz::info))
    }

    async fn start_attempt(&self, quiz_id: QuizId) -> Result<StartedAttempt, SourceError> {
        let quiz = self.quiz(quiz_id)?;
        let mut state = self.lock();
        let used = state.history.get(&quiz_id).map_or(0, Vec::len);
        if quiz.info.max_attempts_reached(used) {
            return Err(SourceError::AttemptLimit);
        }

        let attempt_id = AttemptId::new(state.next_attempt_id);
        state.next_attempt_id += 1;
        state.open.insert(attempt_id, quiz_id);

        Ok(StartedAttempt {
            attempt_id,
            quiz_id,
            questions: quiz.questions.iter().map(|q| q.question.clone()).collect(),
            started_at: self.clock.now(),
            time_limit_seconds: quiz.time_limit_seconds,
        })
    }

    async fn submit_attempt(&self, payload: &SubmitPayload) -> Result<QuizResults, SourceError> {
        let quiz = self.quiz(payload.quiz_id)?;
        let mut state = self.lock();
        match state.open.get(&payload.attempt_id) {
            Some(quiz_id) if *quiz_id == payload.quiz_id => {}
            _ => {
                return Err(SourceError::Api {
                    status: StatusCode::CONFLICT,
                    message: "Attempt is not open".into(),
                });
            }
        }
        state.open.remove(&payload.attempt_id);
        state.submissions.push(payload.clone());

        let (score, total_marks, answers) = quiz.grade(payload);
        let percentage = if total_marks == 0 {
            0.0
        } else {
            (f64::from(score) * 100.0 / f64::from(total_marks)).round()
        };
        let passed = percentage >= f64::from(quiz.info.passing_score);
        let submitted_at = self.clock.now();

        let history = state.history.entry(payload.quiz_id).or_default();
        history.push(QuizAttempt {
            attempt_id: payload.attempt_id,
            quiz_id: payload.quiz_id,
            attempt_number: u32::try_from(history.len() + 1).unwrap_or(u32::MAX),
            score,
            percentage,
            passed,
            submitted_at,
        });

        Ok(QuizResults {
            attempt_id: payload.attempt_id,
            quiz_id: payload.quiz_id,
            score,
            total_marks,
            percentage,
            passed,
            coins_awarded: if passed { score * COINS_PER_MARK } else { 0 },
            submitted_at,
            answers,
        })
    }

    async fn list_attempts(&self, quiz_id: QuizId) -> Result<Vec<QuizAttempt>, SourceError> {
        self.quiz(quiz_id)?;
        Ok(self.lock().history.get(&quiz_id).cloned().unwrap_or_default())
    }
}
