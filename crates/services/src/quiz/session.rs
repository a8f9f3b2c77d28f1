use std::fmt;

use chrono::{DateTime, Utc};
use quiz_core::model::{
    AnswerSheet, AttemptId, OptionId, QuestionId, QuizAttempt, QuizId, QuizInfo, QuizPhase,
    QuizQuestion, QuizResults, StartedAttempt, SubmitPayload,
};

use super::progress::QuizProgress;
use crate::error::QuizError;

//
// ─── OUTCOMES ──────────────────────────────────────────────────────────────────
//

/// What a single timer tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Not taking, or already at zero. Nothing changed.
    Idle,
    Running { remaining: u32 },
    /// The countdown just reached zero. Reported once per attempt.
    Expired,
}

/// Whether a manual submit may go ahead right away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitCheck {
    Ready,
    NeedsConfirmation { unanswered: usize },
}

/// Handle for an in-flight start call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartTicket {
    pub quiz_id: QuizId,
    epoch: u64,
}

/// Handle for an in-flight submit call, carrying the payload to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSubmit {
    pub payload: SubmitPayload,
    epoch: u64,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// State of one quiz view: `start -> taking -> results`, back to `start` on restart.
///
/// Purely synchronous. Remote calls are split into `begin_*` (validate and mark
/// in flight) and `apply_*`/`fail_*` (fold the response back in), so the caller
/// can keep ticking and navigating while a request is outstanding. Responses
/// that belong to a session that was restarted in the meantime are rejected as
/// `QuizError::Stale`.
#[derive(Clone)]
pub struct QuizSession {
    quiz_id: QuizId,
    info: Option<QuizInfo>,
    attempts: Vec<QuizAttempt>,

    phase: QuizPhase,
    attempt_id: Option<AttemptId>,
    questions: Vec<QuizQuestion>,
    answers: AnswerSheet,
    current_index: usize,
    time_remaining_seconds: u32,
    time_limit_seconds: u32,
    started_at: Option<DateTime<Utc>>,
    results: Option<QuizResults>,

    is_starting: bool,
    is_submitting: bool,
    start_error: Option<String>,
    submit_error: Option<String>,
    epoch: u64,
}

impl QuizSession {
    #[must_use]
    pub fn new(quiz_id: QuizId) -> Self {
        Self {
            quiz_id,
            info: None,
            attempts: Vec::new(),
            phase: QuizPhase::Start,
            attempt_id: None,
            questions: Vec::new(),
            answers: AnswerSheet::new(),
            current_index: 0,
            time_remaining_seconds: 0,
            time_limit_seconds: 0,
            started_at: None,
            results: None,
            is_starting: false,
            is_submitting: false,
            start_error: None,
            submit_error: None,
            epoch: 0,
        }
    }

    // ─── Accessors ────────────────────────────────────────────────────────────

    #[must_use]
    pub fn quiz_id(&self) -> QuizId {
        self.quiz_id
    }

    #[must_use]
    pub fn info(&self) -> Option<&QuizInfo> {
        self.info.as_ref()
    }

    #[must_use]
    pub fn attempts(&self) -> &[QuizAttempt] {
        &self.attempts
    }

    #[must_use]
    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    #[must_use]
    pub fn attempt_id(&self) -> Option<AttemptId> {
        self.attempt_id
    }

    #[must_use]
    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    #[must_use]
    pub fn answers(&self) -> &AnswerSheet {
        &self.answers
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// `None` while questions are missing, which views treat as still loading.
    #[must_use]
    pub fn current_question(&self) -> Option<&QuizQuestion> {
        self.questions.get(self.current_index)
    }

    #[must_use]
    pub fn time_remaining_seconds(&self) -> u32 {
        self.time_remaining_seconds
    }

    #[must_use]
    pub fn time_limit_seconds(&self) -> u32 {
        self.time_limit_seconds
    }

    /// Seconds used so far: limit minus remaining.
    #[must_use]
    pub fn time_spent_seconds(&self) -> u32 {
        self.time_limit_seconds
            .saturating_sub(self.time_remaining_seconds)
    }

    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    #[must_use]
    pub fn results(&self) -> Option<&QuizResults> {
        self.results.as_ref()
    }

    #[must_use]
    pub fn is_starting(&self) -> bool {
        self.is_starting
    }

    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.is_submitting
    }

    #[must_use]
    pub fn start_error(&self) -> Option<&str> {
        self.start_error.as_deref()
    }

    #[must_use]
    pub fn submit_error(&self) -> Option<&str> {
        self.submit_error.as_deref()
    }

    /// True once the configured attempt maximum has been used up.
    #[must_use]
    pub fn max_attempts_reached(&self) -> bool {
        self.info
            .as_ref()
            .is_some_and(|info| info.max_attempts_reached(self.attempts.len()))
    }

    #[must_use]
    pub fn progress(&self) -> QuizProgress {
        let total = self.questions.len();
        let answered = total - self.answers.unanswered_count(&self.questions);
        QuizProgress {
            total,
            answered,
            unanswered: total - answered,
            position: if total == 0 { 0 } else { self.current_index + 1 },
        }
    }

    // ─── Metadata ─────────────────────────────────────────────────────────────

    pub fn set_info(&mut self, info: Option<QuizInfo>) {
        self.info = info;
    }

    pub fn set_attempts(&mut self, attempts: Vec<QuizAttempt>) {
        self.attempts = attempts;
    }

    // ─── start -> taking ──────────────────────────────────────────────────────

    /// Validate and mark a start call as in flight.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::WrongPhase` outside `start`, `QuizError::StartInProgress`
    /// when a start is already outstanding, and `QuizError::AttemptLimitReached`
    /// (with `start_error` set) when no attempts are left.
    pub fn begin_start(&mut self) -> Result<StartTicket, QuizError> {
        self.ensure_phase(QuizPhase::Start)?;
        if self.is_starting {
            return Err(QuizError::StartInProgress);
        }
        if let Some(max) = self
            .info
            .as_ref()
            .filter(|info| info.max_attempts_reached(self.attempts.len()))
            .and_then(|info| info.max_attempts)
        {
            self.start_error =
                Some("You've reached the maximum number of attempts for this quiz.".into());
            return Err(QuizError::AttemptLimitReached { max });
        }

        self.is_starting = true;
        self.start_error = None;
        Ok(StartTicket {
            quiz_id: self.quiz_id,
            epoch: self.epoch,
        })
    }

    /// Enter `taking` with a freshly started attempt.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Stale` if the session was restarted since `begin_start`.
    pub fn apply_started(
        &mut self,
        ticket: StartTicket,
        started: StartedAttempt,
    ) -> Result<(), QuizError> {
        if ticket.epoch != self.epoch || !self.is_starting || self.phase != QuizPhase::Start {
            return Err(QuizError::Stale);
        }

        self.attempt_id = Some(started.attempt_id);
        self.questions = started.questions;
        self.time_limit_seconds = started.time_limit_seconds;
        self.time_remaining_seconds = started.time_limit_seconds;
        self.started_at = Some(started.started_at);
        self.answers.clear();
        self.current_index = 0;
        self.results = None;
        self.is_starting = false;
        self.start_error = None;
        self.submit_error = None;
        self.phase = QuizPhase::Taking;
        Ok(())
    }

    /// Record a failed start. The phase stays `start`.
    pub fn fail_start(&mut self, ticket: StartTicket, message: impl Into<String>) {
        if ticket.epoch == self.epoch && self.is_starting {
            self.is_starting = false;
            self.start_error = Some(message.into());
        }
    }

    // ─── taking ───────────────────────────────────────────────────────────────

    /// Select `option_id` for `question_id`, replacing any earlier choice.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::WrongPhase` outside `taking`, or `UnknownQuestion` /
    /// `UnknownOption` for ids not part of this attempt.
    pub fn select_answer(
        &mut self,
        question_id: QuestionId,
        option_id: OptionId,
    ) -> Result<Option<OptionId>, QuizError> {
        self.ensure_phase(QuizPhase::Taking)?;
        let question = self
            .questions
            .iter()
            .find(|question| question.id == question_id)
            .ok_or(QuizError::UnknownQuestion(question_id))?;
        if !question.has_option(option_id) {
            return Err(QuizError::UnknownOption {
                question: question_id,
                option: option_id,
            });
        }
        Ok(self.answers.select(question_id, option_id))
    }

    pub fn next_question(&mut self) {
        self.go_to_question(self.current_index.saturating_add(1));
    }

    pub fn previous_question(&mut self) {
        self.go_to_question(self.current_index.saturating_sub(1));
    }

    /// Jump to `index`, clamped to the available questions.
    pub fn go_to_question(&mut self, index: usize) {
        self.current_index = index.min(self.questions.len().saturating_sub(1));
    }

    /// Advance the countdown by one second.
    pub fn tick(&mut self) -> Tick {
        if self.phase != QuizPhase::Taking || self.time_remaining_seconds == 0 {
            return Tick::Idle;
        }
        self.time_remaining_seconds -= 1;
        if self.time_remaining_seconds == 0 {
            Tick::Expired
        } else {
            Tick::Running {
                remaining: self.time_remaining_seconds,
            }
        }
    }

    /// Whether a manual submit should ask for confirmation first.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::WrongPhase` outside `taking`.
    pub fn check_submit(&self) -> Result<SubmitCheck, QuizError> {
        self.ensure_phase(QuizPhase::Taking)?;
        match self.answers.unanswered_count(&self.questions) {
            0 => Ok(SubmitCheck::Ready),
            unanswered => Ok(SubmitCheck::NeedsConfirmation { unanswered }),
        }
    }

    // ─── taking -> results ────────────────────────────────────────────────────

    /// Build the submit payload and mark a submit as in flight.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::WrongPhase` outside `taking`, `SubmitInProgress` when a
    /// submit is outstanding, and `NoAttempt` without an attempt id.
    pub fn begin_submit(&mut self) -> Result<PendingSubmit, QuizError> {
        self.ensure_phase(QuizPhase::Taking)?;
        if self.is_submitting {
            return Err(QuizError::SubmitInProgress);
        }
        let attempt_id = self.attempt_id.ok_or(QuizError::NoAttempt)?;

        self.is_submitting = true;
        self.submit_error = None;
        Ok(PendingSubmit {
            payload: SubmitPayload {
                attempt_id,
                quiz_id: self.quiz_id,
                answers: self.answers.to_payload(),
                time_spent_seconds: self.time_spent_seconds(),
            },
            epoch: self.epoch,
        })
    }

    /// Store graded results and enter `results`. The countdown freezes where it is.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Stale` if the session was restarted since `begin_submit`.
    pub fn apply_submitted(
        &mut self,
        pending: &PendingSubmit,
        results: QuizResults,
    ) -> Result<(), QuizError> {
        if pending.epoch != self.epoch || !self.is_submitting || self.phase != QuizPhase::Taking {
            return Err(QuizError::Stale);
        }
        self.results = Some(results);
        self.is_submitting = false;
        self.submit_error = None;
        self.phase = QuizPhase::Results;
        Ok(())
    }

    /// Record a failed submit. The phase stays `taking`.
    pub fn fail_submit(&mut self, pending: &PendingSubmit, message: impl Into<String>) {
        if pending.epoch == self.epoch && self.is_submitting {
            self.is_submitting = false;
            self.submit_error = Some(message.into());
        }
    }

    // ─── any -> start ─────────────────────────────────────────────────────────

    /// Drop the current attempt and return to `start`.
    ///
    /// Quiz metadata and attempt history are kept; in-flight responses become stale.
    pub fn restart(&mut self) {
        let epoch = self.epoch.wrapping_add(1);
        let info = self.info.take();
        let attempts = std::mem::take(&mut self.attempts);
        *self = Self::new(self.quiz_id);
        self.info = info;
        self.attempts = attempts;
        self.epoch = epoch;
    }

    fn ensure_phase(&self, expected: QuizPhase) -> Result<(), QuizError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(QuizError::WrongPhase {
                expected,
                actual: self.phase,
            })
        }
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("quiz_id", &self.quiz_id)
            .field("phase", &self.phase)
            .field("attempt_id", &self.attempt_id)
            .field("questions_len", &self.questions.len())
            .field("answers_len", &self.answers.len())
            .field("current_index", &self.current_index)
            .field("time_remaining_seconds", &self.time_remaining_seconds)
            .field("is_starting", &self.is_starting)
            .field("is_submitting", &self.is_submitting)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
