use std::ops::ControlFlow;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use quiz_core::model::{OptionId, QuestionId, QuizAttempt, QuizId, QuizPhase, QuizResults};
use remote::QuizSource;
use tokio::sync::watch;

use super::session::{QuizSession, SubmitCheck, Tick};
use super::timer::{self, TICK_INTERVAL, TimerGuard};
use crate::error::QuizError;

const START_FAILED: &str = "Failed to start quiz";
const SUBMIT_FAILED: &str = "Failed to submit quiz";

/// Result of asking to submit an attempt by hand.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Unanswered questions remain; call `confirm_submit` to go ahead anyway.
    NeedsConfirmation { unanswered: usize },
    Submitted(QuizResults),
}

struct Inner {
    source: Arc<dyn QuizSource>,
    session: Mutex<QuizSession>,
    timer: Mutex<Option<TimerGuard>>,
    phase_tx: watch::Sender<QuizPhase>,
    tick_interval: Duration,
}

/// Drives one `QuizSession` against a `QuizSource`.
///
/// Cheap to clone; all clones share the session. The session lock is never held
/// across a remote call, so ticks and navigation proceed while a request is in
/// flight. The countdown task lives only while the session is `taking` and is
/// cancelled when the last handle is dropped.
#[derive(Clone)]
pub struct QuizController {
    inner: Arc<Inner>,
}

impl QuizController {
    #[must_use]
    pub fn new(quiz_id: QuizId, source: Arc<dyn QuizSource>) -> Self {
        let (phase_tx, _) = watch::channel(QuizPhase::Start);
        Self {
            inner: Arc::new(Inner {
                source,
                session: Mutex::new(QuizSession::new(quiz_id)),
                timer: Mutex::new(None),
                phase_tx,
                tick_interval: TICK_INTERVAL,
            }),
        }
    }

    #[must_use]
    pub fn quiz_id(&self) -> QuizId {
        self.session().quiz_id()
    }

    /// Copy of the current session state for rendering.
    #[must_use]
    pub fn snapshot(&self) -> QuizSession {
        self.session().clone()
    }

    /// Receives the phase every time it changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<QuizPhase> {
        self.inner.phase_tx.subscribe()
    }

    /// Fetch quiz metadata and attempt history for the start screen.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Source` if either lookup fails.
    pub async fn load(&self) -> Result<(), QuizError> {
        let quiz_id = self.quiz_id();
        let info = self.inner.source.quiz_info(quiz_id).await?;
        self.session().set_info(info);
        self.refresh_attempts().await?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `QuizError::Source` if the history cannot be fetched.
    pub async fn refresh_attempts(&self) -> Result<Vec<QuizAttempt>, QuizError> {
        let quiz_id = self.quiz_id();
        let attempts = self.inner.source.list_attempts(quiz_id).await?;
        self.session().set_attempts(attempts.clone());
        Ok(attempts)
    }

    /// Start a new attempt and begin the countdown.
    ///
    /// # Errors
    ///
    /// Returns the `QuizError` from `QuizSession::begin_start`, or `QuizError::Source`
    /// after recording a human-readable `start_error`.
    pub async fn start(&self) -> Result<(), QuizError> {
        let ticket = self.session().begin_start()?;
        tracing::info!(quiz_id = %ticket.quiz_id, "starting quiz attempt");

        let started = match self.inner.source.start_attempt(ticket.quiz_id).await {
            Ok(started) => started,
            Err(err) => {
                tracing::warn!(quiz_id = %ticket.quiz_id, error = %err, "quiz start failed");
                self.session().fail_start(ticket, err.user_message(START_FAILED));
                return Err(err.into());
            }
        };

        let attempt_id = started.attempt_id;
        let already_expired = {
            let mut session = self.session();
            session.apply_started(ticket, started)?;
            session.time_remaining_seconds() == 0
        };
        tracing::info!(%attempt_id, "quiz attempt started");
        self.publish();

        if already_expired {
            self.expire().await;
        } else {
            self.start_timer();
        }
        Ok(())
    }

    /// # Errors
    ///
    /// See `QuizSession::select_answer`.
    pub fn select_answer(
        &self,
        question_id: QuestionId,
        option_id: OptionId,
    ) -> Result<(), QuizError> {
        self.session().select_answer(question_id, option_id)?;
        Ok(())
    }

    pub fn next_question(&self) {
        self.session().next_question();
    }

    pub fn previous_question(&self) {
        self.session().previous_question();
    }

    pub fn go_to_question(&self, index: usize) {
        self.session().go_to_question(index);
    }

    /// Submit by hand, asking for confirmation first if questions are unanswered.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::WrongPhase` outside `taking`, or any submit error.
    pub async fn request_submit(&self) -> Result<SubmitOutcome, QuizError> {
        let check = self.session().check_submit()?;
        match check {
            SubmitCheck::NeedsConfirmation { unanswered } => {
                Ok(SubmitOutcome::NeedsConfirmation { unanswered })
            }
            SubmitCheck::Ready => self.confirm_submit().await.map(SubmitOutcome::Submitted),
        }
    }

    /// Submit regardless of unanswered questions.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::SubmitInProgress` while another submit is outstanding, or
    /// `QuizError::Source` after recording a human-readable `submit_error`.
    pub async fn confirm_submit(&self) -> Result<QuizResults, QuizError> {
        let pending = self.session().begin_submit()?;
        let payload = &pending.payload;
        tracing::info!(
            attempt_id = %payload.attempt_id,
            answers = payload.answers.len(),
            time_spent = payload.time_spent_seconds,
            "submitting quiz attempt"
        );

        let results = match self.inner.source.submit_attempt(payload).await {
            Ok(results) => results,
            Err(err) => {
                tracing::warn!(attempt_id = %payload.attempt_id, error = %err, "quiz submit failed");
                self.session().fail_submit(&pending, err.user_message(SUBMIT_FAILED));
                return Err(err.into());
            }
        };

        self.session().apply_submitted(&pending, results.clone())?;
        self.stop_timer();
        self.publish();
        tracing::info!(
            attempt_id = %results.attempt_id,
            percentage = results.percentage,
            passed = results.passed,
            "quiz attempt graded"
        );

        if let Err(err) = self.refresh_attempts().await {
            tracing::warn!(error = %err, "could not refresh attempt history");
        }
        Ok(results)
    }

    /// Abandon the current attempt and return to the start screen.
    pub fn restart(&self) {
        self.stop_timer();
        self.session().restart();
        self.publish();
    }

    fn tick(&self) -> Tick {
        self.session().tick()
    }

    /// Auto-submit after the countdown reached zero. Failures are surfaced through
    /// `submit_error` and are not retried.
    async fn expire(&self) {
        tracing::info!(quiz_id = %self.quiz_id(), "time limit reached, submitting");
        match self.confirm_submit().await {
            Ok(_) => {}
            Err(QuizError::SubmitInProgress) => {
                tracing::debug!("submit already in flight when time ran out");
            }
            Err(err) => tracing::warn!(error = %err, "automatic submit failed"),
        }
    }

    fn start_timer(&self) {
        let weak: Weak<Inner> = Arc::downgrade(&self.inner);
        let guard = timer::spawn_ticker(self.inner.tick_interval, move || {
            let Some(inner) = weak.upgrade() else {
                return ControlFlow::Break(());
            };
            let controller = QuizController { inner };
            match controller.tick() {
                Tick::Running { .. } => ControlFlow::Continue(()),
                Tick::Expired => {
                    tokio::spawn(async move { controller.expire().await });
                    ControlFlow::Break(())
                }
                Tick::Idle => ControlFlow::Break(()),
            }
        });
        *self.timer() = Some(guard);
    }

    fn stop_timer(&self) {
        let guard = self.timer().take();
        drop(guard);
    }

    fn publish(&self) {
        let phase = self.session().phase();
        self.inner.phase_tx.send_if_modified(|current| {
            let changed = *current != phase;
            *current = phase;
            changed
        });
    }

    fn session(&self) -> MutexGuard<'_, QuizSession> {
        self.inner
            .session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn timer(&self) -> MutexGuard<'_, Option<TimerGuard>> {
        self.inner
            .timer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for QuizController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuizController")
            .field("session", &*self.session())
            .field("tick_interval", &self.inner.tick_interval)
            .finish_non_exhaustive()
    }
}
