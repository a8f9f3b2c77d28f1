mod progress;
mod session;
mod timer;
mod workflow;

// Public API of the quiz subsystem.
pub use crate::error::QuizError;
pub use progress::QuizProgress;
pub use session::{PendingSubmit, QuizSession, StartTicket, SubmitCheck, Tick};
pub use timer::TICK_INTERVAL;
pub use workflow::{QuizController, SubmitOutcome};
