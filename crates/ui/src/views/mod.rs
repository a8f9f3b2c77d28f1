//! Plain-text screens for the three quiz phases.

mod results;
mod start;
mod taking;

#[cfg(test)]
mod view_smoke;

use quiz_core::model::QuizPhase;
use services::QuizSession;

use crate::vm::{QuizResultsVm, QuizStartVm, map_quiz_taking};

pub use results::render_results;
pub use start::render_start;
pub use taking::{render_loading, render_taking};

/// Render whichever screen matches the session's phase.
#[must_use]
pub fn render_session(session: &QuizSession) -> String {
    match session.phase() {
        QuizPhase::Start => render_start(&QuizStartVm::from(session)),
        QuizPhase::Taking => {
            map_quiz_taking(session).map_or_else(render_loading, |vm| render_taking(&vm))
        }
        QuizPhase::Results => session
            .results()
            .map_or_else(render_loading, |results| {
                render_results(&QuizResultsVm::from(results))
            }),
    }
}

pub(crate) fn rule() -> String {
    "-".repeat(48)
}
