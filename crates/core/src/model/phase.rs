use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a quiz session currently is.
///
/// `Start -> Taking -> Results`, and back to `Start` only through an explicit restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuizPhase {
    #[default]
    Start,
    Taking,
    Results,
}

impl QuizPhase {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            QuizPhase::Start => "start",
            QuizPhase::Taking => "taking",
            QuizPhase::Results => "results",
        }
    }
}

impl fmt::Display for QuizPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
