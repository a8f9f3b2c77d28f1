use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::ids::{AttemptId, QuizId};
use crate::model::question::QuizQuestion;

//
// ─── STARTED ATTEMPT ──────────────────────────────────────────────────────────
//

/// What the backend hands out when an attempt starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartedAttempt {
    pub attempt_id: AttemptId,
    pub quiz_id: QuizId,
    pub questions: Vec<QuizQuestion>,
    pub started_at: DateTime<Utc>,
    pub time_limit_seconds: u32,
}

//
// ─── SUBMIT PAYLOAD ───────────────────────────────────────────────────────────
//

/// Everything sent to the backend when an attempt is submitted.
///
/// `answers` maps the stringified question id to the stringified option id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitPayload {
    pub attempt_id: AttemptId,
    pub quiz_id: QuizId,
    pub answers: BTreeMap<String, String>,
    pub time_spent_seconds: u32,
}

//
// ─── ATTEMPT HISTORY ──────────────────────────────────────────────────────────
//

/// A past, already graded attempt. Created server-side; read-only here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizAttempt {
    pub attempt_id: AttemptId,
    pub quiz_id: QuizId,
    pub attempt_number: u32,
    pub score: u32,
    pub percentage: f64,
    pub passed: bool,
    pub submitted_at: DateTime<Utc>,
}

/// Highest-percentage attempt; the earliest one wins a tie.
#[must_use]
pub fn best_attempt(attempts: &[QuizAttempt]) -> Option<&QuizAttempt> {
    attempts.iter().fold(None, |best, current| match best {
        Some(best) if current.percentage <= best.percentage => Some(best),
        _ => Some(current),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    fn attempt(id: u64, percentage: f64) -> QuizAttempt {
        QuizAttempt {
            attempt_id: AttemptId::new(id),
            quiz_id: QuizId::new(1),
            attempt_number: u32::try_from(id).unwrap(),
            score: 0,
            percentage,
            passed: percentage >= 70.0,
            submitted_at: fixed_now(),
        }
    }

    #[test]
    fn best_attempt_of_empty_history_is_none() {
        assert!(best_attempt(&[]).is_none());
    }

    #[test]
    fn best_attempt_picks_highest_percentage() {
        let history = vec![attempt(1, 40.0), attempt(2, 90.0), attempt(3, 60.0)];
        assert_eq!(best_attempt(&history).unwrap().attempt_id, AttemptId::new(2));
    }

    #[test]
    fn best_attempt_prefers_earliest_on_tie() {
        let history = vec![attempt(1, 80.0), attempt(2, 80.0)];
        assert_eq!(best_attempt(&history).unwrap().attempt_id, AttemptId::new(1));
    }
}
