use quiz_core::model::{QuizAttempt, best_attempt};
use services::QuizSession;

use crate::vm::time_fmt::format_datetime;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttemptRowVm {
    pub number: u32,
    pub percentage: String,
    pub passed: bool,
    pub result_label: &'static str,
    pub date: String,
}

impl From<&QuizAttempt> for AttemptRowVm {
    fn from(attempt: &QuizAttempt) -> Self {
        Self {
            number: attempt.attempt_number,
            percentage: format_percentage(attempt.percentage),
            passed: attempt.passed,
            result_label: if attempt.passed { "Passed" } else { "Failed" },
            date: format_datetime(attempt.submitted_at),
        }
    }
}

/// Start screen: quiz facts, start button state and attempt history.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizStartVm {
    pub title: String,
    pub description: Option<String>,
    pub question_count: String,
    pub minutes: String,
    pub passing_score: String,
    pub max_attempts: String,
    pub max_attempts_reached: bool,
    pub is_starting: bool,
    pub start_error: Option<String>,
    pub best_attempt: Option<String>,
    pub attempts: Vec<AttemptRowVm>,
}

impl From<&QuizSession> for QuizStartVm {
    fn from(session: &QuizSession) -> Self {
        let info = session.info();
        let unknown = || "?".to_string();

        Self {
            title: info.map_or_else(
                || format!("Quiz #{}", session.quiz_id()),
                |info| info.title.clone(),
            ),
            description: info.and_then(|info| info.description.clone()),
            question_count: info
                .map(|info| info.question_count)
                .filter(|count| *count > 0)
                .map_or_else(unknown, |count| count.to_string()),
            minutes: info
                .map(|info| info.time_limit_minutes)
                .filter(|minutes| *minutes > 0)
                .map_or_else(unknown, |minutes| minutes.to_string()),
            passing_score: format!(
                "{}%",
                info.map_or(quiz_core::model::DEFAULT_PASSING_SCORE, |info| info
                    .passing_score)
            ),
            max_attempts: info
                .and_then(|info| info.max_attempts)
                .map_or_else(|| "∞".to_string(), |max| max.to_string()),
            max_attempts_reached: session.max_attempts_reached(),
            is_starting: session.is_starting(),
            start_error: session.start_error().map(str::to_string),
            best_attempt: best_attempt(session.attempts()).map(|best| {
                let mut line = format!("Best Score: {}", format_percentage(best.percentage));
                if best.passed {
                    line.push_str(" (Passed)");
                }
                line
            }),
            attempts: session.attempts().iter().map(AttemptRowVm::from).collect(),
        }
    }
}

pub(crate) fn format_percentage(value: f64) -> String {
    format!("{value}%")
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{AttemptId, QuizId, QuizInfo};
    use quiz_core::time::fixed_now;

    fn attempt(number: u32, percentage: f64, passed: bool) -> QuizAttempt {
        QuizAttempt {
            attempt_id: AttemptId::new(u64::from(number)),
            quiz_id: QuizId::new(1),
            attempt_number: number,
            score: 0,
            percentage,
            passed,
            submitted_at: fixed_now(),
        }
    }

    #[test]
    fn missing_info_falls_back_to_placeholders() {
        let session = QuizSession::new(QuizId::new(12));
        let vm = QuizStartVm::from(&session);
        assert_eq!(vm.title, "Quiz #12");
        assert_eq!(vm.question_count, "?");
        assert_eq!(vm.minutes, "?");
        assert_eq!(vm.passing_score, "70%");
        assert_eq!(vm.max_attempts, "∞");
        assert!(!vm.max_attempts_reached);
        assert!(vm.best_attempt.is_none());
    }

    #[test]
    fn history_and_limit_are_reflected() {
        let mut session = QuizSession::new(QuizId::new(1));
        session.set_info(Some(
            QuizInfo::new(QuizId::new(1), "Ownership")
                .with_shape(3, 10)
                .with_max_attempts(2),
        ));
        session.set_attempts(vec![attempt(1, 40.0, false), attempt(2, 85.5, true)]);

        let vm = QuizStartVm::from(&session);
        assert_eq!(vm.title, "Ownership");
        assert_eq!(vm.question_count, "3");
        assert_eq!(vm.minutes, "10");
        assert_eq!(vm.max_attempts, "2");
        assert!(vm.max_attempts_reached);
        assert_eq!(vm.best_attempt.as_deref(), Some("Best Score: 85.5% (Passed)"));
        assert_eq!(vm.attempts[0].result_label, "Failed");
        assert_eq!(vm.attempts[1].percentage, "85.5%");
        assert_eq!(vm.attempts[1].date, "Nov 14, 2023");
    }
}
