use quiz_core::model::{AnswerResult, QuizResults};

use crate::vm::quiz_start_vm::format_percentage;

const PROMPT_PREVIEW_CHARS: usize = 60;
const NO_ANSWER: &str = "(No answer)";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnswerRowVm {
    pub title: String,
    pub is_correct: bool,
    pub user_answer: String,
    /// Only present for wrong answers.
    pub correct_answer: Option<String>,
}

/// Outcome screen of a graded attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizResultsVm {
    pub passed: bool,
    pub headline: &'static str,
    pub score: String,
    pub percentage: String,
    pub correct: usize,
    pub incorrect: usize,
    pub coins: Option<String>,
    pub rows: Vec<AnswerRowVm>,
}

impl From<&QuizResults> for QuizResultsVm {
    fn from(results: &QuizResults) -> Self {
        Self {
            passed: results.passed,
            headline: if results.passed {
                "Congratulations! You passed!"
            } else {
                "Keep practicing! You didn't pass this time."
            },
            score: format!("{} / {}", results.score, results.total_marks),
            percentage: format_percentage(results.percentage),
            correct: results.correct_count(),
            incorrect: results.incorrect_count(),
            coins: (results.coins_awarded > 0)
                .then(|| format!("+{} coins earned", results.coins_awarded)),
            rows: results
                .answers
                .iter()
                .enumerate()
                .map(|(i, answer)| answer_row(i, answer))
                .collect(),
        }
    }
}

fn answer_row(index: usize, answer: &AnswerResult) -> AnswerRowVm {
    AnswerRowVm {
        title: format!("Question {}: {}", index + 1, preview(&answer.question)),
        is_correct: answer.is_correct,
        user_answer: if answer.user_answer.trim().is_empty() {
            NO_ANSWER.to_string()
        } else {
            answer.user_answer.clone()
        },
        correct_answer: (!answer.is_correct).then(|| answer.correct_answer.clone()),
    }
}

fn preview(prompt: &str) -> String {
    if prompt.chars().count() > PROMPT_PREVIEW_CHARS {
        let head: String = prompt.chars().take(PROMPT_PREVIEW_CHARS).collect();
        format!("{head}...")
    } else {
        prompt.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{AttemptId, QuestionId, QuizId};
    use quiz_core::time::fixed_now;

    fn results(passed: bool, coins: u32) -> QuizResults {
        QuizResults {
            attempt_id: AttemptId::new(1),
            quiz_id: QuizId::new(1),
            score: 1,
            total_marks: 2,
            percentage: 50.0,
            passed,
            coins_awarded: coins,
            submitted_at: fixed_now(),
            answers: vec![
                AnswerResult {
                    question_id: QuestionId::new(1),
                    question: "x".repeat(70),
                    user_answer: "A".into(),
                    correct_answer: "A".into(),
                    is_correct: true,
                },
                AnswerResult {
                    question_id: QuestionId::new(2),
                    question: "Short".into(),
                    user_answer: "Not answered".into(),
                    correct_answer: "B".into(),
                    is_correct: false,
                },
            ],
        }
    }

    #[test]
    fn failed_results_without_coins() {
        let vm = QuizResultsVm::from(&results(false, 0));
        assert!(!vm.passed);
        assert_eq!(vm.score, "1 / 2");
        assert_eq!(vm.percentage, "50%");
        assert_eq!((vm.correct, vm.incorrect), (1, 1));
        assert!(vm.coins.is_none());
    }

    #[test]
    fn blank_user_answer_reads_as_no_answer() {
        let mut graded = results(false, 0);
        graded.answers[1].user_answer = String::new();
        let vm = QuizResultsVm::from(&graded);
        assert_eq!(vm.rows[1].user_answer, "(No answer)");
        assert_eq!(vm.rows[0].user_answer, "A");
    }

    #[test]
    fn coins_line_when_awarded() {
        let vm = QuizResultsVm::from(&results(true, 10));
        assert_eq!(vm.coins.as_deref(), Some("+10 coins earned"));
        assert_eq!(vm.headline, "Congratulations! You passed!");
    }

    #[test]
    fn long_prompts_are_truncated_and_wrong_rows_show_key() {
        let vm = QuizResultsVm::from(&results(false, 0));
        assert_eq!(vm.rows[0].title, format!("Question 1: {}...", "x".repeat(60)));
        assert!(vm.rows[0].correct_answer.is_none());
        assert_eq!(vm.rows[1].title, "Question 2: Short");
        assert_eq!(vm.rows[1].correct_answer.as_deref(), Some("B"));
    }
}
