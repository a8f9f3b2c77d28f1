use quiz_core::model::{OptionId, QuestionId, QuestionKind};
use services::QuizSession;

use crate::vm::time_fmt::{format_clock, is_low_time};

pub const LOADING_MESSAGE: &str = "Loading questions...";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionVm {
    pub id: OptionId,
    pub text: String,
    pub selected: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DotState {
    Current,
    Answered,
    Unanswered,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionDotVm {
    pub label: String,
    pub state: DotState,
}

/// One question on screen plus the timer and navigation around it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizTakingVm {
    pub clock: String,
    pub low_time: bool,
    pub counter: String,
    pub kind_label: &'static str,
    pub question_id: QuestionId,
    pub prompt: String,
    pub options: Vec<OptionVm>,
    pub answered_label: String,
    pub unanswered: usize,
    pub dots: Vec<QuestionDotVm>,
    pub is_first: bool,
    pub is_last: bool,
    pub is_submitting: bool,
    pub submit_error: Option<String>,
}

fn kind_label(kind: QuestionKind) -> &'static str {
    match kind {
        QuestionKind::TrueFalse => "True/False",
        QuestionKind::MultipleChoice => "Multiple Choice",
    }
}

/// `None` while the attempt has no question to show yet.
#[must_use]
pub fn map_quiz_taking(session: &QuizSession) -> Option<QuizTakingVm> {
    let question = session.current_question()?;
    let answers = session.answers();
    let selected = answers.selected(question.id);
    let progress = session.progress();
    let index = session.current_index();

    let dots = session
        .questions()
        .iter()
        .enumerate()
        .map(|(i, q)| QuestionDotVm {
            label: (i + 1).to_string(),
            state: if i == index {
                DotState::Current
            } else if answers.is_answered(q.id) {
                DotState::Answered
            } else {
                DotState::Unanswered
            },
        })
        .collect();

    Some(QuizTakingVm {
        clock: format_clock(session.time_remaining_seconds()),
        low_time: is_low_time(session.time_remaining_seconds()),
        counter: format!("Question {} of {}", progress.position, progress.total),
        kind_label: kind_label(question.kind),
        question_id: question.id,
        prompt: question.prompt.clone(),
        options: question
            .options
            .iter()
            .map(|option| OptionVm {
                id: option.id,
                text: option.text.clone(),
                selected: selected == Some(option.id),
            })
            .collect(),
        answered_label: format!(
            "Jump to question ({}/{} answered)",
            progress.answered, progress.total
        ),
        unanswered: progress.unanswered,
        dots,
        is_first: index == 0,
        is_last: index + 1 == progress.total,
        is_submitting: session.is_submitting(),
        submit_error: session.submit_error().map(str::to_string),
    })
}

/// Confirmation text shown when submitting with gaps.
#[must_use]
pub fn confirm_submit_message(unanswered: usize) -> String {
    let plural = if unanswered == 1 { "" } else { "s" };
    format!(
        "You have {unanswered} unanswered question{plural}. Are you sure you want to submit?"
    )
}
