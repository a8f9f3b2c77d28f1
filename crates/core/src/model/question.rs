use serde::{Deserialize, Serialize};

use crate::model::ids::{OptionId, QuestionId};

//
// ─── QUESTION KIND ────────────────────────────────────────────────────────────
//

/// How a question is presented to the learner.
///
/// Unknown kinds coming from the backend are read as `MultipleChoice`; both kinds
/// are answered the same way (pick exactly one option).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    TrueFalse,
    #[default]
    #[serde(other)]
    MultipleChoice,
}

impl QuestionKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            QuestionKind::MultipleChoice => "multiple_choice",
            QuestionKind::TrueFalse => "true_false",
        }
    }
}

//
// ─── QUESTION ─────────────────────────────────────────────────────────────────
//

/// A selectable answer for a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizOption {
    pub id: OptionId,
    pub text: String,
}

impl QuizOption {
    #[must_use]
    pub fn new(id: OptionId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
        }
    }
}

/// A question as delivered by the start-attempt call.
///
/// Immutable once loaded; the session only ever reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub id: QuestionId,
    pub prompt: String,
    pub kind: QuestionKind,
    pub options: Vec<QuizOption>,
}

impl QuizQuestion {
    #[must_use]
    pub fn new(
        id: QuestionId,
        prompt: impl Into<String>,
        kind: QuestionKind,
        options: Vec<QuizOption>,
    ) -> Self {
        Self {
            id,
            prompt: prompt.into(),
            kind,
            options,
        }
    }

    /// Convenience constructor for a true/false question with options `1 = True`, `2 = False`.
    #[must_use]
    pub fn true_false(id: QuestionId, prompt: impl Into<String>) -> Self {
        Self::new(
            id,
            prompt,
            QuestionKind::TrueFalse,
            vec![
                QuizOption::new(OptionId::new(1), "True"),
                QuizOption::new(OptionId::new(2), "False"),
            ],
        )
    }

    #[must_use]
    pub fn option(&self, id: OptionId) -> Option<&QuizOption> {
        self.options.iter().find(|option| option.id == id)
    }

    #[must_use]
    pub fn has_option(&self, id: OptionId) -> bool {
        self.option(id).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_kind_falls_back_to_multiple_choice() {
        let kind: QuestionKind = serde_json::from_str("\"essay\"").unwrap();
        assert_eq!(kind, QuestionKind::MultipleChoice);
    }

    #[test]
    fn true_false_kind_reads_snake_case() {
        let kind: QuestionKind = serde_json::from_str("\"true_false\"").unwrap();
        assert_eq!(kind, QuestionKind::TrueFalse);
        assert_eq!(kind.as_str(), "true_false");
    }

    #[test]
    fn kinds_serialize_with_wire_names() {
        assert_eq!(
            serde_json::to_string(&QuestionKind::MultipleChoice).unwrap(),
            "\"multiple_choice\""
        );
        assert_eq!(
            serde_json::to_string(&QuestionKind::TrueFalse).unwrap(),
            "\"true_false\""
        );
        assert_eq!(QuestionKind::default(), QuestionKind::MultipleChoice);
    }

    #[test]
    fn option_lookup_by_id() {
        let question = QuizQuestion::true_false(QuestionId::new(1), "Rust has a GC");
        assert_eq!(question.option(OptionId::new(2)).unwrap().text, "False");
        assert!(!question.has_option(OptionId::new(3)));
    }
}
