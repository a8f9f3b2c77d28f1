use std::collections::BTreeMap;

use crate::model::ids::{OptionId, QuestionId};
use crate::model::question::QuizQuestion;

/// Selected options for the questions of one attempt.
///
/// Keyed by `QuestionId`; each question holds at most one selection and a new
/// selection replaces the old one. Iteration is in question-id order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerSheet {
    selections: BTreeMap<QuestionId, OptionId>,
}

impl AnswerSheet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `option_id` for `question_id`, returning the previously selected option.
    pub fn select(&mut self, question_id: QuestionId, option_id: OptionId) -> Option<OptionId> {
        self.selections.insert(question_id, option_id)
    }

    #[must_use]
    pub fn selected(&self, question_id: QuestionId) -> Option<OptionId> {
        self.selections.get(&question_id).copied()
    }

    #[must_use]
    pub fn is_answered(&self, question_id: QuestionId) -> bool {
        self.selections.contains_key(&question_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.selections.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }

    pub fn clear(&mut self) {
        self.selections.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (QuestionId, OptionId)> + '_ {
        self.selections.iter().map(|(q, o)| (*q, *o))
    }

    /// Number of `questions` without a selection.
    #[must_use]
    pub fn unanswered_count(&self, questions: &[QuizQuestion]) -> usize {
        questions
            .iter()
            .filter(|question| !self.is_answered(question.id))
            .count()
    }

    /// Submit-endpoint shape: question id and option id, both as strings.
    #[must_use]
    pub fn to_payload(&self) -> BTreeMap<String, String> {
        self.selections
            .iter()
            .map(|(question, option)| (question.to_string(), option.to_string()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_overwrites_previous_choice() {
        let mut sheet = AnswerSheet::new();
        assert_eq!(sheet.select(QuestionId::new(1), OptionId::new(10)), None);
        assert_eq!(
            sheet.select(QuestionId::new(1), OptionId::new(11)),
            Some(OptionId::new(10))
        );
        assert_eq!(sheet.len(), 1);
        assert_eq!(sheet.selected(QuestionId::new(1)), Some(OptionId::new(11)));
    }

    #[test]
    fn payload_stringifies_keys_and_values() {
        let mut sheet = AnswerSheet::new();
        sheet.select(QuestionId::new(3), OptionId::new(30));
        sheet.select(QuestionId::new(1), OptionId::new(12));

        let payload = sheet.to_payload();
        let pairs: Vec<_> = payload.iter().collect();
        assert_eq!(
            pairs,
            vec![
                (&"1".to_string(), &"12".to_string()),
                (&"3".to_string(), &"30".to_string()),
            ]
        );
    }

    #[test]
    fn unanswered_count_ignores_selections_for_other_questions() {
        let questions = vec![
            QuizQuestion::true_false(QuestionId::new(1), "a"),
            QuizQuestion::true_false(QuestionId::new(2), "b"),
        ];
        let mut sheet = AnswerSheet::new();
        sheet.select(QuestionId::new(2), OptionId::new(1));
        sheet.select(QuestionId::new(99), OptionId::new(1));
        assert_eq!(sheet.unanswered_count(&questions), 1);
    }
}
