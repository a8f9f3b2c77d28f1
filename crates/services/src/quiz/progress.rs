/// Aggregated view of how far the learner is through an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizProgress {
    pub total: usize,
    pub answered: usize,
    pub unanswered: usize,
    /// 1-based position of the current question, 0 when there are no questions.
    pub position: usize,
}
