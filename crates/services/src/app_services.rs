use std::sync::Arc;

use quiz_core::model::QuizId;
use remote::{QuizSource, SourceConfig, SourceError, build_source};

use crate::quiz::QuizController;

/// Composition root: builds the data source once and hands out quiz controllers.
#[derive(Clone)]
pub struct QuizServices {
    source: Arc<dyn QuizSource>,
}

impl QuizServices {
    /// Build services from an explicit source configuration.
    ///
    /// # Errors
    ///
    /// Returns `SourceError` if the live HTTP client cannot be constructed.
    pub fn from_config(config: SourceConfig) -> Result<Self, SourceError> {
        Ok(Self::with_source(build_source(config)?))
    }

    #[must_use]
    pub fn with_source(source: Arc<dyn QuizSource>) -> Self {
        Self { source }
    }

    /// A fresh controller (and session) for one quiz view.
    #[must_use]
    pub fn quiz(&self, quiz_id: QuizId) -> QuizController {
        QuizController::new(quiz_id, Arc::clone(&self.source))
    }
}
