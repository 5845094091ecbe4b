use std::sync::Arc;

use futures::future::try_join_all;
use stepform_core::model::{Question, QuestionWithOptions, StepCode};
use storage::{ApiError, QuestionRepository};

use crate::error::QuestionServiceError;

/// Fetches question definitions and resolves the options of choice questions.
#[derive(Clone)]
pub struct QuestionService {
    questions: Arc<dyn QuestionRepository>,
}

impl QuestionService {
    #[must_use]
    pub fn new(questions: Arc<dyn QuestionRepository>) -> Self {
        Self { questions }
    }

    /// Every question across all steps, as the API returns them.
    ///
    /// # Errors
    ///
    /// Returns `QuestionServiceError` if the remote call fails.
    pub async fn all_questions(&self) -> Result<Vec<Question>, QuestionServiceError> {
        Ok(self.questions.all_questions().await?)
    }

    /// The question set for a step, ordered by sort order, each choice question
    /// carrying its options.
    ///
    /// Option lookups run concurrently and are awaited jointly; the first failure
    /// rejects the whole set. A step without questions makes no further calls.
    ///
    /// # Errors
    ///
    /// Returns `QuestionServiceError` if the question or any option lookup fails.
    pub async fn questions_for_step(
        &self,
        step: &StepCode,
    ) -> Result<Vec<QuestionWithOptions>, QuestionServiceError> {
        let mut questions = self.questions.questions_by_step(step).await?;
        if questions.is_empty() {
            tracing::debug!(%step, "step has no questions");
            return Ok(Vec::new());
        }
        questions.sort_by_key(|question| question.sort_order);

        let repo = &self.questions;
        let resolved = try_join_all(questions.into_iter().map(|question| async move {
            let options = if question.question_type.requires_options() {
                repo.question_options(question.id).await?
            } else {
                Vec::new()
            };
            Ok::<_, ApiError>(QuestionWithOptions::new(question, options))
        }))
        .await?;

        tracing::debug!(%step, questions = resolved.len(), "step questions resolved");
        Ok(resolved)
    }
}
