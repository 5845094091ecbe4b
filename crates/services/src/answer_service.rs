use std::sync::Arc;

use stepform_core::model::{AnswerUpsert, Answers, CalculationId};
use storage::AnswerRepository;

use crate::error::AnswerServiceError;

/// Reads and writes the answers of a calculation in the remote store.
#[derive(Clone)]
pub struct AnswerService {
    answers: Arc<dyn AnswerRepository>,
}

impl AnswerService {
    #[must_use]
    pub fn new(answers: Arc<dyn AnswerRepository>) -> Self {
        Self { answers }
    }

    /// Answers already recorded for `calculation_id`, keyed by question.
    ///
    /// Records without a question or a text value are skipped.
    ///
    /// # Errors
    ///
    /// Returns `AnswerServiceError` if the remote call fails.
    pub async fn load(&self, calculation_id: CalculationId) -> Result<Answers, AnswerServiceError> {
        let records = self.answers.answers_by_calculation(calculation_id).await?;
        let answers = Answers::from_records(&records);
        tracing::debug!(
            %calculation_id,
            records = records.len(),
            answers = answers.len(),
            "answers loaded"
        );
        Ok(answers)
    }

    /// Upsert one answer; the remote store keeps the last write.
    ///
    /// # Errors
    ///
    /// Returns `AnswerServiceError` if the remote call fails.
    pub async fn save(&self, answer: &AnswerUpsert) -> Result<(), AnswerServiceError> {
        self.answers.upsert_answer(answer).await?;
        Ok(())
    }
}
