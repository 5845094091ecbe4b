use stepform_core::model::{AnswerUpsert, CalculationAnswer, CalculationId};

use super::HttpApi;
use super::envelope::{AnswersEnvelope, UpsertEnvelope};
use crate::repository::{AnswerRepository, ApiError, Endpoint};

#[async_trait::async_trait]
impl AnswerRepository for HttpApi {
    async fn answers_by_calculation(
        &self,
        calculation_id: CalculationId,
    ) -> Result<Vec<CalculationAnswer>, ApiError> {
        let endpoint = Endpoint::AnswersByCalculation;
        let id = calculation_id.to_string();
        let url = self.endpoint_url(endpoint, &[("calculationId", id.as_str())])?;
        let envelope: AnswersEnvelope = self.get_envelope(endpoint, url).await?;
        tracing::debug!(%calculation_id, count = ?envelope.count, "fetched answers");
        envelope.into_answers()
    }

    async fn upsert_answer(&self, answer: &AnswerUpsert) -> Result<(), ApiError> {
        let endpoint = Endpoint::UpsertAnswer;
        let url = self.endpoint_url(endpoint, &[])?;
        let envelope: UpsertEnvelope = self.post_envelope(endpoint, url, answer).await?;
        let saved = envelope.into_result()?;
        tracing::debug!(
            calculation_id = %answer.calculation_id(),
            question_id = %answer.question_id(),
            answer_id = ?saved.and_then(|record| record.id),
            "answer saved"
        );
        Ok(())
    }
}
