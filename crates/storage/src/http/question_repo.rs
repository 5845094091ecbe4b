use stepform_core::model::{Question, QuestionId, QuestionOption, StepCode};

use super::HttpApi;
use super::envelope::{QuestionOptionsEnvelope, QuestionsEnvelope};
use crate::repository::{ApiError, Endpoint, QuestionRepository};

#[async_trait::async_trait]
impl QuestionRepository for HttpApi {
    async fn all_questions(&self) -> Result<Vec<Question>, ApiError> {
        let endpoint = Endpoint::AllQuestions;
        let url = self.endpoint_url(endpoint, &[])?;
        let envelope: QuestionsEnvelope = self.get_envelope(endpoint, url).await?;
        tracing::debug!(count = ?envelope.count, "fetched all questions");
        envelope.into_questions(endpoint)
    }

    async fn questions_by_step(&self, step: &StepCode) -> Result<Vec<Question>, ApiError> {
        let endpoint = Endpoint::QuestionsByStep;
        let url = self.endpoint_url(endpoint, &[("stepCode", step.as_str())])?;
        let envelope: QuestionsEnvelope = self.get_envelope(endpoint, url).await?;
        tracing::debug!(%step, count = ?envelope.count, "fetched step questions");
        envelope.into_questions(endpoint)
    }

    async fn question_options(
        &self,
        question_id: QuestionId,
    ) -> Result<Vec<QuestionOption>, ApiError> {
        let endpoint = Endpoint::QuestionOptions;
        let id = question_id.to_string();
        let url = self.endpoint_url(endpoint, &[("questionId", id.as_str())])?;
        let envelope: QuestionOptionsEnvelope = self.get_envelope(endpoint, url).await?;
        tracing::debug!(%question_id, count = ?envelope.count, "fetched question options");
        envelope.into_options()
    }
}
