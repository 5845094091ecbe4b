//! Response envelopes and their interpretation.
//!
//! Every endpoint answers `{ success, <payload>?, count?, message? }`.

use serde::Deserialize;
use stepform_core::model::{CalculationAnswer, Question, QuestionOption};

use crate::repository::{ApiError, Endpoint};

/// What to do when `success: true` arrives without the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MissingPayload {
    Reject,
    Empty,
}

/// Fields shared by every envelope.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct Status {
    #[serde(default)]
    pub(crate) success: Option<bool>,
    #[serde(default)]
    pub(crate) message: Option<String>,
}

impl Status {
    fn check(&self, endpoint: Endpoint) -> Result<(), ApiError> {
        match self.success {
            Some(true) => Ok(()),
            Some(false) => Err(ApiError::Rejected(self.message_or_default(endpoint))),
            None => Err(ApiError::Malformed(self.message_or_default(endpoint))),
        }
    }

    fn message_or_default(&self, endpoint: Endpoint) -> String {
        self.message
            .clone()
            .unwrap_or_else(|| endpoint.fallback_message().to_string())
    }
}

fn unwrap_list<T>(
    status: &Status,
    list: Option<Vec<T>>,
    endpoint: Endpoint,
    missing: MissingPayload,
) -> Result<Vec<T>, ApiError> {
    status.check(endpoint)?;
    match (list, missing) {
        (Some(list), _) => Ok(list),
        (None, MissingPayload::Empty) => Ok(Vec::new()),
        (None, MissingPayload::Reject) => {
            Err(ApiError::Malformed(status.message_or_default(endpoint)))
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct QuestionsEnvelope {
    #[serde(flatten)]
    pub(crate) status: Status,
    #[serde(default)]
    pub(crate) questions: Option<Vec<Question>>,
    #[serde(default)]
    pub(crate) count: Option<u64>,
}

impl QuestionsEnvelope {
    pub(crate) fn into_questions(self, endpoint: Endpoint) -> Result<Vec<Question>, ApiError> {
        unwrap_list(&self.status, self.questions, endpoint, MissingPayload::Reject)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct QuestionOptionsEnvelope {
    #[serde(flatten)]
    pub(crate) status: Status,
    #[serde(default)]
    pub(crate) question_options: Option<Vec<QuestionOption>>,
    #[serde(default)]
    pub(crate) count: Option<u64>,
}

impl QuestionOptionsEnvelope {
    pub(crate) fn into_options(self) -> Result<Vec<QuestionOption>, ApiError> {
        unwrap_list(
            &self.status,
            self.question_options,
            Endpoint::QuestionOptions,
            MissingPayload::Empty,
        )
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AnswersEnvelope {
    #[serde(flatten)]
    pub(crate) status: Status,
    #[serde(default)]
    pub(crate) calculation_answers: Option<Vec<CalculationAnswer>>,
    #[serde(default)]
    pub(crate) count: Option<u64>,
}

impl AnswersEnvelope {
    pub(crate) fn into_answers(self) -> Result<Vec<CalculationAnswer>, ApiError> {
        unwrap_list(
            &self.status,
            self.calculation_answers,
            Endpoint::AnswersByCalculation,
            MissingPayload::Reject,
        )
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpsertEnvelope {
    #[serde(flatten)]
    pub(crate) status: Status,
    #[serde(default)]
    pub(crate) calculation_answer: Option<CalculationAnswer>,
}

impl UpsertEnvelope {
    pub(crate) fn into_result(self) -> Result<Option<CalculationAnswer>, ApiError> {
        self.status.check(Endpoint::UpsertAnswer)?;
        Ok(self.calculation_answer)
    }
}
