use std::sync::Arc;

use storage::{HttpApiConfig, Storage};

use crate::answer_service::AnswerService;
use crate::error::AppServicesError;
use crate::question_service::QuestionService;

/// Assembles the app-facing services over one storage backend.
#[derive(Clone)]
pub struct AppServices {
    questions: Arc<QuestionService>,
    answers: Arc<AnswerService>,
}

impl AppServices {
    /// Build services backed by the remote HTTP API.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the HTTP client cannot be built.
    pub fn new_http(config: &HttpApiConfig) -> Result<Self, AppServicesError> {
        let storage = Storage::http(config)?;
        tracing::info!(base_url = %config.base_url, "using remote questionnaire API");
        Ok(Self::from_storage(&storage))
    }

    #[must_use]
    pub fn from_storage(storage: &Storage) -> Self {
        Self {
            questions: Arc::new(QuestionService::new(Arc::clone(&storage.questions))),
            answers: Arc::new(AnswerService::new(Arc::clone(&storage.answers))),
        }
    }

    #[must_use]
    pub fn questions(&self) -> Arc<QuestionService> {
        Arc::clone(&self.questions)
    }

    #[must_use]
    pub fn answers(&self) -> Arc<AnswerService> {
        Arc::clone(&self.answers)
    }
}
