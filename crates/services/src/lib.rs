#![forbid(unsafe_code)]

pub mod answer_service;
pub mod app_services;
pub mod error;
pub mod question_service;
pub mod questionnaire;

pub use answer_service::AnswerService;
pub use app_services::AppServices;
pub use error::{AnswerServiceError, AppServicesError, QuestionServiceError};
pub use question_service::QuestionService;
pub use questionnaire::{AnswerBook, LoadPhase, QuestionSet, Revision, SyncStatus};
