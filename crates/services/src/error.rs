//! Shared error types for the services crate.

use thiserror::Error;

use storage::{ApiError, HttpInitError};

/// Errors emitted by `QuestionService`.
///
/// Displays as the underlying human-readable message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionServiceError {
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Errors emitted by `AnswerService`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AnswerServiceError {
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Http(#[from] HttpInitError),
}
