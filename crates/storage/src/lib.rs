#![forbid(unsafe_code)]

pub mod http;
pub mod repository;

pub use http::{HttpApi, HttpApiConfig, HttpInitError};
pub use repository::{
    AnswerRepository, ApiError, CallCounts, Endpoint, InMemoryRepository, QuestionRepository,
    Storage,
};
