use std::env;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

use crate::repository::{AnswerRepository, ApiError, Endpoint, QuestionRepository, Storage};

mod answer_repo;
mod envelope;
mod question_repo;

pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpApiConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for HttpApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl HttpApiConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Read `STEPFORM_API_URL` and `STEPFORM_HTTP_TIMEOUT_SECS`, falling back to defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let base_url = env::var("STEPFORM_API_URL")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.into());
        let timeout = env::var("STEPFORM_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|value| value.trim().parse::<u64>().ok())
            .map_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS), Duration::from_secs);
        Self { base_url, timeout }
    }
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HttpInitError {
    #[error("invalid API base URL {raw}: {source}")]
    InvalidBaseUrl {
        raw: String,
        #[source]
        source: url::ParseError,
    },
    #[error(transparent)]
    Client(#[from] reqwest::Error),
}

/// Remote store reached over the questionnaire's JSON HTTP API.
#[derive(Clone)]
pub struct HttpApi {
    client: Client,
    base_url: String,
}

impl HttpApi {
    /// Build a client for the API at `config.base_url`.
    ///
    /// # Errors
    ///
    /// Returns `HttpInitError` if the base URL does not parse or the client cannot be built.
    pub fn new(config: &HttpApiConfig) -> Result<Self, HttpInitError> {
        let base_url = config.base_url.trim().trim_end_matches('/').to_string();
        Url::parse(&base_url).map_err(|source| HttpInitError::InvalidBaseUrl {
            raw: config.base_url.clone(),
            source,
        })?;
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, base_url })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Endpoint URL with percent-encoded query parameters.
    pub(crate) fn endpoint_url(
        &self,
        endpoint: Endpoint,
        query: &[(&str, &str)],
    ) -> Result<Url, ApiError> {
        let raw = format!("{}/{}", self.base_url, endpoint.path());
        let parsed = if query.is_empty() {
            Url::parse(&raw)
        } else {
            Url::parse_with_params(&raw, query)
        };
        parsed.map_err(|e| {
            tracing::warn!(%raw, error = %e, "could not build request url");
            ApiError::Transport(endpoint.fallback_message().to_string())
        })
    }

    pub(crate) async fn get_envelope<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        url: Url,
    ) -> Result<T, ApiError> {
        tracing::debug!(%url, "GET");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| transport_error(endpoint, &e))?;
        read_envelope(endpoint, response).await
    }

    pub(crate) async fn post_envelope<B, T>(
        &self,
        endpoint: Endpoint,
        url: Url,
        body: &B,
    ) -> Result<T, ApiError>
    where
        B: serde::Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        tracing::debug!(%url, "POST");
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| transport_error(endpoint, &e))?;
        read_envelope(endpoint, response).await
    }
}

// Envelopes are read whatever the status code: APIs report failures in the body too.
async fn read_envelope<T: DeserializeOwned>(
    endpoint: Endpoint,
    response: reqwest::Response,
) -> Result<T, ApiError> {
    let status = response.status();
    response.json::<T>().await.map_err(|e| {
        tracing::warn!(?endpoint, %status, error = %e, "unreadable response envelope");
        ApiError::Transport(endpoint.fallback_message().to_string())
    })
}

fn transport_error(endpoint: Endpoint, error: &reqwest::Error) -> ApiError {
    tracing::warn!(?endpoint, %error, "request failed");
    ApiError::Transport(endpoint.fallback_message().to_string())
}

impl Storage {
    /// Build a `Storage` backed by the HTTP API.
    ///
    /// # Errors
    ///
    /// Returns `HttpInitError` if the client cannot be configured.
    pub fn http(config: &HttpApiConfig) -> Result<Self, HttpInitError> {
        let api = HttpApi::new(config)?;
        let questions: Arc<dyn QuestionRepository> = Arc::new(api.clone());
        let answers: Arc<dyn AnswerRepository> = Arc::new(api);
        Ok(Self { questions, answers })
    }
}
