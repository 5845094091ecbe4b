use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validated step code (trimmed, non-empty).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StepCode(String);

impl StepCode {
    /// Create a validated step code.
    ///
    /// # Errors
    ///
    /// Returns `StepError::EmptyCode` if the code is empty after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, StepError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(StepError::EmptyCode);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Like [`StepCode::new`], mapping a blank code to `None` ("no active step").
    #[must_use]
    pub fn parse_optional(value: &str) -> Option<Self> {
        Self::new(value).ok()
    }

    /// Split a comma-separated list, dropping blank entries.
    #[must_use]
    pub fn parse_list(value: &str) -> Vec<Self> {
        value.split(',').filter_map(Self::parse_optional).collect()
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for StepCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for StepCode {
    type Error = StepError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<StepCode> for String {
    fn from(code: StepCode) -> Self {
        code.0
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StepError {
    #[error("step code cannot be empty")]
    EmptyCode,
}
