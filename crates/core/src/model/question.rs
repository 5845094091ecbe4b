use serde::{Deserialize, Serialize};

use crate::model::ids::{OptionId, QuestionId};

/// How a question is answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuestionType {
    /// Free-text or numeric input.
    Value,
    SingleChoice,
    /// Rendered as a single select, like `SingleChoice`.
    MultiChoice,
}

impl QuestionType {
    /// Choice questions need their options resolved before rendering.
    #[must_use]
    pub const fn requires_options(self) -> bool {
        matches!(self, Self::SingleChoice | Self::MultiChoice)
    }

    /// Wire name, as the API spells it.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Value => "VALUE",
            Self::SingleChoice => "SINGLE_CHOICE",
            Self::MultiChoice => "MULTI_CHOICE",
        }
    }
}

impl std::fmt::Display for QuestionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reference to another entity by id, as the API nests it (`{ "id": 3 }`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IdRef<T> {
    pub id: T,
}

impl<T> IdRef<T> {
    #[must_use]
    pub const fn new(id: T) -> Self {
        Self { id }
    }
}

/// A question definition. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: QuestionId,
    pub code: String,
    pub question_type: QuestionType,
    pub label: String,
    #[serde(default)]
    pub help_text: Option<String>,
    pub step_code: String,
    pub sort_order: i32,
}

/// A selectable option of a choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionOption {
    pub id: OptionId,
    pub code: String,
    pub label: String,
    pub sort_order: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question: Option<IdRef<QuestionId>>,
}

/// A question together with its resolved options (empty for `VALUE`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionWithOptions {
    pub question: Question,
    pub options: Vec<QuestionOption>,
}

impl QuestionWithOptions {
    #[must_use]
    pub fn new(question: Question, options: Vec<QuestionOption>) -> Self {
        Self { question, options }
    }

    /// A question that needs no options.
    #[must_use]
    pub fn without_options(question: Question) -> Self {
        Self::new(question, Vec::new())
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.question.id
    }

    #[must_use]
    pub fn code(&self) -> &str {
        &self.question.code
    }

    #[must_use]
    pub fn question_type(&self) -> QuestionType {
        self.question.question_type
    }

    /// Options in ascending sort order; ties keep fetch order.
    #[must_use]
    pub fn sorted_options(&self) -> Vec<&QuestionOption> {
        let mut options: Vec<&QuestionOption> = self.options.iter().collect();
        options.sort_by_key(|option| option.sort_order);
        options
    }
}
