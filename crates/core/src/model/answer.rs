use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::ids::{AnswerId, CalculationId, EmissionFactorId, QuestionId};
use crate::model::question::IdRef;

/// An answer record as the remote store returns it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationAnswer {
    #[serde(default)]
    pub id: Option<AnswerId>,
    #[serde(default)]
    pub calculation: Option<IdRef<CalculationId>>,
    #[serde(default)]
    pub question: Option<IdRef<QuestionId>>,
    /// Flat fallback some endpoints send instead of the nested `question`.
    #[serde(default)]
    pub question_id: Option<QuestionId>,
    #[serde(default)]
    pub value_text: Option<String>,
    #[serde(default)]
    pub emission_factor_id: Option<EmissionFactorId>,
}

impl CalculationAnswer {
    /// The owning question, preferring the nested reference.
    #[must_use]
    pub fn owning_question(&self) -> Option<QuestionId> {
        self.question.map(|question| question.id).or(self.question_id)
    }
}

/// Insert-or-update request keyed by (calculation, question).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerUpsert {
    pub calculation: IdRef<CalculationId>,
    pub question: IdRef<QuestionId>,
    pub value_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emission_factor_id: Option<EmissionFactorId>,
}

impl AnswerUpsert {
    #[must_use]
    pub fn new(
        calculation_id: CalculationId,
        question_id: QuestionId,
        value_text: impl Into<String>,
    ) -> Self {
        Self {
            calculation: IdRef::new(calculation_id),
            question: IdRef::new(question_id),
            value_text: value_text.into(),
            emission_factor_id: None,
        }
    }

    #[must_use]
    pub fn with_emission_factor(mut self, emission_factor_id: Option<EmissionFactorId>) -> Self {
        self.emission_factor_id = emission_factor_id;
        self
    }

    #[must_use]
    pub fn calculation_id(&self) -> CalculationId {
        self.calculation.id
    }

    #[must_use]
    pub fn question_id(&self) -> QuestionId {
        self.question.id
    }
}

/// Answer text per question; one answer per question, last write wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Answers(BTreeMap<QuestionId, String>);

impl Answers {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Project stored records, skipping ones without a question or a text value.
    #[must_use]
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a CalculationAnswer>) -> Self {
        let mut answers = Self::new();
        for record in records {
            if let (Some(question_id), Some(value)) =
                (record.owning_question(), record.value_text.as_ref())
            {
                answers.set(question_id, value.clone());
            }
        }
        answers
    }

    /// The recorded value, or `""` when the question is unanswered.
    #[must_use]
    pub fn value(&self, question_id: QuestionId) -> &str {
        self.0.get(&question_id).map_or("", String::as_str)
    }

    pub fn set(&mut self, question_id: QuestionId, value: impl Into<String>) {
        self.0.insert(question_id, value.into());
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (QuestionId, &str)> {
        self.0.iter().map(|(id, value)| (*id, value.as_str()))
    }
}

impl FromIterator<(QuestionId, String)> for Answers {
    fn from_iter<I: IntoIterator<Item = (QuestionId, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
