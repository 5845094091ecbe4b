//! Declarative conditional visibility of questions.
//!
//! A rule ties a dependent question to a controlling question: the dependent
//! question is shown only while the controller's recorded answer equals the
//! rule's required value. Questions named by no rule are always visible.

use serde::{Deserialize, Serialize};

use crate::model::{Answers, QuestionWithOptions};

//
// ─── RULES ─────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VisibilityRule {
    /// Code of the question being shown or hidden.
    pub dependent: String,
    /// Code of the question whose answer decides.
    pub controller: String,
    pub required_value: String,
}

impl VisibilityRule {
    #[must_use]
    pub fn new(
        dependent: impl Into<String>,
        controller: impl Into<String>,
        required_value: impl Into<String>,
    ) -> Self {
        Self {
            dependent: dependent.into(),
            controller: controller.into(),
            required_value: required_value.into(),
        }
    }

    fn is_satisfied(&self, questions: &[QuestionWithOptions], answers: &Answers) -> bool {
        questions
            .iter()
            .find(|question| question.code() == self.controller)
            .is_some_and(|controller| answers.value(controller.id()) == self.required_value)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VisibilityRules(Vec<VisibilityRule>);

impl VisibilityRules {
    /// No conditional questions: everything is visible.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// The rules the production questionnaire ships with.
    #[must_use]
    pub fn builtin() -> Self {
        Self(vec![VisibilityRule::new(
            "ALU_ANODE_CARBON_PERCENT",
            "ALU_HAS_CARBON_PERCENT",
            "YES",
        )])
    }

    #[must_use]
    pub fn with_rule(mut self, rule: VisibilityRule) -> Self {
        self.0.push(rule);
        self
    }

    #[must_use]
    pub fn rules(&self) -> &[VisibilityRule] {
        &self.0
    }

    /// Whether `question` is shown given the current question set and answers.
    ///
    /// A question that is the dependent of several rules needs all of them.
    /// A missing controller hides its dependent.
    #[must_use]
    pub fn is_visible(
        &self,
        question: &QuestionWithOptions,
        questions: &[QuestionWithOptions],
        answers: &Answers,
    ) -> bool {
        self.0
            .iter()
            .filter(|rule| rule.dependent == question.code())
            .all(|rule| rule.is_satisfied(questions, answers))
    }

    /// The visible subset of `questions`, in their original order.
    #[must_use]
    pub fn visible<'a>(
        &self,
        questions: &'a [QuestionWithOptions],
        answers: &Answers,
    ) -> Vec<&'a QuestionWithOptions> {
        questions
            .iter()
            .filter(|question| self.is_visible(question, questions, answers))
            .collect()
    }
}

impl FromIterator<VisibilityRule> for VisibilityRules {
    fn from_iter<I: IntoIterator<Item = VisibilityRule>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
