use std::collections::BTreeMap;

use stepform_core::model::{Answers, QuestionId, QuestionWithOptions};
use stepform_core::{VisibilityRules, can_proceed};

use crate::vm::question_vm::{QuestionVm, map_question_vm};

/// What one step of the form renders: its visible questions and whether
/// "next" is enabled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StepFormVm {
    pub questions: Vec<QuestionVm>,
    pub can_proceed: bool,
}

#[must_use]
pub fn map_step_form(
    questions: &[QuestionWithOptions],
    answers: &Answers,
    errors: &BTreeMap<QuestionId, String>,
    rules: &VisibilityRules,
    next_disabled: bool,
) -> StepFormVm {
    let visible = rules.visible(questions, answers);
    let can_proceed = can_proceed(&visible, answers, next_disabled);
    let questions = visible
        .into_iter()
        .map(|question| {
            map_question_vm(
                question,
                answers.value(question.id()),
                errors.get(&question.id()).map(String::as_str),
            )
        })
        .collect();
    StepFormVm {
        questions,
        can_proceed,
    }
}
