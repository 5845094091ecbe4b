use crate::model::{Answers, QuestionType, QuestionWithOptions};

/// Non-empty check per question type. `VALUE` answers are trimmed first.
#[must_use]
pub fn is_answered(question_type: QuestionType, value: &str) -> bool {
    match question_type {
        QuestionType::Value => !value.trim().is_empty(),
        QuestionType::SingleChoice | QuestionType::MultiChoice => !value.is_empty(),
    }
}

/// True when every visible question has a recorded answer and nothing outside
/// the form forces navigation off.
#[must_use]
pub fn can_proceed(
    visible: &[&QuestionWithOptions],
    answers: &Answers,
    next_disabled: bool,
) -> bool {
    !next_disabled
        && visible
            .iter()
            .all(|question| is_answered(question.question_type(), answers.value(question.id())))
}
