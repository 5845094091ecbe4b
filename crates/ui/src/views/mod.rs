mod question_step;
mod questionnaire;
mod state;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use question_step::DynamicQuestionStep;
pub use questionnaire::{CompleteView, QuestionnaireView};
pub use state::{ViewError, ViewState, view_state_from_flags};
