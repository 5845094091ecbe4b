//! Signal-backed hooks that keep the active step's questions and the
//! calculation's answers in sync with the remote store.

mod answers;
mod questions;

pub use answers::{AnswersHandle, use_calculation_answers};
pub use questions::{QuestionsHandle, use_questions_by_step};
