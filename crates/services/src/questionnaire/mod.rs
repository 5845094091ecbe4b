//! Client-side state of the questionnaire: the active step's questions and
//! the calculation's answers, both guarded against stale async results.

mod answer_book;
mod step_state;

pub use answer_book::{AnswerBook, Revision, SyncStatus};
pub use step_state::{LoadPhase, QuestionSet};
