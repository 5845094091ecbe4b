mod answer;
mod ids;
mod question;
mod step;

pub use answer::{Answers, AnswerUpsert, CalculationAnswer};
pub use ids::{AnswerId, CalculationId, EmissionFactorId, OptionId, ParseIdError, QuestionId};
pub use question::{IdRef, Question, QuestionOption, QuestionType, QuestionWithOptions};
pub use step::{StepCode, StepError};
