mod question_vm;
mod step_vm;

pub use question_vm::{ControlVm, OptionVm, QuestionVm, map_question_vm};
pub use step_vm::{StepFormVm, map_step_form};
