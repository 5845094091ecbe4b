use stepform_core::model::{QuestionId, QuestionType, QuestionWithOptions};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionVm {
    pub code: String,
    pub label: String,
    pub selected: bool,
}

/// The control a question renders as.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ControlVm {
    Text { value: String },
    /// Single-select radio group, also used for `MULTI_CHOICE`.
    Select { options: Vec<OptionVm> },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionVm {
    pub id: QuestionId,
    pub code: String,
    pub label: String,
    pub help_text: Option<String>,
    pub control: ControlVm,
    pub error: Option<String>,
}

impl QuestionVm {
    #[must_use]
    pub fn input_id(&self) -> String {
        format!("question-{}", self.id)
    }
}

#[must_use]
pub fn map_question_vm(
    question: &QuestionWithOptions,
    value: &str,
    error: Option<&str>,
) -> QuestionVm {
    let control = match question.question_type() {
        QuestionType::Value => ControlVm::Text {
            value: value.to_string(),
        },
        QuestionType::SingleChoice | QuestionType::MultiChoice => ControlVm::Select {
            options: question
                .sorted_options()
                .into_iter()
                .map(|option| OptionVm {
                    code: option.code.clone(),
                    label: option.label.clone(),
                    selected: !value.is_empty() && option.code == value,
                })
                .collect(),
        },
    };

    QuestionVm {
        id: question.id(),
        code: question.code().to_string(),
        label: question.question.label.clone(),
        help_text: question
            .question
            .help_text
            .clone()
            .filter(|text| !text.trim().is_empty()),
        control,
        error: error.map(str::to_string),
    }
}
