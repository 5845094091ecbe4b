use std::collections::BTreeMap;

use dioxus::prelude::*;
use stepform_core::VisibilityRules;
use stepform_core::model::{Answers, QuestionId, QuestionWithOptions};

use crate::views::{ViewState, view_state_from_flags};
use crate::vm::{ControlVm, OptionVm, QuestionVm, map_step_form};

/// Renders one step's question set with Back/Next navigation.
///
/// Visibility and the "can proceed" gate are computed from `answers` on every
/// render. Every edit emits `on_answer`; text edits also emit
/// `on_value_change(code, value)` and option picks `on_option_select(code, option)`.
#[component]
pub fn DynamicQuestionStep(
    questions: Vec<QuestionWithOptions>,
    loading: bool,
    error: Option<String>,
    answers: Answers,
    #[props(default)] answer_errors: BTreeMap<QuestionId, String>,
    #[props(default = VisibilityRules::builtin())] rules: VisibilityRules,
    on_answer: EventHandler<(QuestionId, String)>,
    on_value_change: Option<EventHandler<(String, String)>>,
    on_option_select: Option<EventHandler<(String, String)>>,
    on_back: EventHandler<()>,
    on_next: EventHandler<()>,
    #[props(default)] next_disabled: bool,
) -> Element {
    match view_state_from_flags(loading, error, questions) {
        ViewState::Loading => rsx! {
            div { class: "question-step__loading", role: "status",
                div { class: "spinner" }
                span { "Loading questions..." }
            }
        },
        ViewState::Error(err) => rsx! {
            p { class: "question-step__error", role: "alert", "{err.message()}" }
        },
        ViewState::Ready(questions) if questions.is_empty() => rsx! {},
        ViewState::Ready(questions) => {
            let form = map_step_form(&questions, &answers, &answer_errors, &rules, next_disabled);
            let can_proceed = form.can_proceed;
            rsx! {
                div { class: "question-step", "data-can-proceed": "{can_proceed}",
                    for question in form.questions {
                        QuestionField {
                            key: "{question.id}",
                            question,
                            on_answer,
                            on_value_change,
                            on_option_select,
                        }
                    }
                    div { class: "question-step__nav",
                        button {
                            class: "question-step__back",
                            id: "question-step-back",
                            r#type: "button",
                            onclick: move |_| on_back.call(()),
                            "Back"
                        }
                        button {
                            class: "question-step__next",
                            id: "question-step-next",
                            r#type: "button",
                            disabled: !can_proceed,
                            onclick: move |_| on_next.call(()),
                            "Next"
                        }
                    }
                }
            }
        }
    }
}

fn emit_value_change(
    question_id: QuestionId,
    question_code: &str,
    value: String,
    on_answer: EventHandler<(QuestionId, String)>,
    on_value_change: Option<EventHandler<(String, String)>>,
) {
    on_answer.call((question_id, value.clone()));
    if let Some(handler) = on_value_change {
        handler.call((question_code.to_string(), value));
    }
}

/// Choice answers record the option code, never its label.
fn emit_option_select(
    question_id: QuestionId,
    question_code: &str,
    option: &OptionVm,
    on_answer: EventHandler<(QuestionId, String)>,
    on_option_select: Option<EventHandler<(String, String)>>,
) {
    on_answer.call((question_id, option.code.clone()));
    if let Some(handler) = on_option_select {
        handler.call((question_code.to_string(), option.code.clone()));
    }
}

#[component]
fn QuestionField(
    question: QuestionVm,
    on_answer: EventHandler<(QuestionId, String)>,
    on_value_change: Option<EventHandler<(String, String)>>,
    on_option_select: Option<EventHandler<(String, String)>>,
) -> Element {
    let input_id = question.input_id();
    let QuestionVm {
        id,
        code,
        label,
        help_text,
        control,
        error,
    } = question;

    match control {
        ControlVm::Text { value } => {
            let question_code = code.clone();
            let on_input = move |evt: FormEvent| {
                emit_value_change(id, &question_code, evt.value(), on_answer, on_value_change);
            };
            rsx! {
                div { class: "question question--value", "data-question-code": "{code}",
                    label { class: "question__label", r#for: "{input_id}", "{label}" }
                    if let Some(help) = help_text {
                        p { class: "question__help", "{help}" }
                    }
                    input {
                        id: "{input_id}",
                        class: "question__input",
                        r#type: "text",
                        inputmode: "decimal",
                        value: "{value}",
                        oninput: on_input,
                    }
                    if let Some(error) = error {
                        p { class: "question__error", role: "alert", "{error}" }
                    }
                }
            }
        }
        ControlVm::Select { options } => rsx! {
            fieldset { class: "question question--choice", "data-question-code": "{code}",
                legend { class: "question__label", "{label}" }
                if let Some(help) = help_text {
                    p { class: "question__help", "{help}" }
                }
                div { class: "question__options", role: "radiogroup",
                    for option in options {
                        ChoiceOption {
                            key: "{option.code}",
                            question_id: id,
                            question_code: code.clone(),
                            option,
                            on_answer,
                            on_option_select,
                        }
                    }
                }
                if let Some(error) = error {
                    p { class: "question__error", role: "alert", "{error}" }
                }
            }
        },
    }
}

#[component]
fn ChoiceOption(
    question_id: QuestionId,
    question_code: String,
    option: OptionVm,
    on_answer: EventHandler<(QuestionId, String)>,
    on_option_select: Option<EventHandler<(String, String)>>,
) -> Element {
    let input_id = format!("question-{question_id}-{}", option.code);
    let picked = option.clone();
    let on_change = move |_: FormEvent| {
        emit_option_select(question_id, &question_code, &picked, on_answer, on_option_select);
    };

    rsx! {
        label { class: "question__option", r#for: "{input_id}",
            input {
                id: "{input_id}",
                r#type: "radio",
                name: "question-{question_id}",
                value: "{option.code}",
                checked: option.selected,
                onchange: on_change,
            }
            span { "{option.label}" }
        }
    }
}
