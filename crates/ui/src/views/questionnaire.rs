#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::rc::Rc;

use dioxus::prelude::*;
use dioxus_router::{Link, use_navigator};
use services::LoadPhase;
use stepform_core::model::QuestionId;

use crate::context::AppContext;
use crate::hooks::{use_calculation_answers, use_questions_by_step};
#[cfg(test)]
use crate::hooks::{AnswersHandle, QuestionsHandle};
use crate::routes::Route;
use crate::views::DynamicQuestionStep;

/// Walks the configured steps with Back/Next and completes on the last one.
#[component]
pub fn QuestionnaireView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let steps = ctx.steps();
    let rules = ctx.visibility_rules();

    let mut step_index = use_signal(|| 0_usize);
    let mut step = use_signal({
        let steps = steps.clone();
        move || steps.first().cloned()
    });
    let calculation = use_signal(|| ctx.calculation_id());

    let questions = use_questions_by_step(step);
    let answers = use_calculation_answers(calculation);

    #[cfg(test)]
    {
        let mut registered = use_signal(|| false);
        if !registered() {
            registered.set(true);
            if let Some(handles) = try_consume_context::<QuestionnaireTestHandles>() {
                handles.register(questions, answers);
            }
        }
    }

    let total = steps.len();
    let on_back = use_callback({
        let steps = steps.clone();
        move |()| {
            let current = step_index();
            if current == 0 {
                return;
            }
            step_index.set(current - 1);
            step.set(steps.get(current - 1).cloned());
        }
    });
    let on_next = use_callback({
        let steps = steps.clone();
        move |()| {
            let next = step_index() + 1;
            if next >= total {
                let _ = navigator.push(Route::Complete {});
                return;
            }
            step_index.set(next);
            step.set(steps.get(next).cloned());
        }
    });

    if steps.is_empty() {
        return rsx! {
            div { class: "page",
                h2 { "Questionnaire" }
                p { "No steps configured." }
            }
        };
    }

    let index = step_index();
    let position = index + 1;
    let title = step
        .read()
        .as_ref()
        .map_or_else(String::new, ToString::to_string);
    let empty_step = questions.phase() == LoadPhase::Ready && questions.questions().is_empty();

    rsx! {
        div { class: "page questionnaire",
            header { class: "questionnaire__header",
                h2 { "{title}" }
                span { class: "questionnaire__progress", "Step {position} of {total}" }
            }
            if calculation.read().is_none() {
                p { class: "questionnaire__notice",
                    "No calculation selected; answers are not saved."
                }
            }
            if let Some(error) = answers.error() {
                p { class: "questionnaire__error", role: "alert", "{error}" }
            }
            DynamicQuestionStep {
                questions: questions.questions(),
                loading: questions.loading(),
                error: questions.error(),
                answers: answers.answers(),
                answer_errors: answers.errors(),
                rules: (*rules).clone(),
                on_answer: move |(question_id, value): (QuestionId, String)| {
                    answers.set_answer(question_id, value, None);
                },
                on_value_change: move |(code, value): (String, String)| {
                    tracing::debug!(question = %code, %value, "value changed");
                },
                on_option_select: move |(code, option): (String, String)| {
                    tracing::debug!(question = %code, %option, "option selected");
                },
                on_back,
                on_next,
            }
            if empty_step {
                div { class: "question-step__nav questionnaire__empty",
                    p { "This step has no questions." }
                    button {
                        class: "question-step__back",
                        r#type: "button",
                        onclick: move |_| on_back.call(()),
                        "Back"
                    }
                    button {
                        class: "question-step__next",
                        r#type: "button",
                        onclick: move |_| on_next.call(()),
                        "Next"
                    }
                }
            }
            if questions.error().is_some() {
                button {
                    class: "questionnaire__retry",
                    r#type: "button",
                    onclick: move |_| questions.refetch(),
                    "Retry"
                }
            }
        }
    }
}

/// Shown after the last step.
#[component]
pub fn CompleteView() -> Element {
    rsx! {
        div { class: "page complete",
            h2 { "All steps complete" }
            p { "Your answers have been recorded." }
            Link { class: "complete__restart", to: Route::Questionnaire {}, "Start over" }
        }
    }
}

#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct QuestionnaireTestHandles {
    questions: Rc<RefCell<Option<QuestionsHandle>>>,
    answers: Rc<RefCell<Option<AnswersHandle>>>,
}

#[cfg(test)]
impl QuestionnaireTestHandles {
    pub(crate) fn register(&self, questions: QuestionsHandle, answers: AnswersHandle) {
        *self.questions.borrow_mut() = Some(questions);
        *self.answers.borrow_mut() = Some(answers);
    }

    pub(crate) fn questions(&self) -> QuestionsHandle {
        (*self.questions.borrow()).expect("questions handle registered")
    }

    pub(crate) fn answers(&self) -> AnswersHandle {
        (*self.answers.borrow()).expect("answers handle registered")
    }
}
