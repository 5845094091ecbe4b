use std::collections::BTreeMap;
use std::sync::Arc;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use services::{AnswerService, AppServices, QuestionService};
use stepform_core::model::{
    Answers, CalculationId, OptionId, Question, QuestionId, QuestionOption, QuestionType,
    QuestionWithOptions, StepCode,
};
use storage::{InMemoryRepository, Storage};

use crate::context::{UiApp, build_app_context};
use crate::views::questionnaire::QuestionnaireTestHandles;
use crate::views::{CompleteView, DynamicQuestionStep, QuestionnaireView};

#[derive(Clone)]
struct TestApp {
    services: AppServices,
    steps: Vec<StepCode>,
    calculation_id: Option<CalculationId>,
}

impl UiApp for TestApp {
    fn question_service(&self) -> Arc<QuestionService> {
        self.services.questions()
    }

    fn answer_service(&self) -> Arc<AnswerService> {
        self.services.answers()
    }

    fn steps(&self) -> Vec<StepCode> {
        self.steps.clone()
    }

    fn calculation_id(&self) -> Option<CalculationId> {
        self.calculation_id
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Questionnaire,
    Complete,
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
    handles: QuestionnaireTestHandles,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.view);
    use_context_provider(|| props.handles.clone());
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    let view = use_context::<ViewKind>();
    match view {
        ViewKind::Questionnaire => rsx! { QuestionnaireView {} },
        ViewKind::Complete => rsx! { CompleteView {} },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub repo: InMemoryRepository,
    pub handles: QuestionnaireTestHandles,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    /// Drive effects, spawned fetches and the re-renders they trigger.
    pub async fn settle(&mut self) {
        for _ in 0..6 {
            self.drive_async().await;
        }
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub fn setup_view_harness(
    view: ViewKind,
    repo: InMemoryRepository,
    steps: &[&str],
    calculation_id: Option<u64>,
) -> ViewHarness {
    let services = AppServices::from_storage(&Storage::from_in_memory(&repo));
    let app = Arc::new(TestApp {
        services,
        steps: steps
            .iter()
            .map(|code| StepCode::new(*code).expect("step code"))
            .collect(),
        calculation_id: calculation_id.map(CalculationId::new),
    });
    let handles = QuestionnaireTestHandles::default();

    let dom = VirtualDom::new_with_props(
        ViewRouterHarness,
        ViewHarnessProps {
            app,
            view,
            handles: handles.clone(),
        },
    );

    ViewHarness { dom, repo, handles }
}

// ─── STEP RENDERER ─────────────────────────────────────────────────────────────

#[derive(Props, Clone, PartialEq, Default)]
pub struct StepHarnessProps {
    pub questions: Vec<QuestionWithOptions>,
    pub loading: bool,
    pub error: Option<String>,
    pub answers: Answers,
    pub answer_errors: BTreeMap<QuestionId, String>,
    pub next_disabled: bool,
}

#[component]
fn StepHarness(props: StepHarnessProps) -> Element {
    rsx! {
        DynamicQuestionStep {
            questions: props.questions.clone(),
            loading: props.loading,
            error: props.error.clone(),
            answers: props.answers.clone(),
            answer_errors: props.answer_errors.clone(),
            next_disabled: props.next_disabled,
            on_answer: |_: (QuestionId, String)| {},
            on_back: |_: ()| {},
            on_next: |_: ()| {},
        }
    }
}

pub fn render_step(props: StepHarnessProps) -> String {
    let mut dom = VirtualDom::new_with_props(StepHarness, props);
    dom.rebuild_in_place();
    drive_dom(&mut dom);
    dioxus_ssr::render(&dom)
}

// ─── FIXTURES ──────────────────────────────────────────────────────────────────

pub fn question(
    id: u64,
    code: &str,
    question_type: QuestionType,
    step: &str,
    order: i32,
) -> Question {
    Question {
        id: QuestionId::new(id),
        code: code.into(),
        question_type,
        label: format!("{code} label"),
        help_text: None,
        step_code: step.into(),
        sort_order: order,
    }
}

pub fn option(id: u64, code: &str, order: i32) -> QuestionOption {
    QuestionOption {
        id: OptionId::new(id),
        code: code.into(),
        label: format!("{code} option"),
        sort_order: order,
        question: None,
    }
}

/// Step `S1`: AGE (VALUE) then COLOR (SINGLE_CHOICE, options RED/BLUE stored out of order).
pub fn step_one_questions() -> Vec<QuestionWithOptions> {
    vec![
        QuestionWithOptions::without_options(question(1, "AGE", QuestionType::Value, "S1", 1)),
        QuestionWithOptions::new(
            question(2, "COLOR", QuestionType::SingleChoice, "S1", 2),
            vec![option(11, "RED", 2), option(10, "BLUE", 1)],
        ),
    ]
}

pub fn seeded_repo() -> InMemoryRepository {
    let repo = InMemoryRepository::new();
    for question in step_one_questions() {
        repo.insert_options(question.id(), question.options.clone());
        repo.insert_question(question.question);
    }
    repo.insert_question(question(3, "TONNES", QuestionType::Value, "S2", 1));
    repo
}
