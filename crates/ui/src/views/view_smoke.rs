use std::collections::BTreeMap;

use stepform_core::model::{
    Answers, CalculationId, QuestionId, QuestionType, QuestionWithOptions,
};
use storage::{ApiError, InMemoryRepository};

use super::test_harness::{
    StepHarnessProps, ViewKind, question, render_step, seeded_repo, setup_view_harness,
    step_one_questions,
};

fn answered(pairs: &[(u64, &str)]) -> Answers {
    pairs
        .iter()
        .map(|(id, value)| (QuestionId::new(*id), (*value).to_string()))
        .collect()
}

#[test]
fn step_renders_sorted_options_and_gates_next() {
    let html = render_step(StepHarnessProps {
        questions: step_one_questions(),
        ..StepHarnessProps::default()
    });

    assert!(html.contains("AGE label"), "missing AGE in {html}");
    let blue = html.find("BLUE option").expect("BLUE rendered");
    let red = html.find("RED option").expect("RED rendered");
    assert!(blue < red, "options not sorted in {html}");
    assert!(html.contains("data-can-proceed=\"false\""), "next enabled in {html}");
    assert!(html.contains("Back"), "missing back in {html}");
}

#[test]
fn step_allows_next_once_everything_is_answered() {
    let html = render_step(StepHarnessProps {
        questions: step_one_questions(),
        answers: answered(&[(1, "30"), (2, "RED")]),
        ..StepHarnessProps::default()
    });
    assert!(html.contains("data-can-proceed=\"true\""), "next disabled in {html}");

    let html = render_step(StepHarnessProps {
        questions: step_one_questions(),
        answers: answered(&[(1, "30"), (2, "RED")]),
        next_disabled: true,
        ..StepHarnessProps::default()
    });
    assert!(html.contains("data-can-proceed=\"false\""), "override ignored in {html}");
}

#[test]
fn step_renders_loading_error_and_empty_states() {
    let html = render_step(StepHarnessProps {
        questions: step_one_questions(),
        loading: true,
        ..StepHarnessProps::default()
    });
    assert!(html.contains("Loading questions"), "missing loader in {html}");
    assert!(!html.contains("AGE label"), "questions shown while loading: {html}");

    let html = render_step(StepHarnessProps {
        error: Some("boom".into()),
        ..StepHarnessProps::default()
    });
    assert!(html.contains("boom"), "missing error in {html}");
    assert!(!html.contains("Next"), "navigation shown on error: {html}");

    let html = render_step(StepHarnessProps::default());
    assert!(!html.contains("question-step"), "empty step rendered markup: {html}");
}

#[test]
fn step_hides_dependent_until_controller_says_yes() {
    let questions = vec![
        QuestionWithOptions::without_options(question(
            1,
            "ALU_HAS_CARBON_PERCENT",
            QuestionType::SingleChoice,
            "ALU",
            1,
        )),
        QuestionWithOptions::without_options(question(
            2,
            "ALU_ANODE_CARBON_PERCENT",
            QuestionType::Value,
            "ALU",
            2,
        )),
    ];

    let html = render_step(StepHarnessProps {
        questions: questions.clone(),
        answers: answered(&[(1, "NO")]),
        ..StepHarnessProps::default()
    });
    assert!(!html.contains("ALU_ANODE_CARBON_PERCENT"), "dependent shown in {html}");
    assert!(html.contains("data-can-proceed=\"true\""), "hidden dependent gated: {html}");

    let html = render_step(StepHarnessProps {
        questions,
        answers: answered(&[(1, "YES")]),
        ..StepHarnessProps::default()
    });
    assert!(html.contains("ALU_ANODE_CARBON_PERCENT"), "dependent hidden in {html}");
    assert!(html.contains("data-can-proceed=\"false\""), "unanswered dependent passed: {html}");
}

#[test]
fn step_shows_save_error_beside_its_question() {
    let mut answer_errors = BTreeMap::new();
    answer_errors.insert(QuestionId::new(1), "Failed to save answer".to_string());

    let html = render_step(StepHarnessProps {
        questions: step_one_questions(),
        answers: answered(&[(1, "42")]),
        answer_errors,
        ..StepHarnessProps::default()
    });
    let age = html.find("AGE label").expect("AGE rendered");
    let error = html.find("Failed to save answer").expect("error rendered");
    let color = html.find("COLOR label").expect("COLOR rendered");
    assert!(age < error && error < color, "error not beside AGE in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn questionnaire_loads_first_step_and_persists_answers() {
    let mut harness =
        setup_view_harness(ViewKind::Questionnaire, seeded_repo(), &["S1", "S2"], Some(7));
    harness.rebuild();
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("Step 1 of 2"), "missing progress in {html}");
    assert!(html.contains("COLOR label"), "missing questions in {html}");
    assert!(html.contains("data-can-proceed=\"false\""), "next enabled in {html}");

    let answers = harness.handles.answers();
    harness.dom.in_runtime(|| {
        answers.set_answer(QuestionId::new(1), "30", None);
        answers.set_answer(QuestionId::new(2), "RED", None);
    });
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("data-can-proceed=\"true\""), "next still disabled in {html}");
    let stored = harness
        .repo
        .stored_answer(CalculationId::new(7), QuestionId::new(2))
        .expect("answer persisted");
    assert_eq!(stored.value_text.as_deref(), Some("RED"));
}

#[tokio::test(flavor = "current_thread")]
async fn questionnaire_keeps_value_when_save_fails() {
    let repo = seeded_repo();
    repo.fail_next_upsert(ApiError::Rejected("Failed to save answer".into()));
    let mut harness = setup_view_harness(ViewKind::Questionnaire, repo, &["S1"], Some(7));
    harness.rebuild();
    harness.settle().await;

    let answers = harness.handles.answers();
    harness
        .dom
        .in_runtime(|| answers.set_answer(QuestionId::new(1), "42", None));
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("Failed to save answer"), "missing error in {html}");
    let (value, error) = harness.dom.in_runtime(|| {
        (
            answers.get_answer(QuestionId::new(1)),
            answers.error_for(QuestionId::new(1)),
        )
    });
    assert_eq!(value, "42");
    assert_eq!(error.as_deref(), Some("Failed to save answer"));
}

#[tokio::test(flavor = "current_thread")]
async fn questionnaire_surfaces_rejected_step() {
    let repo = seeded_repo();
    repo.fail_questions_for_step(
        stepform_core::model::StepCode::new("S1").unwrap(),
        ApiError::Rejected("boom".into()),
    );
    let mut harness = setup_view_harness(ViewKind::Questionnaire, repo, &["S1"], Some(7));
    harness.rebuild();
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("boom"), "missing error in {html}");
    assert!(html.contains("Retry"), "missing retry in {html}");
    let error = harness.dom.in_runtime(|| harness.handles.questions().error());
    assert_eq!(error.as_deref(), Some("boom"));
}

#[tokio::test(flavor = "current_thread")]
async fn questionnaire_without_calculation_does_not_save() {
    let mut harness = setup_view_harness(ViewKind::Questionnaire, seeded_repo(), &["S1"], None);
    harness.rebuild();
    harness.settle().await;

    let answers = harness.handles.answers();
    harness
        .dom
        .in_runtime(|| answers.set_answer(QuestionId::new(1), "30", None));
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("No calculation selected"), "missing notice in {html}");
    assert_eq!(harness.repo.calls().upsert_answer, 0);
    assert_eq!(harness.repo.calls().answers_by_calculation, 0);
}

#[tokio::test(flavor = "current_thread")]
async fn questionnaire_without_steps_says_so() {
    let mut harness =
        setup_view_harness(ViewKind::Questionnaire, InMemoryRepository::new(), &[], Some(1));
    harness.rebuild();
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("No steps configured"), "missing notice in {html}");
    assert_eq!(harness.repo.calls().questions_by_step, 0);
}

#[tokio::test(flavor = "current_thread")]
async fn questionnaire_offers_navigation_on_step_without_questions() {
    let mut harness =
        setup_view_harness(ViewKind::Questionnaire, seeded_repo(), &["EMPTY", "S1"], Some(7));
    harness.rebuild();
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("This step has no questions"), "missing notice in {html}");
    assert!(html.contains("Next"), "missing next in {html}");
    assert!(!html.contains("data-can-proceed"), "step form rendered: {html}");
    assert_eq!(harness.repo.calls().question_options, 0);
}

#[tokio::test(flavor = "current_thread")]
async fn complete_view_smoke_renders() {
    let mut harness =
        setup_view_harness(ViewKind::Complete, InMemoryRepository::new(), &["S1"], None);
    harness.rebuild();

    let html = harness.render();
    assert!(html.contains("All steps complete"), "missing title in {html}");
    assert!(html.contains("Start over"), "missing restart link in {html}");
}
