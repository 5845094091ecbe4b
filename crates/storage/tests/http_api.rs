use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::Query;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use stepform_core::model::{
    AnswerUpsert, CalculationId, EmissionFactorId, QuestionId, QuestionType, StepCode,
};
use storage::{AnswerRepository, ApiError, HttpApi, HttpApiConfig, QuestionRepository};

async fn serve(router: Router) -> HttpApi {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve");
    });
    HttpApi::new(&HttpApiConfig::new(format!("http://{addr}/api"))).expect("client")
}

fn question_json(id: u64, code: &str, question_type: &str, step: &str) -> Value {
    json!({
        "id": id,
        "code": code,
        "questionType": question_type,
        "label": code,
        "helpText": null,
        "stepCode": step,
        "sortOrder": id
    })
}

#[tokio::test]
async fn by_step_sends_encoded_step_code() {
    let seen = Arc::new(Mutex::new(Vec::<String>::new()));
    let seen_in_handler = Arc::clone(&seen);
    let router = Router::new().route(
        "/api/questions/by-step",
        get(move |Query(params): Query<HashMap<String, String>>| {
            let seen = Arc::clone(&seen_in_handler);
            async move {
                let step = params.get("stepCode").cloned().unwrap_or_default();
                seen.lock().unwrap().push(step.clone());
                Json(json!({
                    "success": true,
                    "questions": [question_json(1, "AGE", "VALUE", &step)],
                    "count": 1
                }))
            }
        }),
    );
    let api = serve(router).await;

    let step = StepCode::new("Step 1/A").unwrap();
    let questions = api.questions_by_step(&step).await.expect("questions");

    assert_eq!(questions.len(), 1);
    assert_eq!(questions[0].question_type, QuestionType::Value);
    assert_eq!(questions[0].step_code, "Step 1/A");
    assert_eq!(seen.lock().unwrap().as_slice(), ["Step 1/A".to_string()]);
}

#[tokio::test]
async fn by_step_failure_envelope_rejects_with_message() {
    let router = Router::new().route(
        "/api/questions/by-step",
        get(|| async { Json(json!({ "success": false, "message": "boom" })) }),
    );
    let api = serve(router).await;

    let step = StepCode::new("S1").unwrap();
    let err = api.questions_by_step(&step).await.unwrap_err();
    assert_eq!(err, ApiError::Rejected("boom".into()));
    assert_eq!(err.to_string(), "boom");
}

#[tokio::test]
async fn all_questions_reads_full_list() {
    let router = Router::new().route(
        "/api/questions/all",
        get(|| async {
            Json(json!({
                "success": true,
                "questions": [
                    question_json(1, "AGE", "VALUE", "S1"),
                    question_json(2, "COLOR", "SINGLE_CHOICE", "S2")
                ],
                "count": 2
            }))
        }),
    );
    let api = serve(router).await;

    let questions = api.all_questions().await.expect("questions");
    assert_eq!(questions.len(), 2);
}

#[tokio::test]
async fn options_without_list_read_as_empty() {
    let router = Router::new().route(
        "/api/question-options/by-question",
        get(|Query(params): Query<HashMap<String, String>>| async move {
            assert_eq!(params.get("questionId").map(String::as_str), Some("2"));
            Json(json!({ "success": true, "count": 0 }))
        }),
    );
    let api = serve(router).await;

    let options = api.question_options(QuestionId::new(2)).await.expect("options");
    assert!(options.is_empty());
}

#[tokio::test]
async fn unreadable_body_is_a_transport_error() {
    let router = Router::new().route(
        "/api/questions/all",
        get(|| async { (axum::http::StatusCode::BAD_GATEWAY, "upstream down") }),
    );
    let api = serve(router).await;

    let err = api.all_questions().await.unwrap_err();
    assert_eq!(err, ApiError::Transport("Failed to fetch questions".into()));
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    let api = HttpApi::new(&HttpApiConfig::new(format!("http://{addr}/api"))).expect("client");

    let err = api
        .answers_by_calculation(CalculationId::new(1))
        .await
        .unwrap_err();
    assert_eq!(err, ApiError::Transport("Failed to load answers".into()));
}

#[tokio::test]
async fn answers_and_upsert_round_trip_wire_shapes() {
    let posted = Arc::new(Mutex::new(Vec::<Value>::new()));
    let posted_in_handler = Arc::clone(&posted);
    let router = Router::new()
        .route(
            "/api/calculation-answers/by-calculation",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                assert_eq!(params.get("calculationId").map(String::as_str), Some("9"));
                Json(json!({
                    "success": true,
                    "calculationAnswers": [
                        { "id": 1, "question": { "id": 3 }, "valueText": "42" },
                        { "id": 2, "question": { "id": 4 }, "valueText": null }
                    ],
                    "count": 2
                }))
            }),
        )
        .route(
            "/api/calculation-answers/upsert",
            post(move |Json(body): Json<Value>| {
                let posted = Arc::clone(&posted_in_handler);
                async move {
                    posted.lock().unwrap().push(body);
                    Json(json!({ "success": true }))
                }
            }),
        );
    let api = serve(router).await;

    let answers = api
        .answers_by_calculation(CalculationId::new(9))
        .await
        .expect("answers");
    assert_eq!(answers.len(), 2);
    assert_eq!(answers[0].owning_question(), Some(QuestionId::new(3)));

    let upsert = AnswerUpsert::new(CalculationId::new(9), QuestionId::new(3), "43")
        .with_emission_factor(Some(EmissionFactorId::new(5)));
    api.upsert_answer(&upsert).await.expect("upsert");

    let posted = posted.lock().unwrap();
    assert_eq!(
        posted.as_slice(),
        [json!({
            "calculation": { "id": 9 },
            "question": { "id": 3 },
            "valueText": "43",
            "emissionFactorId": 5
        })]
    );
}

#[tokio::test]
async fn failed_upsert_uses_save_fallback() {
    let router = Router::new().route(
        "/api/calculation-answers/upsert",
        post(|| async { Json(json!({ "success": false })) }),
    );
    let api = serve(router).await;

    let upsert = AnswerUpsert::new(CalculationId::new(1), QuestionId::new(1), "x");
    let err = api.upsert_answer(&upsert).await.unwrap_err();
    assert_eq!(err, ApiError::Rejected("Failed to save answer".into()));
}
