use actix_web::dev::ServerHandle;
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

use coverie::cover::CoverPage;
use coverie::gateway::client::DEFAULT_GEMINI_MODEL;
use coverie::gateway::{
    GatewayError, GatewayOutcome, GeminiValidator, InputValidator, ValidateInputsInput,
    ValidationGateway,
};

const API_KEY: &str = "test-key";

/// What the fake Gemini endpoint saw.
#[derive(Debug, Clone)]
struct RecordedCall {
    path: String,
    api_key: Option<String>,
    body: Value,
}

/// Start a one-worker HTTP server that answers every request with `status`
/// and `body`. Returns its base URL.
async fn spawn_upstream(
    status: u16,
    body: Value,
) -> (String, ServerHandle, Arc<Mutex<Vec<RecordedCall>>>) {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let recorder = calls.clone();

    let server = HttpServer::new(move || {
        let recorder = recorder.clone();
        let body = body.clone();
        App::new().default_service(web::to(move |req: HttpRequest, payload: web::Bytes| {
            let recorder = recorder.clone();
            let body = body.clone();
            async move {
                recorder.lock().push(RecordedCall {
                    path: req.path().to_string(),
                    api_key: req
                        .headers()
                        .get("x-goog-api-key")
                        .and_then(|value| value.to_str().ok())
                        .map(str::to_string),
                    body: serde_json::from_slice(&payload).unwrap_or(Value::Null),
                });
                let status = actix_web::http::StatusCode::from_u16(status)
                    .unwrap_or(actix_web::http::StatusCode::INTERNAL_SERVER_ERROR);
                HttpResponse::build(status).json(body)
            }
        }))
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .unwrap();

    let addr = server.addrs()[0];
    let server = server.run();
    let handle = server.handle();
    actix_web::rt::spawn(server);

    (format!("http://{}/v1beta", addr), handle, calls)
}

fn validator(endpoint: &str) -> GeminiValidator {
    let client = reqwest::Client::builder()
        .no_proxy()
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap();
    GeminiValidator::with_client(client, endpoint, API_KEY, DEFAULT_GEMINI_MODEL)
}

fn input() -> ValidateInputsInput {
    ValidateInputsInput {
        university_name: "Chandpur Science and Technology".into(),
        department: "CSE".into(),
        session: "Fall 2024".into(),
        course_code: "CSE-101".into(),
        teacher_name: "Dr. Alan Turing".into(),
        designation: "Professor".into(),
        student_name: "Ada Lovelace".into(),
        student_id: "20240001".into(),
        submission_date: "2024-03-15".into(),
        topic: Some("Data Structures".into()),
        document_type: "assignment".into(),
    }
}

fn fenced_answer() -> Value {
    let answer = json!({
        "validatedUniversityName": "Chandpur Science and Technology",
        "validatedDepartment": "CSE",
        "validatedSession": "Fall 2024",
        "validatedCourseCode": "CSE-101",
        "validatedTeacherName": "Dr. Alan Turing",
        "validatedDesignation": "Professor",
        "validatedStudentName": "Ada Lovelace",
        "validatedStudentId": "20240001",
        "validatedSubmissionDate": "2024-03-15",
        "validatedTopic": "Data Structures",
        "suggestions": ["Student ID looks short"]
    });
    json!({
        "candidates": [{
            "content": {
                "role": "model",
                "parts": [{ "text": format!("```json\n{}\n```", answer) }]
            }
        }]
    })
}

#[actix_web::test]
async fn test_error_status_carries_service_message() {
    let (endpoint, handle, _calls) = spawn_upstream(
        400,
        json!({ "error": { "code": 400, "message": "API key invalid", "status": "INVALID_ARGUMENT" } }),
    )
    .await;

    let err = validator(&endpoint)
        .validate_inputs(&input())
        .await
        .unwrap_err();

    match err {
        GatewayError::Upstream { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "API key invalid");
        }
        other => panic!("expected upstream error, got {:?}", other),
    }
    handle.stop(false).await;
}

#[actix_web::test]
async fn test_fenced_json_answer_is_parsed() {
    let (endpoint, handle, calls) = spawn_upstream(200, fenced_answer()).await;

    let output = validator(&endpoint)
        .validate_inputs(&input())
        .await
        .unwrap();

    assert_eq!(output.validated_student_name, "Ada Lovelace");
    assert_eq!(output.validated_topic.as_deref(), Some("Data Structures"));
    assert_eq!(output.suggestions, vec!["Student ID looks short"]);

    let calls = calls.lock().clone();
    assert_eq!(calls.len(), 1);
    assert_eq!(
        calls[0].path,
        format!("/v1beta/models/{}:generateContent", DEFAULT_GEMINI_MODEL)
    );
    assert_eq!(calls[0].api_key.as_deref(), Some(API_KEY));
    assert_eq!(
        calls[0].body["generationConfig"]["responseMimeType"],
        "application/json"
    );
    let prompt = calls[0].body["contents"][0]["parts"][0]["text"]
        .as_str()
        .unwrap();
    assert!(prompt.contains("Topic: Data Structures"));
    handle.stop(false).await;
}

#[actix_web::test]
async fn test_candidate_without_text_is_empty_response() {
    let (endpoint, handle, _calls) = spawn_upstream(200, json!({ "candidates": [] })).await;

    let err = validator(&endpoint)
        .validate_inputs(&input())
        .await
        .unwrap_err();
    assert!(matches!(err, GatewayError::EmptyResponse));
    handle.stop(false).await;
}

#[actix_web::test]
async fn test_gateway_reports_upstream_message_as_failure() {
    let (endpoint, handle, _calls) = spawn_upstream(
        403,
        json!({ "error": { "message": "API key invalid" } }),
    )
    .await;

    let record = coverie::cover::CoverPageData {
        department: "CSE".into(),
        session: "Fall 2024".into(),
        course_code: "CSE-101".into(),
        teacher_name: "Dr. Alan Turing".into(),
        designation: "Professor".into(),
        student_name: "Ada Lovelace".into(),
        student_id: "20240001".into(),
        submission_date: chrono::NaiveDate::from_ymd_opt(2024, 3, 15),
        topic: Some("Data Structures".into()),
        document_type: "assignment".into(),
    };
    let page: CoverPage = coverie::cover::validate(&record).unwrap();
    let gateway = ValidationGateway::new(
        Arc::new(validator(&endpoint)),
        "Chandpur Science and Technology",
    );

    match gateway.validate(&page).await {
        GatewayOutcome::Failure { message } => {
            assert!(message.contains("API key invalid"), "{message}");
            assert!(message.contains("403"), "{message}");
        }
        other => panic!("expected failure, got {:?}", other),
    }
    handle.stop(false).await;
}
