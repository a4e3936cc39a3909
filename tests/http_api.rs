use async_trait::async_trait;
use axum::body::{Body, to_bytes};
use http::{Request, StatusCode};
use passage_analyzer::error::ModelError;
use passage_analyzer::routes::{AppState, app};
use passage_analyzer::services::llm::ModelClient;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

struct CannedModel(String);

#[async_trait]
impl ModelClient for CannedModel {
    async fn complete(&self, _: &str, _: &str) -> Result<String, ModelError> {
        Ok(self.0.clone())
    }
}

struct QuotaExceeded;

#[async_trait]
impl ModelClient for QuotaExceeded {
    async fn complete(&self, _: &str, _: &str) -> Result<String, ModelError> {
        Err(ModelError::Status {
            status: 429,
            body: "RESOURCE_EXHAUSTED".to_string(),
        })
    }
}

fn cats_reply() -> String {
    let report = json!({
        "title": "Cats",
        "subtitle": "고양이",
        "full_en": "Cats are mammals. They are popular pets.",
        "full_ko": "고양이는 포유류이다. 그들은 인기 있는 반려동물이다.",
        "sentences": [
            {
                "no": 1,
                "en": "Cats are mammals.",
                "ko": "고양이는 포유류이다.",
                "grammar": "<b>be</b>동사 + 보어",
                "structure": [{"role": "S", "en": "Cats", "ko": "주어"}]
            },
            {
                "no": 2,
                "en": "They are popular pets.",
                "ko": "그들은 인기 있는 반려동물이다.",
                "grammar": "대명사 <i>They</i>",
                "structure": [{"role": "V", "en": "are", "ko": "동사"}]
            }
        ],
        "summary": "고양이는 인기 있는 포유류 반려동물이다.",
        "logic_flow": ["정의", "특징"],
        "vocab": [{"word": "mammal", "meaning": "동물"}]
    });
    format!("Here is the analysis:\n```json\n{report:#}\n```")
}

async fn post_passage(client: Arc<dyn ModelClient>, passage: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/analyze")
        .header("content-type", "application/json")
        .body(Body::from(json!({ "passage": passage }).to_string()))
        .unwrap();

    let response = app(AppState { llm_client: client })
        .oneshot(request)
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn between<'a>(html: &'a str, start: &str, end: &str) -> &'a str {
    let from = html.find(start).expect("start marker") + start.len();
    let to = from + html[from..].find(end).expect("end marker");
    &html[from..to]
}

#[tokio::test]
async fn passage_renders_full_report() {
    let client: Arc<dyn ModelClient> = Arc::new(CannedModel(cats_reply()));
    let (status, body) = post_passage(client, "Cats are mammals. They are popular pets.").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["report"]["title"], "Cats");

    let html = body["html"].as_str().unwrap();
    assert_eq!(html.matches("class=\"sentence-item\"").count(), 2);

    for table in html.split("<table class=\"structure-table\">").skip(1) {
        let rows = between(table, "<tbody>", "</tbody>");
        assert_eq!(rows.matches("<tr>").count(), 1);
    }

    let vocab = between(html, "<table class=\"vocab-table\"><tbody>", "</tbody>");
    assert_eq!(vocab, "<tr><td>mammal</td><td>동물</td></tr>");
}

#[tokio::test]
async fn refusal_returns_raw_text() {
    let client: Arc<dyn ModelClient> = Arc::new(CannedModel("I cannot help with that.".to_string()));
    let (status, body) = post_passage(client, "Cats are mammals.").await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["kind"], "no_json_found");
    assert_eq!(body["raw_response"], "I cannot help with that.");
}

#[tokio::test]
async fn missing_vocabulary_is_reported_by_path() {
    let mut reply: Value = serde_json::from_str(
        passage_analyzer::services::extract::extract_json(&cats_reply()).unwrap(),
    )
    .unwrap();
    reply.as_object_mut().unwrap().remove("vocab");

    let client: Arc<dyn ModelClient> = Arc::new(CannedModel(reply.to_string()));
    let (status, body) = post_passage(client, "Cats are mammals.").await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["kind"], "missing_field");
    assert!(body["error"].as_str().unwrap().contains("vocab"));
}

#[tokio::test]
async fn model_failure_is_bad_gateway() {
    let (status, body) = post_passage(Arc::new(QuotaExceeded), "Cats are mammals.").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["kind"], "model_error");
    assert!(body["raw_response"].is_null());
}

#[tokio::test]
async fn blank_passage_is_rejected_before_model_call() {
    let (status, body) = post_passage(Arc::new(QuotaExceeded), "   \n ").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "empty_passage");
}

async fn post_raw(content_type: &str, body: &'static str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/analyze")
        .header("content-type", content_type)
        .body(Body::from(body))
        .unwrap();

    let response = app(AppState {
        llm_client: Arc::new(QuotaExceeded),
    })
    .oneshot(request)
    .await
    .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn malformed_body_gets_json_error() {
    let (status, body) = post_raw("application/json", "{\"passage\": ").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "bad_request");
    assert!(body["raw_response"].is_null());

    let (status, body) = post_raw("application/json", "{\"text\": \"Cats\"}").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["kind"], "bad_request");

    let (status, body) = post_raw("text/plain", "Cats are mammals.").await;
    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(body["kind"], "bad_request");
}

#[tokio::test]
async fn index_and_health_are_served() {
    let router = app(AppState {
        llm_client: Arc::new(QuotaExceeded),
    });

    let page = router
        .clone()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(page.status(), StatusCode::OK);
    let page = to_bytes(page.into_body(), usize::MAX).await.unwrap();
    assert!(String::from_utf8_lossy(&page).contains("id=\"passage\""));

    let health = router
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(health.status(), StatusCode::OK);
}
