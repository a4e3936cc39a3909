use crate::error::{AnalysisError, ReportFailure};
use crate::models::{AnalyzeRequest, AnalyzeResponse, ErrorBody};
use crate::services::analyzer::generate_report;
use crate::services::llm::ModelClient;
use crate::services::render::render_report;
use axum::{
    Router,
    extract::{State, rejection::JsonRejection},
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
};
use http::StatusCode;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Instrument;
use uuid::Uuid;

#[derive(Clone)]
pub struct AppState {
    pub llm_client: Arc<dyn ModelClient>,
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/analyze", post(analyze))
        .route("/health", get(health_check))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::AllowMethods::any())
                .allow_headers(tower_http::cors::AllowHeaders::any()),
        )
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="ko">
<head>
    <meta charset="utf-8">
    <title>AI 영어 지문 분석기</title>
    <style>
        body { font-family: sans-serif; margin: 32px auto; max-width: 1200px; color: #111827; }
        textarea { width: 100%; box-sizing: border-box; font-size: 14px; padding: 10px; }
        button { margin: 12px 0; padding: 8px 18px; font-size: 14px; cursor: pointer; }
        .spinner { display: none; margin: 12px 0; color: #2563eb; }
        .spinner.active { display: block; }
        .error { color: #dc2626; background: #fef2f2; border: 1px solid #fecaca; padding: 10px; border-radius: 6px; }
        pre.raw { white-space: pre-wrap; background: #f9fafb; border: 1px solid #e5e7eb; padding: 10px; font-size: 12px; }
    </style>
</head>
<body>
    <h1>📝 AI 영어 지문 분석기</h1>
    <p>영어 지문을 입력하면 전문적인 문장 분석지를 생성합니다.</p>

    <textarea id="passage" rows="10" placeholder="여기에 영어 본문을 붙여넣으세요..."></textarea>
    <button id="analyze">분석지 생성하기</button>
    <div id="spinner" class="spinner">AI가 지문을 정밀 분석 중입니다...</div>
    <div id="result"></div>

    <script>
        const button = document.getElementById("analyze");
        const spinner = document.getElementById("spinner");
        const result = document.getElementById("result");

        function showError(message, raw) {
            result.replaceChildren();
            const box = document.createElement("div");
            box.className = "error";
            box.textContent = message;
            result.appendChild(box);
            if (raw) {
                const pre = document.createElement("pre");
                pre.className = "raw";
                pre.textContent = raw;
                result.appendChild(pre);
            }
        }

        button.addEventListener("click", async () => {
            const passage = document.getElementById("passage").value;
            if (!passage.trim()) {
                showError("지문을 입력해주세요.", null);
                return;
            }
            button.disabled = true;
            spinner.classList.add("active");
            try {
                const response = await fetch("/analyze", {
                    method: "POST",
                    headers: { "Content-Type": "application/json" },
                    body: JSON.stringify({ passage }),
                });
                const body = await response.json();
                if (response.ok) {
                    result.innerHTML = body.html;
                } else {
                    showError("분석 중 오류가 발생했습니다: " + body.error, body.raw_response);
                }
            } catch (err) {
                showError("분석 중 오류가 발생했습니다: " + err, null);
            } finally {
                spinner.classList.remove("active");
                button.disabled = false;
            }
        });
    </script>
</body>
</html>
"#;

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn health_check() -> &'static str {
    "OK"
}

pub struct ApiError {
    status: StatusCode,
    body: ErrorBody,
}

impl ApiError {
    fn empty_passage() -> Self {
        ApiError {
            status: StatusCode::BAD_REQUEST,
            body: ErrorBody {
                error: "passage is empty".to_string(),
                kind: "empty_passage",
                raw_response: None,
            },
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError {
            status: rejection.status(),
            body: ErrorBody {
                error: rejection.body_text(),
                kind: "bad_request",
                raw_response: None,
            },
        }
    }
}

impl From<ReportFailure> for ApiError {
    fn from(failure: ReportFailure) -> Self {
        let status = match failure.error {
            AnalysisError::Model(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::UNPROCESSABLE_ENTITY,
        };
        ApiError {
            status,
            body: ErrorBody {
                error: failure.error.to_string(),
                kind: failure.error.kind(),
                raw_response: failure.raw_response,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

async fn analyze(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let Json(request) = payload?;
    if request.passage.trim().is_empty() {
        return Err(ApiError::empty_passage());
    }

    let span = tracing::info_span!("analyze", request_id = %Uuid::new_v4());
    async move {
        tracing::info!(passage_chars = request.passage.chars().count(), "analysis requested");

        let report = generate_report(&request.passage, &state.llm_client)
            .await
            .inspect_err(|failure| {
                tracing::warn!(kind = failure.error.kind(), error = %failure.error, "analysis failed")
            })?;

        let html = render_report(&report);
        tracing::info!(
            sentences = report.sentences.len(),
            vocabulary = report.vocabulary.len(),
            "report rendered"
        );
        Ok::<_, ApiError>(Json(AnalyzeResponse { html, report }))
    }
    .instrument(span)
    .await
}
