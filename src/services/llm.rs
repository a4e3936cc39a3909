use crate::config::ModelConfig;
use crate::error::ModelError;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};

/// Text-in, text-out access to a hosted model.
#[async_trait]
pub trait ModelClient: Send + Sync {
    async fn complete(&self, instruction: &str, passage: &str) -> Result<String, ModelError>;
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

pub struct GeminiClient {
    client: reqwest::Client,
    config: ModelConfig,
}

impl GeminiClient {
    pub fn new(config: ModelConfig) -> Result<Self, ModelError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(GeminiClient { client, config })
    }

    fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model_name
        )
    }
}

fn request_body(instruction: &str, passage: &str) -> Value {
    json!({
        "contents": [{
            "role": "user",
            "parts": [
                { "text": instruction },
                { "text": passage }
            ]
        }]
    })
}

/// Joins the text parts of the first candidate.
fn response_text(body: &str) -> Result<String, ModelError> {
    let response: GenerateContentResponse =
        serde_json::from_str(body).map_err(|e| ModelError::Decode(e.to_string()))?;

    let Some(candidate) = response.candidates.into_iter().next() else {
        return Err(match response.prompt_feedback.and_then(|f| f.block_reason) {
            Some(reason) => ModelError::Blocked { reason },
            None => ModelError::EmptyResponse,
        });
    };

    let text: String = candidate
        .content
        .map(|c| c.parts)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|p| p.text)
        .collect();

    if text.is_empty() {
        return Err(ModelError::EmptyResponse);
    }
    Ok(text)
}

#[async_trait]
impl ModelClient for GeminiClient {
    async fn complete(&self, instruction: &str, passage: &str) -> Result<String, ModelError> {
        tracing::debug!(model = %self.config.model_name, "sending generateContent request");

        let response = self
            .client
            .post(self.url())
            .header("Content-Type", "application/json")
            .header("x-goog-api-key", &self.config.credential)
            .json(&request_body(instruction, passage))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ModelError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response_text(&body)
    }
}
