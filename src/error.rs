use thiserror::Error;

/// Failures of the call to the hosted model.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("model service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("model refused the prompt: {reason}")]
    Blocked { reason: String },

    #[error("model returned no text")]
    EmptyResponse,

    #[error("unreadable model response: {0}")]
    Decode(String),
}

/// Everything that can stop a passage from becoming a report.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("no JSON object found in the model response")]
    NoJsonFound,

    #[error("model response is not valid JSON: {message}")]
    ParseError { message: String },

    #[error("missing required field `{path}`")]
    MissingField { path: String },

    #[error("field `{path}` should be {expected}")]
    InvalidField { path: String, expected: &'static str },
}

impl AnalysisError {
    /// Stable machine-readable name, used in API error bodies and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            AnalysisError::Model(_) => "model_error",
            AnalysisError::NoJsonFound => "no_json_found",
            AnalysisError::ParseError { .. } => "parse_error",
            AnalysisError::MissingField { .. } => "missing_field",
            AnalysisError::InvalidField { .. } => "invalid_field",
        }
    }
}

/// A failed analysis together with the raw model text, when one was received.
#[derive(Debug, Error)]
#[error("{error}")]
pub struct ReportFailure {
    #[source]
    pub error: AnalysisError,
    pub raw_response: Option<String>,
}

impl ReportFailure {
    pub fn with_raw(error: AnalysisError, raw_response: impl Into<String>) -> Self {
        Self {
            error,
            raw_response: Some(raw_response.into()),
        }
    }
}

impl From<ModelError> for ReportFailure {
    fn from(err: ModelError) -> Self {
        Self {
            error: AnalysisError::Model(err),
            raw_response: None,
        }
    }
}
