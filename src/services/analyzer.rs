use crate::error::{AnalysisError, ReportFailure};
use crate::models::AnalysisReport;
use crate::services::extract::{extract_json, first_balanced_object};
use crate::services::llm::ModelClient;
use crate::services::parser::parse_report;
use crate::services::prompt::build_prompt;
use std::sync::Arc;
use std::time::Instant;

/// Turns model text into a report: greedy brace span first, then the first
/// balanced object if the greedy span is not valid JSON.
pub fn decode_report(raw: &str) -> Result<AnalysisReport, AnalysisError> {
    let candidate = extract_json(raw)?;
    match parse_report(candidate) {
        Err(err @ AnalysisError::ParseError { .. }) => match first_balanced_object(raw) {
            Some(balanced) if balanced != candidate => {
                tracing::debug!("greedy span is not JSON, retrying with first balanced object");
                parse_report(balanced).map_err(|retry_err| match retry_err {
                    AnalysisError::ParseError { .. } => err,
                    other => other,
                })
            }
            _ => Err(err),
        },
        result => result,
    }
}

/// Runs one passage through prompt, model, extraction and parsing.
pub async fn generate_report(
    passage: &str,
    client: &Arc<dyn ModelClient>,
) -> Result<AnalysisReport, ReportFailure> {
    let prompt = build_prompt(passage);

    let started = Instant::now();
    let raw = client.complete(prompt.instruction, &prompt.passage).await?;
    tracing::info!(
        elapsed_ms = started.elapsed().as_millis() as u64,
        response_chars = raw.chars().count(),
        "model responded"
    );
    tracing::debug!(raw_response = %raw);

    match decode_report(&raw) {
        Ok(report) => Ok(report),
        Err(error) => Err(ReportFailure::with_raw(error, raw)),
    }
}
