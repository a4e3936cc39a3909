use serde::{Deserialize, Serialize};

/// One analysed passage, as the model is instructed to return it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub title: String,
    pub subtitle: String,
    #[serde(rename = "full_en")]
    pub full_english: String,
    #[serde(rename = "full_ko")]
    pub full_korean: String,
    pub sentences: Vec<SentenceAnalysis>,
    pub summary: String,
    pub logic_flow: Vec<String>,
    #[serde(rename = "vocab")]
    pub vocabulary: Vec<VocabEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentenceAnalysis {
    #[serde(rename = "no")]
    pub number: u32,
    #[serde(rename = "en")]
    pub english: String,
    #[serde(rename = "ko")]
    pub korean: String,
    /// May carry inline markup; see `services::render`.
    #[serde(rename = "grammar")]
    pub grammar_note: String,
    pub structure: Vec<StructureRole>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureRole {
    pub role: String,
    #[serde(rename = "en")]
    pub english: String,
    #[serde(rename = "ko")]
    pub korean: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabEntry {
    pub word: String,
    pub meaning: String,
}

/// The two-part payload handed to the model: instruction first, passage second.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptRequest {
    pub instruction: &'static str,
    pub passage: String,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub passage: String,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub html: String,
    pub report: AnalysisReport,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub kind: &'static str,
    pub raw_response: Option<String>,
}
