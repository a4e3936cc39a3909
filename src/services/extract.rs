use crate::error::AnalysisError;
use regex::Regex;
use std::sync::OnceLock;

fn brace_span() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // (?s) lets `.` cross newlines; `.*` is greedy, so the span ends at the last `}`.
    RE.get_or_init(|| Regex::new(r"(?s)\{.*\}").expect("brace span pattern is valid"))
}

/// Returns the text from the first `{` to the last `}`.
///
/// The model often wraps its JSON in prose or a ```json fence; both fall
/// outside the span. Stray braces in the surrounding prose widen the span,
/// see [`first_balanced_object`] for the narrower scan.
pub fn extract_json(text: &str) -> Result<&str, AnalysisError> {
    brace_span()
        .find(text)
        .map(|m| m.as_str())
        .ok_or(AnalysisError::NoJsonFound)
}

/// Returns the first `{...}` span whose braces balance, ignoring braces that
/// appear inside JSON string literals.
pub fn first_balanced_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }
    None
}
