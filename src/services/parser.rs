use crate::error::AnalysisError;
use crate::models::AnalysisReport;
use serde_json::Value;

/// Expected JSON shape of a report, checked before deserializing.
enum Shape {
    Text,
    Count,
    List(&'static Shape),
    Object(&'static [(&'static str, Shape)]),
}

static STRUCTURE_ROLE: Shape = Shape::Object(&[
    ("role", Shape::Text),
    ("en", Shape::Text),
    ("ko", Shape::Text),
]);

static SENTENCE: Shape = Shape::Object(&[
    ("no", Shape::Count),
    ("en", Shape::Text),
    ("ko", Shape::Text),
    ("grammar", Shape::Text),
    ("structure", Shape::List(&STRUCTURE_ROLE)),
]);

static VOCAB_ENTRY: Shape = Shape::Object(&[("word", Shape::Text), ("meaning", Shape::Text)]);

static TEXT: Shape = Shape::Text;

static REPORT: Shape = Shape::Object(&[
    ("title", Shape::Text),
    ("subtitle", Shape::Text),
    ("full_en", Shape::Text),
    ("full_ko", Shape::Text),
    ("sentences", Shape::List(&SENTENCE)),
    ("summary", Shape::Text),
    ("logic_flow", Shape::List(&TEXT)),
    ("vocab", Shape::List(&VOCAB_ENTRY)),
]);

impl Shape {
    fn expected(&self) -> &'static str {
        match self {
            Shape::Text => "a string",
            Shape::Count => "a non-negative integer",
            Shape::List(_) => "an array",
            Shape::Object(_) => "an object",
        }
    }

    fn check(&self, value: &Value, path: &str) -> Result<(), AnalysisError> {
        let invalid = || AnalysisError::InvalidField {
            path: display_path(path),
            expected: self.expected(),
        };
        match self {
            Shape::Text => value.as_str().map(|_| ()).ok_or_else(invalid),
            Shape::Count => match value.as_u64() {
                Some(n) if n <= u64::from(u32::MAX) => Ok(()),
                _ => Err(invalid()),
            },
            Shape::List(item) => {
                let items = value.as_array().ok_or_else(invalid)?;
                for (index, element) in items.iter().enumerate() {
                    item.check(element, &format!("{path}[{index}]"))?;
                }
                Ok(())
            }
            Shape::Object(fields) => {
                let map = value.as_object().ok_or_else(invalid)?;
                for (key, field) in fields.iter() {
                    let field_path = join(path, key);
                    let field_value = map
                        .get(*key)
                        .ok_or_else(|| AnalysisError::MissingField {
                            path: field_path.clone(),
                        })?;
                    field.check(field_value, &field_path)?;
                }
                Ok(())
            }
        }
    }
}

fn join(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}.{key}")
    }
}

fn display_path(path: &str) -> String {
    if path.is_empty() {
        "<root>".to_string()
    } else {
        path.to_string()
    }
}

/// Parses an extracted candidate into a report.
///
/// Every required key is checked at every level before the typed value is
/// built, so the result is either a complete report or the first offending
/// path.
pub fn parse_report(candidate: &str) -> Result<AnalysisReport, AnalysisError> {
    let value: Value = serde_json::from_str(candidate).map_err(|e| AnalysisError::ParseError {
        message: e.to_string(),
    })?;

    REPORT.check(&value, "")?;

    serde_json::from_value(value).map_err(|e| AnalysisError::ParseError {
        message: e.to_string(),
    })
}
