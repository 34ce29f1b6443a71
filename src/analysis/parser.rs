//! Parsing of model responses into [`ReviewAnalysis`].
//!
//! Models wrap JSON in prose or markdown fences and send numbers as
//! strings. Extraction and field shapes are lenient about that, but values
//! that break the schema are not repaired: a score outside 1..=10, a
//! fractional score, an unknown severity or an issue that is not an object
//! rejects the whole response. Absent fields take their defaults.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::models::analysis::{
    CodeIssue, DEFAULT_SCORE, MAX_SCORE, MIN_SCORE, ReviewAnalysis, SeverityLevel, checked_score,
};

use super::AnalysisError;

/// Maximum number of characters of a bad response echoed in the error.
const PARSE_ERROR_PREVIEW_LEN: usize = 200;

/// Wire shape of a model response, with every field optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawAnalysis {
    #[serde(deserialize_with = "score")]
    readability_score: Option<u8>,
    #[serde(deserialize_with = "score")]
    modularity_score: Option<u8>,
    #[serde(deserialize_with = "score")]
    maintainability_score: Option<u8>,
    #[serde(deserialize_with = "lenient_text")]
    overall_summary: String,
    #[serde(deserialize_with = "lenient_list")]
    strengths: Vec<String>,
    #[serde(deserialize_with = "issues")]
    issues: Vec<CodeIssue>,
    #[serde(deserialize_with = "lenient_list")]
    suggestions: Vec<String>,
    #[serde(deserialize_with = "lenient_list")]
    potential_bugs: Vec<String>,
    #[serde(deserialize_with = "lenient_list")]
    security_concerns: Vec<String>,
}

impl From<RawAnalysis> for ReviewAnalysis {
    fn from(raw: RawAnalysis) -> Self {
        let score = |value: Option<u8>| value.unwrap_or(DEFAULT_SCORE);
        ReviewAnalysis {
            readability: score(raw.readability_score),
            modularity: score(raw.modularity_score),
            maintainability: score(raw.maintainability_score),
            summary: raw.overall_summary,
            strengths: raw.strengths,
            issues: raw.issues,
            suggestions: raw.suggestions,
            potential_bugs: raw.potential_bugs,
            security_concerns: raw.security_concerns,
        }
    }
}

/// Parse raw model output into a typed analysis.
///
/// The first candidate (see [`json_candidates`]) that is valid JSON is
/// taken as the answer and must then match the analysis schema.
pub fn parse_analysis_response(response: &str) -> Result<ReviewAnalysis, AnalysisError> {
    let trimmed = response.trim();
    if trimmed.is_empty() {
        return Err(AnalysisError::Malformed("empty response".to_string()));
    }

    for candidate in json_candidates(trimmed) {
        let Ok(value) = serde_json::from_str::<Value>(candidate) else {
            continue;
        };
        return serde_json::from_value::<RawAnalysis>(value)
            .map(ReviewAnalysis::from)
            .map_err(|e| AnalysisError::Malformed(format!("schema mismatch: {e}")));
    }

    let preview: String = trimmed.chars().take(PARSE_ERROR_PREVIEW_LEN).collect();
    Err(AnalysisError::Malformed(format!(
        "no JSON object found in response: {preview}"
    )))
}

/// Candidate JSON object slices of `text`, most specific first.
///
/// Every balanced top-level `{...}` region comes first, in order of
/// appearance. Braces inside string literals are ignored. The span from
/// the first `{` to the last `}` is appended last, which covers responses
/// whose braces never balance.
pub(crate) fn json_candidates(text: &str) -> Vec<&str> {
    let mut candidates = Vec::new();

    let mut depth = 0usize;
    let mut start = None;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in text.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' if depth > 0 => in_string = true,
            '{' => {
                if depth == 0 {
                    start = Some(i);
                }
                depth += 1;
            }
            '}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    if let Some(s) = start.take() {
                        candidates.push(&text[s..=i]);
                    }
                }
            }
            _ => {}
        }
    }

    if let (Some(first), Some(last)) = (text.find('{'), text.rfind('}')) {
        if first < last {
            let greedy = &text[first..=last];
            if !candidates.contains(&greedy) {
                candidates.push(greedy);
            }
        }
    }

    candidates
}

fn score<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    score_from_value(&value).map(Some).ok_or_else(|| {
        D::Error::custom(format!(
            "score must be a whole number from {MIN_SCORE} to {MAX_SCORE}, got {value}"
        ))
    })
}

/// A score from a JSON number or numeric string with no fractional part.
fn score_from_value(value: &Value) -> Option<u8> {
    let number = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if !number.is_finite() || number.fract() != 0.0 {
        return None;
    }
    checked_score(number as i64)
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(text_from_value(&value).unwrap_or_default())
}

fn text_from_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// A list of strings. A bare string counts as a one-element list; blank
/// and non-scalar entries are dropped.
fn lenient_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let items = match value {
        Value::Array(items) => items,
        Value::String(_) => vec![value],
        _ => return Ok(Vec::new()),
    };
    Ok(items
        .iter()
        .filter_map(text_from_value)
        .filter(|s| !s.trim().is_empty())
        .collect())
}

fn issues<'de, D>(deserializer: D) -> Result<Vec<CodeIssue>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Array(items) => items
            .iter()
            .map(issue_from_value)
            .collect::<Result<_, _>>()
            .map_err(D::Error::custom),
        Value::Null => Ok(Vec::new()),
        other => Err(D::Error::custom(format!("issues must be a list, got {other}"))),
    }
}

fn issue_from_value(value: &Value) -> Result<CodeIssue, String> {
    let obj = value
        .as_object()
        .ok_or_else(|| format!("issue must be an object, got {value}"))?;
    let text = |key: &str| obj.get(key).and_then(text_from_value);

    let severity = match obj.get("severity") {
        None | Some(Value::Null) => SeverityLevel::default(),
        Some(Value::String(label)) => label.trim().parse::<SeverityLevel>()?,
        Some(other) => return Err(format!("unknown severity: {other}")),
    };

    Ok(CodeIssue {
        line: obj.get("line").and_then(line_from_value),
        severity,
        category: text("category").unwrap_or_default(),
        description: text("description").unwrap_or_default(),
        suggestion: text("suggestion").filter(|s| !s.trim().is_empty()),
    })
}

/// A line number from an integer or a numeric string.
fn line_from_value(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const FULL_RESPONSE: &str = r#"{
        "readability_score": 8,
        "modularity_score": 6,
        "maintainability_score": 7,
        "overall_summary": "Tidy code with a few rough edges.",
        "strengths": ["clear naming", "small functions"],
        "issues": [
            {
                "line": 12,
                "severity": "warning",
                "category": "bug",
                "description": "Possible division by zero",
                "suggestion": "Check the divisor first"
            }
        ],
        "suggestions": ["Add tests"],
        "potential_bugs": ["Zero divisor"],
        "security_concerns": []
    }"#;

    #[test]
    fn parse_full_response() {
        let analysis = parse_analysis_response(FULL_RESPONSE).unwrap();
        assert_eq!(analysis.readability, 8);
        assert_eq!(analysis.modularity, 6);
        assert_eq!(analysis.maintainability, 7);
        assert_eq!(analysis.summary, "Tidy code with a few rough edges.");
        assert_eq!(analysis.strengths, vec!["clear naming", "small functions"]);
        assert_eq!(
            analysis.issues,
            vec![CodeIssue {
                line: Some(12),
                severity: SeverityLevel::Warning,
                category: "bug".to_string(),
                description: "Possible division by zero".to_string(),
                suggestion: Some("Check the divisor first".to_string()),
            }]
        );
        assert_eq!(analysis.suggestions, vec!["Add tests"]);
        assert_eq!(analysis.potential_bugs, vec!["Zero divisor"]);
        assert!(analysis.security_concerns.is_empty());
    }

    #[test]
    fn parse_markdown_fenced_json() {
        let response = format!("Here is my review:\n```json\n{FULL_RESPONSE}\n```\nHope it helps!");
        let analysis = parse_analysis_response(&response).unwrap();
        assert_eq!(analysis.readability, 8);
    }

    #[test]
    fn missing_fields_default() {
        let analysis = parse_analysis_response("{}").unwrap();
        assert_eq!(analysis.readability, 5);
        assert_eq!(analysis.modularity, 5);
        assert_eq!(analysis.maintainability, 5);
        assert_eq!(analysis.summary, "");
        assert!(analysis.strengths.is_empty());
        assert!(analysis.issues.is_empty());
    }

    #[test]
    fn whole_number_scores_in_any_form_are_accepted() {
        let response = r#"{"readability_score": 7.0, "modularity_score": " 9 ", "maintainability_score": 10}"#;
        let analysis = parse_analysis_response(response).unwrap();
        assert_eq!(analysis.scores().map(|(_, s)| s), [7, 9, 10]);
    }

    #[test]
    fn out_of_range_or_fractional_scores_are_rejected() {
        for bad in ["42", "0", "-3", "7.5", r#""n/a""#, "null", "[8]"] {
            let response = format!(r#"{{"readability_score": 8, "modularity_score": {bad}}}"#);
            let err = parse_analysis_response(&response).unwrap_err();
            assert!(matches!(err, AnalysisError::Malformed(_)), "{bad}");
            assert!(err.to_string().contains("schema mismatch"), "{bad}: {err}");
        }
    }

    #[test]
    fn issue_fields_are_lenient_about_shape() {
        let response = r#"{"issues": [
            {"line": "14", "severity": "Critical", "description": "bad"},
            {"line": "around 20", "severity": "suggestion"},
            {"line": 3.5, "suggestion": ""},
            {"line": null, "severity": null, "category": "style"}
        ]}"#;
        let analysis = parse_analysis_response(response).unwrap();
        let issues = analysis.issues;
        assert_eq!(issues.len(), 4);
        assert_eq!(issues[0].line, Some(14));
        assert_eq!(issues[0].severity, SeverityLevel::Critical);
        assert_eq!(issues[0].category, "");
        assert_eq!(issues[1].line, None);
        assert_eq!(issues[1].severity, SeverityLevel::Suggestion);
        assert_eq!(issues[1].description, "");
        assert_eq!(issues[2].line, None);
        assert_eq!(issues[2].severity, SeverityLevel::Info);
        assert_eq!(issues[2].suggestion, None);
        assert_eq!(issues[3].severity, SeverityLevel::Info);
        assert_eq!(issues[3].category, "style");
    }

    #[test]
    fn unknown_severity_rejects_the_response() {
        for severity in [r#""High""#, r#""minor""#, "3"] {
            let response = format!(r#"{{"issues": [{{"severity": {severity}, "description": "x"}}]}}"#);
            let err = parse_analysis_response(&response).unwrap_err();
            assert!(err.to_string().contains("unknown severity"), "{severity}: {err}");
        }
    }

    #[test]
    fn non_object_issue_rejects_the_response() {
        let err = parse_analysis_response(r#"{"issues": ["not an object"]}"#).unwrap_err();
        assert!(err.to_string().contains("issue must be an object"));
        let err = parse_analysis_response(r#"{"issues": "none"}"#).unwrap_err();
        assert!(err.to_string().contains("issues must be a list"));
    }

    #[test]
    fn lists_accept_bare_strings_and_skip_junk() {
        let response = r#"{"strengths": "concise", "suggestions": ["a", null, "", 3, {"x": 1}]}"#;
        let analysis = parse_analysis_response(response).unwrap();
        assert_eq!(analysis.strengths, vec!["concise"]);
        assert_eq!(analysis.suggestions, vec!["a", "3"]);
    }

    #[test]
    fn braces_inside_strings_do_not_confuse_extraction() {
        let response = r#"Result: {"overall_summary": "uses } and { freely", "readability_score": 9} trailing }"#;
        let analysis = parse_analysis_response(response).unwrap();
        assert_eq!(analysis.summary, "uses } and { freely");
        assert_eq!(analysis.readability, 9);
    }

    #[test]
    fn later_object_is_tried_when_first_is_not_json() {
        let response = r#"Template {like this} then {"readability_score": 3}"#;
        let analysis = parse_analysis_response(response).unwrap();
        assert_eq!(analysis.readability, 3);
    }

    #[test]
    fn candidates_fall_back_to_greedy_span() {
        let text = r#"{"a": {"b": 1}"#;
        let candidates = json_candidates(text);
        assert_eq!(candidates, vec![r#"{"a": {"b": 1}"#]);

        let text = r#"x {"a": 1} y"#;
        assert_eq!(json_candidates(text), vec![r#"{"a": 1}"#]);
    }

    #[test]
    fn no_json_is_malformed() {
        let err = parse_analysis_response("I cannot review this code.").unwrap_err();
        assert!(matches!(err, AnalysisError::Malformed(_)));
        assert!(err.to_string().contains("no JSON object"));
    }

    #[test]
    fn empty_response_is_malformed() {
        let err = parse_analysis_response("   \n").unwrap_err();
        assert!(err.to_string().contains("empty response"));
    }

    #[test]
    fn array_response_is_malformed() {
        assert!(parse_analysis_response("[1, 2, 3]").is_err());
    }
}
