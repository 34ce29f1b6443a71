//! Analysis types: the structured verdict for a chunk or a whole file.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Lowest score an analysis can carry.
pub const MIN_SCORE: u8 = 1;

/// Highest score an analysis can carry.
pub const MAX_SCORE: u8 = 10;

/// Score used when the model omits one, and for fallback analyses.
pub const DEFAULT_SCORE: u8 = 5;

/// Caps applied to the merged text lists.
pub const MAX_STRENGTHS: usize = 10;
pub const MAX_SUGGESTIONS: usize = 15;
pub const MAX_POTENTIAL_BUGS: usize = 10;
pub const MAX_SECURITY_CONCERNS: usize = 10;

/// Severity of a flagged issue.
///
/// The ordering is used for display only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityLevel {
    #[default]
    Info,
    Suggestion,
    Warning,
    Critical,
}

/// Accepts the four level names in any letter case; anything else is an error.
impl<'de> Deserialize<'de> for SeverityLevel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.trim().parse::<Self>().map_err(D::Error::custom)
    }
}

impl fmt::Display for SeverityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeverityLevel::Critical => write!(f, "critical"),
            SeverityLevel::Warning => write!(f, "warning"),
            SeverityLevel::Suggestion => write!(f, "suggestion"),
            SeverityLevel::Info => write!(f, "info"),
        }
    }
}

impl std::str::FromStr for SeverityLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "critical" => Ok(SeverityLevel::Critical),
            "warning" => Ok(SeverityLevel::Warning),
            "suggestion" => Ok(SeverityLevel::Suggestion),
            "info" => Ok(SeverityLevel::Info),
            _ => Err(format!("unknown severity: {s}")),
        }
    }
}

/// One flagged problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeIssue {
    /// Line the issue refers to, when the model gave one.
    pub line: Option<u32>,
    pub severity: SeverityLevel,
    /// Free-form category such as "security" or "readability".
    pub category: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

/// Quality verdict for a chunk or a whole file.
///
/// Field names on the wire match the stored review records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewAnalysis {
    #[serde(rename = "readability_score", deserialize_with = "bounded_score")]
    pub readability: u8,
    #[serde(rename = "modularity_score", deserialize_with = "bounded_score")]
    pub modularity: u8,
    #[serde(rename = "maintainability_score", deserialize_with = "bounded_score")]
    pub maintainability: u8,
    #[serde(rename = "overall_summary")]
    pub summary: String,
    pub strengths: Vec<String>,
    pub issues: Vec<CodeIssue>,
    pub suggestions: Vec<String>,
    pub potential_bugs: Vec<String>,
    pub security_concerns: Vec<String>,
}

impl ReviewAnalysis {
    /// The degraded analysis substituted when a model call fails.
    ///
    /// Shaped exactly like a real result so it merges like one.
    pub fn fallback(reason: impl fmt::Display) -> Self {
        Self {
            readability: DEFAULT_SCORE,
            modularity: DEFAULT_SCORE,
            maintainability: DEFAULT_SCORE,
            summary: format!("Analysis failed: {reason}"),
            strengths: vec!["Code structure appears standard".to_string()],
            issues: Vec::new(),
            suggestions: vec!["Review the code manually for improvements".to_string()],
            potential_bugs: vec!["Unable to detect automatically".to_string()],
            security_concerns: vec!["Manual security review recommended".to_string()],
        }
    }

    /// The three scores in display order.
    pub fn scores(&self) -> [(&'static str, u8); 3] {
        [
            ("readability", self.readability),
            ("modularity", self.modularity),
            ("maintainability", self.maintainability),
        ]
    }
}

/// Clamp an arbitrary integer into the valid score range.
pub fn clamp_score(value: i64) -> u8 {
    value.clamp(i64::from(MIN_SCORE), i64::from(MAX_SCORE)) as u8
}

/// `value` as a score, or `None` when it lies outside the valid range.
pub fn checked_score(value: i64) -> Option<u8> {
    (i64::from(MIN_SCORE)..=i64::from(MAX_SCORE))
        .contains(&value)
        .then_some(value as u8)
}

fn bounded_score<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let value = i64::deserialize(deserializer)?;
    checked_score(value).ok_or_else(|| {
        D::Error::custom(format!(
            "score {value} is outside {MIN_SCORE}..={MAX_SCORE}"
        ))
    })
}
