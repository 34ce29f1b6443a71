//! Merging per-chunk analyses into one file-level analysis.

use indexmap::IndexSet;

use crate::models::analysis::{
    DEFAULT_SCORE, MAX_POTENTIAL_BUGS, MAX_SECURITY_CONCERNS, MAX_STRENGTHS, MAX_SUGGESTIONS,
    ReviewAnalysis, clamp_score,
};

/// Combine chunk analyses, in chunk order, into one.
///
/// Returns `None` for an empty input. A single analysis is returned as is.
pub fn merge(analyses: Vec<ReviewAnalysis>) -> Option<ReviewAnalysis> {
    let count = analyses.len();
    if count <= 1 {
        return analyses.into_iter().next();
    }

    let first_summary = analyses[0].summary.clone();
    let readability = mean_score(analyses.iter().map(|a| a.readability));
    let modularity = mean_score(analyses.iter().map(|a| a.modularity));
    let maintainability = mean_score(analyses.iter().map(|a| a.maintainability));

    let mut strengths = IndexSet::new();
    let mut suggestions = IndexSet::new();
    let mut potential_bugs = IndexSet::new();
    let mut security_concerns = IndexSet::new();
    let mut issues = Vec::new();

    for analysis in analyses {
        strengths.extend(analysis.strengths);
        suggestions.extend(analysis.suggestions);
        potential_bugs.extend(analysis.potential_bugs);
        security_concerns.extend(analysis.security_concerns);
        issues.extend(analysis.issues);
    }

    Some(ReviewAnalysis {
        readability,
        modularity,
        maintainability,
        summary: format!("Analyzed {count} code segments. {first_summary}"),
        strengths: capped(strengths, MAX_STRENGTHS),
        issues,
        suggestions: capped(suggestions, MAX_SUGGESTIONS),
        potential_bugs: capped(potential_bugs, MAX_POTENTIAL_BUGS),
        security_concerns: capped(security_concerns, MAX_SECURITY_CONCERNS),
    })
}

/// Mean of the scores, rounded half away from zero.
///
/// Computed as `(2 * sum + n) / (2 * n)` in integers, which equals
/// `floor(sum / n + 0.5)` for non-negative sums.
fn mean_score(scores: impl Iterator<Item = u8>) -> u8 {
    let (sum, n) = scores.fold((0i64, 0i64), |(sum, n), s| (sum + i64::from(s), n + 1));
    if n == 0 {
        return DEFAULT_SCORE;
    }
    clamp_score((2 * sum + n) / (2 * n))
}

fn capped(items: IndexSet<String>, cap: usize) -> Vec<String> {
    items.into_iter().take(cap).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::analysis::{CodeIssue, SeverityLevel};
    use pretty_assertions::assert_eq;

    fn analysis(score: u8, summary: &str) -> ReviewAnalysis {
        ReviewAnalysis {
            readability: score,
            modularity: score,
            maintainability: score,
            summary: summary.to_string(),
            strengths: Vec::new(),
            issues: Vec::new(),
            suggestions: Vec::new(),
            potential_bugs: Vec::new(),
            security_concerns: Vec::new(),
        }
    }

    fn issue(description: &str) -> CodeIssue {
        CodeIssue {
            line: None,
            severity: SeverityLevel::Warning,
            category: "bug".to_string(),
            description: description.to_string(),
            suggestion: None,
        }
    }

    #[test]
    fn empty_input_merges_to_none() {
        assert_eq!(merge(Vec::new()), None);
    }

    #[test]
    fn single_analysis_is_unchanged() {
        let only = analysis(7, "Fine");
        assert_eq!(merge(vec![only.clone()]), Some(only));
    }

    #[test]
    fn scores_average_with_half_rounding_up() {
        let mut a = analysis(8, "first");
        let mut b = analysis(4, "second");
        a.modularity = 7;
        b.modularity = 8;
        a.maintainability = 1;
        b.maintainability = 2;
        let merged = merge(vec![a, b]).unwrap();
        assert_eq!(merged.readability, 6);
        assert_eq!(merged.modularity, 8);
        assert_eq!(merged.maintainability, 2);
    }

    #[test]
    fn thirds_round_to_nearest() {
        let merged = merge(vec![analysis(7, ""), analysis(7, ""), analysis(8, "")]).unwrap();
        // 22 / 3 = 7.33
        assert_eq!(merged.readability, 7);
        let merged = merge(vec![analysis(7, ""), analysis(8, ""), analysis(8, "")]).unwrap();
        // 23 / 3 = 7.67
        assert_eq!(merged.readability, 8);
    }

    #[test]
    fn summary_prefixes_segment_count_to_first_summary() {
        let merged = merge(vec![analysis(5, "Looks good."), analysis(5, "Other")]).unwrap();
        assert_eq!(merged.summary, "Analyzed 2 code segments. Looks good.");
    }

    #[test]
    fn lists_are_deduplicated_in_order() {
        let mut a = analysis(5, "");
        a.strengths = vec!["clear naming".into(), "tests".into()];
        let mut b = analysis(5, "");
        b.strengths = vec!["clear naming".into(), "docs".into()];
        let merged = merge(vec![a, b]).unwrap();
        assert_eq!(merged.strengths, vec!["clear naming", "tests", "docs"]);
    }

    #[test]
    fn lists_are_capped() {
        let chunks: Vec<ReviewAnalysis> = (0..4)
            .map(|i| {
                let mut a = analysis(5, "");
                a.strengths = (0..5).map(|j| format!("strength {i}-{j}")).collect();
                a.suggestions = (0..5).map(|j| format!("suggestion {i}-{j}")).collect();
                a.potential_bugs = (0..5).map(|j| format!("bug {i}-{j}")).collect();
                a.security_concerns = (0..5).map(|j| format!("concern {i}-{j}")).collect();
                a
            })
            .collect();
        let merged = merge(chunks).unwrap();
        assert_eq!(merged.strengths.len(), MAX_STRENGTHS);
        assert_eq!(merged.suggestions.len(), MAX_SUGGESTIONS);
        assert_eq!(merged.potential_bugs.len(), MAX_POTENTIAL_BUGS);
        assert_eq!(merged.security_concerns.len(), MAX_SECURITY_CONCERNS);
        assert_eq!(merged.strengths[0], "strength 0-0");
        assert_eq!(merged.strengths[9], "strength 1-4");
    }

    #[test]
    fn issues_are_concatenated_without_dedup() {
        let mut a = analysis(5, "");
        a.issues = vec![issue("same"), issue("a-only")];
        let mut b = analysis(5, "");
        b.issues = vec![issue("same")];
        let merged = merge(vec![a, b]).unwrap();
        let descriptions: Vec<&str> = merged.issues.iter().map(|i| i.description.as_str()).collect();
        assert_eq!(descriptions, vec!["same", "a-only", "same"]);
    }

    #[test]
    fn fallbacks_merge_like_any_analysis() {
        let merged = merge(vec![
            ReviewAnalysis::fallback("boom"),
            ReviewAnalysis::fallback("boom"),
        ])
        .unwrap();
        assert_eq!(merged.readability, 5);
        assert_eq!(merged.strengths, vec!["Code structure appears standard"]);
        assert_eq!(merged.summary, "Analyzed 2 code segments. Analysis failed: boom");
    }
}
