//! Terminal renderer: styled flowing text.

use std::fmt::Write as _;

use colored::{ColoredString, Colorize};

use crate::models::analysis::{CodeIssue, ReviewAnalysis, SeverityLevel};
use crate::models::{CodeChunk, CodeReview, ReviewStats};
use crate::output::OutputRenderer;

const RULE: &str = "───────────────────────────────────";

/// Terminal output renderer with colored, flowing text.
pub struct TerminalRenderer;

/// Score colored by band: green from 8, yellow from 5, red below.
fn score(value: u8) -> ColoredString {
    let text = format!("{value:>2}/10");
    match value {
        8.. => text.green().bold(),
        5..=7 => text.yellow().bold(),
        _ => text.red().bold(),
    }
}

fn severity(level: SeverityLevel) -> (ColoredString, ColoredString) {
    let label = level.to_string();
    match level {
        SeverityLevel::Critical => ("✖".red().bold(), label.red().bold()),
        SeverityLevel::Warning => ("⚠".yellow().bold(), label.yellow().bold()),
        SeverityLevel::Suggestion => ("➜".cyan().bold(), label.cyan().bold()),
        SeverityLevel::Info => ("ℹ".blue().bold(), label.blue().bold()),
    }
}

fn push_list(out: &mut String, title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    let _ = writeln!(out, "\n {}", title.bold());
    for item in items {
        let _ = writeln!(out, "   {} {item}", "•".dimmed());
    }
}

fn push_issue(out: &mut String, issue: &CodeIssue) {
    let (icon, label) = severity(issue.severity);
    let location = match issue.line {
        Some(line) => format!("line {line}"),
        None => "general".to_string(),
    };
    let category = if issue.category.is_empty() {
        String::new()
    } else {
        format!(" [{}]", issue.category)
    };
    let _ = writeln!(out, "   {icon} {label} at {}{}", location.bold(), category.dimmed());
    let _ = writeln!(out, "     {}", issue.description);
    if let Some(ref suggestion) = issue.suggestion {
        let _ = writeln!(out, "     {} {suggestion}", "→".cyan());
    }
}

fn push_analysis(out: &mut String, analysis: &ReviewAnalysis) {
    for (name, value) in analysis.scores() {
        let _ = writeln!(out, "   {:<16} {}", name, score(value));
    }
    if !analysis.summary.is_empty() {
        let _ = writeln!(out, "\n {}", analysis.summary);
    }

    push_list(out, "Strengths", &analysis.strengths);

    if !analysis.issues.is_empty() {
        let mut issues = analysis.issues.clone();
        // most severe first, otherwise keep model order
        issues.sort_by(|a, b| b.severity.cmp(&a.severity));
        let _ = writeln!(out, "\n {}", "Issues".bold());
        for issue in &issues {
            push_issue(out, issue);
        }
    }

    push_list(out, "Suggestions", &analysis.suggestions);
    push_list(out, "Potential bugs", &analysis.potential_bugs);
    push_list(out, "Security concerns", &analysis.security_concerns);
}

impl OutputRenderer for TerminalRenderer {
    fn render_review(&self, review: &CodeReview) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            " {} {}",
            review.filename.bold(),
            format!(
                "({}, {} lines, {} bytes)",
                review.language, review.lines_of_code, review.file_size
            )
            .dimmed()
        );
        let _ = writeln!(out, "{}", RULE.dimmed());
        push_analysis(&mut out, &review.analysis);
        let _ = writeln!(out, "{}", RULE.dimmed());
        let _ = writeln!(out, " {} {}", "review id:".dimmed(), review.id);
        out
    }

    fn render_history(&self, reviews: &[CodeReview]) -> String {
        if reviews.is_empty() {
            return format!("{}", "  No reviews recorded yet.\n".dimmed());
        }

        let mut out = String::new();
        for review in reviews {
            let a = &review.analysis;
            let _ = writeln!(
                out,
                " {}  {} {}",
                review.id.dimmed(),
                review.filename.bold(),
                format!("({})", review.language).dimmed(),
            );
            let _ = writeln!(
                out,
                "   readability {}  modularity {}  maintainability {}",
                score(a.readability),
                score(a.modularity),
                score(a.maintainability),
            );
        }
        out
    }

    fn render_stats(&self, stats: &ReviewStats) -> String {
        let mut out = String::new();
        let _ = writeln!(out, " {} {}", "Total reviews:".bold(), stats.total_reviews);
        if stats.total_reviews == 0 {
            return out;
        }

        let _ = writeln!(out, "\n {}", "Languages".bold());
        for (language, count) in &stats.languages {
            let _ = writeln!(out, "   {language:<16} {count}");
        }

        let _ = writeln!(out, "\n {}", "Average scores".bold());
        for (name, value) in [
            ("readability", stats.avg_readability),
            ("modularity", stats.avg_modularity),
            ("maintainability", stats.avg_maintainability),
        ] {
            let _ = writeln!(out, "   {name:<16} {value:.1}");
        }

        let _ = writeln!(out, "\n {}", "Recent reviews".bold());
        out.push_str(&self.render_history(&stats.recent_reviews));
        out
    }

    fn render_chunks(&self, filename: &str, language: &str, chunks: &[CodeChunk]) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            " {} {}",
            filename.bold(),
            format!("({language}, {} chunks)", chunks.len()).dimmed()
        );
        for (i, chunk) in chunks.iter().enumerate() {
            let range = format!("{}-{}", chunk.start_line, chunk.end_line);
            let _ = writeln!(
                out,
                "   {:>3}  {:<11} {:<9} {}",
                i + 1,
                range,
                chunk.chunk_type.to_string().cyan(),
                chunk.context
            );
        }
        out
    }
}
