//! Review prompt construction.

/// System instruction sent with every review request.
pub const SYSTEM_PROMPT: &str =
    "You are an expert code reviewer. Always respond with valid JSON only, no additional text.";

/// The response shape the model is asked to produce.
const RESPONSE_TEMPLATE: &str = r#"{
    "readability_score": <1-10>,
    "modularity_score": <1-10>,
    "maintainability_score": <1-10>,
    "overall_summary": "<brief summary of code quality>",
    "strengths": ["<strength 1>", "<strength 2>", ...],
    "issues": [
        {
            "line": <line number or null>,
            "severity": "<critical|warning|suggestion|info>",
            "category": "<readability|performance|security|bug|best-practice>",
            "description": "<issue description>",
            "suggestion": "<how to fix it>"
        }
    ],
    "suggestions": ["<actionable improvement 1>", "<actionable improvement 2>", ...],
    "potential_bugs": ["<potential bug 1>", "<potential bug 2>", ...],
    "security_concerns": ["<security issue 1>", "<security issue 2>", ...]
}"#;

const FOCUS_AREAS: &str = "\
Focus on:
1. **Readability**: Variable names, comments, code structure
2. **Modularity**: Function/class design, separation of concerns
3. **Potential Bugs**: Logic errors, edge cases, null checks
4. **Security**: Input validation, injection risks, data exposure
5. **Best Practices**: Language-specific conventions, patterns
6. **Performance**: Inefficient algorithms, unnecessary operations";

/// Build the user prompt for one piece of code.
///
/// `hint` describes where the code sits in its file (for example
/// `chunk 2/5: def parse`). An empty hint adds no note.
pub fn build_prompt(code: &str, language: &str, hint: &str) -> String {
    let mut prompt = format!(
        "You are an expert code reviewer. Analyze the following {language} code and provide a comprehensive review."
    );

    if !hint.is_empty() {
        prompt.push_str(&format!("\n\n**Note:** This is {hint}"));
    }

    prompt.push_str(&format!("\n\nCODE TO REVIEW:\n```{language}\n{code}\n```\n\n"));
    prompt.push_str("Provide your analysis in the following JSON format (MUST be valid JSON):\n");
    prompt.push_str(RESPONSE_TEMPLATE);
    prompt.push_str("\n\n");
    prompt.push_str(FOCUS_AREAS);
    prompt.push_str("\n\nBe specific and actionable. Reference line numbers when possible.");
    prompt
}
