//! Filename → language tag lookup.
//!
//! Detection is purely extension based. The tag also selects the chunking
//! strategy through [`LanguageFamily`].

/// Tag returned for files with no known extension.
pub const UNKNOWN_LANGUAGE: &str = "unknown";

/// Extension (lowercase, with leading dot) → language tag.
const EXTENSION_MAP: &[(&str, &str)] = &[
    (".py", "python"),
    (".js", "javascript"),
    (".jsx", "javascript"),
    (".ts", "typescript"),
    (".tsx", "typescript"),
    (".java", "java"),
    (".go", "go"),
    (".rs", "rust"),
    (".cpp", "cpp"),
    (".c", "c"),
    (".cs", "csharp"),
    (".php", "php"),
    (".rb", "ruby"),
    (".swift", "swift"),
    (".kt", "kotlin"),
    (".scala", "scala"),
    (".r", "r"),
    (".sql", "sql"),
    (".sh", "bash"),
    (".yaml", "yaml"),
    (".yml", "yaml"),
    (".json", "json"),
    (".html", "html"),
    (".css", "css"),
    (".scss", "scss"),
    (".vue", "vue"),
    (".dart", "dart"),
];

/// Coarse grouping of languages by how blocks are delimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageFamily {
    /// Blocks opened by a keyword at line start (`def`, `class`).
    Indentation,
    /// Blocks delimited by `{` / `}`.
    Brace,
    /// No structural knowledge; split by line windows.
    Generic,
}

impl LanguageFamily {
    /// Classify a language tag. Matching is case-insensitive.
    pub fn of(language: &str) -> Self {
        match language.to_lowercase().as_str() {
            "python" | "py" => LanguageFamily::Indentation,
            "javascript" | "js" | "typescript" | "ts" | "jsx" | "tsx" => LanguageFamily::Brace,
            _ => LanguageFamily::Generic,
        }
    }
}

/// Detect the language of a file from its name.
///
/// Only the text after the last `.` is considered, so `archive.tar.py`
/// is Python and `Makefile` is unknown.
pub fn detect(filename: &str) -> &'static str {
    let Some((_, ext)) = filename.rsplit_once('.') else {
        return UNKNOWN_LANGUAGE;
    };
    let ext = format!(".{}", ext.to_lowercase());
    EXTENSION_MAP
        .iter()
        .find(|(e, _)| *e == ext)
        .map(|(_, lang)| *lang)
        .unwrap_or(UNKNOWN_LANGUAGE)
}

/// All supported extensions paired with their language tag.
pub fn supported_extensions() -> impl Iterator<Item = (&'static str, &'static str)> {
    EXTENSION_MAP.iter().copied()
}
