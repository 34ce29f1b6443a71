//! Source splitter for large files.
//!
//! Splits a file into bounded-size chunks at shallow textual boundaries
//! (block-opening keywords, balanced braces, or fixed line windows) so each
//! piece fits comfortably in a single LLM request. No parsing is involved;
//! chunks are not guaranteed to be syntactically valid on their own.
//!
//! Lines are the `\n`-separated segments of the input. Chunks never split a
//! line, never overlap, and joining their contents with `\n` reproduces the
//! input exactly.

mod brace;
mod indent;
mod window;

use tracing::debug;

use crate::language::LanguageFamily;
use crate::models::chunk::{ChunkType, CodeChunk};

/// Default maximum chunk size in characters.
pub const DEFAULT_MAX_CHUNK_SIZE: usize = 3000;

/// Accumulated text at or below this many characters is never flushed at a
/// unit boundary; it is folded into the next unit instead.
pub const DEFAULT_MIN_CHUNK_SIZE: usize = 50;

/// Splits source text into [`CodeChunk`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunker {
    max_chunk_size: usize,
    min_chunk_size: usize,
}

impl Chunker {
    /// Create a chunker with the given maximum chunk size (in characters).
    pub fn new(max_chunk_size: usize) -> Self {
        Self {
            max_chunk_size,
            min_chunk_size: DEFAULT_MIN_CHUNK_SIZE,
        }
    }

    /// Override the minimum size a chunk needs before a unit boundary flushes it.
    pub fn with_min_chunk_size(mut self, min_chunk_size: usize) -> Self {
        self.min_chunk_size = min_chunk_size;
        self
    }

    pub fn max_chunk_size(&self) -> usize {
        self.max_chunk_size
    }

    /// Split `source` into ordered chunks using the strategy for `language`.
    ///
    /// Always returns at least one chunk. Files no longer than the maximum
    /// chunk size come back whole as a single [`ChunkType::Full`] chunk.
    pub fn chunk(&self, source: &str, language: &str) -> Vec<CodeChunk> {
        if source.chars().count() <= self.max_chunk_size {
            return vec![CodeChunk {
                content: source.to_string(),
                start_line: 1,
                end_line: source.split('\n').count(),
                chunk_type: ChunkType::Full,
                context: "Complete file".to_string(),
            }];
        }

        let lines: Vec<&str> = source.split('\n').collect();
        let family = LanguageFamily::of(language);
        let chunks = match family {
            LanguageFamily::Indentation => {
                indent::split(&lines, self.max_chunk_size, self.min_chunk_size)
            }
            LanguageFamily::Brace => brace::split(&lines, self.max_chunk_size, self.min_chunk_size),
            LanguageFamily::Generic => window::split(&lines, self.max_chunk_size),
        };

        debug!(
            language,
            ?family,
            lines = lines.len(),
            chunks = chunks.len(),
            "split source into chunks"
        );
        chunks
    }
}

impl Default for Chunker {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CHUNK_SIZE)
    }
}

/// Lines accumulated for the chunk currently being built.
///
/// Tracks the joined (`\n`-separated) character length incrementally so
/// size checks stay linear in the input.
struct Pending<'a> {
    lines: Vec<&'a str>,
    start_line: usize,
    chars: usize,
    chunk_type: ChunkType,
    context: String,
}

impl<'a> Pending<'a> {
    fn new() -> Self {
        Self {
            lines: Vec::new(),
            start_line: 1,
            chars: 0,
            chunk_type: ChunkType::Other,
            context: String::new(),
        }
    }

    fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Character length of the lines joined with `\n`.
    fn text_len(&self) -> usize {
        self.chars
    }

    fn push(&mut self, line: &'a str) {
        if !self.lines.is_empty() {
            self.chars += 1;
        }
        self.chars += line.chars().count();
        self.lines.push(line);
    }

    /// Set the role and label carried by the chunk being built.
    fn label(&mut self, chunk_type: ChunkType, context: String) {
        self.chunk_type = chunk_type;
        self.context = context;
    }

    /// Emit the accumulated lines as a chunk ending at `end_line`.
    ///
    /// The role and label stay active; the next chunk starts on the
    /// following line.
    fn flush(&mut self, end_line: usize) -> CodeChunk {
        let chunk = CodeChunk {
            content: self.lines.join("\n"),
            start_line: self.start_line,
            end_line,
            chunk_type: self.chunk_type,
            context: self.context.clone(),
        };
        self.lines.clear();
        self.chars = 0;
        self.start_line = end_line + 1;
        chunk
    }
}
