//! Chunk types produced by the chunker.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What textual construct opened a chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChunkType {
    /// The whole file fits in one chunk.
    Full,
    Function,
    Class,
    Import,
    /// Opened after a size-triggered flush.
    Other,
    /// Fixed line window from the generic splitter.
    Segment,
}

impl fmt::Display for ChunkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ChunkType::Full => "full",
            ChunkType::Function => "function",
            ChunkType::Class => "class",
            ChunkType::Import => "import",
            ChunkType::Other => "other",
            ChunkType::Segment => "segment",
        };
        f.write_str(s)
    }
}

/// A contiguous slice of a source file.
///
/// Line numbers are 1-based and inclusive. Chunks of one file never
/// overlap and together cover every line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeChunk {
    pub content: String,
    pub start_line: usize,
    pub end_line: usize,
    pub chunk_type: ChunkType,
    /// Short label such as a function signature. May be empty.
    pub context: String,
}

impl CodeChunk {
    /// Number of lines spanned by the chunk.
    pub fn line_count(&self) -> usize {
        self.end_line - self.start_line + 1
    }
}
