//! Structure-agnostic splitting into fixed line windows.

use crate::models::chunk::{ChunkType, CodeChunk};

/// Rough average characters per source line, used to turn a character
/// budget into a line count.
const AVG_CHARS_PER_LINE: usize = 50;

pub(super) fn split(lines: &[&str], max_chunk_size: usize) -> Vec<CodeChunk> {
    let window = (max_chunk_size / AVG_CHARS_PER_LINE).max(1);

    lines
        .chunks(window)
        .enumerate()
        .map(|(i, slice)| {
            let start_line = i * window + 1;
            let end_line = start_line + slice.len() - 1;
            CodeChunk {
                content: slice.join("\n"),
                start_line,
                end_line,
                chunk_type: ChunkType::Segment,
                context: format!("Lines {start_line}-{end_line}"),
            }
        })
        .collect()
}
