//! Splitting for languages whose blocks open with a keyword at line start.

use super::Pending;
use crate::models::chunk::{ChunkType, CodeChunk};

/// Split at `def` / `class` lines, force-flushing oversized chunks.
pub(super) fn split(lines: &[&str], max_chunk_size: usize, min_chunk_size: usize) -> Vec<CodeChunk> {
    let mut chunks = Vec::new();
    let mut pending = Pending::new();

    for (idx, line) in lines.iter().enumerate() {
        let line_no = idx + 1;

        if let Some((chunk_type, context)) = block_opener(line.trim_start()) {
            if !pending.is_empty() && pending.text_len() > min_chunk_size {
                chunks.push(pending.flush(line_no - 1));
            }
            pending.label(chunk_type, context);
        }

        pending.push(line);

        if pending.text_len() > max_chunk_size {
            chunks.push(pending.flush(line_no));
            pending.label(ChunkType::Other, String::new());
        }
    }

    if !pending.is_empty() {
        chunks.push(pending.flush(lines.len()));
    }
    chunks
}

/// Recognise a block-opening line and derive its label.
///
/// Classes are labelled up to the first `:`, functions up to the first `(`.
fn block_opener(stripped: &str) -> Option<(ChunkType, String)> {
    if stripped.starts_with("class ") {
        return Some((ChunkType::Class, label_until(stripped, ':')));
    }
    if stripped.starts_with("def ") {
        return Some((ChunkType::Function, label_until(stripped, '(')));
    }
    None
}

fn label_until(text: &str, delimiter: char) -> String {
    text.split(delimiter).next().unwrap_or(text).trim_end().to_string()
}
