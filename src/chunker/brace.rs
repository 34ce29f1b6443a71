//! Splitting for `{`/`}` delimited languages (JavaScript, TypeScript).
//!
//! Size-triggered flushes only happen when the running brace depth is
//! back at zero, so an open block is never cut in half. Unit boundaries
//! (declarations) flush regardless of depth.

use super::Pending;
use crate::models::chunk::{ChunkType, CodeChunk};

/// Keywords that, combined with an assignment of a function value, open a unit.
const DECLARATION_KEYWORDS: [&str; 6] = ["function ", "class ", "const ", "let ", "var ", "export "];

pub(super) fn split(lines: &[&str], max_chunk_size: usize, min_chunk_size: usize) -> Vec<CodeChunk> {
    let mut chunks = Vec::new();
    let mut pending = Pending::new();
    let mut depth: i64 = 0;

    for (idx, line) in lines.iter().enumerate() {
        let line_no = idx + 1;

        if let Some((chunk_type, context)) = unit_opener(line.trim_start()) {
            if !pending.is_empty() && pending.text_len() > min_chunk_size {
                chunks.push(pending.flush(line_no - 1));
            }
            pending.label(chunk_type, context);
        }

        pending.push(line);
        depth += brace_delta(line);

        if depth == 0 && pending.text_len() > max_chunk_size {
            chunks.push(pending.flush(line_no));
            pending.label(ChunkType::Other, String::new());
        }
    }

    if !pending.is_empty() {
        chunks.push(pending.flush(lines.len()));
    }
    chunks
}

/// Recognise a function-valued assignment (`const f = (x) => ...`,
/// `export let g = function ...`), labelled with its left-hand side.
///
/// Plain `function name()` declarations are not units; they only split
/// through size flushes.
fn unit_opener(stripped: &str) -> Option<(ChunkType, String)> {
    let has_keyword = DECLARATION_KEYWORDS.iter().any(|k| stripped.contains(k));
    if !(has_keyword
        && stripped.contains('=')
        && (stripped.contains("=>") || stripped.contains("function")))
    {
        return None;
    }
    let lhs = stripped.split('=').next().unwrap_or_default().trim();
    Some((ChunkType::Function, lhs.to_string()))
}

fn brace_delta(line: &str) -> i64 {
    line.chars().fold(0, |acc, c| match c {
        '{' => acc + 1,
        '}' => acc - 1,
        _ => acc,
    })
}
