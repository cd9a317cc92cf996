//! Line and column computation for diagnostic positions.

use sift_ir::Span;

/// 1-based line number where `span` starts.
pub fn line_number(source: &str, span: Span) -> u32 {
    offset_to_line_col(source, span.start).0
}

/// Compute 1-based (line, column) from a byte offset.
///
/// The column counts characters, not bytes, from the start of the line.
pub fn offset_to_line_col(source: &str, offset: u32) -> (u32, u32) {
    let offset = (offset as usize).min(source.len());
    let mut line = 1u32;
    let mut line_start = 0usize;

    for (i, &byte) in source.as_bytes()[..offset].iter().enumerate() {
        if byte == b'\n' {
            line += 1;
            line_start = i + 1;
        }
    }

    let col_text = source.get(line_start..offset).unwrap_or_default();
    let col = u32::try_from(col_text.chars().count()).unwrap_or(u32::MAX - 1) + 1;

    (line, col)
}
