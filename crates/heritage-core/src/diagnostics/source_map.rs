//! Byte offset to line/column conversion

use std::ops::Range;
use std::path::Path;

use super::Location;
use crate::cst::SyntaxToken;

/// Source map for efficient byte offset to line/column conversion
///
/// Uses a precomputed table of line start offsets for O(log n) lookup.
#[derive(Debug, Clone)]
pub struct SourceMap {
    /// Byte offset of each line start (line 1 starts at 0)
    line_starts: Vec<usize>,
}

impl SourceMap {
    /// Create a source map from source text
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        for (idx, ch) in source.char_indices() {
            if ch == '\n' {
                line_starts.push(idx + 1);
            }
        }
        Self { line_starts }
    }

    /// Convert byte offset to 1-based `(line, column)`
    ///
    /// Columns count characters, not bytes.
    pub fn offset_to_position(&self, offset: usize, source: &str) -> (usize, usize) {
        let line_idx = match self.line_starts.binary_search(&offset) {
            Ok(idx) => idx,
            Err(idx) => idx.saturating_sub(1),
        };

        let line_start = self.line_starts.get(line_idx).copied().unwrap_or(0);
        let column = source
            .get(line_start..offset.min(source.len()))
            .map(|text| text.chars().count())
            .unwrap_or(0)
            + 1;

        (line_idx + 1, column)
    }

    /// Create a Location from a byte span
    pub fn span_to_diagnostic_location(
        &self,
        span: &Range<usize>,
        source: &str,
        file_path: &Path,
    ) -> Location {
        let (line, column) = self.offset_to_position(span.start, source);
        let (end_line, end_column) = self.offset_to_position(span.end, source);

        Location {
            file: file_path.to_path_buf(),
            line,
            column,
            end_line: Some(end_line),
            end_column: Some(end_column),
            offset: span.start,
            length: span.end - span.start,
        }
    }

    /// Convert a CST token to a diagnostic location
    pub fn token_to_diagnostic_location(
        &self,
        token: &SyntaxToken,
        source: &str,
        file_path: &Path,
    ) -> Location {
        let range = token.text_range();
        let span = usize::from(range.start())..usize::from(range.end());
        self.span_to_diagnostic_location(&span, source, file_path)
    }
}
