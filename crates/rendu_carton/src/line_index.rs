//! Byte offset to line/column conversion.

/// Zero-based line and column (in bytes) of a source offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineColumn {
    pub line: u32,
    pub column: u32,
}

/// Precomputed line starts for a source text.
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<u32>,
    len: u32,
}

impl LineIndex {
    /// Build a line index for `source`.
    pub fn new(source: &str) -> Self {
        let mut line_starts = Vec::with_capacity(source.len() / 32 + 1);
        line_starts.push(0);
        for (idx, byte) in source.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push(idx as u32 + 1);
            }
        }
        Self {
            line_starts,
            len: source.len() as u32,
        }
    }

    /// Resolve an offset. Offsets past the end clamp to the last position.
    pub fn line_column(&self, offset: u32) -> LineColumn {
        let offset = offset.min(self.len);
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        LineColumn {
            line: line as u32,
            column: offset - self.line_starts[line],
        }
    }

    /// Number of lines.
    #[inline]
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_column() {
        let index = LineIndex::new("ab\ncd\n\nef");
        assert_eq!(index.line_count(), 4);
        assert_eq!(index.line_column(0), LineColumn { line: 0, column: 0 });
        assert_eq!(index.line_column(4), LineColumn { line: 1, column: 1 });
        assert_eq!(index.line_column(6), LineColumn { line: 2, column: 0 });
        assert_eq!(index.line_column(8), LineColumn { line: 3, column: 1 });
        assert_eq!(index.line_column(100), LineColumn { line: 3, column: 2 });
    }
}
