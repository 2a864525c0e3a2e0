//! Line/column lookup for error positions and snippets.

/// Pre-computed line offset table for line/column lookup.
///
/// # Example
///
/// ```
/// use rvs_diagnostic::span_utils::LineOffsetTable;
///
/// let source = "a = 1;\nb = 2;";
/// let table = LineOffsetTable::build(source);
///
/// assert_eq!(table.offset_to_line_col(source, 0), (1, 1));
/// assert_eq!(table.offset_to_line_col(source, 11), (2, 5));
/// assert_eq!(table.line_text(source, 2), "b = 2;");
/// ```
#[derive(Clone, Debug, Default)]
pub struct LineOffsetTable {
    /// Byte offset of each line start; `offsets[0] == 0`.
    offsets: Vec<u32>,
}

impl LineOffsetTable {
    /// Build a line offset table from source text.
    pub fn build(source: &str) -> Self {
        let mut offsets = vec![0u32];
        for (i, byte) in source.bytes().enumerate() {
            if byte == b'\n' {
                offsets.push(u32::try_from(i + 1).unwrap_or(u32::MAX));
            }
        }
        LineOffsetTable { offsets }
    }

    /// Get 1-based line number from a byte offset.
    #[inline]
    pub fn line_from_offset(&self, offset: u32) -> u32 {
        let line_idx = match self.offsets.binary_search(&offset) {
            Ok(exact) => exact,
            Err(insert) => insert.saturating_sub(1),
        };
        u32::try_from(line_idx).unwrap_or(u32::MAX - 1) + 1
    }

    /// Get 1-based (line, column) from a byte offset.
    ///
    /// The column counts characters, not bytes.
    pub fn offset_to_line_col(&self, source: &str, offset: u32) -> (u32, u32) {
        let line = self.line_from_offset(offset);
        let line_start = self.line_start(line);
        let offset = (offset as usize).min(source.len());
        let col = source
            .get(line_start..offset)
            .map_or(0, |text| text.chars().count());
        (line, u32::try_from(col).unwrap_or(u32::MAX - 1) + 1)
    }

    /// Text of a 1-based line without its line terminator.
    ///
    /// Returns an empty string for out-of-range lines.
    pub fn line_text<'a>(&self, source: &'a str, line: u32) -> &'a str {
        if line == 0 || line as usize > self.offsets.len() {
            return "";
        }
        let start = self.line_start(line);
        let end = self
            .offsets
            .get(line as usize)
            .map_or(source.len(), |&next| next as usize);
        source
            .get(start..end)
            .unwrap_or("")
            .trim_end_matches(['\n', '\r'])
    }

    pub fn line_count(&self) -> usize {
        self.offsets.len()
    }

    #[inline]
    fn line_start(&self, line: u32) -> usize {
        self.offsets
            .get(line.saturating_sub(1) as usize)
            .copied()
            .unwrap_or(0) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_from_offset_multiple_lines() {
        let table = LineOffsetTable::build("line1\nline2\nline3");
        assert_eq!(table.line_from_offset(0), 1);
        assert_eq!(table.line_from_offset(5), 1);
        assert_eq!(table.line_from_offset(6), 2);
        assert_eq!(table.line_from_offset(12), 3);
        assert_eq!(table.line_count(), 3);
    }

    #[test]
    fn test_column_counts_characters() {
        let source = "é = 1;";
        let table = LineOffsetTable::build(source);
        // 'é' is two bytes; '=' sits at byte 3 but column 3.
        assert_eq!(table.offset_to_line_col(source, 3), (1, 3));
    }

    #[test]
    fn test_offset_past_end_is_clamped() {
        let source = "ab";
        let table = LineOffsetTable::build(source);
        assert_eq!(table.offset_to_line_col(source, 99), (1, 3));
    }

    #[test]
    fn test_line_text_strips_crlf() {
        let source = "a = 1;\r\nb = 2;\r\n";
        let table = LineOffsetTable::build(source);
        assert_eq!(table.line_text(source, 1), "a = 1;");
        assert_eq!(table.line_text(source, 2), "b = 2;");
        assert_eq!(table.line_text(source, 3), "");
        assert_eq!(table.line_text(source, 9), "");
    }
}
