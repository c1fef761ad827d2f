use crate::Span;

/// Represents the mapping between AST positions and source code positions.
/// Used by error reporting to highlight exactly where a diagnostic occurs.
pub struct SourceMap<'a> {
    source_code: &'a str, // The full source code as a string slice
    file_name: &'a str,   // Name of the file containing the source code
}

impl<'a> SourceMap<'a> {
    /// Creates a new SourceMap
    ///
    /// # Arguments
    /// - `file_name`: name of the source file
    /// - `source_code`: the content of the file
    pub fn new(file_name: &'a str, source_code: &'a str) -> Self {
        Self {
            source_code,
            file_name,
        }
    }

    /// Formats a message with source context.
    /// Highlights the part of the source code indicated by `span` and appends `message`.
    ///
    /// Example output:
    /// ```text
    /// bus.sv --> line 3:5
    ///      |
    ///   3  | if (x) break;
    ///      |        ^~~~~ message
    /// ```
    pub fn format_message(&self, message: String, span: Span) -> String {
        let line_text = self.get_line_text(span.start);
        let column = self.get_col_number(span.start);

        let marker_start = column.saturating_sub(1);
        let marker_len = span.end.saturating_sub(span.start).max(1);

        // Pad up to the marker, preserving tab alignment
        let mut marker_line = String::new();
        for ch in line_text.chars().take(marker_start) {
            marker_line.push(if ch == '\t' { '\t' } else { ' ' });
        }
        marker_line.push('^');
        for _ in 1..marker_len {
            marker_line.push('~');
        }
        marker_line.push(' ');
        marker_line.push_str(&message);

        format!(
            "{} --> line {}:{}\n     |\n{:>4} | {}\n     | {}\n",
            self.file_name, span.line, column, span.line, line_text, marker_line
        )
    }

    /// Returns the text of the line containing the given offset.
    fn get_line_text(&self, offset: usize) -> &str {
        let offset = offset.min(self.source_code.len());
        let start = self.source_code[..offset]
            .rfind('\n')
            .map_or(0, |pos| pos + 1);
        let end = self.source_code[offset..]
            .find('\n')
            .map_or(self.source_code.len(), |pos| offset + pos);

        &self.source_code[start..end]
    }

    /// Returns the column number (1-based) corresponding to the given offset.
    fn get_col_number(&self, offset: usize) -> usize {
        let offset = offset.min(self.source_code.len());
        let line_start = self.source_code[..offset]
            .rfind('\n')
            .map_or(0, |pos| pos + 1);

        self.source_code[line_start..offset].chars().count() + 1
    }
}
