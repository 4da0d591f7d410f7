//! Malformed entry types for unusable trace lines.
//!
//! When a JSONL line cannot be parsed into a [`LoggedRecord`](crate::model::LoggedRecord),
//! we keep a MalformedEntry so the caller can report it and keep going.

/// A trace log line that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedEntry {
    line_number: usize,
    raw_line: String,
    error_message: String,
}

impl MalformedEntry {
    /// Create a new malformed entry.
    ///
    /// # Arguments
    ///
    /// * `line_number` - The line number in the JSONL file (1-indexed)
    /// * `raw_line` - The raw line content that failed to parse
    /// * `error_message` - Human-readable error message
    pub fn new(
        line_number: usize,
        raw_line: impl Into<String>,
        error_message: impl Into<String>,
    ) -> Self {
        Self {
            line_number,
            raw_line: raw_line.into(),
            error_message: error_message.into(),
        }
    }

    /// Get the line number where the error occurred.
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Get the raw line content.
    pub fn raw_line(&self) -> &str {
        &self.raw_line
    }

    /// Get the error message.
    pub fn error_message(&self) -> &str {
        &self.error_message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_entry_stores_all_fields() {
        let entry = MalformedEntry::new(3, "{not json", "Invalid JSON at line 3: eof");
        assert_eq!(entry.line_number(), 3);
        assert_eq!(entry.raw_line(), "{not json");
        assert_eq!(entry.error_message(), "Invalid JSON at line 3: eof");
    }

    #[test]
    fn malformed_entry_accepts_string_types() {
        let entry = MalformedEntry::new(1, String::from("raw"), String::from("msg"));
        assert_eq!(entry.raw_line(), "raw");
        assert_eq!(entry.error_message(), "msg");
    }
}
