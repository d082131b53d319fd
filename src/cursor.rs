//! Forward-only cursor over the materialized lines of a file

use crate::constants::ngi_tokens;

/// Cursor over trimmed lines
///
/// Every grammar rule consumes lines through this type, so the scanning
/// position only ever moves forward.
#[derive(Debug, Clone)]
pub struct LineCursor<'a> {
    lines: &'a [String],
    position: usize,
}

impl<'a> LineCursor<'a> {
    pub fn new(lines: &'a [String]) -> Self {
        Self::at(lines, 0)
    }

    pub fn at(lines: &'a [String], position: usize) -> Self {
        Self { lines, position }
    }

    /// Index of the current line
    pub fn position(&self) -> usize {
        self.position
    }

    /// 1-based line number of the current line, for diagnostics
    pub fn line_number(&self) -> usize {
        self.position + 1
    }

    /// The untrimmed lines the cursor runs over
    pub fn lines(&self) -> &'a [String] {
        self.lines
    }

    pub fn is_at_end(&self) -> bool {
        self.position >= self.lines.len()
    }

    /// Current line, trimmed
    pub fn peek(&self) -> Option<&'a str> {
        self.peek_at(0)
    }

    /// Line `offset` positions ahead of the current one, trimmed
    pub fn peek_at(&self, offset: usize) -> Option<&'a str> {
        self.lines
            .get(self.position + offset)
            .map(|line| line.trim())
    }

    /// Return the current line and move past it
    pub fn next_line(&mut self) -> Option<&'a str> {
        let line = self.peek();
        self.advance(1);
        line
    }

    /// Move forward `n` lines, clamped to the end of input
    pub fn advance(&mut self, n: usize) {
        self.position = (self.position + n).min(self.lines.len());
    }

    /// Move to the first line at or after the current one that satisfies
    /// `predicate`. Returns that line, or `None` with the cursor at the end.
    pub fn skip_to<F>(&mut self, predicate: F) -> Option<&'a str>
    where
        F: Fn(&str) -> bool,
    {
        while let Some(line) = self.peek() {
            if predicate(line) {
                return Some(line);
            }
            self.advance(1);
        }
        None
    }
}

/// Id of a `$RECORD <id>` line, shared by both file grammars
pub fn record_id(line: &str) -> Option<&str> {
    let rest = line.strip_prefix(ngi_tokens::RECORD)?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    rest.split_whitespace().next()
}

/// Strip whitespace and surrounding quotes from a layer name line
pub fn unquote_name(line: &str) -> &str {
    line.trim().trim_matches('"')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_peek_and_advance() {
        let lines = lines(&["  first ", "second", "third"]);
        let mut cursor = LineCursor::new(&lines);

        assert_eq!(cursor.peek(), Some("first"));
        assert_eq!(cursor.peek_at(2), Some("third"));
        assert_eq!(cursor.peek_at(3), None);

        cursor.advance(2);
        assert_eq!(cursor.position(), 2);
        assert_eq!(cursor.line_number(), 3);

        cursor.advance(10);
        assert!(cursor.is_at_end());
        assert_eq!(cursor.position(), 3);
        assert_eq!(cursor.peek(), None);
    }

    #[test]
    fn test_next_line_consumes() {
        let lines = lines(&["a", "b"]);
        let mut cursor = LineCursor::new(&lines);

        assert_eq!(cursor.next_line(), Some("a"));
        assert_eq!(cursor.next_line(), Some("b"));
        assert_eq!(cursor.next_line(), None);
        assert!(cursor.is_at_end());
    }

    #[test]
    fn test_skip_to() {
        let lines = lines(&["x", "", "BOUND(1,2,3,4)", "y"]);
        let mut cursor = LineCursor::new(&lines);

        let found = cursor.skip_to(|line| line.starts_with("BOUND"));
        assert_eq!(found, Some("BOUND(1,2,3,4)"));
        assert_eq!(cursor.position(), 2);

        cursor.advance(1);
        assert_eq!(cursor.skip_to(|line| line == "missing"), None);
        assert!(cursor.is_at_end());
    }

    #[test]
    fn test_record_id() {
        assert_eq!(record_id("$RECORD 12"), Some("12"));
        assert_eq!(record_id("$RECORD   A-7  x"), Some("A-7"));
        assert_eq!(record_id("$RECORD"), None);
        assert_eq!(record_id("$RECORD "), None);
        assert_eq!(record_id("$RECORDS 1"), None);
    }

    #[test]
    fn test_unquote_name() {
        assert_eq!(unquote_name("  \"PARCEL\" "), "PARCEL");
        assert_eq!(unquote_name("필지"), "필지");
    }
}
