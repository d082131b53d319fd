//! Quote-aware splitting of NDA data lines

use crate::constants::FIELD_DELIMITER;

/// Split `line` on the standard NDA delimiter
pub fn split_quoted(line: &str) -> Vec<String> {
    split_quoted_with(line, FIELD_DELIMITER)
}

/// Split `line` on `delimiter`, ignoring delimiters inside double quotes.
///
/// Every `"` toggles the quoted state and is dropped from the output; there
/// is no escaped-quote syntax. Fields are trimmed and a trailing field is
/// always emitted, so an empty line yields one empty field.
pub fn split_quoted_with(line: &str, delimiter: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in line.chars() {
        if ch == '"' {
            in_quotes = !in_quotes;
        } else if ch == delimiter && !in_quotes {
            fields.push(current.trim().to_string());
            current.clear();
        } else {
            current.push(ch);
        }
    }

    fields.push(current.trim().to_string());
    fields
}
