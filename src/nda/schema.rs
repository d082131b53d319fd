//! `ATTRIB(name, type)` field declarations

use crate::error::{DecodeError, Result};
use crate::models::{FieldDefinition, FieldType};
use crate::splitter::split_quoted;
use regex::Regex;
use std::sync::LazyLock;

static ATTRIB_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ATTRIB\s*\((.*)\)$").expect("ATTRIB pattern is valid"));

/// Parse one `ATTRIB(...)` line into a field definition.
///
/// Arguments after the type (width, precision) are accepted and ignored.
/// An unknown type token is kept as [`FieldType::Unsupported`].
pub fn parse_field_definition(line: &str) -> Result<FieldDefinition> {
    let captures = ATTRIB_PATTERN
        .captures(line.trim())
        .ok_or_else(|| DecodeError::InvalidFieldDefinition {
            line: line.trim().to_string(),
            reason: "expected ATTRIB(name, type)".to_string(),
        })?;

    let arguments = split_quoted(&captures[1]);
    let (name, declared_type) = match arguments.as_slice() {
        [name, declared_type, ..] if !name.is_empty() => (name, declared_type),
        _ => {
            return Err(DecodeError::InvalidFieldDefinition {
                line: line.trim().to_string(),
                reason: "missing field name or type".to_string(),
            });
        }
    };

    Ok(FieldDefinition::new(
        name.as_str(),
        FieldType::from_declared(declared_type),
    ))
}
