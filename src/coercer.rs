//! Type-directed coercion of raw NDA field tokens
//!
//! The strict contract lives in [`coerce`]. [`CoercionPolicy::Lenient`] wraps
//! it for callers that prefer keeping the raw text over losing a record.

use crate::error::{DecodeError, Result};
use crate::models::{FieldType, PropertyValue};
use serde::{Deserialize, Serialize};

/// How coercion failures are treated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoercionPolicy {
    /// Failures are errors; the NDA parser skips the affected record
    #[default]
    Strict,
    /// Failures keep the unquoted raw text as a string value
    Lenient,
}

/// Result of coercing one token under a policy
#[derive(Debug)]
pub enum Coerced {
    Value(PropertyValue),
    Absent,
    /// Lenient fallback: raw text kept, with the error it replaced
    Raw { value: String, cause: DecodeError },
}

impl CoercionPolicy {
    pub fn apply(self, raw: &str, field_type: &FieldType) -> Result<Coerced> {
        match coerce(raw, field_type) {
            Ok(Some(value)) => Ok(Coerced::Value(value)),
            Ok(None) => Ok(Coerced::Absent),
            Err(cause) => match self {
                CoercionPolicy::Strict => Err(cause),
                CoercionPolicy::Lenient => Ok(Coerced::Raw {
                    value: unquote(raw.trim()).trim().to_string(),
                    cause,
                }),
            },
        }
    }
}

/// Coerce `raw` according to a declared type token such as `NUMERIC`
pub fn coerce_declared(raw: &str, declared_type: &str) -> Result<Option<PropertyValue>> {
    let field_type = declared_type.parse::<FieldType>()?;
    coerce(raw, &field_type)
}

/// Strictly coerce `raw` to a typed value; `Ok(None)` means absent.
///
/// Absent values are never an error, even for an unsupported field type.
pub fn coerce(raw: &str, field_type: &FieldType) -> Result<Option<PropertyValue>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "\"\"" {
        return Ok(None);
    }

    let value = unquote(trimmed).trim();
    if value.is_empty() {
        return Ok(None);
    }

    match field_type {
        FieldType::String => Ok(Some(PropertyValue::String(value.to_string()))),
        FieldType::Numeric => parse_numeric(value).map(Some),
        FieldType::Unsupported(token) => Err(DecodeError::UnsupportedFieldType {
            field_type: token.clone(),
        }),
    }
}

fn parse_numeric(value: &str) -> Result<PropertyValue> {
    if value.chars().any(char::is_alphabetic) {
        return Err(DecodeError::invalid_field_value(
            value,
            FieldType::Numeric.as_str(),
            "contains non-numeric characters",
        ));
    }

    if value.contains('.') {
        value
            .parse::<f64>()
            .map(PropertyValue::Float)
            .map_err(|e| {
                DecodeError::invalid_field_value(value, FieldType::Numeric.as_str(), e.to_string())
            })
    } else {
        value
            .parse::<i64>()
            .map(PropertyValue::Integer)
            .map_err(|e| {
                DecodeError::invalid_field_value(value, FieldType::Numeric.as_str(), e.to_string())
            })
    }
}

/// Strip one layer of surrounding double quotes
fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_values() {
        assert_eq!(
            coerce("123", &FieldType::Numeric).unwrap(),
            Some(PropertyValue::Integer(123))
        );
        assert_eq!(
            coerce("123.45", &FieldType::Numeric).unwrap(),
            Some(PropertyValue::Float(123.45))
        );
        assert_eq!(
            coerce("-123.45", &FieldType::Numeric).unwrap(),
            Some(PropertyValue::Float(-123.45))
        );
        assert_eq!(
            coerce("-123", &FieldType::Numeric).unwrap(),
            Some(PropertyValue::Integer(-123))
        );
        assert_eq!(
            coerce("9999999999", &FieldType::Numeric).unwrap(),
            Some(PropertyValue::Integer(9_999_999_999))
        );
        assert_eq!(
            coerce(" \"42\" ", &FieldType::Numeric).unwrap(),
            Some(PropertyValue::Integer(42))
        );
    }

    #[test]
    fn test_invalid_numeric_values() {
        let err = coerce("abc", &FieldType::Numeric).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidFieldValue { .. }));

        let err = coerce("123.45.67", &FieldType::Numeric).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidFieldValue { .. }));

        let err = coerce("12-3", &FieldType::Numeric).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidFieldValue { .. }));
    }

    #[test]
    fn test_string_values() {
        assert_eq!(
            coerce("\"test\"", &FieldType::String).unwrap(),
            Some(PropertyValue::String("test".to_string()))
        );
        assert_eq!(
            coerce("  test  ", &FieldType::String).unwrap(),
            Some(PropertyValue::String("test".to_string()))
        );
        assert_eq!(
            coerce("\"테스트\"", &FieldType::String).unwrap(),
            Some(PropertyValue::String("테스트".to_string()))
        );
        assert_eq!(
            coerce("123", &FieldType::String).unwrap(),
            Some(PropertyValue::String("123".to_string()))
        );
        assert_eq!(
            coerce("test!@#$", &FieldType::String).unwrap(),
            Some(PropertyValue::String("test!@#$".to_string()))
        );
    }

    #[test]
    fn test_absent_values() {
        assert_eq!(coerce("", &FieldType::String).unwrap(), None);
        assert_eq!(coerce("\"\"", &FieldType::String).unwrap(), None);
        assert_eq!(coerce("", &FieldType::Numeric).unwrap(), None);
        assert_eq!(coerce("   ", &FieldType::Numeric).unwrap(), None);
    }

    #[test]
    fn test_declared_type_tokens() {
        assert_eq!(
            coerce_declared("7", "numeric").unwrap(),
            Some(PropertyValue::Integer(7))
        );

        let err = coerce_declared("7", "DATE").unwrap_err();
        assert!(matches!(err, DecodeError::UnsupportedFieldType { .. }));
    }

    #[test]
    fn test_unsupported_type_fails_only_when_present() {
        let date = FieldType::from_declared("DATE");

        let err = coerce("20240101", &date).unwrap_err();
        assert!(matches!(err, DecodeError::UnsupportedFieldType { .. }));
        assert_eq!(coerce("", &date).unwrap(), None);

        match CoercionPolicy::Lenient.apply("\"20240101\"", &date).unwrap() {
            Coerced::Raw { value, cause } => {
                assert_eq!(value, "20240101");
                assert!(matches!(cause, DecodeError::UnsupportedFieldType { .. }));
            }
            other => panic!("expected raw fallback, got {:?}", other),
        }
    }

    #[test]
    fn test_strict_policy_propagates_failure() {
        let result = CoercionPolicy::Strict.apply("abc", &FieldType::Numeric);
        assert!(matches!(
            result,
            Err(DecodeError::InvalidFieldValue { .. })
        ));
    }

    #[test]
    fn test_lenient_policy_keeps_raw_text() {
        match CoercionPolicy::Lenient.apply("\"12a\"", &FieldType::Numeric).unwrap() {
            Coerced::Raw { value, cause } => {
                assert_eq!(value, "12a");
                assert!(matches!(cause, DecodeError::InvalidFieldValue { .. }));
            }
            other => panic!("expected raw fallback, got {:?}", other),
        }

        assert!(matches!(
            CoercionPolicy::Lenient.apply("", &FieldType::Numeric).unwrap(),
            Coerced::Absent
        ));
        assert!(matches!(
            CoercionPolicy::Lenient.apply("5", &FieldType::Numeric).unwrap(),
            Coerced::Value(PropertyValue::Integer(5))
        ));
    }
}
