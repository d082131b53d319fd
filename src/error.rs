//! Error handling for NGI/NDA decoding operations.
//!
//! Fatal errors abort a parse and are propagated to the caller. Recoverable
//! problems found while scanning are reported as
//! [`Diagnostic`](crate::diagnostics::Diagnostic) records instead.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("File {path} is {size} bytes, exceeding the configured limit of {limit} bytes")]
    FileTooLarge { path: PathBuf, size: u64, limit: u64 },

    #[error("Unknown text encoding label: {label}")]
    UnknownEncoding { label: String },

    #[error("File {path} cannot be decoded as {encoding}")]
    Undecodable { path: PathBuf, encoding: String },

    #[error("Invalid geometry type at line {line}: {reason}")]
    InvalidGeometryType { line: usize, reason: String },

    #[error("Invalid bounds at line {line}: {reason}")]
    InvalidBounds { line: usize, reason: String },

    #[error("Invalid value '{value}' for {field_type} field: {reason}")]
    InvalidFieldValue {
        value: String,
        field_type: String,
        reason: String,
    },

    #[error("Invalid field definition '{line}': {reason}")]
    InvalidFieldDefinition { line: String, reason: String },

    #[error("Unsupported field type: {field_type}")]
    UnsupportedFieldType { field_type: String },

    #[error("Directory traversal failed under {path}: {source}")]
    DirectoryTraversal {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl DecodeError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn invalid_field_value(
        value: impl Into<String>,
        field_type: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidFieldValue {
            value: value.into(),
            field_type: field_type.into(),
            reason: reason.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DecodeError>;
