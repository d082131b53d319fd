//! Recoverable parse diagnostics and statistics
//!
//! Parsers never write warnings to the log directly. They collect
//! [`Diagnostic`] records in file order and hand them back with the parsed
//! maps; the caller decides whether and how to surface them.

use serde::Serialize;
use std::fmt;
use tracing::warn;

/// Category of a recoverable problem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DiagnosticKind {
    /// Coordinate line that is not two floats
    InvalidCoordinate,
    /// Coordinate block whose count line is not an integer
    InvalidPointCount,
    /// Single coordinate expected but missing or unparseable
    MissingCoordinate,
    /// Polygon ring with fewer than four points after closure
    TooFewRingPoints,
    /// Polygon ring with degenerate winding
    DegenerateRing,
    /// Polygon declaring a part count other than one
    UnsupportedPartCount,
    /// `$GEOMETRIC_METADATA` block that could not be read
    InvalidMetadata,
    /// `ATTRIB(...)` line that could not be read
    InvalidFieldDefinition,
    /// `$RECORD` in a data section with no data line after it
    MissingDataLine,
    /// Data line value count differs from the layer's field count
    FieldCountMismatch,
    /// Value rejected by strict coercion; the record was dropped
    InvalidFieldValue,
    /// Value of a field whose declared type is unknown; the record was dropped
    UnsupportedFieldType,
    /// Value kept as raw text under lenient coercion
    LenientFieldValue,
}

/// One recoverable problem, located in the source file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// 1-based line number
    pub line: usize,
    pub layer: Option<String>,
    pub record: Option<String>,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}", self.line)?;
        if let Some(layer) = &self.layer {
            write!(f, ", layer {}", layer)?;
        }
        if let Some(record) = &self.record {
            write!(f, ", record {}", record)?;
        }
        write!(f, ": {}", self.message)
    }
}

/// Ordered collection of diagnostics for one file
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(
        &mut self,
        kind: DiagnosticKind,
        line: usize,
        layer: Option<&str>,
        record: Option<&str>,
        message: impl Into<String>,
    ) {
        self.entries.push(Diagnostic {
            kind,
            line,
            layer: layer.map(str::to_string),
            record: record.map(str::to_string),
            message: message.into(),
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    pub fn count_of(&self, kind: DiagnosticKind) -> usize {
        self.entries.iter().filter(|d| d.kind == kind).count()
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.entries.extend(other.entries);
    }

    /// Emit every entry as a `warn!` event tagged with `source`
    pub fn log_all(&self, source: &str) {
        for diagnostic in &self.entries {
            warn!("{}: {}", source, diagnostic);
        }
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Record counters for one parsed file
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParseStats {
    /// `$RECORD` entries that reached a geometry or data line
    pub records_seen: usize,

    /// Records stored in the output map
    pub records_stored: usize,

    /// Records dropped because of a diagnostic
    pub records_skipped: usize,

    /// Records with no present value (attribute files only)
    pub records_empty: usize,
}

impl ParseStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Share of seen records that were stored, as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.records_seen == 0 {
            0.0
        } else {
            (self.records_stored as f64 / self.records_seen as f64) * 100.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_display() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.push(
            DiagnosticKind::FieldCountMismatch,
            12,
            Some("필지"),
            Some("7"),
            "expected 2 values, found 3",
        );
        diagnostics.push(DiagnosticKind::InvalidMetadata, 3, None, None, "bad MASK");

        let rendered: Vec<String> = diagnostics.iter().map(ToString::to_string).collect();
        assert_eq!(
            rendered,
            vec![
                "line 12, layer 필지, record 7: expected 2 values, found 3",
                "line 3: bad MASK",
            ]
        );
        assert_eq!(diagnostics.count_of(DiagnosticKind::FieldCountMismatch), 1);
        assert_eq!(diagnostics.count_of(DiagnosticKind::DegenerateRing), 0);
    }

    #[test]
    fn test_success_rate() {
        let stats = ParseStats {
            records_seen: 4,
            records_stored: 3,
            records_skipped: 1,
            records_empty: 0,
        };
        assert_eq!(stats.success_rate(), 75.0);
        assert_eq!(ParseStats::new().success_rate(), 0.0);
    }
}
