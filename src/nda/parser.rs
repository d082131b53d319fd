//! NDA attribute file scanner

use indexmap::IndexMap;
use std::path::Path;
use tracing::{debug, info};

use super::schema::parse_field_definition;
use crate::coercer::{Coerced, CoercionPolicy};
use crate::config::DecoderConfig;
use crate::constants::nda_tokens;
use crate::cursor::{record_id, unquote_name, LineCursor};
use crate::diagnostics::{DiagnosticKind, Diagnostics, ParseStats};
use crate::error::{DecodeError, Result};
use crate::models::{FieldDefinition, LayerMap, LayerName, PropertyMap, PropertyValue, RecordId};
use crate::source::read_lines;
use crate::splitter::split_quoted;

/// Classification of one trimmed NDA line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NdaLine<'a> {
    LayerStart,
    LayerName,
    FieldDefinitions,
    DataStart,
    DataEnd,
    Record(&'a str),
    Other,
}

impl<'a> NdaLine<'a> {
    pub fn classify(line: &'a str) -> Self {
        match line {
            nda_tokens::LAYER_START => NdaLine::LayerStart,
            nda_tokens::LAYER_NAME => NdaLine::LayerName,
            nda_tokens::FIELD_DEF => NdaLine::FieldDefinitions,
            nda_tokens::DATA_START => NdaLine::DataStart,
            nda_tokens::DATA_END => NdaLine::DataEnd,
            _ => record_id(line).map_or(NdaLine::Other, NdaLine::Record),
        }
    }
}

/// Everything decoded from one NDA file
#[derive(Debug, Clone, Default)]
pub struct AttributeParseResult {
    pub records: LayerMap<PropertyMap>,
    /// Declared fields per layer, in declaration order
    pub schemas: IndexMap<LayerName, Vec<FieldDefinition>>,
    pub diagnostics: Diagnostics,
    pub stats: ParseStats,
}

impl AttributeParseResult {
    pub fn schema(&self, layer: &str) -> Option<&[FieldDefinition]> {
        self.schemas.get(layer).map(Vec::as_slice)
    }
}

/// NDA attribute file parser
#[derive(Debug, Clone)]
pub struct NdaParser {
    policy: CoercionPolicy,
    encoding: String,
    max_file_bytes: Option<u64>,
}

impl Default for NdaParser {
    fn default() -> Self {
        Self::from_config(&DecoderConfig::default())
    }
}

impl NdaParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: CoercionPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn from_config(config: &DecoderConfig) -> Self {
        Self {
            policy: config.coercion_policy,
            encoding: config.encoding.clone(),
            max_file_bytes: config.max_file_bytes,
        }
    }

    /// Read and decode an NDA file
    pub fn parse_file(&self, path: &Path) -> Result<AttributeParseResult> {
        info!("Parsing NDA file: {}", path.display());
        let lines = read_lines(path, &self.encoding, self.max_file_bytes)?;
        let result = self.parse_lines(&lines);

        info!(
            "Parsed {} attribute records in {} layers from {} ({} diagnostics)",
            result.stats.records_stored,
            result.records.len(),
            path.display(),
            result.diagnostics.len()
        );
        Ok(result)
    }

    pub fn parse_lines(&self, lines: &[String]) -> AttributeParseResult {
        let mut scan = Scan {
            policy: self.policy,
            cursor: LineCursor::new(lines),
            current_layer: None,
            current_record: None,
            in_data: false,
            result: AttributeParseResult::default(),
        };
        scan.run();
        scan.result
    }
}

/// Outcome of coercing one data line
enum RecordValues {
    Stored(PropertyMap),
    Empty,
    Rejected,
}

struct Scan<'a> {
    policy: CoercionPolicy,
    cursor: LineCursor<'a>,
    current_layer: Option<LayerName>,
    current_record: Option<RecordId>,
    in_data: bool,
    result: AttributeParseResult,
}

impl<'a> Scan<'a> {
    fn run(&mut self) {
        while let Some(line) = self.cursor.peek() {
            match NdaLine::classify(line) {
                NdaLine::LayerName => self.enter_layer(),
                NdaLine::FieldDefinitions if self.current_layer.is_some() => {
                    self.read_field_definitions()
                }
                NdaLine::DataStart => {
                    self.in_data = true;
                    self.cursor.advance(1);
                }
                NdaLine::DataEnd => {
                    if let (true, Some(layer)) = (self.in_data, &self.current_layer) {
                        debug!(
                            "Layer {} data section ended: {} records",
                            layer,
                            self.result.records.get(layer).map_or(0, IndexMap::len)
                        );
                    }
                    self.in_data = false;
                    self.cursor.advance(1);
                }
                NdaLine::Record(id) if self.in_data && self.current_layer.is_some() => {
                    self.read_record(id)
                }
                NdaLine::LayerStart
                | NdaLine::FieldDefinitions
                | NdaLine::Record(_)
                | NdaLine::Other => self.cursor.advance(1),
            }
        }
    }

    /// `$LAYER_NAME` and its name line; the layer's field list starts over
    fn enter_layer(&mut self) {
        self.cursor.advance(1);
        let Some(name_line) = self.cursor.next_line() else {
            return;
        };

        let name = unquote_name(name_line).to_string();
        debug!("Processing layer: {}", name);
        self.result.records.entry(name.clone()).or_default();
        self.result.schemas.insert(name.clone(), Vec::new());
        self.current_layer = Some(name);
    }

    /// `$ASPATIAL_FIELD_DEF` up to and including its `$END`
    fn read_field_definitions(&mut self) {
        self.cursor.advance(1);

        while let Some(line) = self.cursor.peek() {
            if line == nda_tokens::FIELD_DEF_END {
                self.cursor.advance(1);
                break;
            }

            if line.starts_with(nda_tokens::ATTRIB) {
                match parse_field_definition(line) {
                    Ok(field) => {
                        debug!("Field added: {} ({})", field.name, field.field_type);
                        self.push_field(field);
                    }
                    Err(e) => {
                        let line_number = self.cursor.line_number();
                        self.warn(DiagnosticKind::InvalidFieldDefinition, line_number, e.to_string());
                    }
                }
            }
            self.cursor.advance(1);
        }

        if let Some(layer) = &self.current_layer {
            debug!(
                "Layer {} field definitions completed: {} fields",
                layer,
                self.result.schemas.get(layer).map_or(0, Vec::len)
            );
        }
    }

    fn push_field(&mut self, field: FieldDefinition) {
        if let Some(layer) = &self.current_layer {
            self.result
                .schemas
                .entry(layer.clone())
                .or_default()
                .push(field);
        }
    }

    /// `$RECORD <id>` and the data line after it
    fn read_record(&mut self, id: &str) {
        self.current_record = Some(id.to_string());
        let record_line = self.cursor.line_number();

        let Some(data_line) = self.cursor.peek_at(1) else {
            self.warn(
                DiagnosticKind::MissingDataLine,
                record_line,
                "record has no data line",
            );
            self.result.stats.records_skipped += 1;
            self.cursor.advance(1);
            return;
        };
        let data_line_number = record_line + 1;
        self.cursor.advance(2);
        self.result.stats.records_seen += 1;

        match self.coerce_record(data_line, data_line_number) {
            RecordValues::Stored(properties) => {
                if let Some(layer) = &self.current_layer {
                    self.result
                        .records
                        .entry(layer.clone())
                        .or_default()
                        .insert(id.to_string(), properties);
                    self.result.stats.records_stored += 1;
                }
            }
            RecordValues::Empty => self.result.stats.records_empty += 1,
            RecordValues::Rejected => self.result.stats.records_skipped += 1,
        }
    }

    fn coerce_record(&mut self, data_line: &str, line_number: usize) -> RecordValues {
        let values = split_quoted(data_line);
        let fields = self
            .current_layer
            .as_ref()
            .and_then(|layer| self.result.schemas.get(layer))
            .cloned()
            .unwrap_or_default();

        if values.len() != fields.len() {
            self.warn(
                DiagnosticKind::FieldCountMismatch,
                line_number,
                format!(
                    "field count mismatch (expected: {}, actual: {})",
                    fields.len(),
                    values.len()
                ),
            );
            return RecordValues::Rejected;
        }

        let mut properties = PropertyMap::new();
        for (field, raw) in fields.iter().zip(&values) {
            match self.policy.apply(raw, &field.field_type) {
                Ok(Coerced::Value(value)) => {
                    properties.insert(field.name.clone(), value);
                }
                Ok(Coerced::Absent) => {}
                Ok(Coerced::Raw { value, cause }) => {
                    self.warn(
                        DiagnosticKind::LenientFieldValue,
                        line_number,
                        format!("field {}: {}; raw text kept", field.name, cause),
                    );
                    properties.insert(field.name.clone(), PropertyValue::String(value));
                }
                Err(e) => {
                    let kind = match e {
                        DecodeError::UnsupportedFieldType { .. } => {
                            DiagnosticKind::UnsupportedFieldType
                        }
                        _ => DiagnosticKind::InvalidFieldValue,
                    };
                    self.warn(
                        kind,
                        line_number,
                        format!("field {}: {}; record skipped", field.name, e),
                    );
                    return RecordValues::Rejected;
                }
            }
        }

        if properties.is_empty() {
            RecordValues::Empty
        } else {
            RecordValues::Stored(properties)
        }
    }

    fn warn(&mut self, kind: DiagnosticKind, line: usize, message: impl Into<String>) {
        self.result.diagnostics.push(
            kind,
            line,
            self.current_layer.as_deref(),
            self.current_record.as_deref(),
            message,
        );
    }
}
