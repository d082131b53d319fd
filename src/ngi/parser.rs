//! NGI geometry file scanner
//!
//! Lines are first classified into [`NgiLine`] tokens; the scanner then
//! dispatches on the token kind and lets each geometry rule consume its
//! lines through the shared [`LineCursor`].

use indexmap::IndexMap;
use std::path::Path;
use tracing::{debug, info};

use super::coordinates::{is_block_terminator, parse_coordinate_line, read_block, CoordinateBlock};
use super::metadata::{parse_bounds, parse_geometry_type_mask, LayerMetadata};
use crate::config::DecoderConfig;
use crate::constants::ngi_tokens;
use crate::constants::MIN_RING_POINTS;
use crate::cursor::{record_id, unquote_name, LineCursor};
use crate::diagnostics::{DiagnosticKind, Diagnostics, ParseStats};
use crate::error::Result;
use crate::models::{Geometry, LayerMap, LayerName, Point, RecordId};
use crate::ring::{Ring, RingError, WindingRule};
use crate::source::read_lines;

/// Geometry keywords that start a geometry rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryKeyword {
    Polygon,
    LineString,
    NetworkChain,
    Point,
    MultiPoint,
    Text,
}

/// Classification of one trimmed NGI line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NgiLine<'a> {
    Blank,
    LayerName,
    Record(&'a str),
    GeometricMetadata,
    Geometry(GeometryKeyword),
    Other,
}

impl<'a> NgiLine<'a> {
    pub fn classify(line: &'a str) -> Self {
        match line {
            "" => NgiLine::Blank,
            ngi_tokens::LAYER_NAME => NgiLine::LayerName,
            ngi_tokens::GEOMETRIC_METADATA => NgiLine::GeometricMetadata,
            ngi_tokens::POLYGON => NgiLine::Geometry(GeometryKeyword::Polygon),
            ngi_tokens::LINESTRING => NgiLine::Geometry(GeometryKeyword::LineString),
            ngi_tokens::NETWORKCHAIN | ngi_tokens::NETWORK_CHAIN => {
                NgiLine::Geometry(GeometryKeyword::NetworkChain)
            }
            ngi_tokens::POINT => NgiLine::Geometry(GeometryKeyword::Point),
            ngi_tokens::MULTIPOINT => NgiLine::Geometry(GeometryKeyword::MultiPoint),
            ngi_tokens::TEXT => NgiLine::Geometry(GeometryKeyword::Text),
            _ => record_id(line).map_or(NgiLine::Other, NgiLine::Record),
        }
    }
}

/// Everything decoded from one NGI file
#[derive(Debug, Clone, Default)]
pub struct GeometryParseResult {
    pub layers: LayerMap<Geometry>,
    pub metadata: IndexMap<LayerName, LayerMetadata>,
    pub diagnostics: Diagnostics,
    pub stats: ParseStats,
}

/// NGI geometry file parser
#[derive(Debug, Clone)]
pub struct NgiParser {
    force_ccw_polygons: bool,
    winding_rule: WindingRule,
    encoding: String,
    max_file_bytes: Option<u64>,
}

impl Default for NgiParser {
    fn default() -> Self {
        Self::from_config(&DecoderConfig::default())
    }
}

impl NgiParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &DecoderConfig) -> Self {
        Self {
            force_ccw_polygons: config.force_ccw_polygons,
            winding_rule: config.winding_rule,
            encoding: config.encoding.clone(),
            max_file_bytes: config.max_file_bytes,
        }
    }

    /// Read and decode an NGI file
    pub fn parse_file(&self, path: &Path) -> Result<GeometryParseResult> {
        info!("Parsing NGI file: {}", path.display());
        let lines = read_lines(path, &self.encoding, self.max_file_bytes)?;
        let result = self.parse_lines(&lines);

        info!(
            "Parsed {} geometries in {} layers from {} ({} diagnostics)",
            result.stats.records_stored,
            result.layers.len(),
            path.display(),
            result.diagnostics.len()
        );
        Ok(result)
    }

    /// Decode already materialized lines
    pub fn parse_lines(&self, lines: &[String]) -> GeometryParseResult {
        let mut scan = Scan::new(self, lines);
        scan.run();
        scan.finish()
    }
}

/// Mutable state of one scan
struct Scan<'p, 'a> {
    parser: &'p NgiParser,
    cursor: LineCursor<'a>,
    current_layer: Option<LayerName>,
    current_record: Option<RecordId>,
    result: GeometryParseResult,
}

impl<'p, 'a> Scan<'p, 'a> {
    fn new(parser: &'p NgiParser, lines: &'a [String]) -> Self {
        Self {
            parser,
            cursor: LineCursor::new(lines),
            current_layer: None,
            current_record: None,
            result: GeometryParseResult::default(),
        }
    }

    fn finish(self) -> GeometryParseResult {
        self.result
    }

    fn run(&mut self) {
        while let Some(line) = self.cursor.peek() {
            match NgiLine::classify(line) {
                NgiLine::Blank | NgiLine::Other => self.cursor.advance(1),
                NgiLine::LayerName => self.enter_layer(),
                NgiLine::Record(id) => {
                    self.current_record = Some(id.to_string());
                    self.cursor.advance(1);
                }
                NgiLine::GeometricMetadata => self.read_metadata(),
                NgiLine::Geometry(keyword) => self.read_geometry(keyword),
            }
        }
    }

    fn enter_layer(&mut self) {
        self.cursor.advance(1);
        let Some(name_line) = self.cursor.next_line() else {
            return;
        };

        let name = unquote_name(name_line).to_string();
        debug!("Processing layer: {}", name);
        self.result.layers.entry(name.clone()).or_default();
        self.current_layer = Some(name);
    }

    /// Read a `$GEOMETRIC_METADATA` block up to its `$END`
    fn read_metadata(&mut self) {
        let block_start = self.cursor.position();
        self.cursor.advance(1);
        self.cursor
            .skip_to(|line| line.starts_with('$') || line.starts_with('<'));
        let block_end = self.cursor.position();
        if self.cursor.peek() == Some("$END") {
            self.cursor.advance(1);
        }

        // Slicing at the block end keeps the forward scans inside the block
        let upto_end = &self.cursor_lines()[..block_end];
        let block = &upto_end[block_start..];
        let mut metadata = LayerMetadata::default();

        if block.iter().any(|line| line.trim().starts_with("MASK")) {
            match parse_geometry_type_mask(upto_end, block_start) {
                Ok((kind, _)) => metadata.declared_kind = Some(kind),
                Err(e) => self.warn(DiagnosticKind::InvalidMetadata, block_start + 1, e.to_string()),
            }
        }
        if block.iter().any(|line| line.trim().starts_with("BOUND")) {
            match parse_bounds(upto_end, block_start) {
                Ok((bounds, _)) => metadata.bounds = Some(bounds),
                Err(e) => self.warn(DiagnosticKind::InvalidMetadata, block_start + 1, e.to_string()),
            }
        }

        debug!(
            "Layer metadata: kind={:?} bounds={:?}",
            metadata.declared_kind, metadata.bounds
        );

        if let Some(layer) = &self.current_layer {
            self.result.metadata.insert(layer.clone(), metadata);
        }
    }

    fn read_geometry(&mut self, keyword: GeometryKeyword) {
        let keyword_line = self.cursor.line_number();
        self.cursor.advance(1);

        let (Some(layer), Some(record)) = (self.current_layer.clone(), self.current_record.clone())
        else {
            return;
        };
        self.result.stats.records_seen += 1;

        let geometry = match keyword {
            GeometryKeyword::Polygon => self.read_polygon(keyword_line),
            GeometryKeyword::LineString => {
                let block = self.read_coordinate_block();
                Some(Geometry::LineString(block.points))
            }
            GeometryKeyword::NetworkChain => {
                let block = self.read_coordinate_block();
                Some(Geometry::MultiLineString(vec![block.points]))
            }
            GeometryKeyword::MultiPoint => {
                let block = self.read_coordinate_block();
                Some(Geometry::MultiPoint(block.points))
            }
            GeometryKeyword::Point => self.read_single_point().map(Geometry::Point),
            GeometryKeyword::Text => self.read_single_point().map(Geometry::Text),
        };

        match geometry {
            Some(geometry) => {
                self.result.stats.records_stored += 1;
                self.result
                    .layers
                    .entry(layer)
                    .or_default()
                    .insert(record, geometry);
            }
            None => self.result.stats.records_skipped += 1,
        }
    }

    fn read_polygon(&mut self, keyword_line: usize) -> Option<Geometry> {
        if let Some(parts) = self.cursor.peek().and_then(numparts) {
            let numparts_line = self.cursor.line_number();
            self.cursor.advance(1);
            if parts != 1 {
                for _ in 0..parts {
                    let before = self.cursor.position();
                    self.read_coordinate_block();
                    if self.cursor.position() == before {
                        break;
                    }
                }
                self.warn(
                    DiagnosticKind::UnsupportedPartCount,
                    numparts_line,
                    format!("polygon declares {} parts, only single-part polygons are supported", parts),
                );
                return None;
            }
        }

        let block = self.read_coordinate_block();
        if block.points.len() < MIN_RING_POINTS {
            self.warn(
                DiagnosticKind::TooFewRingPoints,
                keyword_line,
                format!(
                    "polygon has {} coordinates, at least {} required",
                    block.points.len(),
                    MIN_RING_POINTS
                ),
            );
            return None;
        }

        let ring = match Ring::with_rule(block.points, self.parser.winding_rule) {
            Ok(ring) => ring,
            Err(RingError::TooFewPoints { count }) => {
                self.warn(
                    DiagnosticKind::TooFewRingPoints,
                    keyword_line,
                    format!("polygon ring has {} points after closure", count),
                );
                return None;
            }
            Err(RingError::Degenerate) => {
                self.warn(
                    DiagnosticKind::DegenerateRing,
                    keyword_line,
                    "polygon ring winding is degenerate",
                );
                return None;
            }
        };

        let ring = if self.parser.force_ccw_polygons {
            ring.oriented(true)
        } else {
            ring
        };
        Some(Geometry::Polygon(vec![ring]))
    }

    fn read_coordinate_block(&mut self) -> CoordinateBlock {
        let count_line = self.cursor.line_number();
        let count_text = self.cursor.peek().unwrap_or_default();
        let block = read_block(&mut self.cursor);

        if block.declared.is_none() && !is_block_terminator(count_text) {
            self.warn(
                DiagnosticKind::InvalidPointCount,
                count_line,
                format!("failed to parse number of points '{}'", count_text),
            );
        }
        for &line in &block.rejected_lines {
            let text = self.cursor_lines()[line - 1].trim().to_string();
            self.warn(
                DiagnosticKind::InvalidCoordinate,
                line,
                format!("failed to parse coordinates '{}'", text),
            );
        }
        block
    }

    fn read_single_point(&mut self) -> Option<Point> {
        let line_number = self.cursor.line_number();
        let Some(line) = self.cursor.peek() else {
            self.warn(
                DiagnosticKind::MissingCoordinate,
                line_number,
                "expected a coordinate line at end of input",
            );
            return None;
        };

        if is_block_terminator(line) {
            self.warn(
                DiagnosticKind::MissingCoordinate,
                line_number,
                format!("expected a coordinate line, found '{}'", line),
            );
            return None;
        }

        self.cursor.advance(1);
        let point = parse_coordinate_line(line);
        if point.is_none() {
            self.warn(
                DiagnosticKind::InvalidCoordinate,
                line_number,
                format!("failed to parse coordinates '{}'", line),
            );
        }
        point
    }

    fn cursor_lines(&self) -> &'a [String] {
        self.cursor.lines()
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

/// Part count of a `NUMPARTS <n>` line
fn numparts(line: &str) -> Option<usize> {
    let rest = line.strip_prefix(ngi_tokens::NUMPARTS)?;
    rest.trim().parse().ok()
}
