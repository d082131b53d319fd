//! `$GEOMETRIC_METADATA` declarations: `MASK(...)` and `BOUND(...)`

use crate::cursor::LineCursor;
use crate::error::{DecodeError, Result};
use crate::models::GeometryKind;
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

static MASK_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^MASK\s*\((.*)\)$").expect("MASK pattern is valid"));

static BOUND_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^BOUND\s*\((.*)\)$").expect("BOUND pattern is valid"));

/// Metadata declared for one layer
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LayerMetadata {
    pub declared_kind: Option<GeometryKind>,
    /// `[x1, y1, x2, y2]`
    pub bounds: Option<[f64; 4]>,
}

/// Resolve the geometry kind declared by the first `MASK(...)` line at or
/// after `start`.
///
/// A single listed type maps to its own kind. Several types resolve to a
/// multi kind by precedence: polygon, then line, then point. Returns the kind
/// and the index after the MASK line.
pub fn parse_geometry_type_mask(lines: &[String], start: usize) -> Result<(GeometryKind, usize)> {
    let mut cursor = LineCursor::at(lines, start);
    let line = cursor
        .skip_to(|line| line.starts_with("MASK"))
        .ok_or_else(|| DecodeError::InvalidGeometryType {
            line: start + 1,
            reason: "no MASK declaration found".to_string(),
        })?;
    let line_number = cursor.line_number();

    let captures = MASK_PATTERN
        .captures(line)
        .ok_or_else(|| DecodeError::InvalidGeometryType {
            line: line_number,
            reason: format!("malformed MASK declaration '{}'", line),
        })?;

    let mut kinds: Vec<GeometryKind> = Vec::new();
    for token in captures[1].split(',').map(str::trim).filter(|t| !t.is_empty()) {
        let kind = mask_token_kind(token).ok_or_else(|| DecodeError::InvalidGeometryType {
            line: line_number,
            reason: format!("unrecognized geometry type '{}'", token),
        })?;
        if !kinds.contains(&kind) {
            kinds.push(kind);
        }
    }

    let kind = match kinds.as_slice() {
        [] => {
            return Err(DecodeError::InvalidGeometryType {
                line: line_number,
                reason: "MASK lists no geometry types".to_string(),
            });
        }
        [single] => *single,
        several => resolve_mixed(several),
    };

    cursor.advance(1);
    Ok((kind, cursor.position()))
}

/// Read the first `BOUND(x1,y1,x2,y2)` line at or after `start`.
///
/// Returns the four values and the index after the BOUND line.
pub fn parse_bounds(lines: &[String], start: usize) -> Result<([f64; 4], usize)> {
    let mut cursor = LineCursor::at(lines, start);
    let line = cursor
        .skip_to(|line| line.starts_with("BOUND"))
        .ok_or_else(|| DecodeError::InvalidBounds {
            line: start + 1,
            reason: "no BOUND declaration found".to_string(),
        })?;
    let line_number = cursor.line_number();

    let captures = BOUND_PATTERN
        .captures(line)
        .ok_or_else(|| DecodeError::InvalidBounds {
            line: line_number,
            reason: format!("malformed BOUND declaration '{}'", line),
        })?;

    let values = captures[1]
        .split(',')
        .map(|part| part.trim().parse::<f64>())
        .collect::<std::result::Result<Vec<f64>, _>>()
        .map_err(|e| DecodeError::InvalidBounds {
            line: line_number,
            reason: e.to_string(),
        })?;

    let bounds: [f64; 4] = values
        .try_into()
        .map_err(|values: Vec<f64>| DecodeError::InvalidBounds {
            line: line_number,
            reason: format!("expected 4 values, found {}", values.len()),
        })?;

    cursor.advance(1);
    Ok((bounds, cursor.position()))
}

fn mask_token_kind(token: &str) -> Option<GeometryKind> {
    match token {
        "POINT" => Some(GeometryKind::Point),
        "LINESTRING" => Some(GeometryKind::LineString),
        "POLYGON" => Some(GeometryKind::Polygon),
        "MULTIPOINT" => Some(GeometryKind::MultiPoint),
        "NETWORKCHAIN" | "NETWORK CHAIN" => Some(GeometryKind::MultiLineString),
        "TEXT" => Some(GeometryKind::Text),
        _ => None,
    }
}

fn resolve_mixed(kinds: &[GeometryKind]) -> GeometryKind {
    let multi: Vec<GeometryKind> = kinds.iter().map(|kind| kind.to_multi()).collect();
    if multi.contains(&GeometryKind::MultiPolygon) {
        GeometryKind::MultiPolygon
    } else if multi.contains(&GeometryKind::MultiLineString) {
        GeometryKind::MultiLineString
    } else {
        GeometryKind::MultiPoint
    }
}
