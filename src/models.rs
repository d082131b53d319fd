//! Core data structures for the decoded layer model.
//!
//! Everything here is plain data: the parsers build these values, the merge
//! step combines them, and external writers serialize them.

use crate::error::{DecodeError, Result};
use crate::ring::Ring;
use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Layer key; byte-exact and possibly non-ASCII
pub type LayerName = String;

/// Record key; unique within one layer of one file, never parsed numerically
pub type RecordId = String;

/// Layer name -> record id -> value, in file order
pub type LayerMap<T> = IndexMap<LayerName, IndexMap<RecordId, T>>;

/// Typed attribute values of one record, in field-definition order
pub type PropertyMap = IndexMap<String, PropertyValue>;

/// Coordinate pair in EPSG:5186 (meters)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(into = "[f64; 2]")]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<Point> for [f64; 2] {
    fn from(point: Point) -> Self {
        [point.x, point.y]
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Geometry kinds that the NGI grammar can declare or produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum GeometryKind {
    Point,
    LineString,
    Polygon,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
    Text,
}

impl GeometryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GeometryKind::Point => "Point",
            GeometryKind::LineString => "LineString",
            GeometryKind::Polygon => "Polygon",
            GeometryKind::MultiPoint => "MultiPoint",
            GeometryKind::MultiLineString => "MultiLineString",
            GeometryKind::MultiPolygon => "MultiPolygon",
            GeometryKind::Text => "Text",
        }
    }

    /// Multi-part counterpart used when a MASK lists several types
    pub fn to_multi(self) -> Self {
        match self {
            GeometryKind::Point | GeometryKind::Text => GeometryKind::MultiPoint,
            GeometryKind::LineString => GeometryKind::MultiLineString,
            GeometryKind::Polygon => GeometryKind::MultiPolygon,
            multi => multi,
        }
    }
}

impl fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A decoded geometry
///
/// `Text` marks label/annotation anchors; it carries the same single
/// coordinate as `Point` but stays distinguishable from it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum Geometry {
    Point(Point),
    LineString(Vec<Point>),
    /// Rings in file order, first ring is the outer boundary
    Polygon(Vec<Ring>),
    MultiPoint(Vec<Point>),
    MultiLineString(Vec<Vec<Point>>),
    MultiPolygon(Vec<Vec<Ring>>),
    Text(Point),
}

impl Geometry {
    pub fn kind(&self) -> GeometryKind {
        match self {
            Geometry::Point(_) => GeometryKind::Point,
            Geometry::LineString(_) => GeometryKind::LineString,
            Geometry::Polygon(_) => GeometryKind::Polygon,
            Geometry::MultiPoint(_) => GeometryKind::MultiPoint,
            Geometry::MultiLineString(_) => GeometryKind::MultiLineString,
            Geometry::MultiPolygon(_) => GeometryKind::MultiPolygon,
            Geometry::Text(_) => GeometryKind::Text,
        }
    }

    /// True for label/annotation anchors decoded from `TEXT`
    pub fn is_text_marker(&self) -> bool {
        matches!(self, Geometry::Text(_))
    }

    pub fn point_count(&self) -> usize {
        match self {
            Geometry::Point(_) | Geometry::Text(_) => 1,
            Geometry::LineString(points) | Geometry::MultiPoint(points) => points.len(),
            Geometry::Polygon(rings) => rings.iter().map(Ring::len).sum(),
            Geometry::MultiLineString(lines) => lines.iter().map(Vec::len).sum(),
            Geometry::MultiPolygon(polygons) => polygons
                .iter()
                .flat_map(|rings| rings.iter())
                .map(Ring::len)
                .sum(),
        }
    }
}

/// Declared type of an NDA attribute field
///
/// Unknown type tokens are kept as [`FieldType::Unsupported`] so the field
/// still occupies its position; values of such fields fail at coercion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    Numeric,
    String,
    Unsupported(String),
}

impl FieldType {
    /// Read a declared type token, keeping unknown tokens verbatim
    pub fn from_declared(token: &str) -> Self {
        let token = token.trim();
        if token.eq_ignore_ascii_case("NUMERIC") {
            FieldType::Numeric
        } else if token.eq_ignore_ascii_case("STRING") {
            FieldType::String
        } else {
            FieldType::Unsupported(token.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            FieldType::Numeric => "NUMERIC",
            FieldType::String => "STRING",
            FieldType::Unsupported(token) => token,
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, FieldType::Unsupported(_))
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for FieldType {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self> {
        match FieldType::from_declared(s) {
            FieldType::Unsupported(field_type) => {
                Err(DecodeError::UnsupportedFieldType { field_type })
            }
            supported => Ok(supported),
        }
    }
}

/// One positional field of an NDA layer schema
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDefinition {
    pub name: String,
    pub field_type: FieldType,
}

impl FieldDefinition {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
        }
    }
}

/// A typed attribute value; absent values are never stored
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Integer(i64),
    Float(f64),
    String(String),
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Integer(value) => write!(f, "{}", value),
            PropertyValue::Float(value) => write!(f, "{}", value),
            PropertyValue::String(value) => f.write_str(value),
        }
    }
}

/// One joined record: geometry plus attributes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Feature {
    pub record_id: RecordId,
    pub geometry: Geometry,
    pub properties: PropertyMap,
}

/// Ordered features of one layer
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, feature: Feature) {
        self.features.push(feature);
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Feature> {
        self.features.iter()
    }
}

/// Layer metadata assembled for downstream writers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerDefinition {
    pub name: LayerName,
    /// `record_id` first, then the NDA fields in declaration order
    pub fields: Vec<FieldDefinition>,
    pub geometry_kind: Option<GeometryKind>,
}
