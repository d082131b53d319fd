//! NGI geometry file parser
//!
//! The geometry file groups records by layer. Each record carries one
//! geometry introduced by a keyword line and followed by coordinate lines.
//!
//! ## Architecture
//!
//! - [`parser`] - Line classification and the stateful scan
//! - [`coordinates`] - Coordinate block and coordinate line reading
//! - [`metadata`] - `MASK(...)` and `BOUND(...)` declarations
//!
//! ## Usage
//!
//! ```rust
//! use ngi_decoder::ngi::NgiParser;
//!
//! let lines: Vec<String> = ["$LAYER_NAME", "\"PARCEL\"", "$RECORD 1", "POINT", "10.0 20.0"]
//!     .iter()
//!     .map(|s| s.to_string())
//!     .collect();
//!
//! let result = NgiParser::new().parse_lines(&lines);
//! assert_eq!(result.layers["PARCEL"].len(), 1);
//! ```

pub mod coordinates;
pub mod metadata;
pub mod parser;

#[cfg(test)]
mod tests;

pub use coordinates::{parse_coordinate_line, parse_coordinates, CoordinateBlock};
pub use metadata::{parse_bounds, parse_geometry_type_mask, LayerMetadata};
pub use parser::{GeometryKeyword, GeometryParseResult, NgiLine, NgiParser};
