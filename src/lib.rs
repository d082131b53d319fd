//! NGI/NDA Decoder Library
//!
//! A Rust library for decoding legacy Korean cadastral NGI (geometry) and
//! NDA (attribute) text files into an in-memory layer model.
//!
//! This library provides tools for:
//! - Reading legacy-encoded files (cp949 by default) with explicit failure on undecodable bytes
//! - Scanning NGI geometry files into per-layer, per-record geometries
//! - Scanning NDA attribute files into typed, per-record property maps
//! - Validating polygon rings and normalizing their orientation on request
//! - Joining both into ordered feature collections with an injected `record_id`
//! - Collecting recoverable problems as structured diagnostics
//!
//! ## Usage
//!
//! ```rust,no_run
//! use ngi_decoder::{CompanionPair, DecoderConfig, decode_pair};
//! use std::path::Path;
//!
//! # fn example() -> ngi_decoder::Result<()> {
//! let pair = CompanionPair::from_geometry_path(Path::new("parcels.ngi"))?;
//! let dataset = decode_pair(&pair, &DecoderConfig::default())?;
//!
//! for (layer, collection) in &dataset.features {
//!     println!("{}: {} features", layer, collection.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod coercer;
pub mod config;
pub mod constants;
pub mod cursor;
pub mod diagnostics;
pub mod error;
pub mod merge;
pub mod models;
pub mod nda;
pub mod ngi;
pub mod pipeline;
pub mod ring;
pub mod source;
pub mod splitter;

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use coercer::{CoercionPolicy, coerce};
pub use config::DecoderConfig;
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics, ParseStats};
pub use error::{DecodeError, Result};
pub use merge::merge;
pub use models::{
    Feature, FeatureCollection, FieldDefinition, FieldType, Geometry, GeometryKind, LayerDefinition,
    LayerMap, Point, PropertyMap, PropertyValue,
};
pub use nda::NdaParser;
pub use ngi::NgiParser;
pub use pipeline::{DecodePipeline, DecodedDataset, decode_pair};
pub use ring::{Ring, WindingDirection, WindingRule, force_orientation, winding_direction};
pub use source::{CompanionPair, discover_pairs};
pub use splitter::split_quoted;
