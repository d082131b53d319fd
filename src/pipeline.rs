//! Decode pipeline for one geometry/attribute companion pair.
//!
//! Runs the NGI parser, the NDA parser and the merge in sequence and
//! assembles the per-layer definitions downstream writers need. The
//! pipeline is the place where parse diagnostics are surfaced to the log.

use indexmap::IndexMap;
use serde::Serialize;
use std::path::Path;
use std::time::Instant;
use tracing::info;

use crate::config::DecoderConfig;
use crate::constants::RECORD_ID_PROPERTY;
use crate::diagnostics::ParseStats;
use crate::error::Result;
use crate::merge::merge;
use crate::models::{FeatureCollection, FieldDefinition, FieldType, LayerDefinition, LayerName};
use crate::nda::{AttributeParseResult, NdaParser};
use crate::ngi::{GeometryParseResult, NgiParser};
use crate::source::CompanionPair;

/// Everything decoded from one companion pair
#[derive(Debug, Clone)]
pub struct DecodedDataset {
    pub pair: CompanionPair,
    pub geometry: GeometryParseResult,
    pub attributes: AttributeParseResult,
    pub features: IndexMap<LayerName, FeatureCollection>,
    pub layer_definitions: Vec<LayerDefinition>,
    pub processing_time_ms: u128,
}

impl DecodedDataset {
    pub fn feature_count(&self) -> usize {
        self.features.values().map(FeatureCollection::len).sum()
    }

    pub fn diagnostic_count(&self) -> usize {
        self.geometry.diagnostics.len() + self.attributes.diagnostics.len()
    }

    pub fn layer_definition(&self, layer: &str) -> Option<&LayerDefinition> {
        self.layer_definitions.iter().find(|def| def.name == layer)
    }

    /// Serializable overview of the decode
    pub fn summary(&self) -> DecodeSummary {
        let layers = self
            .layer_definitions
            .iter()
            .map(|definition| {
                let features = self.features.get(&definition.name);
                let with_attributes = self
                    .attributes
                    .records
                    .get(&definition.name)
                    .map_or(0, |records| {
                        features.map_or(0, |collection| {
                            collection
                                .iter()
                                .filter(|f| records.contains_key(&f.record_id))
                                .count()
                        })
                    });

                LayerSummary {
                    name: definition.name.clone(),
                    geometry_kind: definition.geometry_kind.map(|kind| kind.as_str().to_string()),
                    features: features.map_or(0, FeatureCollection::len),
                    with_attributes,
                    fields: definition.fields.len(),
                }
            })
            .collect();

        DecodeSummary {
            name: self.pair.name(),
            geometry_file: self.pair.geometry.display().to_string(),
            attribute_file: self.pair.attributes.display().to_string(),
            layers,
            geometry_stats: self.geometry.stats.clone(),
            attribute_stats: self.attributes.stats.clone(),
            geometry_diagnostics: self.geometry.diagnostics.len(),
            attribute_diagnostics: self.attributes.diagnostics.len(),
            processing_time_ms: self.processing_time_ms,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LayerSummary {
    pub name: LayerName,
    pub geometry_kind: Option<String>,
    pub features: usize,
    pub with_attributes: usize,
    pub fields: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct DecodeSummary {
    pub name: String,
    pub geometry_file: String,
    pub attribute_file: String,
    pub layers: Vec<LayerSummary>,
    pub geometry_stats: ParseStats,
    pub attribute_stats: ParseStats,
    pub geometry_diagnostics: usize,
    pub attribute_diagnostics: usize,
    pub processing_time_ms: u128,
}

/// Decoder for companion pairs sharing one configuration
#[derive(Debug, Clone)]
pub struct DecodePipeline {
    config: DecoderConfig,
    ngi_parser: NgiParser,
    nda_parser: NdaParser,
}

impl DecodePipeline {
    /// Create a pipeline; fails if the configuration is unusable
    pub fn new(config: DecoderConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            ngi_parser: NgiParser::from_config(&config),
            nda_parser: NdaParser::from_config(&config),
            config,
        })
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Decode a geometry file and the attribute file next to it
    pub fn decode_geometry_path(&self, geometry: &Path) -> Result<DecodedDataset> {
        let pair = CompanionPair::from_geometry_path(geometry)?;
        self.decode_pair(&pair)
    }

    pub fn decode_pair(&self, pair: &CompanionPair) -> Result<DecodedDataset> {
        let start_time = Instant::now();

        let geometry = self.ngi_parser.parse_file(&pair.geometry)?;
        geometry.diagnostics.log_all(&pair.geometry.display().to_string());

        let attributes = self.nda_parser.parse_file(&pair.attributes)?;
        attributes
            .diagnostics
            .log_all(&pair.attributes.display().to_string());

        let features = merge(&geometry.layers, &attributes.records);
        let layer_definitions = layer_definitions(&geometry, &attributes);

        let dataset = DecodedDataset {
            pair: pair.clone(),
            geometry,
            attributes,
            features,
            layer_definitions,
            processing_time_ms: start_time.elapsed().as_millis(),
        };

        info!(
            "Decoded {}: {} features in {} layers, {} diagnostics",
            pair.name(),
            dataset.feature_count(),
            dataset.features.len(),
            dataset.diagnostic_count()
        );

        Ok(dataset)
    }
}

/// Decode one pair with `config`
pub fn decode_pair(pair: &CompanionPair, config: &DecoderConfig) -> Result<DecodedDataset> {
    DecodePipeline::new(config.clone())?.decode_pair(pair)
}

/// Per-layer definitions for every geometry layer.
///
/// Fields start with a `record_id` string field followed by the layer's
/// declared attribute fields. The geometry kind is taken from the layer's
/// first geometry, or from its `MASK` declaration when it has none.
pub fn layer_definitions(
    geometry: &GeometryParseResult,
    attributes: &AttributeParseResult,
) -> Vec<LayerDefinition> {
    geometry
        .layers
        .iter()
        .map(|(name, records)| {
            let mut fields = vec![FieldDefinition::new(RECORD_ID_PROPERTY, FieldType::String)];
            if let Some(schema) = attributes.schema(name) {
                fields.extend(
                    schema
                        .iter()
                        .filter(|field| field.name != RECORD_ID_PROPERTY)
                        .cloned(),
                );
            }

            let geometry_kind = records
                .values()
                .next()
                .map(|first| first.kind())
                .or_else(|| {
                    geometry
                        .metadata
                        .get(name)
                        .and_then(|metadata| metadata.declared_kind)
                });

            LayerDefinition {
                name: name.clone(),
                fields,
                geometry_kind,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DecodeError;
    use crate::models::GeometryKind;
    use std::fs;
    use tempfile::TempDir;

    const NGI: &str = "$LAYER_NAME\n\"PARCEL\"\n$GEOMETRIC_METADATA\nMASK(POLYGON)\n$END\n\
$RECORD 1\nPOLYGON\nNUMPARTS 1\n4\n0 0\n10 0\n10 10\n0 0\n\
$RECORD 2\nPOINT\n5 5\n\
$LAYER_NAME\n\"EMPTY\"\n$GEOMETRIC_METADATA\nMASK(LINESTRING)\n$END\n";

    const NDA: &str = "<LAYER_START>\n$LAYER_NAME\n\"PARCEL\"\n$ASPATIAL_FIELD_DEF\n\
ATTRIB(\"PNU\", STRING)\nATTRIB(\"record_id\", STRING)\n$END\n<DATA>\n\
$RECORD 1\n\"1111\",\"dup\"\n<END>\n";

    fn write_pair(dir: &TempDir) -> CompanionPair {
        let geometry = dir.path().join("sample.ngi");
        let attributes = dir.path().join("sample.nda");
        fs::write(&geometry, NGI).unwrap();
        fs::write(&attributes, NDA).unwrap();
        CompanionPair::new(geometry, attributes)
    }

    #[test]
    fn test_decode_pair() {
        let dir = TempDir::new().unwrap();
        let pair = write_pair(&dir);
        let config = DecoderConfig::default().with_encoding("utf-8");

        let dataset = decode_pair(&pair, &config).unwrap();

        assert_eq!(dataset.feature_count(), 2);
        assert_eq!(dataset.features["PARCEL"].len(), 2);
        assert!(dataset.features["EMPTY"].is_empty());
        assert_eq!(dataset.diagnostic_count(), 0);
    }

    #[test]
    fn test_layer_definitions() {
        let dir = TempDir::new().unwrap();
        let pair = write_pair(&dir);
        let config = DecoderConfig::default().with_encoding("utf-8");

        let dataset = decode_pair(&pair, &config).unwrap();

        let parcel = dataset.layer_definition("PARCEL").unwrap();
        let names: Vec<&str> = parcel.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["record_id", "PNU"]);
        assert_eq!(parcel.geometry_kind, Some(GeometryKind::Polygon));

        let empty = dataset.layer_definition("EMPTY").unwrap();
        assert_eq!(empty.fields.len(), 1);
        assert_eq!(empty.geometry_kind, Some(GeometryKind::LineString));
    }

    #[test]
    fn test_summary() {
        let dir = TempDir::new().unwrap();
        let pair = write_pair(&dir);
        let config = DecoderConfig::default().with_encoding("utf-8");

        let summary = decode_pair(&pair, &config).unwrap().summary();

        assert_eq!(summary.name, "sample");
        assert_eq!(summary.layers[0].features, 2);
        assert_eq!(summary.layers[0].with_attributes, 1);
        assert_eq!(summary.geometry_stats.records_stored, 2);
        assert_eq!(summary.attribute_stats.records_stored, 1);
    }

    #[test]
    fn test_parsers_read_with_their_own_settings() {
        let dir = TempDir::new().unwrap();
        let pair = write_pair(&dir);
        let utf8 = DecoderConfig::default().with_encoding("utf-8");

        let geometry = NgiParser::from_config(&utf8).parse_file(&pair.geometry).unwrap();
        assert_eq!(geometry.layers["PARCEL"].len(), 2);
        let attributes = NdaParser::from_config(&utf8).parse_file(&pair.attributes).unwrap();
        assert_eq!(attributes.records["PARCEL"].len(), 1);

        let capped = utf8.with_max_file_bytes(8);
        assert!(matches!(
            NgiParser::from_config(&capped).parse_file(&pair.geometry),
            Err(DecodeError::FileTooLarge { limit: 8, .. })
        ));
        assert!(matches!(
            NdaParser::from_config(&capped).parse_file(&pair.attributes),
            Err(DecodeError::FileTooLarge { limit: 8, .. })
        ));
    }

    #[test]
    fn test_invalid_configuration_is_rejected() {
        let config = DecoderConfig::default().with_encoding("no-such-encoding");
        assert!(DecodePipeline::new(config).is_err());
    }

    #[test]
    fn test_missing_companion() {
        let dir = TempDir::new().unwrap();
        let geometry = dir.path().join("alone.ngi");
        fs::write(&geometry, NGI).unwrap();

        let pipeline = DecodePipeline::new(DecoderConfig::default()).unwrap();
        assert!(pipeline.decode_geometry_path(&geometry).is_err());
    }
}
