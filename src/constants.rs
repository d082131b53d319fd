//! Grammar tokens and fixed parameters for the NGI/NDA formats
//!
//! Every token is matched exactly and case-sensitively against a trimmed line.

// =============================================================================
// Encoding and Reference System
// =============================================================================

/// Encoding label assumed for legacy NGI/NDA files when none is given
pub const DEFAULT_ENCODING: &str = "cp949";

/// Projected reference system of every coordinate in NGI files
pub const EPSG_CODE: u32 = 5186;

/// File extension of the geometry file
pub const GEOMETRY_EXTENSION: &str = "ngi";

/// File extension of the attribute file
pub const ATTRIBUTE_EXTENSION: &str = "nda";

// =============================================================================
// Geometry File (NGI) Tokens
// =============================================================================

pub mod ngi_tokens {
    pub const LAYER_NAME: &str = "$LAYER_NAME";
    pub const RECORD: &str = "$RECORD";
    pub const GEOMETRIC_METADATA: &str = "$GEOMETRIC_METADATA";
    pub const POLYGON: &str = "POLYGON";
    pub const NUMPARTS: &str = "NUMPARTS";
    pub const LINESTRING: &str = "LINESTRING";
    pub const NETWORKCHAIN: &str = "NETWORKCHAIN";
    pub const NETWORK_CHAIN: &str = "NETWORK CHAIN";
    pub const POINT: &str = "POINT";
    pub const MULTIPOINT: &str = "MULTIPOINT";
    pub const TEXT: &str = "TEXT";

    /// Lines that terminate a coordinate block early
    pub const BLOCK_TERMINATORS: &[&str] = &[
        POLYGON,
        LINESTRING,
        NETWORKCHAIN,
        NETWORK_CHAIN,
        POINT,
        MULTIPOINT,
        TEXT,
    ];
}

// =============================================================================
// Attribute File (NDA) Tokens
// =============================================================================

pub mod nda_tokens {
    pub const LAYER_START: &str = "<LAYER_START>";
    pub const LAYER_NAME: &str = "$LAYER_NAME";
    pub const FIELD_DEF: &str = "$ASPATIAL_FIELD_DEF";
    pub const FIELD_DEF_END: &str = "$END";
    pub const ATTRIB: &str = "ATTRIB";
    pub const DATA_START: &str = "<DATA>";
    pub const DATA_END: &str = "<END>";
    pub const RECORD: &str = "$RECORD";
}

// =============================================================================
// Parsing Parameters
// =============================================================================

/// Delimiter between values on an NDA data line
pub const FIELD_DELIMITER: char = ',';

/// Property key injected into every merged feature
pub const RECORD_ID_PROPERTY: &str = "record_id";

/// Minimum number of points in a closed polygon ring
pub const MIN_RING_POINTS: usize = 4;

/// Reduced heading sums below this magnitude (radians) mark a ring degenerate
pub const WINDING_TOLERANCE: f64 = 0.1;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_terminators_cover_geometry_keywords() {
        for keyword in ["POLYGON", "LINESTRING", "POINT", "MULTIPOINT", "TEXT"] {
            assert!(ngi_tokens::BLOCK_TERMINATORS.contains(&keyword));
        }
        assert!(!ngi_tokens::BLOCK_TERMINATORS.contains(&ngi_tokens::RECORD));
    }
}
