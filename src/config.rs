//! Decoder configuration.
//!
//! The only externally required parameter is the text encoding of the input
//! files. The remaining settings choose between documented behaviours and
//! all default to the strict, file-order variant.

use crate::coercer::CoercionPolicy;
use crate::constants::DEFAULT_ENCODING;
use crate::error::{DecodeError, Result};
use crate::ring::WindingRule;
use crate::source::resolve_encoding;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Settings shared by both file parsers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecoderConfig {
    /// Encoding label of the NGI/NDA bytes (e.g. "cp949", "euc-kr", "utf-8")
    pub encoding: String,

    /// Treatment of NDA values that fail type coercion
    pub coercion_policy: CoercionPolicy,

    /// Reorient polygon rings to counter-clockwise after parsing
    pub force_ccw_polygons: bool,

    /// Rule used to classify ring orientation
    pub winding_rule: WindingRule,

    /// Reject input files larger than this many bytes
    pub max_file_bytes: Option<u64>,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            encoding: DEFAULT_ENCODING.to_string(),
            coercion_policy: CoercionPolicy::Strict,
            force_ccw_polygons: false,
            winding_rule: WindingRule::SignedArea,
            max_file_bytes: None,
        }
    }
}

impl DecoderConfig {
    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = encoding.into();
        self
    }

    pub fn with_coercion_policy(mut self, policy: CoercionPolicy) -> Self {
        self.coercion_policy = policy;
        self
    }

    pub fn with_forced_ccw_polygons(mut self) -> Self {
        self.force_ccw_polygons = true;
        self
    }

    pub fn with_winding_rule(mut self, rule: WindingRule) -> Self {
        self.winding_rule = rule;
        self
    }

    pub fn with_max_file_bytes(mut self, limit: u64) -> Self {
        self.max_file_bytes = Some(limit);
        self
    }

    /// Check that the settings can be used for decoding
    pub fn validate(&self) -> Result<()> {
        let encoding = resolve_encoding(&self.encoding)?;
        debug!("Encoding '{}' resolved to {}", self.encoding, encoding.name());

        if self.max_file_bytes == Some(0) {
            return Err(DecodeError::configuration(
                "Maximum file size must be greater than 0 bytes",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DecoderConfig::default();
        assert_eq!(config.encoding, "cp949");
        assert_eq!(config.coercion_policy, CoercionPolicy::Strict);
        assert!(!config.force_ccw_polygons);
        assert_eq!(config.winding_rule, WindingRule::SignedArea);
        assert_eq!(config.max_file_bytes, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builders() {
        let config = DecoderConfig::default()
            .with_encoding("utf-8")
            .with_coercion_policy(CoercionPolicy::Lenient)
            .with_forced_ccw_polygons()
            .with_winding_rule(WindingRule::LegacyHeadingSum)
            .with_max_file_bytes(1024);

        assert_eq!(config.encoding, "utf-8");
        assert_eq!(config.coercion_policy, CoercionPolicy::Lenient);
        assert!(config.force_ccw_polygons);
        assert_eq!(config.winding_rule, WindingRule::LegacyHeadingSum);
        assert_eq!(config.max_file_bytes, Some(1024));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_failures() {
        let unknown = DecoderConfig::default().with_encoding("klingon-8");
        assert!(matches!(
            unknown.validate(),
            Err(DecodeError::UnknownEncoding { .. })
        ));

        let zero = DecoderConfig::default().with_max_file_bytes(0);
        assert!(matches!(
            zero.validate(),
            Err(DecodeError::Configuration { .. })
        ));
    }
}
