//! Command-line argument definitions for the NGI/NDA decoder
//!
//! This module defines the CLI interface using the clap derive API. Decoder
//! settings and output settings are shared between subcommands through
//! flattened argument groups.

use crate::coercer::CoercionPolicy;
use crate::config::DecoderConfig;
use crate::constants::DEFAULT_ENCODING;
use crate::ring::WindingRule;
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the NGI/NDA decoder
///
/// Decodes legacy Korean cadastral NGI geometry files and their NDA
/// attribute companions into a layer model and reports what was found.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "ngi-decoder",
    version,
    about = "Decode NGI geometry and NDA attribute files into a layer model",
    long_about = "Decodes pairs of legacy NGI (geometry) and NDA (attribute) text files, \
                  as produced by Korean cadastral and survey tooling, into per-layer feature \
                  collections. Reports layers, record counts and recoverable parse diagnostics \
                  as human-readable text or JSON."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Decode one NGI file and its NDA companion
    Inspect(InspectArgs),
    /// Decode every NGI/NDA pair under a directory
    Batch(BatchArgs),
}

/// Arguments for the inspect command
#[derive(Debug, Clone, ClapArgs)]
pub struct InspectArgs {
    /// Path to the NGI geometry file
    #[arg(value_name = "NGI_FILE")]
    pub geometry: PathBuf,

    /// Path to the NDA attribute file
    ///
    /// Defaults to the file next to the geometry file with the `.nda`
    /// extension.
    #[arg(
        short = 'a',
        long = "attributes",
        value_name = "NDA_FILE",
        help = "Attribute file (defaults to the .nda next to NGI_FILE)"
    )]
    pub attributes: Option<PathBuf>,

    /// List every diagnostic instead of only the counts
    #[arg(long = "diagnostics", help = "List every recoverable diagnostic")]
    pub show_diagnostics: bool,

    /// Emit the merged feature collections (JSON output only)
    #[arg(long = "features", help = "Emit merged features in JSON output")]
    pub features: bool,

    #[command(flatten)]
    pub decode: DecodeOptions,

    #[command(flatten)]
    pub output: OutputOptions,
}

/// Arguments for the batch command
#[derive(Debug, Clone, ClapArgs)]
pub struct BatchArgs {
    /// Directory searched recursively for NGI files
    #[arg(value_name = "DIR")]
    pub root: PathBuf,

    /// Keep decoding remaining pairs after a pair fails
    #[arg(
        short = 'k',
        long = "keep-going",
        help = "Continue with remaining pairs when one fails"
    )]
    pub keep_going: bool,

    #[command(flatten)]
    pub decode: DecodeOptions,

    #[command(flatten)]
    pub output: OutputOptions,
}

/// Decoder settings shared by all subcommands
#[derive(Debug, Clone, ClapArgs)]
pub struct DecodeOptions {
    /// Text encoding of the input files
    ///
    /// Any WHATWG encoding label is accepted; `cp949` selects the Korean
    /// extended code page.
    #[arg(
        short = 'e',
        long = "encoding",
        value_name = "LABEL",
        default_value = DEFAULT_ENCODING,
        help = "Text encoding of the input files"
    )]
    pub encoding: String,

    /// Treatment of attribute values that do not match their declared type
    #[arg(
        long = "coercion",
        value_enum,
        default_value = "strict",
        help = "strict: skip records with invalid values; lenient: keep raw text"
    )]
    pub coercion: CoercionArg,

    /// Reorient polygon rings counter-clockwise
    #[arg(long = "force-ccw", help = "Reorient polygon rings counter-clockwise")]
    pub force_ccw: bool,

    /// Classify ring winding with the legacy heading-sum rule
    #[arg(
        long = "legacy-winding",
        help = "Use the legacy heading-sum winding rule instead of signed area"
    )]
    pub legacy_winding: bool,

    /// Refuse input files larger than this many bytes
    #[arg(long = "max-bytes", value_name = "BYTES", help = "Maximum input file size in bytes")]
    pub max_bytes: Option<u64>,
}

impl DecodeOptions {
    /// Build the decoder configuration these options describe
    pub fn to_config(&self) -> DecoderConfig {
        let mut config = DecoderConfig::default()
            .with_encoding(self.encoding.clone())
            .with_coercion_policy(self.coercion.into());

        if self.force_ccw {
            config = config.with_forced_ccw_polygons();
        }
        if self.legacy_winding {
            config = config.with_winding_rule(WindingRule::LegacyHeadingSum);
        }
        if let Some(limit) = self.max_bytes {
            config = config.with_max_file_bytes(limit);
        }
        config
    }
}

/// Logging and output settings shared by all subcommands
#[derive(Debug, Clone, ClapArgs)]
pub struct OutputOptions {
    /// Enable verbose logging output
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output (quiet mode)
    ///
    /// Only show errors. Overrides verbose settings.
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,

    /// Output format for results
    #[arg(
        short = 'f',
        long = "format",
        value_enum,
        default_value = "human",
        help = "Output format for results"
    )]
    pub format: OutputFormat,
}

impl OutputOptions {
    /// Get the appropriate log level based on verbosity settings
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Check if we should show progress bars (not in quiet mode, not JSON)
    pub fn show_progress(&self) -> bool {
        !self.quiet && self.format == OutputFormat::Human
    }
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON format for scripting
    Json,
}

/// Coercion policy as a command-line value
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CoercionArg {
    Strict,
    Lenient,
}

impl From<CoercionArg> for CoercionPolicy {
    fn from(arg: CoercionArg) -> Self {
        match arg {
            CoercionArg::Strict => CoercionPolicy::Strict,
            CoercionArg::Lenient => CoercionPolicy::Lenient,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_inspect_defaults() {
        let args = parse(&["ngi-decoder", "inspect", "map.ngi"]);

        let Some(Commands::Inspect(inspect)) = args.command else {
            panic!("expected inspect command");
        };
        assert_eq!(inspect.geometry, PathBuf::from("map.ngi"));
        assert_eq!(inspect.attributes, None);
        assert_eq!(inspect.decode.to_config(), DecoderConfig::default());
        assert_eq!(inspect.output.get_log_level(), "warn");
        assert!(inspect.output.show_progress());
    }

    #[test]
    fn test_decode_options_map_to_config() {
        let args = parse(&[
            "ngi-decoder",
            "batch",
            "data",
            "--encoding",
            "utf-8",
            "--coercion",
            "lenient",
            "--force-ccw",
            "--legacy-winding",
            "--max-bytes",
            "1048576",
        ]);

        let Some(Commands::Batch(batch)) = args.command else {
            panic!("expected batch command");
        };
        let config = batch.decode.to_config();
        assert_eq!(config.encoding, "utf-8");
        assert_eq!(config.coercion_policy, CoercionPolicy::Lenient);
        assert!(config.force_ccw_polygons);
        assert_eq!(config.winding_rule, WindingRule::LegacyHeadingSum);
        assert_eq!(config.max_file_bytes, Some(1_048_576));
    }

    #[test]
    fn test_log_levels() {
        let verbose = parse(&["ngi-decoder", "inspect", "a.ngi", "-vv"]);
        let Some(Commands::Inspect(inspect)) = verbose.command else {
            panic!("expected inspect command");
        };
        assert_eq!(inspect.output.get_log_level(), "debug");

        let quiet = parse(&["ngi-decoder", "inspect", "a.ngi", "-q", "--format", "json"]);
        let Some(Commands::Inspect(inspect)) = quiet.command else {
            panic!("expected inspect command");
        };
        assert_eq!(inspect.output.get_log_level(), "error");
        assert!(!inspect.output.show_progress());
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Args::try_parse_from(["ngi-decoder", "inspect", "a.ngi", "-q", "-v"]).is_err());
    }
}
