//! Inspect command: decode one companion pair and report on it

use super::shared::{RunStats, print_diagnostics, print_summary, setup_logging};
use crate::cli::args::{InspectArgs, OutputFormat};
use crate::pipeline::{DecodePipeline, DecodedDataset};
use crate::source::CompanionPair;
use anyhow::{Context, Result};
use serde_json::json;
use std::time::Instant;
use tracing::{debug, info};

pub fn run_inspect(args: InspectArgs) -> Result<RunStats> {
    let start_time = Instant::now();
    setup_logging(&args.output)?;
    debug!("Inspect arguments: {:?}", args);

    let pipeline =
        DecodePipeline::new(args.decode.to_config()).context("Invalid decoder configuration")?;

    let pair = match &args.attributes {
        Some(attributes) => CompanionPair::new(&args.geometry, attributes),
        None => CompanionPair::from_geometry_path(&args.geometry).with_context(|| {
            format!(
                "No attribute file found for {}",
                args.geometry.display()
            )
        })?,
    };
    info!(
        "Decoding {} with {}",
        pair.geometry.display(),
        pair.attributes.display()
    );

    let dataset = pipeline
        .decode_pair(&pair)
        .with_context(|| format!("Failed to decode {}", pair.geometry.display()))?;

    let mut stats = RunStats::default();
    let summary = dataset.summary();
    stats.record(&summary);
    stats.processing_time = start_time.elapsed();

    match args.output.format {
        OutputFormat::Human => {
            print_summary(&summary);
            if args.show_diagnostics {
                print_diagnostics("Geometry diagnostics", &dataset.geometry.diagnostics);
                print_diagnostics("Attribute diagnostics", &dataset.attributes.diagnostics);
            }
        }
        OutputFormat::Json => {
            let document = json_document(&dataset, &args)?;
            println!("{}", serde_json::to_string_pretty(&document)?);
        }
    }

    Ok(stats)
}

fn json_document(dataset: &DecodedDataset, args: &InspectArgs) -> Result<serde_json::Value> {
    let mut document = json!({
        "summary": dataset.summary(),
        "layers": dataset.layer_definitions,
        "metadata": dataset.geometry.metadata,
    });

    if args.show_diagnostics {
        document["diagnostics"] = json!({
            "geometry": dataset.geometry.diagnostics,
            "attributes": dataset.attributes.diagnostics,
        });
    }
    if args.features {
        document["features"] = serde_json::to_value(&dataset.features)
            .context("Failed to serialize features")?;
    }

    Ok(document)
}
