//! Batch command: decode every companion pair under a directory

use super::shared::{RunStats, print_run_stats, print_summary, setup_logging};
use crate::cli::args::{BatchArgs, OutputFormat};
use crate::pipeline::{DecodePipeline, DecodeSummary};
use crate::source::discover_pairs;
use anyhow::{Context, Result};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::time::Instant;
use tracing::{debug, info, warn};

/// A pair that failed with a fatal error
#[derive(Debug, Clone, Serialize)]
struct Failure {
    geometry_file: String,
    error: String,
}

#[derive(Debug, Serialize)]
struct BatchReport {
    decoded: Vec<DecodeSummary>,
    failed: Vec<Failure>,
    unpaired: Vec<String>,
}

pub fn run_batch(args: BatchArgs) -> Result<RunStats> {
    let start_time = Instant::now();
    setup_logging(&args.output)?;
    debug!("Batch arguments: {:?}", args);

    let pipeline =
        DecodePipeline::new(args.decode.to_config()).context("Invalid decoder configuration")?;

    let discovery = discover_pairs(&args.root)
        .with_context(|| format!("Failed to search {}", args.root.display()))?;
    info!(
        "Found {} pairs under {}",
        discovery.pairs.len(),
        args.root.display()
    );

    let progress_bar = if args.output.show_progress() {
        let pb = ProgressBar::new(discovery.pairs.len() as u64);
        pb.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
            )?
            .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    let mut stats = RunStats::default();
    let mut report = BatchReport {
        decoded: Vec::with_capacity(discovery.pairs.len()),
        failed: Vec::new(),
        unpaired: discovery
            .unpaired
            .iter()
            .map(|path| path.display().to_string())
            .collect(),
    };

    for pair in &discovery.pairs {
        if let Some(pb) = &progress_bar {
            pb.set_message(pair.name());
        }

        match pipeline.decode_pair(pair) {
            Ok(dataset) => {
                let summary = dataset.summary();
                stats.record(&summary);
                report.decoded.push(summary);
            }
            Err(e) if args.keep_going => {
                warn!("Skipping {}: {}", pair.geometry.display(), e);
                stats.pairs_failed += 1;
                report.failed.push(Failure {
                    geometry_file: pair.geometry.display().to_string(),
                    error: e.to_string(),
                });
            }
            Err(e) => {
                if let Some(pb) = &progress_bar {
                    pb.abandon();
                }
                return Err(e)
                    .with_context(|| format!("Failed to decode {}", pair.geometry.display()));
            }
        }

        if let Some(pb) = &progress_bar {
            pb.inc(1);
        }
    }

    if let Some(pb) = &progress_bar {
        pb.finish_and_clear();
    }
    stats.processing_time = start_time.elapsed();

    match args.output.format {
        OutputFormat::Human => print_report(&report, &stats),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    Ok(stats)
}

fn print_report(report: &BatchReport, stats: &RunStats) {
    for summary in &report.decoded {
        print_summary(summary);
    }
    for failure in &report.failed {
        println!(
            "{} {}: {}",
            "Failed".bright_red().bold(),
            failure.geometry_file,
            failure.error
        );
    }
    for path in &report.unpaired {
        println!("{} {} (no attribute file)", "Unpaired".bright_yellow(), path);
    }
    print_run_stats(stats);
}
