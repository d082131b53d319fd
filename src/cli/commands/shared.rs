//! Shared components for CLI commands
//!
//! Logging setup, run statistics and the human-readable rendering of
//! decode summaries used by both subcommands.

use crate::cli::args::OutputOptions;
use crate::diagnostics::Diagnostics;
use crate::pipeline::DecodeSummary;
use anyhow::Result;
use colored::*;
use std::time::Duration;
use tracing::debug;

/// Totals reported at the end of a run
#[derive(Debug, Clone, Default)]
pub struct RunStats {
    /// Companion pairs decoded successfully
    pub pairs_decoded: usize,
    /// Companion pairs that failed with a fatal error
    pub pairs_failed: usize,
    /// Merged features across all pairs
    pub features: usize,
    /// Recoverable diagnostics across all pairs
    pub diagnostics: usize,
    /// Total processing time
    pub processing_time: Duration,
}

impl RunStats {
    pub fn record(&mut self, summary: &DecodeSummary) {
        self.pairs_decoded += 1;
        self.features += summary.layers.iter().map(|layer| layer.features).sum::<usize>();
        self.diagnostics += summary.geometry_diagnostics + summary.attribute_diagnostics;
    }
}

/// Set up structured logging to stderr
///
/// `RUST_LOG` overrides the level derived from `-v`/`-q`.
pub fn setup_logging(output: &OutputOptions) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = output.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("ngi_decoder={}", log_level)));

    if output.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .try_init()?;
    }

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

/// Print one decode summary as a short report
pub fn print_summary(summary: &DecodeSummary) {
    println!("{} {}", "Decoded".bright_green().bold(), summary.name.bright_white().bold());
    println!("  {} {}", "Geometry:".bright_cyan(), summary.geometry_file);
    println!("  {} {}", "Attributes:".bright_cyan(), summary.attribute_file);

    if summary.layers.is_empty() {
        println!("  {}", "No layers found".bright_yellow());
    }
    for layer in &summary.layers {
        println!(
            "  {} {} {} features ({} with attributes), {} fields, {}",
            "Layer".bright_cyan(),
            layer.name.bright_white().bold(),
            layer.features.to_string().bright_white(),
            layer.with_attributes,
            layer.fields,
            layer.geometry_kind.as_deref().unwrap_or("unknown geometry"),
        );
    }

    println!(
        "  {} geometry {:.1}% stored ({} skipped), attributes {:.1}% stored ({} skipped, {} empty)",
        "Records:".bright_cyan(),
        summary.geometry_stats.success_rate(),
        summary.geometry_stats.records_skipped,
        summary.attribute_stats.success_rate(),
        summary.attribute_stats.records_skipped,
        summary.attribute_stats.records_empty,
    );

    let diagnostics = summary.geometry_diagnostics + summary.attribute_diagnostics;
    let label = format!("{} diagnostics", diagnostics);
    if diagnostics == 0 {
        println!("  {}", label.bright_green());
    } else {
        println!("  {}", label.bright_yellow());
    }
}

/// Print every diagnostic of one file under a heading
pub fn print_diagnostics(heading: &str, diagnostics: &Diagnostics) {
    if diagnostics.is_empty() {
        return;
    }
    println!("  {}", heading.bright_yellow().bold());
    for diagnostic in diagnostics {
        println!("    {:?} {}", diagnostic.kind, diagnostic);
    }
}

/// Print the closing line of a run
pub fn print_run_stats(stats: &RunStats) {
    let status = if stats.pairs_failed == 0 {
        "Completed".bright_green().bold()
    } else {
        "Completed with failures".bright_red().bold()
    };
    println!(
        "\n{} {} pairs decoded, {} failed, {} features, {} diagnostics in {:.2}s",
        status,
        stats.pairs_decoded,
        stats.pairs_failed,
        stats.features,
        stats.diagnostics,
        stats.processing_time.as_secs_f64()
    );
}
