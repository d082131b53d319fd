//! Command implementations for the decoder CLI
//!
//! Each subcommand lives in its own module; shared logging setup and
//! presentation helpers are in [`shared`].

pub mod batch;
pub mod inspect;
pub mod shared;

pub use shared::RunStats;

use crate::cli::args::Commands;
use anyhow::Result;

/// Dispatch to the handler of `command`
pub fn run(command: Commands) -> Result<RunStats> {
    match command {
        Commands::Inspect(inspect_args) => inspect::run_inspect(inspect_args),
        Commands::Batch(batch_args) => batch::run_batch(batch_args),
    }
}
