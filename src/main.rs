use clap::Parser;
use ngi_decoder::cli::{args::Args, commands};
use std::process;

fn main() {
    let args = Args::parse();

    let Some(command) = args.command else {
        show_help_and_commands();
        process::exit(0);
    };

    match commands::run(command) {
        Ok(stats) if stats.pairs_failed > 0 => process::exit(2),
        Ok(_stats) => process::exit(0),
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("NGI Decoder - Korean cadastral NGI/NDA file decoder");
    println!("===================================================");
    println!();
    println!("Decode legacy NGI geometry files and their NDA attribute companions");
    println!("into per-layer feature collections.");
    println!();
    println!("USAGE:");
    println!("    ngi-decoder <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    inspect     Decode one NGI file and its NDA companion");
    println!("    batch       Decode every NGI/NDA pair under a directory");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("EXAMPLES:");
    println!("    # Summarize one pair (parcels.nda is found next to parcels.ngi):");
    println!("    ngi-decoder inspect parcels.ngi");
    println!();
    println!("    # Dump merged features as JSON, keeping raw text for bad values:");
    println!("    ngi-decoder inspect parcels.ngi --coercion lenient --features --format json");
    println!();
    println!("    # Decode a directory tree of UTF-8 files, skipping failures:");
    println!("    ngi-decoder batch ./survey --encoding utf-8 --keep-going");
    println!();
    println!("For detailed help on any command, use:");
    println!("    ngi-decoder <COMMAND> --help");
}
