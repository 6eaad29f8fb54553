//! Object Scales CLI
//!
//! Entry point for the size estimator. Parses CLI arguments and delegates
//! to a Session for loading types and measuring.

use clap::Parser;
use scales_cli::{init_logging, run, write_report, Cli, CliError};

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli).and_then(|report| write_report(&mut std::io::stdout().lock(), &report)) {
        Ok(()) => {}
        Err(CliError::NoTarget) => {
            eprintln!("Error: {}", CliError::NoTarget);
            eprintln!();
            eprintln!("Usage:");
            eprintln!("  object-scales --type <NAME> [--length <N>]   Measure a type");
            eprintln!("  object-scales --string <TEXT>                Measure a string");
            eprintln!("  object-scales --schema <FILE> --all          Measure every declared type");
            eprintln!();
            eprintln!("Run 'object-scales --help' for more options.");
            std::process::exit(2);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
