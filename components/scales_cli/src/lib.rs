//! Object Scales CLI Library
//!
//! Provides argument parsing, the estimation session and report rendering
//! behind the `object-scales` binary.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cli;
pub mod error;
pub mod session;

pub use cli::{Cli, Target};
pub use error::{CliError, CliResult};
pub use session::{render, run, write_report, Measurement, OutputFormat, Session};

/// Installs the stderr logger.
///
/// `verbosity` counts `-v` flags: none logs warnings, one adds debug
/// output, two or more add trace output. `RUST_LOG` overrides the level.
pub fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    // A second initialisation is harmless.
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp_millis()
        .try_init();
}
