//! Command line arguments

use std::path::PathBuf;

use clap::{ArgAction, Parser};
use core_types::ScaleResult;
use layout_estimator::{PlatformConfig, PointerWidth};

/// Estimate exclusive heap sizes of managed-runtime values
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "object-scales", version)]
#[command(about = "Estimate exclusive heap sizes of managed-runtime values", long_about = None)]
pub struct Cli {
    /// JSON schema declaring classes, structs and enums
    #[arg(short, long, value_name = "FILE")]
    pub schema: Option<PathBuf>,

    /// JSON platform configuration
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Pointer width in bytes (4 or 8), overrides the configuration
    #[arg(short, long, value_parser = parse_pointer_width)]
    pub pointer_width: Option<PointerWidth>,

    /// Large-allocation threshold in bytes, overrides the configuration
    #[arg(long, value_name = "BYTES")]
    pub large_threshold: Option<usize>,

    /// Type to measure, with `[]` suffixes for arrays
    #[arg(short = 't', long = "type", value_name = "NAME", conflicts_with_all = ["string", "all"])]
    pub type_name: Option<String>,

    /// Element count for arrays, character count for strings
    #[arg(short = 'n', long, requires = "type_name")]
    pub length: Option<usize>,

    /// Measure a string with this content
    #[arg(long, value_name = "TEXT", conflicts_with = "all")]
    pub string: Option<String>,

    /// Measure every type declared by the schema
    #[arg(short, long)]
    pub all: bool,

    /// Show how each size is made up
    #[arg(short, long)]
    pub explain: bool,

    /// Print the report as JSON
    #[arg(long, conflicts_with = "explain")]
    pub json: bool,

    /// Log more (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// What a single invocation measures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// A named type, with a length for arrays and strings
    Type {
        /// Type name as accepted by the registry
        name: String,
        /// Element or character count
        length: Option<usize>,
    },
    /// A string with the given content
    Text(String),
    /// Every declared type
    All,
}

impl Cli {
    /// Target selected on the command line, if any.
    pub fn target(&self) -> Option<Target> {
        if self.all {
            Some(Target::All)
        } else if let Some(text) = &self.string {
            Some(Target::Text(text.clone()))
        } else {
            self.type_name.as_ref().map(|name| Target::Type {
                name: name.clone(),
                length: self.length,
            })
        }
    }

    /// Platform parameters: the configuration file if given, otherwise the
    /// host defaults, with command line overrides applied.
    pub fn platform(&self) -> ScaleResult<PlatformConfig> {
        let mut config = match &self.config {
            Some(path) => PlatformConfig::from_json_file(path)?,
            None => PlatformConfig::default(),
        };
        if let Some(width) = self.pointer_width {
            config = config.with_pointer_width(width);
        }
        if let Some(threshold) = self.large_threshold {
            config = config.with_large_allocation_threshold(threshold);
        }
        config.validate()?;
        Ok(config)
    }
}

fn parse_pointer_width(arg: &str) -> Result<PointerWidth, String> {
    let bytes: usize = arg.parse().map_err(|_| format!("'{arg}' is not a number"))?;
    PointerWidth::try_from(bytes).map_err(|err| err.to_string())
}
