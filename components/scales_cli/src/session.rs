//! Estimation session
//!
//! A session owns the type registry loaded from a schema and the platform
//! parameters, measures the targets picked on the command line and renders
//! the results.

use std::fmt;
use std::io::Write;

use core_types::{Category, Schema, TypeIntrospection, TypeRegistry, Value};
use layout_estimator::{PlatformConfig, SizeBreakdown, SizeEstimator};
use log::{debug, info};
use serde::Serialize;

use crate::cli::{Cli, Target};
use crate::error::{CliError, CliResult};

/// One measured target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Measurement {
    /// Type name, or the quoted text for strings
    pub name: String,
    /// Element or character count, for arrays and strings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<usize>,
    /// How the size is made up
    #[serde(flatten)]
    pub breakdown: SizeBreakdown,
}

impl Measurement {
    /// Label used in plain-text output.
    pub fn label(&self) -> String {
        match self.length {
            Some(length) => format!("{} (length {})", self.name, length),
            None => self.name.clone(),
        }
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.label(), self.breakdown.total)
    }
}

/// How a report is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// `NAME: BYTES` lines
    Plain,
    /// `NAME: BYTES (breakdown)` lines
    Explain,
    /// A JSON array of measurements
    Json,
}

impl OutputFormat {
    /// Format selected by the `--explain` and `--json` flags.
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else if cli.explain {
            OutputFormat::Explain
        } else {
            OutputFormat::Plain
        }
    }
}

/// Types and platform parameters for one invocation.
pub struct Session {
    registry: TypeRegistry,
    config: PlatformConfig,
}

impl Session {
    /// Create a session over an existing registry
    ///
    /// # Example
    /// ```
    /// use core_types::TypeRegistry;
    /// use layout_estimator::PlatformConfig;
    /// use scales_cli::{Session, Target};
    ///
    /// let mut session = Session::new(TypeRegistry::new(), PlatformConfig::x64());
    /// let report = session.measure(&Target::Text("hi".to_string())).unwrap();
    /// assert_eq!(report[0].breakdown.total, 26);
    /// ```
    pub fn new(registry: TypeRegistry, config: PlatformConfig) -> Self {
        Self { registry, config }
    }

    /// Load the schema and platform configuration named on the command line
    pub fn from_cli(cli: &Cli) -> CliResult<Self> {
        let registry = match &cli.schema {
            Some(path) => {
                info!("loading schema from {}", path.display());
                Schema::from_json_file(path)?.to_registry()?
            }
            None => TypeRegistry::new(),
        };
        let config = cli.platform()?;
        debug!("platform: {:?}", config);
        Ok(Self::new(registry, config))
    }

    /// Types available for measurement
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Platform parameters in use
    pub fn config(&self) -> &PlatformConfig {
        &self.config
    }

    /// Measure `target`.
    ///
    /// `Target::All` yields one measurement per declared type, in
    /// declaration order, and nothing when no schema was loaded. A length
    /// given for a type that is neither an array nor a string is dropped.
    pub fn measure(&mut self, target: &Target) -> CliResult<Vec<Measurement>> {
        let values = match target {
            Target::Type { name, length } => {
                let ty = self.registry.resolve(name)?;
                let length = (*length).filter(|_| {
                    matches!(self.registry.category_of(&ty), Category::Array | Category::String)
                });
                let value = match length {
                    Some(length) => Value::array(ty, length),
                    None => Value::instance(ty),
                };
                vec![(self.registry.type_name(&ty), length, value)]
            }
            Target::Text(text) => {
                let value = Value::string(self.registry.string_type(), text);
                vec![(format!("{text:?}"), value.length(), value)]
            }
            Target::All => self
                .registry
                .declared_types()
                .map(|(id, def)| (def.name.clone(), None, Value::instance(id)))
                .collect(),
        };

        let estimator = SizeEstimator::new(&self.registry, self.config)?;
        values
            .into_iter()
            .map(|(name, length, value)| {
                let breakdown = estimator.estimate_breakdown(&value)?;
                Ok(Measurement {
                    name,
                    length,
                    breakdown,
                })
            })
            .collect()
    }
}

/// Render measurements in the requested format.
pub fn render(measurements: &[Measurement], format: OutputFormat) -> CliResult<String> {
    let text = match format {
        OutputFormat::Plain => measurements
            .iter()
            .map(|m| m.to_string())
            .collect::<Vec<_>>()
            .join("\n"),
        OutputFormat::Explain => measurements
            .iter()
            .map(|m| format!("{}: {}", m.label(), m.breakdown))
            .collect::<Vec<_>>()
            .join("\n"),
        OutputFormat::Json => serde_json::to_string_pretty(measurements)?,
    };
    Ok(text)
}

/// Write a rendered report followed by a newline. Empty reports print
/// nothing.
pub fn write_report<W: Write>(out: &mut W, report: &str) -> CliResult<()> {
    if !report.is_empty() {
        writeln!(out, "{report}")?;
        out.flush()?;
    }
    Ok(())
}

/// Run a parsed command line, returning the rendered report.
pub fn run(cli: &Cli) -> CliResult<String> {
    let target = cli.target().ok_or(CliError::NoTarget)?;
    let mut session = Session::from_cli(cli)?;
    let measurements = session.measure(&target)?;
    render(&measurements, OutputFormat::from_cli(cli))
}
