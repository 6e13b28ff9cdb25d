use std::fmt;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::filters::ValueType;

use super::constants::{ENV_CONFIG, ENV_MAX_FILTERS, ENV_STRICT};

#[derive(Parser)]
#[command(name = "mdh-query")]
#[command(version, about = "Metadata query creator", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config file
    #[arg(long, short = 'c', global = true, env = ENV_CONFIG)]
    pub config: Option<PathBuf>,

    /// Reject dangling filter references and malformed filter logic
    #[arg(long, global = true, env = ENV_STRICT)]
    pub strict: Option<bool>,

    /// Number of filter slots
    #[arg(long, global = true, env = ENV_MAX_FILTERS)]
    pub max_filters: Option<usize>,

    /// Write JSON on a single line
    #[arg(long, global = true)]
    pub compact: bool,
}

/// Payload written by `build`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Metadata query port payload (`{"query": ...}`)
    #[default]
    Port,
    /// Query parameters of the execution layer
    Parameters,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Port => write!(f, "port"),
            OutputFormat::Parameters => write!(f, "parameters"),
        }
    }
}

/// Parse output format from CLI string
fn parse_output_format(s: &str) -> Result<OutputFormat, String> {
    match s.to_lowercase().as_str() {
        "port" => Ok(OutputFormat::Port),
        "parameters" | "params" => Ok(OutputFormat::Parameters),
        _ => Err(format!(
            "Invalid output format '{}'. Valid options: port, parameters",
            s
        )),
    }
}

/// Parse value type from CLI string
fn parse_value_type(s: &str) -> Result<ValueType, String> {
    s.parse()
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Report problems in a query settings file without building it
    Check {
        /// Query settings file (JSON)
        settings: PathBuf,
    },
    /// Compile a query settings file into a query descriptor
    Build {
        /// Query settings file (JSON)
        settings: PathBuf,

        /// Write the result to this file instead of stdout
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Output payload: port, parameters
        #[arg(long, short = 'f', default_value = "port", value_parser = parse_output_format)]
        format: OutputFormat,

        /// Append SourceFile to the selected tags if missing
        #[arg(long)]
        source_file: bool,
    },
    /// List the operations available per value type
    Operations {
        /// Only list operations of this value type: string, number, date
        #[arg(long, short = 't', value_parser = parse_value_type)]
        value_type: Option<ValueType>,
    },
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub config: Option<PathBuf>,
    pub strict: Option<bool>,
    pub max_filters: Option<usize>,
    pub compact: bool,
}

/// Parse CLI arguments and return config with command
pub fn parse() -> (CliConfig, Commands) {
    let cli = Cli::parse();
    let config = CliConfig {
        config: cli.config,
        strict: cli.strict,
        max_filters: cli.max_filters,
        compact: cli.compact,
    };
    (config, cli.command)
}
