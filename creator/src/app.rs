//! Core application

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::core::cli::{self, Commands, OutputFormat};
use crate::core::config::AppConfig;
use crate::core::constants::{APP_NAME, APP_NAME_LOWER, ENV_LOG};
use crate::domain::filters::{
    self, BuildOptions, FilterConfiguration, FilterRegistry, QueryDescriptor, QuerySettings,
    ValueType,
};
use crate::domain::{MetadataQueryPort, QueryParameters, ensure_source_file};
use crate::utils::file::{read_json, write_output};

pub struct CoreApp {
    pub config: AppConfig,
}

impl CoreApp {
    /// Run the application with CLI argument parsing
    pub fn run() -> Result<()> {
        dotenvy::dotenv().ok();
        Self::init_logging();

        tracing::debug!(app = APP_NAME, "Application starting");

        let (cli_config, command) = cli::parse();
        tracing::trace!(command = ?command, "Parsed command");

        let app = Self {
            config: AppConfig::load(&cli_config)?,
        };

        match command {
            Commands::Check { settings } => app.check(&settings),
            Commands::Build {
                settings,
                output,
                format,
                source_file,
            } => app.build(&settings, output.as_deref(), format, source_file),
            Commands::Operations { value_type } => app.operations(value_type),
        }
    }

    /// Load a settings file into filter slots and query controls
    fn load_settings(&self, path: &Path) -> Result<(FilterRegistry, FilterConfiguration)> {
        let settings: QuerySettings = read_json(path)?;
        settings
            .into_parts(self.config.creator.max_filters)
            .map_err(|e| anyhow::anyhow!("[{}] {}", e.code(), e))
    }

    fn check(&self, path: &Path) -> Result<()> {
        let (registry, config) = self.load_settings(path)?;
        let problems = filters::check(&registry, &config);

        if problems.is_empty() {
            println!("No problems found in {}", path.display());
        } else {
            for problem in &problems {
                println!("[{}] {}", problem.code(), problem);
            }
        }
        tracing::debug!(problems = problems.len(), "Check finished");
        Ok(())
    }

    fn build(
        &self,
        path: &Path,
        output: Option<&Path>,
        format: OutputFormat,
        source_file: bool,
    ) -> Result<()> {
        let (registry, config) = self.load_settings(path)?;
        let options = BuildOptions {
            strict: self.config.creator.strict,
        };

        let mut query: QueryDescriptor = filters::compile(&registry, &config, options)
            .map_err(|e| anyhow::anyhow!("[{}] {}", e.code(), e))?;
        if source_file {
            ensure_source_file(&mut query.selected_tags);
        }

        tracing::debug!(
            format = %format,
            filters = query.filters.len(),
            strict = options.strict,
            "Query compiled"
        );

        let bytes = match format {
            OutputFormat::Port => {
                let payload = MetadataQueryPort::new(query)
                    .to_value()
                    .context("Failed to encode metadata query port")?;
                self.to_json(&payload)?
            }
            OutputFormat::Parameters => self.to_json(&QueryParameters::from(&query))?,
        };
        write_output(output, &bytes)
    }

    fn operations(&self, value_type: Option<ValueType>) -> Result<()> {
        let bytes = self.to_json(&filters::describe(value_type))?;
        write_output(None, &bytes)
    }

    fn to_json<T: Serialize>(&self, value: &T) -> Result<Vec<u8>> {
        let bytes = if self.config.output.pretty {
            serde_json::to_vec_pretty(value)
        } else {
            serde_json::to_vec(value)
        };
        bytes.context("Failed to serialize output")
    }

    fn init_logging() {
        let default_filter = format!("info,{}=info", APP_NAME_LOWER);

        let filter = std::env::var(ENV_LOG)
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or(default_filter);

        tracing_subscriber::fmt()
            .with_target(false)
            .with_thread_ids(false)
            .with_level(true)
            .with_ansi(true)
            .compact()
            .with_writer(std::io::stderr)
            .with_env_filter(filter)
            .init();
    }
}
