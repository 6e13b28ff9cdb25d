use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::utils::file::expand_path;

use super::cli::CliConfig;
use super::constants::{APP_DOT_FOLDER, CONFIG_FILE_NAME, DEFAULT_MAX_FILTERS, MAX_FILTERS_LIMIT};

// =============================================================================
// File Config Structs (JSON deserialization)
// =============================================================================

/// Query creator section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct CreatorFileConfig {
    pub max_filters: Option<usize>,
    pub strict: Option<bool>,
}

/// Output section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct OutputFileConfig {
    pub pretty: Option<bool>,
}

/// File-based configuration (JSON)
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub creator: Option<CreatorFileConfig>,
    pub output: Option<OutputFileConfig>,
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

impl FileConfig {
    /// Load configuration from a JSON file
    fn load_from_file(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "Loading config file");
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        tracing::trace!(config = ?config, "Parsed config file");
        Ok(config)
    }

    /// Names of top-level fields nobody reads
    fn unknown_fields(&self) -> Vec<&str> {
        match &self.extra {
            serde_json::Value::Object(map) => map.keys().map(|k| k.as_str()).collect(),
            _ => Vec::new(),
        }
    }

    /// Warn about unknown fields in the config
    fn warn_unknown_fields(&self) {
        let fields = self.unknown_fields();
        if !fields.is_empty() {
            tracing::warn!(
                fields = %fields.join(", "),
                "Unknown fields in config file (possible typos)"
            );
        }
    }

    /// Merge another FileConfig into this one (other takes precedence)
    fn merge(&mut self, other: FileConfig) {
        if let Some(creator) = other.creator {
            let current = self.creator.get_or_insert_with(CreatorFileConfig::default);
            if creator.max_filters.is_some() {
                tracing::trace!(max_filters = ?creator.max_filters, "Merging creator.max_filters");
                current.max_filters = creator.max_filters;
            }
            if creator.strict.is_some() {
                tracing::trace!(strict = ?creator.strict, "Merging creator.strict");
                current.strict = creator.strict;
            }
        }

        if let Some(output) = other.output {
            let current = self.output.get_or_insert_with(OutputFileConfig::default);
            if output.pretty.is_some() {
                tracing::trace!(pretty = ?output.pretty, "Merging output.pretty");
                current.pretty = output.pretty;
            }
        }
    }
}

// =============================================================================
// Resolved Config Structs
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatorConfig {
    /// Number of filter slots (`f0` .. `f{max_filters - 1}`)
    pub max_filters: usize,
    /// Dangling references and malformed filter logic fail the build
    pub strict: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    pub pretty: bool,
}

/// Final merged application configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub creator: CreatorConfig,
    pub output: OutputConfig,
}

impl AppConfig {
    /// Load configuration from all sources
    ///
    /// Priority (lowest to highest):
    /// 1. Defaults
    /// 2. Profile directory config (~/.mdh-query/mdh-query.json)
    /// 3. Local directory config OR CLI-specified config path
    /// 4. CLI arguments (which include env var fallbacks via clap)
    pub fn load(cli: &CliConfig) -> Result<Self> {
        tracing::debug!("Loading application configuration");
        tracing::trace!(cli = ?cli, "CLI config");

        let mut file_config = FileConfig::default();
        let mut found_configs: Vec<String> = Vec::new();

        if let Some(profile_path) = get_profile_config_path()
            && profile_path.exists()
        {
            let profile_config = FileConfig::load_from_file(&profile_path)?;
            profile_config.warn_unknown_fields();
            file_config.merge(profile_config);
            found_configs.push(profile_path.display().to_string());
        }

        let overlay_path = if let Some(ref path) = cli.config {
            let expanded = expand_path(&path.to_string_lossy());
            if !expanded.exists() {
                anyhow::bail!("Config file not found: {}", expanded.display());
            }
            Some(expanded)
        } else {
            let local = PathBuf::from(CONFIG_FILE_NAME);
            if local.exists() { Some(local) } else { None }
        };

        if let Some(path) = overlay_path {
            let overlay_config = FileConfig::load_from_file(&path)?;
            overlay_config.warn_unknown_fields();
            file_config.merge(overlay_config);
            found_configs.push(path.display().to_string());
        }

        tracing::debug!(configs = ?found_configs, "Config files loaded");

        Self::resolve(cli, file_config)
    }

    /// Layer CLI/env overrides on top of file values and defaults
    fn resolve(cli: &CliConfig, file_config: FileConfig) -> Result<Self> {
        let file_creator = file_config.creator.unwrap_or_default();
        let file_output = file_config.output.unwrap_or_default();

        let config = Self {
            creator: CreatorConfig {
                max_filters: cli
                    .max_filters
                    .or(file_creator.max_filters)
                    .unwrap_or(DEFAULT_MAX_FILTERS),
                strict: cli.strict.or(file_creator.strict).unwrap_or(false),
            },
            output: OutputConfig {
                // --compact always wins over the file setting
                pretty: !cli.compact && file_output.pretty.unwrap_or(true),
            },
        };

        config.validate()?;
        tracing::debug!(
            max_filters = config.creator.max_filters,
            strict = config.creator.strict,
            pretty = config.output.pretty,
            "Configuration resolved"
        );
        Ok(config)
    }

    /// Validate the configuration for consistency and correctness
    fn validate(&self) -> Result<()> {
        if self.creator.max_filters == 0 {
            anyhow::bail!("Configuration error: creator.max_filters must be greater than 0");
        }
        if self.creator.max_filters > MAX_FILTERS_LIMIT {
            anyhow::bail!(
                "Configuration error: creator.max_filters ({}) must not exceed {}",
                self.creator.max_filters,
                MAX_FILTERS_LIMIT
            );
        }
        Ok(())
    }
}

/// Get the profile config path (~/.mdh-query/mdh-query.json)
fn get_profile_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(APP_DOT_FOLDER).join(CONFIG_FILE_NAME))
}
