use anyhow::Result;
use clap::ArgMatches;
use clap::parser::ValueSource;
use config::{Config as ConfigBuilder, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Complete configuration that merges CLI args, env vars, config files, and
/// defaults
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NbHugoConfig {
    /// Build configuration
    pub build: BuildConfig,
    /// Export configuration (from nbhugo-core)
    #[serde(flatten)]
    pub export: nbhugo_core::config::Config,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BuildConfig {
    /// Notebook file or directory of notebooks to convert
    pub source: String,
    /// Output directory for generated markdown
    pub output: String,
    /// Configuration file path
    pub config: String,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            source: "./notebooks".to_string(),
            output: "./content".to_string(),
            config: "./nbhugo.toml".to_string(),
        }
    }
}

impl Default for NbHugoConfig {
    fn default() -> Self {
        Self {
            build: BuildConfig::default(),
            export: nbhugo_core::config::Config::default(),
        }
    }
}

impl NbHugoConfig {
    /// Load configuration with cascading precedence:
    /// 1. CLI arguments (highest priority)
    /// 2. Environment variables (NBHUGO_*)
    /// 3. Configuration file
    /// 4. Defaults (lowest priority)
    pub fn load(args: &ArgMatches) -> Result<Self> {
        let config_file = args
            .get_one::<String>("config")
            .unwrap_or(&"./nbhugo.toml".to_string())
            .clone();

        let mut builder = ConfigBuilder::builder();

        // 1. Start with defaults
        let defaults = Self::default();
        builder = builder.add_source(config::Config::try_from(&defaults)?);

        // 2. Add configuration file if it exists
        if Path::new(&config_file).exists() {
            builder = builder.add_source(File::with_name(&config_file.replace(".toml", "")));
        }

        // 3. Add environment variables with NBHUGO_ prefix
        builder = builder.add_source(
            Environment::with_prefix("NBHUGO")
                .prefix_separator("_")
                .separator("__"), // Use double underscore for nested keys
        );

        // 4. Override with CLI arguments (highest priority). Only flags the
        // user actually passed count: clap fills in default values for the
        // rest, and those must not shadow the file and env layers.
        let mut cli_overrides = std::collections::HashMap::new();

        if let Some(source) = passed_on_command_line(args, "source") {
            cli_overrides.insert("build.source".to_string(), source);
        }
        if let Some(output) = passed_on_command_line(args, "output") {
            cli_overrides.insert("build.output".to_string(), output);
        }
        if let Some(config) = passed_on_command_line(args, "config") {
            cli_overrides.insert("build.config".to_string(), config);
        }

        if !cli_overrides.is_empty() {
            builder = builder.add_source(config::Config::try_from(&cli_overrides)?);
        }

        // Build and deserialize
        let config = builder.build()?;
        let nbhugo_config: NbHugoConfig = config.try_deserialize()?;

        Ok(nbhugo_config)
    }

    /// Get just the export configuration for passing to nbhugo-core
    pub fn export_config(&self) -> &nbhugo_core::config::Config {
        &self.export
    }

    /// Get the build configuration
    pub fn build_config(&self) -> &BuildConfig {
        &self.build
    }
}

fn passed_on_command_line(args: &ArgMatches, name: &str) -> Option<String> {
    if args.value_source(name) == Some(ValueSource::CommandLine) {
        args.get_one::<String>(name).cloned()
    } else {
        None
    }
}

/// Load configuration specifically for convert commands
pub fn load_convert_config(args: &ArgMatches) -> Result<NbHugoConfig> {
    NbHugoConfig::load(args)
}

/// Load configuration specifically for watch commands
pub fn load_watch_config(args: &ArgMatches) -> Result<NbHugoConfig> {
    NbHugoConfig::load(args)
}
