use anyhow::Result;
use blogsmith_core::config::{Config, ConvertConfig, FeedConfig, LintConfig, SiteConfig};
use clap::ArgMatches;
use config::{Config as ConfigBuilder, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CONFIG_FILE: &str = "./blogsmith.toml";

/// Complete configuration that merges CLI args, env vars, config files, and defaults
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct BlogsmithConfig {
    /// Build configuration
    #[serde(default)]
    pub build: BuildConfig,
    // The tables of blogsmith_core::config::Config. Not flattened, serde's
    // flatten bypasses the string to bool coercion of environment values.
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub convert: ConvertConfig,
    #[serde(default)]
    pub lint: LintConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Directory holding the markdown posts
    pub source: String,
    /// Where index.html, posts/ and the feed are written
    pub output: String,
    /// Markdown for the homepage
    pub index: String,
    /// Optional directory of templates overriding the built-in ones
    pub theme: String,
    /// Configuration file path
    pub config: String,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            source: "./source".to_string(),
            output: ".".to_string(),
            index: "./index.md".to_string(),
            theme: "./theme".to_string(),
            config: DEFAULT_CONFIG_FILE.to_string(),
        }
    }
}

impl BlogsmithConfig {
    /// Load configuration with cascading precedence:
    /// 1. CLI arguments (highest priority)
    /// 2. Environment variables (BLOGSMITH_*)
    /// 3. Configuration file
    /// 4. Defaults (lowest priority)
    pub fn load(args: &ArgMatches) -> Result<Self> {
        Self::load_with_env(args, environment())
    }

    fn load_with_env(args: &ArgMatches, env: Environment) -> Result<Self> {
        let config_file = arg(args, "config").unwrap_or_else(|| DEFAULT_CONFIG_FILE.to_string());

        let mut builder = ConfigBuilder::builder();

        // 1. Start with defaults
        let defaults = Self::default();
        builder = builder.add_source(ConfigBuilder::try_from(&defaults)?);

        // 2. Add configuration file if it exists
        if Path::new(&config_file).exists() {
            builder = builder.add_source(File::from(Path::new(&config_file)));
        }

        // 3. Add environment variables with BLOGSMITH_ prefix
        builder = builder.add_source(env);

        // 4. Override with CLI arguments (highest priority)
        for key in ["source", "output", "index", "theme"] {
            if let Some(value) = arg(args, key) {
                builder = builder.set_override(format!("build.{key}"), value)?;
            }
        }
        builder = builder.set_override("build.config", config_file)?;
        if let Some(converter) = arg(args, "converter") {
            builder = builder.set_override("convert.backend", converter)?;
        }
        if args.try_get_one::<bool>("no_lint").ok().flatten() == Some(&true) {
            builder = builder.set_override("lint.prose", false)?;
        }

        // Build and deserialize
        let config = builder.build()?;
        let blogsmith_config: BlogsmithConfig = config.try_deserialize()?;

        Ok(blogsmith_config)
    }

    /// The library configuration handed to the site builder
    pub fn site_config(&self) -> Config {
        Config {
            site: self.site.clone(),
            feed: self.feed.clone(),
            convert: self.convert.clone(),
            lint: self.lint.clone(),
        }
    }

    /// Get the build configuration
    pub fn build_config(&self) -> &BuildConfig {
        &self.build
    }
}

/// `BLOGSMITH_FEED__ESCAPE_TEXT=true` sets `feed.escape_text`
fn environment() -> Environment {
    Environment::with_prefix("BLOGSMITH")
        .prefix_separator("_")
        .separator("__")
}

/// String argument, if this command defines it and it was given.
fn arg(args: &ArgMatches, name: &str) -> Option<String> {
    args.try_get_one::<String>(name).ok().flatten().cloned()
}
