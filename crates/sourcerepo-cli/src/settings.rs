//! Layered settings for the `sourcerepo` binary.
//!
//! An optional file named by `SOURCEREPO_CONFIG` is read first, then
//! environment variables such as `SOURCEREPO__REPO__PROJECT` override it.

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use sourcerepo_core::{BootstrapError, BootstrapRequest};
use sourcerepo_git::EngineConfig;

/// Environment variable naming the settings file.
pub const CONFIG_PATH_ENV: &str = "SOURCEREPO_CONFIG";

/// Prefix of environment overrides.
pub const ENV_PREFIX: &str = "SOURCEREPO";

/// Errors raised while loading settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// The settings sources could not be read or deserialized.
    #[error("failed to load settings: {0}")]
    Config(#[from] ConfigError),

    /// The repository request is incomplete.
    #[error(transparent)]
    Request(#[from] BootstrapError),
}

/// Top-level settings.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Repository to reconcile.
    pub repo: BootstrapRequest,

    /// Git engine options.
    #[serde(default)]
    pub engine: EngineSettings,

    /// Deadline for the whole reconciliation, in seconds.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

/// Git engine options.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EngineSettings {
    /// Directory for scratch repositories.
    #[serde(default)]
    pub scratch_dir: Option<PathBuf>,

    /// Committer name used when Git has none configured.
    #[serde(default)]
    pub committer_name: Option<String>,

    /// Committer email used when Git has none configured.
    #[serde(default)]
    pub committer_email: Option<String>,
}

impl EngineSettings {
    /// Converts into the engine configuration.
    pub fn to_engine_config(&self) -> EngineConfig {
        let mut builder = EngineConfig::builder();
        if let Some(dir) = &self.scratch_dir {
            builder = builder.scratch_dir(dir);
        }
        if let Some(name) = &self.committer_name {
            builder = builder.committer_name(name);
        }
        if let Some(email) = &self.committer_email {
            builder = builder.committer_email(email);
        }
        builder.build()
    }
}

impl Settings {
    /// Loads settings from `SOURCEREPO_CONFIG` and the process environment.
    pub fn load() -> Result<Self, SettingsError> {
        let path = std::env::var(CONFIG_PATH_ENV).ok().map(PathBuf::from);
        Self::load_from(path.as_deref(), environment())
    }

    /// Loads settings from an optional file and an environment source.
    pub fn load_from(path: Option<&Path>, env: Environment) -> Result<Self, SettingsError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }

        let settings: Settings = builder.add_source(env).build()?.try_deserialize()?;
        settings.repo.validate()?;

        Ok(settings)
    }

    /// Returns the reconciliation deadline, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Environment source using the `SOURCEREPO__SECTION__KEY` convention.
pub fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}
