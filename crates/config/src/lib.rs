//! Layered configuration for mokuro.
//!
//! Layers, later ones overriding earlier ones:
//!
//! 1. built-in defaults;
//! 2. `config.toml`, `config.yaml` and `config.json` in the platform
//!    configuration directory (`~/.config/mokuro` on Linux);
//! 3. a file named explicitly (format chosen by extension, TOML otherwise);
//! 4. `MOKURO_*` environment variables, with `__` separating sections
//!    (`MOKURO_INGEST__BATCH_SIZE=10`).

pub mod error;

use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use mokuro_model::Classifier;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::Level;

pub const ENV_PREFIX: &str = "MOKURO_";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub ingest: IngestConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    #[serde(flatten)]
    pub classifier: Classifier,
    /// Directory entries read per batch while walking.
    pub batch_size: usize,
    /// Ask for persistent storage before writing to the catalog.
    pub request_persistent: bool,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self { classifier: Classifier::default(), batch_size: 100, request_persistent: true }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Default level when neither `RUST_LOG` nor verbosity flags say
    /// otherwise.
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self { level: "info".to_string() }
    }
}

impl LogConfig {
    pub fn level(&self) -> Result<Level> {
        Level::from_str(&self.level).map_err(|_| exn::Exn::from(ErrorKind::Invalid(format!("log level {:?}", self.level))))
    }
}

impl Config {
    /// Load every layer, with the platform configuration directory.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        Self::load_from(default_config_dir().as_deref(), explicit)
    }

    /// Load every layer, reading default files from `config_dir` (if any)
    /// instead of the platform directory.
    pub fn load_from(config_dir: Option<&Path>, explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit
            && !path.is_file()
        {
            exn::bail!(ErrorKind::NotFound(path.to_path_buf()));
        }
        let config: Self = match figment(config_dir, explicit).extract() {
            Ok(config) => config,
            Err(e) => exn::bail!(ErrorKind::Parse(e.to_string())),
        };
        config.validate()?;
        tracing::debug!(?config, "Loaded configuration");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let ingest = &self.ingest;
        if ingest.classifier.metadata_extension.is_empty() {
            exn::bail!(ErrorKind::Invalid("metadata extension is empty".to_string()));
        }
        if ingest.classifier.archive_extensions.is_empty() {
            exn::bail!(ErrorKind::Invalid("no archive extensions".to_string()));
        }
        if ingest.classifier.image_types.is_empty() {
            exn::bail!(ErrorKind::Invalid("no image types".to_string()));
        }
        if ingest.batch_size == 0 {
            exn::bail!(ErrorKind::Invalid("batch size must be at least 1".to_string()));
        }
        self.log.level()?;
        Ok(())
    }
}

fn default_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "mokuro").map(|dirs| dirs.config_dir().to_path_buf())
}

fn figment(config_dir: Option<&Path>, explicit: Option<&Path>) -> Figment {
    let mut figment = Figment::from(Serialized::defaults(Config::default()));
    if let Some(dir) = config_dir {
        figment = figment
            .merge(Toml::file(dir.join("config.toml")))
            .merge(Yaml::file(dir.join("config.yaml")))
            .merge(Json::file(dir.join("config.json")));
    }
    if let Some(path) = explicit {
        figment = match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml" | "yml") => figment.merge(Yaml::file(path)),
            Some("json") => figment.merge(Json::file(path)),
            _ => figment.merge(Toml::file(path)),
        };
    }
    figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
}
