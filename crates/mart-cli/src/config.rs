use std::path::{Path, PathBuf};

use anyhow::Context;
use mart_draft::DraftConfig;
use mart_server::ServerConfig;
use mart_store::StoreConfig;
use serde::{Deserialize, Serialize};

/// File read when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "mart.toml";
/// Environment variable selecting the data directory.
pub const DATA_DIR_ENV: &str = "MART_DATA_DIR";

/// Top-level configuration, one section per crate.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MartConfig {
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub draft: DraftConfig,
}

impl MartConfig {
    /// Read `path`, or `./mart.toml` when it exists, then apply environment
    /// overrides. A missing default file yields the defaults.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };
        Ok(config.with_env_overrides())
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn parse(text: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn with_env_overrides(mut self) -> Self {
        self.server = self.server.with_env_overrides();
        self.draft = self.draft.with_env_overrides();
        if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
            if !dir.is_empty() {
                self.store.data_dir = PathBuf::from(dir);
            }
        }
        self
    }
}
