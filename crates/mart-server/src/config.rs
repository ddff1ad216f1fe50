use std::net::SocketAddr;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Environment variable selecting the listening port.
pub const PORT_ENV: &str = "PORT";
/// Environment variable selecting the static directory.
pub const STATIC_DIR_ENV: &str = "MART_STATIC_DIR";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Directory holding the built storefront.
    pub static_dir: PathBuf,
    /// Entry document served for every unmatched path, relative to `static_dir`.
    pub index_file: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            static_dir: PathBuf::from("dist"),
            index_file: PathBuf::from("index.html"),
        }
    }
}

impl ServerConfig {
    /// Apply `PORT` and `MART_STATIC_DIR` when set.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(port) = std::env::var(PORT_ENV) {
            self.apply_port(&port);
        }
        if let Ok(dir) = std::env::var(STATIC_DIR_ENV) {
            if !dir.is_empty() {
                self.static_dir = PathBuf::from(dir);
            }
        }
        self
    }

    fn apply_port(&mut self, port: &str) {
        match port.trim().parse::<u16>() {
            Ok(port) => self.bind_addr.set_port(port),
            Err(_) => warn!(value = port, "ignoring invalid PORT"),
        }
    }

    pub fn index_path(&self) -> PathBuf {
        self.static_dir.join(&self.index_file)
    }
}
