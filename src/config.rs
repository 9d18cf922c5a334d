use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Configuration file read from the working directory unless another is given.
pub const CONFIG_FILE: &str = "ElectionAdmin.toml";

/// Prefix of environment variables that override the configuration file.
pub const ENV_PREFIX: &str = "ELECTION_ADMIN_";

/// Where the election API lives unless configured otherwise.
pub const DEFAULT_API_BASE: &str = "https://simulation-knyz.onrender.com/api";

/// Application configuration, derived from defaults, `ElectionAdmin.toml` and
/// `ELECTION_ADMIN_*` environment variables, in increasing priority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    api_base: String,
    session_dir: PathBuf,
    timeout: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            session_dir: std::env::temp_dir().join("election-admin"),
            timeout: None,
        }
    }
}

impl Config {
    /// Load the configuration, reading `file` instead of [`CONFIG_FILE`] if given.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        Ok(Self::figment(file).extract()?)
    }

    /// The layered configuration sources.
    pub fn figment(file: Option<&Path>) -> Figment {
        let file = file.unwrap_or_else(|| Path::new(CONFIG_FILE));
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(file))
            .merge(Env::prefixed(ENV_PREFIX))
    }

    /// Base URL of the election API.
    /// Configured via `API_BASE`.
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Directory the session-scoped admin key is kept in.
    /// Configured via `SESSION_DIR`.
    pub fn session_dir(&self) -> &Path {
        &self.session_dir
    }

    /// Per-request timeout, if any.
    /// Configured via `TIMEOUT`, in seconds.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout.map(Duration::from_secs)
    }
}
