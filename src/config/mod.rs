//! Environment context for the external import tool
//!
//! # Configuration Format
//!
//! ```toml
//! asb_home = "/opt/IBM/InformationServer/ASBNode"  # install root holding bin/imam.sh
//! auth_file = "/home/dsadm/.imam/auth.cfg"         # credentials file passed with -af
//! engine = "ENGINE.EXAMPLE.COM"                      # engine tier host for imports
//! ```
//!
//! Every key may be overridden by `IMAM_ASB_HOME`, `IMAM_AUTH_FILE` and
//! `IMAM_ENGINE` respectively.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default installation root of the services tier client
pub const DEFAULT_ASB_HOME: &str = "/opt/IBM/InformationServer/ASBNode";

pub const ENV_ASB_HOME: &str = "IMAM_ASB_HOME";
pub const ENV_AUTH_FILE: &str = "IMAM_AUTH_FILE";
pub const ENV_ENGINE: &str = "IMAM_ENGINE";

/// Errors raised while loading or using the environment context
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    Read(PathBuf, String),

    #[error("Failed to parse config file {0}: {1}")]
    Parse(PathBuf, String),

    #[error("Missing configuration value: {0}")]
    Missing(&'static str),
}

/// Where the import tool lives and how to authenticate against it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentContext {
    /// Installation root containing `bin/imam.sh` and `bin/encrypt.sh`
    pub asb_home: PathBuf,
    /// Authorisation file handed to the tool with `-af`
    pub auth_file: Option<PathBuf>,
    /// Engine tier host name, required for imports
    pub engine: Option<String>,
}

impl Default for EnvironmentContext {
    fn default() -> Self {
        Self {
            asb_home: PathBuf::from(DEFAULT_ASB_HOME),
            auth_file: None,
            engine: None,
        }
    }
}

impl EnvironmentContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Read(path.to_path_buf(), e.to_string()))?;
        Self::from_toml(&content).map_err(|e| match e {
            ConfigError::Parse(_, msg) => ConfigError::Parse(path.to_path_buf(), msg),
            other => other,
        })
    }

    /// Parse TOML text; unspecified keys keep their defaults
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(PathBuf::new(), e.to_string()))
    }

    /// Load the optional file, then apply environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let base = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        Ok(base.with_overrides(|key| std::env::var(key).ok()))
    }

    /// Apply overrides from a key lookup (normally the process environment)
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(home) = lookup(ENV_ASB_HOME).filter(|v| !v.is_empty()) {
            self.asb_home = PathBuf::from(home);
        }
        if let Some(auth) = lookup(ENV_AUTH_FILE).filter(|v| !v.is_empty()) {
            self.auth_file = Some(PathBuf::from(auth));
        }
        if let Some(engine) = lookup(ENV_ENGINE).filter(|v| !v.is_empty()) {
            self.engine = Some(engine);
        }
        self
    }

    pub fn with_auth_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.auth_file = Some(path.into());
        self
    }

    pub fn with_engine(mut self, engine: impl Into<String>) -> Self {
        self.engine = Some(engine.into());
        self
    }

    pub fn imam_script(&self) -> PathBuf {
        self.asb_home.join("bin").join("imam.sh")
    }

    pub fn encrypt_script(&self) -> PathBuf {
        self.asb_home.join("bin").join("encrypt.sh")
    }

    pub fn require_auth_file(&self) -> Result<&Path, ConfigError> {
        self.auth_file
            .as_deref()
            .ok_or(ConfigError::Missing("auth_file"))
    }

    pub fn require_engine(&self) -> Result<&str, ConfigError> {
        self.engine
            .as_deref()
            .filter(|e| !e.is_empty())
            .ok_or(ConfigError::Missing("engine"))
    }
}
