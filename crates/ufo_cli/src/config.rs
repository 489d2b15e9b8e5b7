//! Probe configuration: built-in defaults < JSON file < flags/env.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tip_client::ClientConfig;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// Instrument name the host registers
    #[serde(default = "default_name")]
    pub name: String,
    /// TIP session parameters
    #[serde(default = "default_tip")]
    pub tip: ClientConfig,
    /// Reject implausible readings
    #[serde(default)]
    pub validate: bool,
}

fn default_name() -> String {
    "ufo".into()
}
fn default_tip() -> ClientConfig {
    ClientConfig::new(ufo_probe::DEFAULT_ADDRESS)
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            tip: default_tip(),
            validate: false,
        }
    }
}

/// Values given on the command line or through the environment.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub name: Option<String>,
    pub address: Option<String>,
    pub port: Option<u16>,
    pub timeout_ms: Option<u64>,
    pub validate: bool,
}

impl ProbeConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Defaults, then the optional file, then overrides.
    pub fn resolve(file: Option<&Path>, overrides: Overrides) -> Result<Self, ConfigError> {
        let base = match file {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        Ok(base.apply(overrides))
    }

    fn apply(mut self, o: Overrides) -> Self {
        if let Some(name) = o.name {
            self.name = name;
        }
        if let Some(address) = o.address {
            self.tip.address = address;
        }
        if let Some(port) = o.port {
            self.tip.port = port;
        }
        if let Some(timeout_ms) = o.timeout_ms {
            self.tip.timeout_ms = timeout_ms;
        }
        self.validate |= o.validate;
        self
    }
}
