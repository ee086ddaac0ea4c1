use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use stdcheck_core::Body;
use tracing::warn;

use crate::error::ConfigError;

pub const DEFAULT_JOBS: usize = 4;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Base URL overrides, for mirrors and proxies. Unset means the public site.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointOverrides {
    pub astm: Option<String>,
    pub iec: Option<String>,
    pub ieee: Option<String>,
    pub tse: Option<String>,
}

impl EndpointOverrides {
    pub fn get(&self, body: Body) -> Option<&str> {
        match body {
            Body::Astm => self.astm.as_deref(),
            Body::Iec => self.iec.as_deref(),
            Body::Ieee => self.ieee.as_deref(),
            Body::Tse => self.tse.as_deref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Concurrent fetches (and TSE sessions).
    #[serde(rename = "fetch.jobs")]
    pub jobs: usize,

    #[serde(rename = "fetch.timeoutSecs")]
    pub timeout_secs: u64,

    /// Where `<body>_fetched.json` and friends live.
    #[serde(rename = "data.dir")]
    pub data_dir: PathBuf,

    #[serde(rename = "endpoints")]
    pub endpoints: EndpointOverrides,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            jobs: DEFAULT_JOBS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            data_dir: PathBuf::from("data"),
            endpoints: EndpointOverrides::default(),
        }
    }
}

impl Settings {
    /// Get the settings file path
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("stdcheck");
        config_dir.join("settings.json")
    }

    /// Load settings from the default location, falling back to defaults.
    ///
    /// A missing file is normal. An unreadable or invalid one is logged and
    /// ignored so a broken settings file never blocks a run.
    pub fn load() -> Self {
        let path = Self::config_path();
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(e) => {
                warn!(error = %e, "using default settings");
                Self::default()
            }
        }
    }

    /// Load settings from an explicit path. Lines starting with `//` are comments.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let cleaned: String = contents
            .lines()
            .filter(|line| !line.trim().starts_with("//"))
            .collect::<Vec<_>>()
            .join("\n");

        serde_json::from_str(&cleaned).map_err(|source| ConfigError::Settings {
            path: path.to_path_buf(),
            source,
        })
    }
}
