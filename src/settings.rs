use crate::dashboard::persistence::LocalLayoutStore;
use crate::dashboard::sync::DEFAULT_API_BASE;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

fn default_api_base_url() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_request_timeout() -> u64 {
    30
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Settings {
    /// Root of the intranet REST API, e.g. `https://intra.example.com/api/v1/`.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Bearer token sent with every request. Requests go out unauthenticated
    /// when unset.
    #[serde(default)]
    pub access_token: Option<String>,
    /// Location of the local layout record. Defaults to the platform data
    /// directory.
    #[serde(default)]
    pub layout_path: Option<String>,
    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    /// When enabled the application initialises the logger at debug level.
    #[serde(default)]
    pub debug_logging: bool,
    /// Optional file that receives log output in addition to stdout.
    #[serde(default)]
    pub log_file: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            access_token: None,
            layout_path: None,
            request_timeout_secs: default_request_timeout(),
            debug_logging: false,
            log_file: None,
        }
    }
}

impl Settings {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path).unwrap_or_default();
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &str) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn layout_path(&self) -> PathBuf {
        match &self.layout_path {
            Some(p) if !p.trim().is_empty() => LocalLayoutStore::path_for(p),
            _ => LocalLayoutStore::default_path(),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}
