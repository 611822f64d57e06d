//! Configuration for the Imoye session client.
//!
//! The client needs very little: where the backend lives and how long a
//! request may take. Values come from `imoye.json` and can be overridden on
//! the command line.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SessionError};

/// The default config file name.
const CONFIG_FILE_NAME: &str = "imoye.json";

/// Default backend hosting the RAG endpoints.
pub const DEFAULT_BACKEND_URL: &str = "https://imoyeaibackend.onrender.com";

/// Default backend base URL.
fn default_backend_url() -> String {
    DEFAULT_BACKEND_URL.to_string()
}

/// Default per-request timeout in seconds.
const fn default_request_timeout() -> u64 {
    60
}

/// Main configuration for the session client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Base URL of the backend, without a trailing path.
    #[serde(default = "default_backend_url")]
    pub backend_url: String,

    /// Timeout applied to each backend request, in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: default_backend_url(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl Config {
    /// Loads configuration from the current working directory.
    ///
    /// Looks for `imoye.json` in the current directory. If not found, returns
    /// the default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but contains invalid JSON.
    pub fn load() -> Result<Self> {
        let current_dir = std::env::current_dir().map_err(|e| {
            SessionError::config_parse(
                "<current directory>",
                format!("cannot determine current directory: {e}"),
            )
        })?;
        Self::load_from_dir(&current_dir)
    }

    /// Loads configuration from `imoye.json` inside `dir`.
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        Self::load_from_file(&dir.join(CONFIG_FILE_NAME))
    }

    /// Loads configuration from a specific file path.
    ///
    /// A missing file yields the default configuration. The loaded values are
    /// validated before being returned.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::ConfigParseError` if the file cannot be read or
    /// is not valid JSON, and `SessionError::ConfigValidationError` if a value
    /// is out of range.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file, using defaults");
                let config = Self::default();
                config.validate()?;
                return Ok(config);
            }
            Err(e) => {
                return Err(SessionError::config_parse(
                    path,
                    format!("failed to read file: {e}"),
                ));
            }
        };

        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| SessionError::config_parse(path, e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration values.
    ///
    /// - `backend_url` must be a non-empty `http://` or `https://` URL
    /// - `request_timeout_secs` must be greater than 0
    pub fn validate(&self) -> Result<()> {
        let url = self.backend_url.trim();
        if url.is_empty() {
            return Err(SessionError::config_validation(
                "backendUrl must not be empty",
                "Set backendUrl in your imoye.json or pass --backend-url",
            ));
        }

        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(SessionError::config_validation(
                format!("backendUrl '{url}' must start with http:// or https://"),
                "Use a full URL such as https://imoyeaibackend.onrender.com for backendUrl",
            ));
        }

        if self.request_timeout_secs == 0 {
            return Err(SessionError::config_validation(
                "requestTimeoutSecs must be greater than 0",
                "Set requestTimeoutSecs to at least 1 second in your imoye.json",
            ));
        }

        Ok(())
    }

    /// Returns the backend base URL without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.backend_url.trim().trim_end_matches('/')
    }

    /// Returns the per-request timeout.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
