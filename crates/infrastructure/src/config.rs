//! Harness configuration.
//!
//! Settings are layered: built-in defaults, then an optional TOML file,
//! then `RESTCHECK_*` environment variables (e.g. `RESTCHECK_BASE_URL`).

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use url::Url;

/// Default target of the suite.
pub const DEFAULT_BASE_URL: &str = "https://reqres.in";

/// File read from the working directory when present.
pub const CONFIG_FILE: &str = "restcheck.toml";

const ENV_PREFIX: &str = "RESTCHECK";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A source could not be read or deserialized.
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// A value was read but is not usable.
    #[error("invalid configuration value for '{key}': {message}")]
    Invalid {
        /// Offending key.
        key: &'static str,
        /// What is wrong with it.
        message: String,
    },
}

/// Settings for one harness run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HarnessConfig {
    /// Base URL every scenario path is resolved against.
    pub base_url: String,
    /// Per-request timeout in milliseconds; none means wait indefinitely.
    #[serde(default)]
    pub timeout_ms: Option<u64>,
    /// Sent as `x-api-key` on every request when set.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Directory holding schema files; the bundled schemas are used when unset.
    #[serde(default)]
    pub schema_dir: Option<PathBuf>,
    /// Where to write the HAR report, if anywhere.
    #[serde(default)]
    pub report_path: Option<PathBuf>,
    /// Run against the bundled mock backend instead of `base_url`.
    #[serde(default)]
    pub use_fixture: bool,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: None,
            api_key: None,
            schema_dir: None,
            report_path: None,
            use_fixture: false,
        }
    }
}

impl HarnessConfig {
    /// Loads `restcheck.toml` from the working directory, if present, and
    /// the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a source is malformed or a value is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Some(Path::new(CONFIG_FILE)), None)
    }

    /// Loads from an optional file and an explicit variable map.
    ///
    /// When `env` is `None` the process environment is read.
    ///
    /// # Errors
    ///
    /// Returns an error if a source is malformed or a value is invalid.
    pub fn load_from(
        file: Option<&Path>,
        env: Option<HashMap<String, String>>,
    ) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("base_url", DEFAULT_BASE_URL)?
            .set_default("use_fixture", false)?;

        if let Some(file) = file {
            builder = builder.add_source(File::from(file).required(false));
        }

        let config: Self = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .try_parsing(true)
                    .source(env),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Checks values the deserializer cannot.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for a non-HTTP base URL or a zero timeout.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = Url::parse(&self.base_url).map_err(|e| ConfigError::Invalid {
            key: "base_url",
            message: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid {
                key: "base_url",
                message: format!("unsupported scheme '{}'", url.scheme()),
            });
        }
        if self.timeout_ms == Some(0) {
            return Err(ConfigError::Invalid {
                key: "timeout_ms",
                message: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    /// Request timeout as a duration.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn vars(pairs: &[(&str, &str)]) -> Option<HashMap<String, String>> {
        Some(
            pairs
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_defaults() {
        let config = HarnessConfig::load_from(None, vars(&[])).unwrap();
        assert_eq!(config, HarnessConfig::default());
        assert_eq!(config.timeout(), None);
    }

    #[test]
    fn test_file_then_environment() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("restcheck.toml");
        std::fs::write(
            &file,
            "base_url = \"http://localhost:8080\"\ntimeout_ms = 5000\napi_key = \"from-file\"\n",
        )
        .unwrap();

        let config = HarnessConfig::load_from(
            Some(&file),
            vars(&[("RESTCHECK_API_KEY", "reqres-free-v1"), ("RESTCHECK_USE_FIXTURE", "true")]),
        )
        .unwrap();

        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.timeout(), Some(Duration::from_millis(5000)));
        assert_eq!(config.api_key.as_deref(), Some("reqres-free-v1"));
        assert!(config.use_fixture);
    }

    #[test]
    fn test_missing_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let config =
            HarnessConfig::load_from(Some(&dir.path().join("absent.toml")), vars(&[])).unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_report_path_from_environment() {
        let config = HarnessConfig::load_from(
            None,
            vars(&[("RESTCHECK_REPORT_PATH", "target/reqres.har")]),
        )
        .unwrap();
        assert_eq!(config.report_path, Some(PathBuf::from("target/reqres.har")));
    }

    #[test]
    fn test_rejects_non_http_base_url() {
        let err = HarnessConfig::load_from(None, vars(&[("RESTCHECK_BASE_URL", "ftp://reqres.in")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "base_url", .. }));

        let err = HarnessConfig::load_from(None, vars(&[("RESTCHECK_BASE_URL", "reqres")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "base_url", .. }));
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let err = HarnessConfig::load_from(None, vars(&[("RESTCHECK_TIMEOUT_MS", "0")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "timeout_ms", .. }));
    }

    #[test]
    fn test_malformed_value() {
        let err = HarnessConfig::load_from(None, vars(&[("RESTCHECK_TIMEOUT_MS", "soon")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Load(_)));
    }
}
