use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, path::PathBuf, time::Duration};

pub const DEFAULT_GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";
pub const DEFAULT_FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";

/// Settings for the cached, retrying HTTP client used for weather requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Cache file; relative paths resolve against the working directory.
    pub cache_path: PathBuf,
    pub expire_after_secs: u64,
    pub retries: u32,
    pub backoff_factor: f64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            cache_path: PathBuf::from(".cache.json"),
            expire_after_secs: 3600,
            retries: 5,
            backoff_factor: 0.2,
        }
    }
}

impl HttpConfig {
    pub fn expire_after(&self) -> Duration {
        Duration::from_secs(self.expire_after_secs)
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// forecast_url = "https://api.open-meteo.com/v1/forecast"
///
/// [http]
/// cache_path = ".cache.json"
/// retries = 3
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub geocoding_url: String,
    pub forecast_url: String,
    pub http: HttpConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            geocoding_url: DEFAULT_GEOCODING_URL.to_string(),
            forecast_url: DEFAULT_FORECAST_URL.to_string(),
            http: HttpConfig::default(),
        }
    }
}

impl Config {
    /// Load config from the platform config directory, or defaults if there is no file yet.
    pub fn load() -> Result<Self> {
        Self::load_or_default(Self::config_file_path())
    }

    /// Defaults when there is no config directory at all (e.g. `HOME` unset).
    fn load_or_default(path: Option<PathBuf>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from(&path),
            None => {
                tracing::debug!("No platform config directory, using default config");
                Ok(Self::default())
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        cfg.validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Path to the config file, if the platform has a config directory.
    pub fn config_file_path() -> Option<PathBuf> {
        ProjectDirs::from("dev", "meteo", "meteo").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    fn validate(&self) -> Result<()> {
        if !self.http.backoff_factor.is_finite() || self.http.backoff_factor < 0.0 {
            return Err(anyhow!(
                "http.backoff_factor must be a non-negative number, got {}",
                self.http.backoff_factor
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_open_meteo_and_cache_policy() {
        let cfg = Config::default();

        assert_eq!(cfg.geocoding_url, DEFAULT_GEOCODING_URL);
        assert_eq!(cfg.forecast_url, DEFAULT_FORECAST_URL);
        assert_eq!(cfg.http.expire_after(), Duration::from_secs(3600));
        assert_eq!(cfg.http.retries, 5);
        assert_eq!(cfg.http.backoff_factor, 0.2);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg = Config::load_from(&dir.path().join("absent.toml")).expect("load");

        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn missing_config_directory_yields_defaults() {
        let cfg = Config::load_or_default(None).expect("load");

        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "[http]\nretries = 2\n").expect("write config");

        let cfg = Config::load_from(&path).expect("load");

        assert_eq!(cfg.http.retries, 2);
        assert_eq!(cfg.http.backoff_factor, 0.2);
        assert_eq!(cfg.forecast_url, DEFAULT_FORECAST_URL);
    }

    #[test]
    fn malformed_file_reports_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "retries = [").expect("write config");

        let err = Config::load_from(&path).unwrap_err();

        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn negative_backoff_is_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "[http]\nbackoff_factor = -1.0\n").expect("write config");

        let err = Config::load_from(&path).unwrap_err();

        assert!(format!("{err:#}").contains("backoff_factor"));
    }
}
