use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable that overrides `geoip_db_path`.
pub const GEOIP_DB_PATH_ENV: &str = "GEOIP_DB_PATH";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("failed to write config file {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("brute_force_threshold must be at least 1")]
    ZeroThreshold,

    #[error("brute_force_window_minutes must not be negative")]
    NegativeWindow,
}

/// Configuration for one detection run.
///
/// Every field has a default, so a partial TOML file is accepted. The
/// only runtime override is `GEOIP_DB_PATH`, applied at load time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// JSON authentication log to analyze.
    pub log_file: PathBuf,
    /// Where the alert collection is written.
    pub alert_output: PathBuf,
    /// Failed attempts within the window that constitute brute force.
    pub brute_force_threshold: usize,
    /// Sliding window length in minutes.
    pub brute_force_window_minutes: i64,
    /// MaxMind GeoLite2-City database file.
    pub geoip_db_path: PathBuf,
    /// GeoIP lookups permitted per trailing 60 seconds.
    pub rate_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            log_file: PathBuf::from("auth_log.json"),
            alert_output: PathBuf::from("alerts.json"),
            brute_force_threshold: 5,
            brute_force_window_minutes: 5,
            geoip_db_path: PathBuf::from("GeoLite2-City.mmdb"),
            rate_limit: 100,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file, apply the environment
    /// override, and validate.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let mut config: Config = toml::from_str(&contents)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file.
    pub fn to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents).map_err(|source| ConfigError::Write {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn apply_env_overrides(&mut self) {
        if let Ok(path) = env::var(GEOIP_DB_PATH_ENV) {
            self.geoip_db_path = PathBuf::from(path);
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.brute_force_threshold == 0 {
            return Err(ConfigError::ZeroThreshold);
        }
        if self.brute_force_window_minutes < 0 {
            return Err(ConfigError::NegativeWindow);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.brute_force_threshold, 5);
        assert_eq!(config.brute_force_window_minutes, 5);
        assert_eq!(config.rate_limit, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "brute_force_threshold = 10").unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.brute_force_threshold, 10);
        assert_eq!(config.rate_limit, 100);
    }

    #[test]
    fn test_round_trip() {
        let file = NamedTempFile::new().unwrap();
        let mut config = Config::default();
        config.brute_force_window_minutes = 15;
        config.to_file(file.path()).unwrap();

        let loaded = Config::from_file(file.path()).unwrap();
        assert_eq!(loaded.brute_force_window_minutes, 15);
    }

    #[test]
    fn test_zero_threshold_rejected() {
        let mut config = Config::default();
        config.brute_force_threshold = 0;
        assert!(matches!(config.validate(), Err(ConfigError::ZeroThreshold)));
    }

    #[test]
    fn test_env_override() {
        let mut config = Config::default();
        env::set_var(GEOIP_DB_PATH_ENV, "/tmp/override.mmdb");
        config.apply_env_overrides();
        env::remove_var(GEOIP_DB_PATH_ENV);

        assert_eq!(config.geoip_db_path, PathBuf::from("/tmp/override.mmdb"));
    }
}
