//! Report configuration
//!
//! Resolved once at startup and passed down explicitly. Precedence, lowest
//! first: built-in defaults, config file, `DASHBOARD_DATA_PATH`, CLI flags.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

pub const DATA_PATH_ENV: &str = "DASHBOARD_DATA_PATH";
pub const DEFAULT_DATA_FILE: &str = "dashboard_data.xlsx";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Workbook to read
    pub data_path: PathBuf,
    /// Rows shown in the "employees by volume" chart
    pub top_employees: usize,
    /// Rows shown in the "cancellations by employee" chart
    pub top_cancelers: usize,
    /// Rows shown in the OTHER procedures chart
    pub top_other_procedures: usize,
    /// Minimum appointments before a procedure can be flagged as high-rate
    pub high_rate_min_appointments: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_FILE),
            top_employees: 10,
            top_cancelers: 15,
            top_other_procedures: 10,
            high_rate_min_appointments: 5,
        }
    }
}

/// Default config file location: `<config_dir>/clinic-report/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("clinic-report").join("config.toml"))
}

impl Config {
    /// Parse a TOML document; missing keys keep their defaults
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse config file")
    }

    /// Load from `path`. A missing file yields the defaults.
    pub fn load_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config = Self::from_toml(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Apply the environment and CLI overrides for the data path
    pub fn with_data_path(mut self, env_value: Option<String>, cli_value: Option<PathBuf>) -> Self {
        if let Some(env_path) = env_value.filter(|v| !v.trim().is_empty()) {
            self.data_path = PathBuf::from(env_path);
        }
        if let Some(cli_path) = cli_value {
            self.data_path = cli_path;
        }
        self
    }

    /// Resolve the full configuration for this run
    pub fn resolve(config_path: Option<&Path>, data_path: Option<PathBuf>) -> Result<Self> {
        let base = match config_path {
            Some(path) => {
                if !path.exists() {
                    anyhow::bail!("Config file does not exist: {}", path.display());
                }
                Self::load_file(path)?
            }
            None => match default_config_path() {
                Some(path) => Self::load_file(&path)?,
                None => Self::default(),
            },
        };

        Ok(base.with_data_path(std::env::var(DATA_PATH_ENV).ok(), data_path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml("top_employees = 3\n").unwrap();
        assert_eq!(config.top_employees, 3);
        assert_eq!(config.top_cancelers, 15);
        assert_eq!(config.data_path, PathBuf::from(DEFAULT_DATA_FILE));
    }

    #[test]
    fn test_invalid_toml() {
        assert!(Config::from_toml("top_employees = \"many\"").is_err());
    }

    #[test]
    fn test_data_path_precedence() {
        let file = Config::from_toml("data_path = \"from_file.xlsx\"").unwrap();
        assert_eq!(file.data_path, PathBuf::from("from_file.xlsx"));

        let env = file.clone().with_data_path(Some("from_env.xlsx".into()), None);
        assert_eq!(env.data_path, PathBuf::from("from_env.xlsx"));

        let cli = file
            .clone()
            .with_data_path(Some("from_env.xlsx".into()), Some("from_cli.xlsx".into()));
        assert_eq!(cli.data_path, PathBuf::from("from_cli.xlsx"));

        let blank_env = file.with_data_path(Some("  ".into()), None);
        assert_eq!(blank_env.data_path, PathBuf::from("from_file.xlsx"));
    }

    #[test]
    fn test_missing_file_is_default() {
        let path = std::env::temp_dir().join(format!("{}.toml", uuid::Uuid::new_v4()));
        assert_eq!(Config::load_file(&path).unwrap(), Config::default());
    }
}
