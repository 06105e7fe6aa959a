//! Configuration management for mysql-stats-probe.
//!
//! This module handles loading, merging, and validating configuration from files
//! and CLI arguments. It supports YAML, JSON, and TOML formats.

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::cli::{Args, ConfigFormat, LogLevel};
use crate::error::ProbeError;

// Default configuration constants
pub const DEFAULT_PORT: u16 = 3306;
pub const DEFAULT_DATABASE: &str = "sys";

const REDACTED: &str = "********";

/// Probe configuration; every field may come from the CLI or a config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // Connection
    pub hostname: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub port: Option<u16>,
    /// Schema the connection opens
    pub database: Option<String>,

    // Cache
    #[serde(alias = "cache-dir")]
    pub cache_dir: Option<PathBuf>,

    // Logging
    #[serde(alias = "log-level")]
    pub log_level: Option<LogLevel>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hostname: None,
            username: None,
            password: None,
            port: Some(DEFAULT_PORT),
            database: Some(DEFAULT_DATABASE.into()),
            cache_dir: None,
            log_level: Some(LogLevel::Off),
        }
    }
}

impl Config {
    /// Directory the cache file lives in.
    pub fn cache_dir(&self) -> PathBuf {
        self.cache_dir.clone().unwrap_or_else(std::env::temp_dir)
    }

    pub fn log_level(&self) -> LogLevel {
        self.log_level.unwrap_or(LogLevel::Off)
    }
}

/// Validated connection parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionSettings {
    pub hostname: String,
    pub username: String,
    pub password: Option<String>,
    pub port: u16,
    pub database: String,
}

impl ConnectionSettings {
    pub fn from_config(cfg: &Config) -> Result<Self, ProbeError> {
        validate_effective_config(cfg)?;

        Ok(Self {
            hostname: cfg.hostname.clone().unwrap_or_default(),
            username: cfg.username.clone().unwrap_or_default(),
            password: cfg.password.clone(),
            port: cfg.port.unwrap_or(DEFAULT_PORT),
            database: cfg
                .database
                .clone()
                .unwrap_or_else(|| DEFAULT_DATABASE.to_string()),
        })
    }
}

/// Validate effective config (used at startup)
pub fn validate_effective_config(cfg: &Config) -> anyhow::Result<()> {
    if cfg.hostname.as_deref().map_or(true, str::is_empty) {
        bail!("hostname is required (use -H/--hostname or set hostname in the config file)");
    }

    if cfg.username.as_deref().map_or(true, str::is_empty) {
        bail!("username is required (use -u/--username or set username in the config file)");
    }

    if cfg.port == Some(0) {
        bail!("port must be between 1 and 65535");
    }

    if cfg.database.as_deref() == Some("") {
        bail!("database must not be empty");
    }

    if let Some(dir) = &cfg.cache_dir {
        if !dir.is_dir() {
            bail!("cache_dir {} is not a directory", dir.display());
        }
    }

    Ok(())
}

/// Resolves configuration from CLI args, config file, and defaults.
/// This enforces precedence: CLI (if provided) > config file > default.
pub fn resolve_config(args: &Args) -> anyhow::Result<Config> {
    let mut config = if args.no_config {
        Config::default()
    } else {
        load_config(args.config.as_deref())?
    };

    if let Some(hostname) = &args.hostname {
        config.hostname = Some(hostname.clone());
    }
    if let Some(username) = &args.username {
        config.username = Some(username.clone());
    }
    if let Some(password) = &args.password {
        config.password = Some(password.clone());
    }
    if let Some(port) = args.port {
        config.port = Some(port);
    }
    if let Some(dir) = &args.cache_dir {
        config.cache_dir = Some(dir.clone());
    }
    if let Some(level) = args.log_level {
        config.log_level = Some(level);
    }

    Ok(config)
}

/// Loads a config file, or the first default location that exists.
///
/// An explicitly given path must exist; with no path and no default file
/// the defaults are returned.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let path = match path {
        Some(p) => {
            if !p.exists() {
                bail!("config file {} not found", p.display());
            }
            p.to_path_buf()
        }
        None => {
            let defaults = [
                "/etc/mysql-stats-probe/probe.yaml",
                "/etc/mysql-stats-probe/probe.yml",
                "/etc/mysql-stats-probe/probe.json",
                "./mysql-stats-probe.yaml",
                "./mysql-stats-probe.yml",
                "./mysql-stats-probe.json",
            ];

            match defaults.iter().map(Path::new).find(|p| p.exists()) {
                Some(p) => p.to_path_buf(),
                None => return Ok(Config::default()),
            }
        }
    };

    let content = fs::read_to_string(&path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;

    let config: Config = match path.extension().and_then(|s| s.to_str()) {
        Some("json") => serde_json::from_str(&content)
            .with_context(|| format!("invalid JSON in {}", path.display()))?,
        Some("toml") => toml::from_str(&content)
            .with_context(|| format!("invalid TOML in {}", path.display()))?,
        _ => serde_yaml::from_str(&content)
            .with_context(|| format!("invalid YAML in {}", path.display()))?,
    };

    info!("Loaded configuration from: {}", path.display());
    Ok(merge_defaults(config))
}

/// Fills fields a config file left unset with their defaults.
fn merge_defaults(mut config: Config) -> Config {
    let defaults = Config::default();
    config.port = config.port.or(defaults.port);
    config.database = config.database.or(defaults.database);
    config.log_level = config.log_level.or(defaults.log_level);
    config
}

/// Renders configuration in requested format, password redacted.
pub fn render_config(config: &Config, format: ConfigFormat) -> anyhow::Result<String> {
    let mut shown = config.clone();
    if shown.password.is_some() {
        shown.password = Some(REDACTED.to_string());
    }

    let output = match format {
        ConfigFormat::Json => serde_json::to_string_pretty(&shown)?,
        ConfigFormat::Toml => toml::to_string_pretty(&shown)?,
        ConfigFormat::Yaml => serde_yaml::to_string(&shown)?,
    };
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn valid_config() -> Config {
        Config {
            hostname: Some("db1".into()),
            username: Some("monitor".into()),
            ..Config::default()
        }
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.port, Some(3306));
        assert_eq!(config.database.as_deref(), Some("sys"));
        assert_eq!(config.log_level(), LogLevel::Off);
        assert_eq!(config.cache_dir(), std::env::temp_dir());
    }

    #[test]
    fn test_validate_requires_target() {
        assert!(validate_effective_config(&Config::default()).is_err());

        let no_user = Config {
            username: None,
            ..valid_config()
        };
        let err = validate_effective_config(&no_user).unwrap_err();
        assert!(err.to_string().contains("username is required"));

        assert!(validate_effective_config(&valid_config()).is_ok());
    }

    #[test]
    fn test_validate_port_and_cache_dir() {
        let zero_port = Config {
            port: Some(0),
            ..valid_config()
        };
        assert!(validate_effective_config(&zero_port).is_err());

        let missing_dir = Config {
            cache_dir: Some(PathBuf::from("/nonexistent/probe-cache")),
            ..valid_config()
        };
        assert!(validate_effective_config(&missing_dir).is_err());
    }

    #[test]
    fn test_connection_settings() {
        let settings = ConnectionSettings::from_config(&valid_config()).unwrap();
        assert_eq!(settings.hostname, "db1");
        assert_eq!(settings.username, "monitor");
        assert_eq!(settings.password, None);
        assert_eq!(settings.port, 3306);
        assert_eq!(settings.database, "sys");

        let err = ConnectionSettings::from_config(&Config::default()).unwrap_err();
        assert!(matches!(err, ProbeError::Config(_)));
    }

    #[test]
    fn test_cli_overrides_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "hostname: db-from-file\nusername: file-user\nport: 3310").unwrap();

        let args = Args {
            config: Some(file.path().to_path_buf()),
            hostname: Some("db-from-cli".into()),
            ..Args::default()
        };
        let config = resolve_config(&args).unwrap();

        assert_eq!(config.hostname.as_deref(), Some("db-from-cli"));
        assert_eq!(config.username.as_deref(), Some("file-user"));
        assert_eq!(config.port, Some(3310));
        assert_eq!(config.database.as_deref(), Some("sys"));
    }

    #[test]
    fn test_load_json_and_toml() {
        let mut json = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(json, r#"{{"hostname": "j", "username": "u", "log_level": "debug"}}"#).unwrap();
        let config = load_config(Some(json.path())).unwrap();
        assert_eq!(config.hostname.as_deref(), Some("j"));
        assert_eq!(config.log_level(), LogLevel::Debug);

        let mut toml_file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(toml_file, "hostname = \"t\"\nusername = \"u\"\nport = 3399").unwrap();
        let config = load_config(Some(toml_file.path())).unwrap();
        assert_eq!(config.hostname.as_deref(), Some("t"));
        assert_eq!(config.port, Some(3399));
    }

    #[test]
    fn test_missing_explicit_file_fails() {
        assert!(load_config(Some(Path::new("/nonexistent/probe.yaml"))).is_err());
    }

    #[test]
    fn test_render_redacts_password() {
        let config = Config {
            password: Some("hunter2".into()),
            ..valid_config()
        };
        let yaml = render_config(&config, ConfigFormat::Yaml).unwrap();
        assert!(!yaml.contains("hunter2"));
        assert!(yaml.contains(REDACTED));

        let json = render_config(&config, ConfigFormat::Json).unwrap();
        assert!(json.contains("\"hostname\": \"db1\""));
    }
}
