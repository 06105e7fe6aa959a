//! CLI arguments for mysql-stats-probe.
//!
//! This module defines the command-line interface using the clap library.

use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Log level options for CLI parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Configuration format options for output
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum ConfigFormat {
    #[default]
    Yaml,
    Json,
    Toml,
}

/// Main CLI arguments structure
#[derive(Parser, Debug, Default)]
#[command(
    name = "mysql-stats-probe",
    about = "Monitoring plugin reporting MySQL status counters and per-second rates",
    long_about = "Monitoring plugin reporting MySQL status counters and per-second rates.\n\n\
                  Reads connection, query and thread counters from performance_schema, \
                  compares them with the sample cached by the previous run and prints a \
                  status line with perfdata. Exit codes: 0 OK, 1 WARNING, 2 CRITICAL, 3 UNKNOWN.",
    author = "Michael Moll <exporter@herakles.now> - Herakles",
    version = concat!("v", env!("CARGO_PKG_VERSION")),
    disable_version_flag = true,
    disable_help_flag = true
)]
pub struct Args {
    /// The host address of the MySQL server
    #[arg(short = 'H', long)]
    pub hostname: Option<String>,

    /// MySQL user
    #[arg(short = 'u', long)]
    pub username: Option<String>,

    /// MySQL password
    #[arg(short = 'p', long, env = "MYSQL_PWD", hide_env_values = true)]
    pub password: Option<String>,

    /// MySQL port
    #[arg(short = 'P', long)]
    pub port: Option<u16>,

    /// Config file (YAML/JSON/TOML)
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Disable all config file loading
    #[arg(long)]
    pub no_config: bool,

    /// Directory for the cache file (default: system temp dir)
    #[arg(long)]
    pub cache_dir: Option<PathBuf>,

    /// Log level (logs go to stderr)
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Print effective merged config and exit
    #[arg(long)]
    pub show_config: bool,

    /// Output format for --show-config
    #[arg(long, value_enum, default_value = "yaml")]
    pub config_format: ConfigFormat,

    /// Print version
    #[arg(short = 'V', long, action = clap::ArgAction::Version)]
    pub version: Option<bool>,

    /// Print help
    #[arg(short = 'h', long, action = clap::ArgAction::Help)]
    pub help: Option<bool>,
}
