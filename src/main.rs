//! mysql-stats-probe - version 1.0.0
//!
//! Monitoring plugin entry point. Parses arguments, sets up logging and maps
//! the probe result to a status line and exit code.

use clap::error::ErrorKind;
use clap::Parser;
use std::process::ExitCode;
use tracing::{debug, Level};

use mysql_stats_probe::cache::{login_name, resolve_cache_path};
use mysql_stats_probe::cli::{Args, LogLevel};
use mysql_stats_probe::config::{render_config, resolve_config, Config, ConnectionSettings};
use mysql_stats_probe::probe::{self, Outcome};
use mysql_stats_probe::{MysqlSource, ProbeError, Status};

/// Initializes tracing on stderr so stdout carries only plugin output.
fn setup_logging(config: &Config) {
    let log_level = match config.log_level() {
        LogLevel::Off => return,
        LogLevel::Error => Level::ERROR,
        LogLevel::Warn => Level::WARN,
        LogLevel::Info => Level::INFO,
        LogLevel::Debug => Level::DEBUG,
        LogLevel::Trace => Level::TRACE,
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_ok() {
        debug!("Logging initialized with level: {:?}", config.log_level());
    }
}

async fn execute(config: &Config) -> Result<Outcome, ProbeError> {
    let settings = ConnectionSettings::from_config(config)?;
    let cache_path = resolve_cache_path(
        &config.cache_dir(),
        &login_name(),
        &settings.hostname,
        &settings.username,
    );

    let mut source = MysqlSource::new(&settings);
    probe::run(&mut source, &cache_path, probe::now_epoch()).await
}

/// Main application entry point.
#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => Status::Ok.into(),
                _ => Status::Unknown.into(),
            };
        }
    };

    let config = match resolve_config(&args) {
        Ok(config) => config,
        Err(e) => {
            println!("{}", ProbeError::from(e).status_line());
            return Status::Unknown.into();
        }
    };
    setup_logging(&config);

    if args.show_config {
        return match render_config(&config, args.config_format) {
            Ok(output) => {
                println!("{output}");
                Status::Ok.into()
            }
            Err(e) => {
                println!("{}", ProbeError::from(e).status_line());
                Status::Unknown.into()
            }
        };
    }

    match execute(&config).await {
        Ok(outcome) => {
            println!("{outcome}");
            outcome.status().into()
        }
        Err(e) => {
            println!("{}", e.status_line());
            e.status().into()
        }
    }
}
