//! Error taxonomy for a probe run.
//!
//! Every failure is fatal for the invocation. The binary maps each variant
//! to a status line and exit code in one place.

use thiserror::Error;

use crate::status::Status;

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("Error reading cache data: {0}")]
    CacheRead(#[source] std::io::Error),

    #[error("Error writing cache data: {0}")]
    CacheWrite(#[source] std::io::Error),

    #[error("{0}")]
    Connection(String),

    #[error("{0}")]
    Query(String),

    #[error("No data received")]
    EmptyResult,

    #[error("Counter {0} missing from server response")]
    MissingCounter(&'static str),

    #[error("Configuration invalid: {0}")]
    Config(String),
}

impl ProbeError {
    /// Status reported for this error.
    ///
    /// Configuration problems mean the probe never looked at the server,
    /// so they are UNKNOWN rather than CRITICAL.
    pub fn status(&self) -> Status {
        match self {
            ProbeError::Config(_) => Status::Unknown,
            _ => Status::Critical,
        }
    }

    /// Full `[TAG] message` line for stdout.
    pub fn status_line(&self) -> String {
        self.status().line(self)
    }
}

impl From<anyhow::Error> for ProbeError {
    fn from(err: anyhow::Error) -> Self {
        ProbeError::Config(format!("{err:#}"))
    }
}
