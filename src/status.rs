//! Plugin status levels and their exit codes.
//!
//! Monitoring frameworks read the process exit code (0/1/2/3) and the
//! `[TAG]` prefix of the first output line.

use serde::Serialize;
use std::fmt;
use std::process::ExitCode;

/// Result state of a probe run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Status {
    Ok,
    Warning,
    Critical,
    Unknown,
}

impl Status {
    /// Tag printed inside the square brackets of a status line.
    pub fn tag(self) -> &'static str {
        match self {
            Status::Ok => "OK",
            Status::Warning => "WARNING",
            Status::Critical => "CRITICAL",
            Status::Unknown => "UNKNOWN",
        }
    }

    /// Numeric process exit code.
    pub fn code(self) -> u8 {
        match self {
            Status::Ok => 0,
            Status::Warning => 1,
            Status::Critical => 2,
            Status::Unknown => 3,
        }
    }

    /// Formats `[TAG] message`.
    pub fn line(self, message: impl fmt::Display) -> String {
        format!("[{}] {}", self.tag(), message)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl From<Status> for ExitCode {
    fn from(status: Status) -> Self {
        ExitCode::from(status.code())
    }
}
