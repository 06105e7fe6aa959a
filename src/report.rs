//! Report composition: status lines plus perfdata.

use chrono::{DateTime, Utc};
use std::fmt;

use crate::counters::{perfdata_key, Counter};
use crate::error::ProbeError;
use crate::sample::{PriorSample, Sample};
use crate::status::Status;

const SECONDS_PER_DAY: i64 = 86_400;

/// Formats an uptime in seconds as `SS`, `MM:SS`, `HH:MM:SS` or
/// `<days> day(s) HH:MM:SS`.
///
/// The clock part is the UTC time of day of the epoch instant `seconds`.
pub fn format_uptime(seconds: i64) -> String {
    let clock = DateTime::<Utc>::from_timestamp(seconds, 0).unwrap_or(DateTime::UNIX_EPOCH);

    if seconds < 60 {
        clock.format("%S").to_string()
    } else if seconds < 3600 {
        clock.format("%M:%S").to_string()
    } else if seconds < SECONDS_PER_DAY {
        clock.format("%H:%M:%S").to_string()
    } else {
        format!(
            "{} day(s) {}",
            seconds / SECONDS_PER_DAY,
            clock.format("%H:%M:%S")
        )
    }
}

/// A single `key=value;;;` perfdata token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Perfdata {
    pub key: String,
    pub value: i64,
}

impl Perfdata {
    fn new(key: impl AsRef<str>, value: i64) -> Self {
        Self {
            key: perfdata_key(key.as_ref()),
            value,
        }
    }
}

impl fmt::Display for Perfdata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={};;;", self.key, self.value)
    }
}

/// One human readable counter line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLine {
    pub status: Status,
    pub label: String,
    pub value: i64,
}

impl fmt::Display for ReportLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\\_ [{}] {} = {}", self.status, self.label, self.value)
    }
}

/// Fully computed OK report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub uptime_seconds: i64,
    pub lines: Vec<ReportLine>,
    pub perfdata: Vec<Perfdata>,
}

impl Report {
    /// Builds the report for a live sample against the prior one.
    ///
    /// Rate counters become floored per-second rates over
    /// `prior.elapsed_seconds`; gauges are reported raw. Uptime only feeds
    /// the headline and its perfdata token.
    pub fn compose(live: &Sample, prior: &PriorSample) -> Result<Self, ProbeError> {
        let uptime_seconds = live
            .get(Counter::Uptime)
            .ok_or(ProbeError::MissingCounter(Counter::Uptime.name()))?;

        let mut lines = Vec::new();
        let mut perfdata = Vec::new();

        for (counter, value) in live.iter() {
            let label = counter.label();

            if counter.is_rate() {
                if let Some(rate) = prior.rate(counter, value) {
                    perfdata.push(Perfdata::new(&label, rate));
                    lines.push(ReportLine {
                        status: Status::Ok,
                        label,
                        value: rate,
                    });
                }
            } else if counter != Counter::Uptime {
                lines.push(ReportLine {
                    status: Status::Ok,
                    label,
                    value,
                });
            }

            perfdata.push(Perfdata::new(counter.name(), value));
        }

        perfdata.push(Perfdata::new("timedelta", prior.elapsed_seconds));

        Ok(Self {
            uptime_seconds,
            lines,
            perfdata,
        })
    }

    pub fn status(&self) -> Status {
        self.lines
            .iter()
            .map(|l| l.status)
            .max()
            .unwrap_or(Status::Ok)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lines = self
            .lines
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n");
        let perfdata = self
            .perfdata
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ");

        write!(
            f,
            "[{}] Uptime: {}\n{}|{}",
            self.status(),
            format_uptime(self.uptime_seconds),
            lines,
            perfdata
        )
    }
}
