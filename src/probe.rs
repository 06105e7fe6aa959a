//! One probe invocation: load cache, fetch live counters, write cache,
//! report.
//!
//! Any failure short-circuits with a [`ProbeError`]; nothing is retried.

use chrono::Utc;
use std::fmt;
use std::path::Path;
use tracing::{debug, info};

use crate::cache;
use crate::error::ProbeError;
use crate::mysql::StatusSource;
use crate::report::Report;
use crate::sample::Sample;
use crate::status::Status;

/// Successful end states of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// No usable prior sample; the cache now holds one for the next run.
    Collecting,
    Report(Report),
}

impl Outcome {
    pub fn status(&self) -> Status {
        match self {
            Outcome::Collecting => Status::Unknown,
            Outcome::Report(report) => report.status(),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Collecting => f.write_str(&Status::Unknown.line("Collecting data")),
            Outcome::Report(report) => write!(f, "{report}"),
        }
    }
}

/// Current time in epoch seconds.
pub fn now_epoch() -> i64 {
    Utc::now().timestamp()
}

/// Runs the probe against `source` with the cache file at `cache_path`.
///
/// The cache is rewritten as soon as a non-empty live sample exists, before
/// deciding between [`Outcome::Collecting`] and a report.
pub async fn run<S: StatusSource>(
    source: &mut S,
    cache_path: &Path,
    now: i64,
) -> Result<Outcome, ProbeError> {
    debug!("Using cache file {}", cache_path.display());
    let prior = cache::load_prior(cache_path, now)?;

    let rows = source.fetch_status().await?;
    let live = Sample::from_rows(rows, now);
    if live.is_empty() {
        return Err(ProbeError::EmptyResult);
    }
    debug!("Live sample holds {} counters", live.len());

    cache::persist(cache_path, &live)?;

    let Some(prior) = prior else {
        info!("No usable prior sample, collecting data");
        return Ok(Outcome::Collecting);
    };
    debug!("Prior sample is {}s old", prior.elapsed_seconds);

    Ok(Outcome::Report(Report::compose(&live, &prior)?))
}
