//! Cache file holding the previous sample between invocations.
//!
//! Format, one record per file, overwritten on every run:
//!
//! ```text
//! <version>|<epoch_seconds_at_capture>
//! <counter_name>:<integer_value>
//! ```
//!
//! Only rate counters are stored. A record that is missing, carries a
//! different version, has a timestamp that is not in the past, or cannot be
//! parsed counts as "no prior data".

use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::counters::Counter;
use crate::error::ProbeError;
use crate::sample::{PriorSample, Sample};

/// Format tag written in the header line.
pub const CACHE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// File name prefix of cache files.
pub const PROGRAM_NAME: &str = env!("CARGO_PKG_NAME");

/// Cache file path for a (login, host, username) triple inside `dir`.
pub fn resolve_cache_path(dir: &Path, login: &str, host: &str, username: &str) -> PathBuf {
    let key = format!("{login}:{host}:{username}");
    let digest = hex::encode(Sha256::digest(key.as_bytes()));
    dir.join(format!("{PROGRAM_NAME}.{digest}.dat"))
}

/// Name of the invoking user.
///
/// Prefers the session's `LOGNAME`/`USER`, then the passwd entry of the
/// effective uid.
pub fn login_name() -> String {
    for var in ["LOGNAME", "USER"] {
        if let Ok(name) = std::env::var(var) {
            if !name.is_empty() {
                return name;
            }
        }
    }

    let uid = nix::unistd::geteuid();
    match nix::unistd::User::from_uid(uid) {
        Ok(Some(user)) => user.name,
        Ok(None) => uid.to_string(),
        Err(e) => {
            debug!("Failed to lookup user for uid {}: {}", uid, e);
            uid.to_string()
        }
    }
}

/// Loads the prior sample at `path` relative to `now` (epoch seconds).
///
/// A missing file or one that is not UTF-8 text is not an error; any
/// other read failure is.
pub fn load_prior(path: &Path, now: i64) -> Result<Option<PriorSample>, ProbeError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!("No cache file at {}", path.display());
            return Ok(None);
        }
        Err(e) if e.kind() == io::ErrorKind::InvalidData => {
            debug!("Cache file {} is not valid UTF-8: {}", path.display(), e);
            return Ok(None);
        }
        Err(e) => return Err(ProbeError::CacheRead(e)),
    };

    Ok(parse_record(&content, now))
}

/// Parses cache file content. `None` means the record is unusable.
pub fn parse_record(content: &str, now: i64) -> Option<PriorSample> {
    let mut lines = content.lines();

    let header = lines.next()?;
    let Some((version, timestamp)) = header.split_once('|') else {
        debug!("Cache header {:?} is malformed", header);
        return None;
    };

    if version != CACHE_VERSION {
        debug!(
            "Cache version {:?} does not match {:?}",
            version, CACHE_VERSION
        );
        return None;
    }

    let Ok(captured_at) = timestamp.trim().parse::<i64>() else {
        debug!("Cache timestamp {:?} is not an integer", timestamp);
        return None;
    };
    if captured_at >= now {
        debug!(
            "Cache timestamp {} is not before current time {}",
            captured_at, now
        );
        return None;
    }

    let mut values = BTreeMap::new();
    for line in lines.map(str::trim).filter(|l| !l.is_empty()) {
        let (name, value) = line.split_once(':')?;
        let value = value.trim().parse::<i64>().ok()?;
        match Counter::from_name(name) {
            Some(counter) => {
                values.insert(counter, value);
            }
            None => debug!("Ignoring unknown cached counter {}", name),
        }
    }

    if let Some(missing) = Counter::RATES.iter().find(|c| !values.contains_key(c)) {
        debug!("Cache record lacks rate counter {}", missing);
        return None;
    }

    PriorSample::new(now - captured_at, values)
}

/// Renders the record persisted for `sample`, stamped with its capture time.
pub fn render_record(sample: &Sample) -> String {
    let mut out = format!("{CACHE_VERSION}|{}\n", sample.captured_at);
    for counter in Counter::RATES {
        if let Some(value) = sample.get(counter) {
            // writing to a String cannot fail
            let _ = writeln!(out, "{}:{}", counter.name(), value);
        }
    }
    out
}

/// Overwrites the cache file at `path` with the rate counters of `sample`.
pub fn persist(path: &Path, sample: &Sample) -> Result<(), ProbeError> {
    fs::write(path, render_record(sample)).map_err(ProbeError::CacheWrite)?;
    info!("Cache written to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(version: &str, timestamp: i64) -> String {
        format!("{version}|{timestamp}\nConnections:10\nQueries:200\nQuestions:150\n")
    }

    #[test]
    fn test_path_is_deterministic() {
        let dir = Path::new("/tmp");
        let a = resolve_cache_path(dir, "nagios", "db1", "monitor");
        let b = resolve_cache_path(dir, "nagios", "db1", "monitor");
        assert_eq!(a, b);

        let name = a.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("mysql-stats-probe."));
        assert!(name.ends_with(".dat"));
        // sha256 hex digest
        assert_eq!(name.len(), "mysql-stats-probe.".len() + 64 + ".dat".len());
    }

    #[test]
    fn test_path_differs_per_target() {
        let dir = Path::new("/tmp");
        let base = resolve_cache_path(dir, "nagios", "db1", "monitor");
        assert_ne!(base, resolve_cache_path(dir, "nagios", "db2", "monitor"));
        assert_ne!(base, resolve_cache_path(dir, "nagios", "db1", "root"));
        assert_ne!(base, resolve_cache_path(dir, "icinga", "db1", "monitor"));
    }

    #[test]
    fn test_parse_valid_record() {
        let prior = parse_record(&record(CACHE_VERSION, 1000), 1060).unwrap();
        assert_eq!(prior.elapsed_seconds, 60);
        assert_eq!(prior.get(Counter::Connections), Some(10));
        assert_eq!(prior.get(Counter::Queries), Some(200));
        assert_eq!(prior.get(Counter::Questions), Some(150));
    }

    #[test]
    fn test_parse_rejects_other_version() {
        assert!(parse_record(&record("0.9.0", 1000), 1060).is_none());
    }

    #[test]
    fn test_parse_rejects_non_past_timestamp() {
        assert!(parse_record(&record(CACHE_VERSION, 1060), 1060).is_none());
        assert!(parse_record(&record(CACHE_VERSION, 2000), 1060).is_none());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_record("", 1060).is_none());
        assert!(parse_record("no header here", 1060).is_none());
        assert!(parse_record(&format!("{CACHE_VERSION}|abc\n"), 1060).is_none());
        let bad_line = format!("{CACHE_VERSION}|1000\nConnections:x\nQueries:1\nQuestions:1\n");
        assert!(parse_record(&bad_line, 1060).is_none());
    }

    #[test]
    fn test_invalid_utf8_is_no_prior() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("garbage.dat");
        fs::write(&path, b"\xff\xfe garbage\n").unwrap();

        assert!(load_prior(&path, 1060).unwrap().is_none());
    }

    #[test]
    fn test_parse_requires_all_rate_counters() {
        let partial = format!("{CACHE_VERSION}|1000\nConnections:10\nQueries:200\n");
        assert!(parse_record(&partial, 1060).is_none());
    }

    #[test]
    fn test_render_only_rate_counters() {
        let sample = Sample::from_rows(
            vec![
                ("Connections", "5"),
                ("Queries", "6"),
                ("Questions", "7"),
                ("Uptime", "3600"),
                ("Threads_running", "1"),
            ],
            1234,
        );
        assert_eq!(
            render_record(&sample),
            format!("{CACHE_VERSION}|1234\nConnections:5\nQueries:6\nQuestions:7\n")
        );
    }
}
