//! MySQL Stats Probe Library
//!
//! Monitoring plugin logic that turns MySQL status counters into a status
//! line with perfdata. Cumulative counters are reported as per-second rates
//! computed against the sample cached by the previous invocation.
//!
//! # Usage
//!
//! ```rust
//! use std::collections::BTreeMap;
//! use mysql_stats_probe::{Counter, PriorSample, Report, Sample};
//!
//! let live = Sample::from_rows(
//!     vec![("Queries", "1600"), ("Uptime", "125"), ("Threads_running", "2")],
//!     1_700_000_060,
//! );
//! let prior = PriorSample::new(60, BTreeMap::from([(Counter::Queries, 1000)])).unwrap();
//!
//! let report = Report::compose(&live, &prior).unwrap();
//! assert_eq!(
//!     report.to_string(),
//!     "[OK] Uptime: 02:05\n\\_ [OK] Queries per second = 10\n\\_ [OK] Threads running = 2\
//!      |queries_per_second=10;;; queries=1600;;; uptime=125;;; threads_running=2;;; timedelta=60;;;"
//! );
//! ```

pub mod cache;
pub mod cli;
pub mod config;
pub mod counters;
pub mod error;
pub mod mysql;
pub mod probe;
pub mod report;
pub mod sample;
pub mod status;

// Re-export main types for convenience
pub use counters::Counter;
pub use error::ProbeError;
pub use mysql::{MysqlSource, StatusSource};
pub use probe::Outcome;
pub use report::Report;
pub use sample::{PriorSample, Sample};
pub use status::Status;
