//! The fixed set of server status counters the probe reads.
//!
//! Rate counters are cumulative and reported per second; everything else
//! is a gauge reported as-is. `Uptime` is a gauge that only feeds the
//! headline and its perfdata token.

use std::fmt;

/// A server status variable queried by the probe.
///
/// Declaration order is the report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Counter {
    Connections,
    Queries,
    Questions,
    Uptime,
    OpenFiles,
    OpenTables,
    TableLocksWaited,
    ThreadsConnected,
    ThreadsRunning,
}

impl Counter {
    pub const ALL: [Counter; 9] = [
        Counter::Connections,
        Counter::Queries,
        Counter::Questions,
        Counter::Uptime,
        Counter::OpenFiles,
        Counter::OpenTables,
        Counter::TableLocksWaited,
        Counter::ThreadsConnected,
        Counter::ThreadsRunning,
    ];

    /// Counters persisted to the cache and reported as rates.
    pub const RATES: [Counter; 3] = [Counter::Connections, Counter::Queries, Counter::Questions];

    /// Server-side variable name.
    pub fn name(self) -> &'static str {
        match self {
            Counter::Connections => "Connections",
            Counter::Queries => "Queries",
            Counter::Questions => "Questions",
            Counter::Uptime => "Uptime",
            Counter::OpenFiles => "Open_files",
            Counter::OpenTables => "Open_tables",
            Counter::TableLocksWaited => "Table_locks_waited",
            Counter::ThreadsConnected => "Threads_connected",
            Counter::ThreadsRunning => "Threads_running",
        }
    }

    /// Looks up a counter by its server-side name (exact match).
    pub fn from_name(name: &str) -> Option<Counter> {
        Counter::ALL.iter().copied().find(|c| c.name() == name)
    }

    pub fn is_rate(self) -> bool {
        Counter::RATES.contains(&self)
    }

    /// Hard-coded display label, if the counter has one.
    fn friendly_label(self) -> Option<&'static str> {
        match self {
            Counter::Connections => Some("Connections per second"),
            Counter::Queries => Some("Queries per second"),
            Counter::Questions => Some("Questions per second"),
            _ => None,
        }
    }

    /// Human readable label for report lines.
    pub fn label(self) -> String {
        match self.friendly_label() {
            Some(label) => label.to_string(),
            None => derive_label(self.name()),
        }
    }
}

impl fmt::Display for Counter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// `Open_files` -> `Open files`: lower-case, capitalize the first letter,
/// underscores become spaces.
pub fn derive_label(name: &str) -> String {
    let lower = name.to_lowercase();
    let mut chars = lower.chars();
    let capitalized = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
        None => String::new(),
    };
    capitalized.replace('_', " ")
}

/// Perfdata key: lower-case with spaces turned into underscores.
pub fn perfdata_key(text: &str) -> String {
    text.to_lowercase().replace(' ', "_")
}
