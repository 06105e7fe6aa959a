//! Counter samples: the live one read from the server and the prior one
//! carried forward in the cache file.

use std::collections::BTreeMap;
use tracing::debug;

use crate::counters::Counter;

/// One reading of the server counters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sample {
    /// Capture time in epoch seconds.
    pub captured_at: i64,
    values: BTreeMap<Counter, i64>,
}

impl Sample {
    pub fn new(captured_at: i64) -> Self {
        Self {
            captured_at,
            values: BTreeMap::new(),
        }
    }

    /// Builds a sample from `(Variable_name, Variable_value)` rows.
    ///
    /// Names outside the counter set and non-integer values are skipped.
    pub fn from_rows<I, N, V>(rows: I, captured_at: i64) -> Self
    where
        I: IntoIterator<Item = (N, V)>,
        N: AsRef<str>,
        V: AsRef<str>,
    {
        let mut sample = Sample::new(captured_at);
        for (name, value) in rows {
            let (name, value) = (name.as_ref(), value.as_ref());
            let Some(counter) = Counter::from_name(name) else {
                debug!("Ignoring unexpected status variable {}", name);
                continue;
            };
            match value.trim().parse::<i64>() {
                Ok(v) => sample.insert(counter, v),
                Err(e) => debug!("Skipping {} with non-integer value {:?}: {}", name, value, e),
            }
        }
        sample
    }

    pub fn insert(&mut self, counter: Counter, value: i64) {
        self.values.insert(counter, value);
    }

    pub fn get(&self, counter: Counter) -> Option<i64> {
        self.values.get(&counter).copied()
    }

    /// Counters in report order.
    pub fn iter(&self) -> impl Iterator<Item = (Counter, i64)> + '_ {
        self.values.iter().map(|(c, v)| (*c, *v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Rate counters loaded from the cache, plus the seconds elapsed since
/// they were captured. `elapsed_seconds` is always positive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriorSample {
    pub elapsed_seconds: i64,
    values: BTreeMap<Counter, i64>,
}

impl PriorSample {
    /// Returns `None` unless `elapsed_seconds > 0`.
    pub fn new(elapsed_seconds: i64, values: BTreeMap<Counter, i64>) -> Option<Self> {
        (elapsed_seconds > 0).then_some(Self {
            elapsed_seconds,
            values,
        })
    }

    pub fn get(&self, counter: Counter) -> Option<i64> {
        self.values.get(&counter).copied()
    }

    /// Per-second rate of `counter` given its live value, floored.
    ///
    /// `None` when the counter is not cached or the delta overflows.
    pub fn rate(&self, counter: Counter, live_value: i64) -> Option<i64> {
        let prior = self.get(counter)?;
        let delta = live_value.checked_sub(prior)?;
        Some(delta.div_euclid(self.elapsed_seconds))
    }
}
