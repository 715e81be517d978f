//! Monitored-node time series.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

/// `(time, temperature)` samples of the monitored node, in time order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    times: Vec<f64>,
    temperatures: Vec<f64>,
}

impl TimeSeries {
    /// An empty series.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty series with room for `capacity` samples.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            times: Vec::with_capacity(capacity),
            temperatures: Vec::with_capacity(capacity),
        }
    }

    /// Append a sample.
    pub fn push(&mut self, time: f64, temperature: f64) {
        self.times.push(time);
        self.temperatures.push(temperature);
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Whether there are no samples.
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Sample times, s.
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Sampled temperatures, K.
    pub fn temperatures(&self) -> &[f64] {
        &self.temperatures
    }

    /// Iterate `(time, temperature)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.times.iter().copied().zip(self.temperatures.iter().copied())
    }

    /// The most recent sample.
    pub fn last(&self) -> Option<(f64, f64)> {
        Some((*self.times.last()?, *self.temperatures.last()?))
    }

    /// Two-column CSV with a header line.
    pub fn to_csv(&self) -> String {
        let mut out = String::with_capacity(24 * (self.len() + 1));
        out.push_str("time_s,temperature_K\n");
        for (t, v) in self.iter() {
            let _ = writeln!(out, "{t},{v}");
        }
        out
    }
}
