//! Per-run performance and outcome metrics.
//!
//! [`RunMetrics`] is filled in by [`Simulator::run`](crate::Simulator::run)
//! and read back for reporting and benchmarking.

/// Counters and timing collected during one run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RunMetrics {
    /// Committed steps.
    pub steps: u64,
    /// Simulated time covered, s.
    pub simulated_time: f64,
    /// Node updates performed (`steps · cell_count`).
    pub node_updates: u64,
    /// Wall-clock time of the marching loop, in microseconds.
    pub wall_us: u64,
    /// Highest monitored temperature seen, K.
    pub peak_temperature: f64,
}

impl RunMetrics {
    /// Node updates per wall-clock second, if any time was measured.
    pub fn updates_per_second(&self) -> Option<f64> {
        (self.wall_us > 0).then(|| self.node_updates as f64 * 1e6 / self.wall_us as f64)
    }
}
