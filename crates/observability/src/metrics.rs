//! Sweep metrics collection
//!
//! Prometheus recording helpers plus an in-memory aggregator for the
//! end-of-run summary.

use metrics::{counter, gauge, histogram};

/// Record an accepted reading at a sweep step
pub fn record_reading(index: u16, x_mm: f64, attempts: u32) {
    counter!("rig_readings_total").increment(1);
    gauge!("rig_last_index").set(f64::from(index));
    histogram!("rig_position_x_mm").record(x_mm);
    histogram!("rig_gate_attempts").record(f64::from(attempts));
}

/// Record a measurement handed to a sink
pub fn record_measurement_dispatched(sink_name: &str, success: bool) {
    let status = if success { "success" } else { "failure" };
    counter!(
        "rig_measurements_dispatched_total",
        "sink" => sink_name.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Sweep metrics aggregator
///
/// Aggregates per-step outcomes in memory for the run summary.
#[derive(Debug, Clone, Default)]
pub struct SweepMetricsAggregator {
    /// Steps commanded
    pub steps: u64,

    /// Steps that produced an accepted reading
    pub recorded: u64,

    /// Steps abandoned without a reading
    pub skipped: u64,

    /// Steps skipped because the move was never acknowledged
    pub ack_timeouts: u64,

    /// Stability-gate attempts per accepted reading
    pub attempt_stats: RunningStats,

    /// Accepted x positions (mm)
    pub position_stats: RunningStats,
}

impl SweepMetricsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an accepted reading
    pub fn record_reading(&mut self, x_mm: f64, attempts: u32) {
        self.steps += 1;
        self.recorded += 1;
        self.attempt_stats.push(f64::from(attempts));
        self.position_stats.push(x_mm);
    }

    /// Record a step that never produced a reading
    pub fn record_skip(&mut self, ack_timeout: bool) {
        self.steps += 1;
        self.skipped += 1;
        if ack_timeout {
            self.ack_timeouts += 1;
        }
    }

    /// Produce the run summary
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            steps: self.steps,
            recorded: self.recorded,
            skipped: self.skipped,
            ack_timeouts: self.ack_timeouts,
            yield_rate: if self.steps > 0 {
                self.recorded as f64 / self.steps as f64 * 100.0
            } else {
                0.0
            },
            gate_attempts: StatsSummary::from(&self.attempt_stats),
            position_x_mm: StatsSummary::from(&self.position_stats),
        }
    }

    /// Reset all aggregated state
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Run summary
#[derive(Debug, Clone, Default)]
pub struct MetricsSummary {
    pub steps: u64,
    pub recorded: u64,
    pub skipped: u64,
    pub ack_timeouts: u64,
    pub yield_rate: f64,
    pub gate_attempts: StatsSummary,
    pub position_x_mm: StatsSummary,
}

impl std::fmt::Display for MetricsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Sweep Summary ===")?;
        writeln!(f, "Steps: {}", self.steps)?;
        writeln!(
            f,
            "Recorded: {} ({:.2}% yield)",
            self.recorded, self.yield_rate
        )?;
        writeln!(f, "Skipped: {}", self.skipped)?;
        writeln!(f, "Ack timeouts: {}", self.ack_timeouts)?;
        writeln!(f, "Gate attempts: {}", self.gate_attempts)?;
        writeln!(f, "Position x (mm): {}", self.position_x_mm)?;
        Ok(())
    }
}

/// Summary of a value series
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count(),
            min: stats.min(),
            max: stats.max(),
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.3}, max={:.3}, mean={:.3}, std={:.3} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// Online statistics (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    /// Add a new value
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            let delta2 = value - self.mean;
            self.m2 += delta * delta2;
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_running_stats() {
        let mut stats = RunningStats::default();

        stats.push(1.0);
        stats.push(2.0);
        stats.push(3.0);
        stats.push(4.0);
        stats.push(5.0);

        assert_eq!(stats.count(), 5);
        assert!((stats.mean() - 3.0).abs() < 1e-10);
        assert!((stats.min() - 1.0).abs() < 1e-10);
        assert!((stats.max() - 5.0).abs() < 1e-10);
        assert!((stats.variance() - 2.5).abs() < 1e-10);
    }

    #[test]
    fn test_aggregator_counts_outcomes() {
        let mut aggregator = SweepMetricsAggregator::new();
        aggregator.record_reading(1.944, 1);
        aggregator.record_reading(2.5, 3);
        aggregator.record_skip(true);
        aggregator.record_skip(false);

        let summary = aggregator.summary();
        assert_eq!(summary.steps, 4);
        assert_eq!(summary.recorded, 2);
        assert_eq!(summary.skipped, 2);
        assert_eq!(summary.ack_timeouts, 1);
        assert!((summary.yield_rate - 50.0).abs() < 1e-10);
        assert_eq!(summary.gate_attempts.count, 2);
        assert!((summary.gate_attempts.mean - 2.0).abs() < 1e-10);
    }

    #[test]
    fn test_summary_display() {
        let mut aggregator = SweepMetricsAggregator::new();
        aggregator.record_reading(1.0, 1);
        let output = format!("{}", aggregator.summary());
        assert!(output.contains("Steps: 1"));
        assert!(output.contains("100.00% yield"));
    }
}
