//! Per-step timing metrics for the environment.
//!
//! [`StepMetrics`] captures where the time of a single `step()` went,
//! for profiling and benchmark reporting.

/// Timing collected during a single step.
///
/// All durations are in microseconds. The environment populates these
/// fields after each successful `step()`; a failed step leaves the
/// previous values in place.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StepMetrics {
    /// Wall-clock time for the entire step.
    pub total_us: u64,
    /// Time spent in the controller.
    pub control_us: u64,
    /// Time spent advancing the engine.
    pub engine_us: u64,
    /// Time spent reading sensor adapters.
    pub observe_us: u64,
    /// Time spent sampling and recording telemetry.
    pub telemetry_us: u64,
    /// Columns appended to the log this step.
    pub signals_recorded: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_metrics_are_zero() {
        let m = StepMetrics::default();
        assert_eq!(m.total_us, 0);
        assert_eq!(m.control_us, 0);
        assert_eq!(m.engine_us, 0);
        assert_eq!(m.observe_us, 0);
        assert_eq!(m.telemetry_us, 0);
        assert_eq!(m.signals_recorded, 0);
    }
}
