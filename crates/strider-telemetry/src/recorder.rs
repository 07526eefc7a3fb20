//! Append-only recording of sample frames.
//!
//! The recorder is the single writer of a run's log. Each call to
//! [`Recorder::record()`] validates the whole frame before touching any
//! column, so a rejected frame leaves the log exactly as it was.

use indexmap::IndexMap;
use strider_core::{StepId, TelemetryError, TelemetryOptions};

use crate::layout::LogLayout;
use crate::record::LogRecord;

/// One step's raw values: one vector per layout source.
///
/// Reused across steps; [`clear()`](SampleFrame::clear) keeps capacity.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SampleFrame {
    sources: Vec<Vec<f64>>,
}

impl SampleFrame {
    /// A frame with `sources` empty value vectors.
    pub fn new(sources: usize) -> Self {
        Self {
            sources: vec![Vec::new(); sources],
        }
    }

    /// A frame shaped for `layout`, with capacity reserved per source.
    pub fn for_layout(layout: &LogLayout) -> Self {
        Self {
            sources: (0..layout.source_count())
                .map(|i| Vec::with_capacity(layout.source_len(i).unwrap_or(0)))
                .collect(),
        }
    }

    /// Empty every source vector.
    pub fn clear(&mut self) {
        for values in &mut self.sources {
            values.clear();
        }
    }

    /// Number of source vectors.
    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Values of source `index`.
    pub fn source(&self, index: usize) -> Option<&[f64]> {
        self.sources.get(index).map(Vec::as_slice)
    }

    /// Mutable values of source `index`, for sampling into.
    pub fn source_mut(&mut self, index: usize) -> Option<&mut Vec<f64>> {
        self.sources.get_mut(index)
    }
}

#[derive(Clone, Debug)]
struct Run {
    layout: LogLayout,
    constants: IndexMap<String, String>,
    columns: Vec<Vec<f64>>,
    steps: u64,
}

/// Records validated sample frames into columns.
#[derive(Clone, Debug, Default)]
pub struct Recorder {
    run: Option<Run>,
}

impl Recorder {
    /// A recorder with no run.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new run, discarding any previous one.
    pub fn begin(&mut self, layout: LogLayout, constants: IndexMap<String, String>) {
        tracing::debug!(
            signals = layout.signal_count(),
            sources = layout.source_count(),
            "telemetry run begun"
        );
        let columns = vec![Vec::new(); layout.signal_count()];
        self.run = Some(Run {
            layout,
            constants,
            columns,
            steps: 0,
        });
    }

    /// Whether a run has begun.
    pub fn is_active(&self) -> bool {
        self.run.is_some()
    }

    /// Append the frame recorded after `step`.
    ///
    /// `step` must be one past the last recorded step. Every source must
    /// supply exactly one value per enabled signal.
    pub fn record(&mut self, step: StepId, frame: &SampleFrame) -> Result<(), TelemetryError> {
        let run = self.run.as_mut().ok_or(TelemetryError::NotReady)?;
        let expected = StepId(run.steps + 1);
        if step != expected {
            return Err(TelemetryError::OutOfOrder {
                expected,
                found: step,
            });
        }
        let layout = &run.layout;
        if frame.source_count() != layout.source_count() {
            return Err(TelemetryError::SourceCount {
                expected: layout.source_count(),
                found: frame.source_count(),
            });
        }
        for (i, values) in frame.sources.iter().enumerate() {
            let expected = layout.source_len(i).unwrap_or(0);
            let source_name = || layout.source_name(i).unwrap_or_default().to_string();
            if values.len() < expected {
                return Err(TelemetryError::MissingSamples {
                    source_name: source_name(),
                    expected,
                    found: values.len(),
                });
            }
            if values.len() > expected {
                return Err(TelemetryError::ExtraSamples {
                    source_name: source_name(),
                    expected,
                    found: values.len(),
                });
            }
        }

        for (i, values) in frame.sources.iter().enumerate() {
            let range = run.layout.source_columns(i);
            for (column, &value) in run.columns[range].iter_mut().zip(values) {
                column.push(value);
            }
        }
        run.steps += 1;
        Ok(())
    }

    /// A copy of the log so far.
    pub fn finalize(&self) -> Result<LogRecord, TelemetryError> {
        let run = self.run.as_ref().ok_or(TelemetryError::NotReady)?;
        let columns = run
            .layout
            .keys()
            .zip(&run.columns)
            .map(|(key, values)| (key.to_string(), values.clone()))
            .collect();
        Ok(LogRecord {
            columns,
            constants: run.constants.clone(),
            steps: run.steps,
        })
    }

    /// Samples of `key` recorded so far, without copying.
    pub fn column(&self, key: &str) -> Option<&[f64]> {
        let run = self.run.as_ref()?;
        let id = run.layout.signal_id(key)?;
        run.columns.get(id.index()).map(Vec::as_slice)
    }

    /// Steps recorded in the current run (0 if none).
    pub fn steps(&self) -> u64 {
        self.run.as_ref().map_or(0, |r| r.steps)
    }

    /// Telemetry options of the current run.
    pub fn options(&self) -> Option<&TelemetryOptions> {
        self.run.as_ref().map(|r| r.layout.options())
    }

    /// Layout of the current run.
    pub fn layout(&self) -> Option<&LogLayout> {
        self.run.as_ref().map(|r| &r.layout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strider_core::{LogKey, SignalClass, SignalSpec};

    fn layout() -> LogLayout {
        let spec = |ns: &str, sig: &str, class| {
            SignalSpec::new(LogKey::new(ns, "src", sig).unwrap(), class)
        };
        LogLayout::builder(TelemetryOptions::default())
            .source("clock", vec![spec("Global", "Time", SignalClass::Always)])
            .source(
                "ctrl",
                vec![
                    spec("HighLevelController", "a", SignalClass::Always),
                    spec("HighLevelController", "b", SignalClass::Command),
                    spec("HighLevelController", "c", SignalClass::Velocity),
                ],
            )
            .build()
            .unwrap()
    }

    fn frame(clock: &[f64], ctrl: &[f64]) -> SampleFrame {
        let mut f = SampleFrame::new(2);
        f.source_mut(0).unwrap().extend_from_slice(clock);
        f.source_mut(1).unwrap().extend_from_slice(ctrl);
        f
    }

    #[test]
    fn records_columns_in_order() {
        let mut rec = Recorder::new();
        rec.begin(layout(), IndexMap::new());
        rec.record(StepId(1), &frame(&[0.001], &[1.0, 2.0])).unwrap();
        rec.record(StepId(2), &frame(&[0.002], &[3.0, 4.0])).unwrap();
        let log = rec.finalize().unwrap();
        assert_eq!(log.steps, 2);
        assert_eq!(log.get("Global.src.Time"), Some(&[0.001, 0.002][..]));
        assert_eq!(log.get("HighLevelController.src.b"), Some(&[2.0, 4.0][..]));
        assert!(!log.contains_key("HighLevelController.src.c"));
        assert_eq!(rec.column("HighLevelController.src.a"), Some(&[1.0, 3.0][..]));
    }

    #[test]
    fn not_ready_before_begin() {
        let mut rec = Recorder::new();
        assert_eq!(rec.finalize(), Err(TelemetryError::NotReady));
        assert_eq!(
            rec.record(StepId(1), &frame(&[0.0], &[0.0, 0.0])),
            Err(TelemetryError::NotReady)
        );
        assert!(rec.options().is_none());
    }

    #[test]
    fn missing_sample_rejected_without_partial_append() {
        let mut rec = Recorder::new();
        rec.begin(layout(), IndexMap::new());
        match rec.record(StepId(1), &frame(&[0.001], &[1.0])) {
            Err(TelemetryError::MissingSamples {
                source_name,
                expected: 2,
                found: 1,
            }) => assert_eq!(source_name, "ctrl"),
            other => panic!("expected MissingSamples, got {other:?}"),
        }
        // The clock source was valid but must not have been appended.
        assert_eq!(rec.column("Global.src.Time"), Some(&[][..]));
        assert_eq!(rec.steps(), 0);
    }

    #[test]
    fn extra_sample_rejected() {
        let mut rec = Recorder::new();
        rec.begin(layout(), IndexMap::new());
        assert!(matches!(
            rec.record(StepId(1), &frame(&[0.001, 9.0], &[1.0, 2.0])),
            Err(TelemetryError::ExtraSamples { .. })
        ));
    }

    #[test]
    fn source_count_checked() {
        let mut rec = Recorder::new();
        rec.begin(layout(), IndexMap::new());
        assert_eq!(
            rec.record(StepId(1), &SampleFrame::new(3)),
            Err(TelemetryError::SourceCount {
                expected: 2,
                found: 3
            })
        );
    }

    #[test]
    fn steps_must_be_consecutive() {
        let mut rec = Recorder::new();
        rec.begin(layout(), IndexMap::new());
        rec.record(StepId(1), &frame(&[0.0], &[0.0, 0.0])).unwrap();
        assert_eq!(
            rec.record(StepId(1), &frame(&[0.0], &[0.0, 0.0])),
            Err(TelemetryError::OutOfOrder {
                expected: StepId(2),
                found: StepId(1)
            })
        );
        assert_eq!(
            rec.record(StepId(3), &frame(&[0.0], &[0.0, 0.0])),
            Err(TelemetryError::OutOfOrder {
                expected: StepId(2),
                found: StepId(3)
            })
        );
    }

    #[test]
    fn begin_discards_previous_run() {
        let mut rec = Recorder::new();
        rec.begin(layout(), IndexMap::new());
        rec.record(StepId(1), &frame(&[0.0], &[0.0, 0.0])).unwrap();
        let mut constants = IndexMap::new();
        constants.insert("robot".to_string(), "biped".to_string());
        rec.begin(layout(), constants);
        let log = rec.finalize().unwrap();
        assert_eq!(log.steps, 0);
        assert!(log.columns.values().all(Vec::is_empty));
        assert_eq!(log.constant("robot"), Some("biped"));
    }
}
