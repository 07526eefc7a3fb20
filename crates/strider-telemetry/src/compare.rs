//! Log comparison for reproducibility checks.
//!
//! Hash-first: equal hashes short-circuit. On mismatch every column is
//! compared bit-exactly and the first divergent step per key is reported.

use crate::hash::log_hash;
use crate::record::LogRecord;

/// How one column differs between two logs.
#[derive(Clone, Debug, PartialEq)]
pub enum DivergenceKind {
    /// The key exists only in the recorded log.
    MissingKey,
    /// The key exists only in the replayed log.
    ExtraKey,
    /// The first sample whose bits differ.
    Value {
        /// Step after which the sample was recorded (1-based).
        step: u64,
        /// Recorded sample.
        recorded: f64,
        /// Replayed sample.
        replayed: f64,
    },
    /// The column lengths differ; all shared samples agree.
    Length {
        /// Recorded column length.
        recorded: usize,
        /// Replayed column length.
        replayed: usize,
    },
}

/// A divergence in one column.
#[derive(Clone, Debug, PartialEq)]
pub struct LogDivergence {
    /// Dotted key of the column.
    pub key: String,
    /// What differs.
    pub kind: DivergenceKind,
}

/// Every difference found between two logs.
#[derive(Clone, Debug, PartialEq)]
pub struct LogDivergenceReport {
    /// Steps in the recorded log.
    pub recorded_steps: u64,
    /// Steps in the replayed log.
    pub replayed_steps: u64,
    /// Per-column divergences, recorded keys first, then extra keys.
    pub divergences: Vec<LogDivergence>,
}

impl LogDivergenceReport {
    /// Earliest divergent step across all value divergences.
    pub fn first_step(&self) -> Option<u64> {
        self.divergences
            .iter()
            .filter_map(|d| match d.kind {
                DivergenceKind::Value { step, .. } => Some(step),
                _ => None,
            })
            .min()
    }
}

/// Compare a replayed log against a recorded one.
///
/// Returns `None` if the logs are bit-identical.
pub fn compare_logs(recorded: &LogRecord, replayed: &LogRecord) -> Option<LogDivergenceReport> {
    if log_hash(recorded) == log_hash(replayed) {
        return None;
    }

    let mut divergences = Vec::new();
    for (key, rec) in &recorded.columns {
        let Some(rep) = replayed.columns.get(key) else {
            divergences.push(LogDivergence {
                key: key.clone(),
                kind: DivergenceKind::MissingKey,
            });
            continue;
        };
        let first = rec
            .iter()
            .zip(rep)
            .position(|(a, b)| a.to_bits() != b.to_bits());
        if let Some(i) = first {
            divergences.push(LogDivergence {
                key: key.clone(),
                kind: DivergenceKind::Value {
                    step: i as u64 + 1,
                    recorded: rec[i],
                    replayed: rep[i],
                },
            });
        } else if rec.len() != rep.len() {
            divergences.push(LogDivergence {
                key: key.clone(),
                kind: DivergenceKind::Length {
                    recorded: rec.len(),
                    replayed: rep.len(),
                },
            });
        }
    }
    for key in replayed.columns.keys() {
        if !recorded.columns.contains_key(key) {
            divergences.push(LogDivergence {
                key: key.clone(),
                kind: DivergenceKind::ExtraKey,
            });
        }
    }

    Some(LogDivergenceReport {
        recorded_steps: recorded.steps,
        replayed_steps: replayed.steps,
        divergences,
    })
}
