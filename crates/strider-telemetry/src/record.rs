//! The finalized log table.

use indexmap::IndexMap;

/// A snapshot of a run's telemetry.
///
/// Every column holds exactly `steps` samples; sample `i` was recorded
/// after step `i + 1`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LogRecord {
    /// Columns keyed by dotted log key, in layout order.
    pub columns: IndexMap<String, Vec<f64>>,
    /// Header values fixed for the run (timestep, robot name, flags).
    pub constants: IndexMap<String, String>,
    /// Number of recorded steps.
    pub steps: u64,
}

impl LogRecord {
    /// Samples of `key`.
    pub fn get(&self, key: &str) -> Option<&[f64]> {
        self.columns.get(key).map(Vec::as_slice)
    }

    /// Whether `key` has a column.
    pub fn contains_key(&self, key: &str) -> bool {
        self.columns.contains_key(key)
    }

    /// Column keys in layout order.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.columns.keys().map(String::as_str)
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether the log has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// The last `n` samples of `key` (fewer if the run is shorter).
    pub fn tail(&self, key: &str, n: usize) -> Option<&[f64]> {
        let column = self.get(key)?;
        Some(&column[column.len().saturating_sub(n)..])
    }

    /// A header value.
    pub fn constant(&self, name: &str) -> Option<&str> {
        self.constants.get(name).map(String::as_str)
    }
}
