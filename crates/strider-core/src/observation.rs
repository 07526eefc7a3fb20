//! Observations flowing out of the environment and actions flowing in.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::id::StepId;

/// A kind of sensor whose readings are grouped into one table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SensorKind {
    /// Joint encoders: position and velocity.
    Encoder,
    /// Motor effort sensors: applied torque.
    Effort,
}

impl SensorKind {
    /// Type name used as the observation key.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Encoder => "EncoderSensor",
            Self::Effort => "EffortSensor",
        }
    }

    /// Names of the sample components (table rows) for this kind.
    pub fn fieldnames(self) -> &'static [&'static str] {
        match self {
            Self::Encoder => &["Q", "V"],
            Self::Effort => &["U"],
        }
    }
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Row and column names of a [`SensorData`] table.
///
/// Shared by every observation of a run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SensorLayout {
    kind: SensorKind,
    columns: Vec<String>,
}

impl SensorLayout {
    /// Layout for `kind` with one column per named sensor.
    pub fn new(kind: SensorKind, columns: Vec<String>) -> Self {
        Self { kind, columns }
    }

    /// The sensor kind.
    pub fn kind(&self) -> SensorKind {
        self.kind
    }

    /// Component names, one per row.
    pub fn rows(&self) -> &'static [&'static str] {
        self.kind.fieldnames()
    }

    /// Sensor names, one per column.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Position of the row called `name`.
    pub fn row_index(&self, name: &str) -> Option<usize> {
        self.rows().iter().position(|r| *r == name)
    }

    /// Position of the column called `name`.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }
}

/// A 2-D row-major table of readings for one sensor kind.
///
/// Rows are sample components and columns are sensors, so `row("Q")`
/// yields every encoder position in registry order.
#[derive(Clone, Debug, PartialEq)]
pub struct SensorData {
    layout: Arc<SensorLayout>,
    values: Vec<f64>,
}

impl SensorData {
    /// A zero-filled table for `layout`.
    pub fn zeros(layout: Arc<SensorLayout>) -> Self {
        let len = layout.rows().len() * layout.columns().len();
        Self {
            layout,
            values: vec![0.0; len],
        }
    }

    /// The shared layout.
    pub fn layout(&self) -> &SensorLayout {
        &self.layout
    }

    /// Number of rows.
    pub fn n_rows(&self) -> usize {
        self.layout.rows().len()
    }

    /// Number of columns.
    pub fn n_cols(&self) -> usize {
        self.layout.columns().len()
    }

    /// All values, row-major.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// One row as a slice.
    ///
    /// # Panics
    ///
    /// Panics if `row >= n_rows()`.
    pub fn row(&self, row: usize) -> &[f64] {
        let n = self.n_cols();
        &self.values[row * n..(row + 1) * n]
    }

    /// Mutable access to one row.
    ///
    /// # Panics
    ///
    /// Panics if `row >= n_rows()`.
    pub fn row_mut(&mut self, row: usize) -> &mut [f64] {
        let n = self.n_cols();
        &mut self.values[row * n..(row + 1) * n]
    }

    /// The row for component `name` (e.g. `"Q"`).
    pub fn row_by_name(&self, name: &str) -> Option<&[f64]> {
        self.layout.row_index(name).map(|r| self.row(r))
    }

    /// One reading, or `None` if out of range.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row < self.n_rows() && col < self.n_cols() {
            Some(self.values[row * self.n_cols() + col])
        } else {
            None
        }
    }
}

/// Everything the environment reports after a reset or step.
///
/// Owned values copied from the engine: an observation stays valid after
/// further steps.
#[derive(Clone, Debug, PartialEq)]
pub struct Observation {
    /// Steps completed since reset.
    pub step: StepId,
    /// Simulation time in seconds.
    pub time: f64,
    /// Readings per sensor kind.
    pub sensors: IndexMap<SensorKind, SensorData>,
}

impl Observation {
    /// Readings for `kind`, if that kind is present.
    pub fn sensor(&self, kind: SensorKind) -> Option<&SensorData> {
        self.sensors.get(&kind)
    }
}

/// Target joint positions keyed by motor channel name.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Action {
    targets: IndexMap<String, f64>,
}

impl Action {
    /// An empty action.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the target for `channel`, returning any previous target.
    pub fn insert(&mut self, channel: impl Into<String>, target: f64) -> Option<f64> {
        self.targets.insert(channel.into(), target)
    }

    /// Target for `channel`.
    pub fn get(&self, channel: &str) -> Option<f64> {
        self.targets.get(channel).copied()
    }

    /// Whether `channel` has a target.
    pub fn contains(&self, channel: &str) -> bool {
        self.targets.contains_key(channel)
    }

    /// Number of targets.
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Whether there are no targets.
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Channel names and targets in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.targets.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for Action {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        Self {
            targets: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

impl From<IndexMap<String, f64>> for Action {
    fn from(targets: IndexMap<String, f64>) -> Self {
        Self { targets }
    }
}
