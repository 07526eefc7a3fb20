//! Strongly-typed identifiers.

use std::fmt;

/// Identifies one channel within a [`ChannelGroup`](crate::ChannelGroup).
///
/// Channels are registered when the [`FieldRegistry`](crate::FieldRegistry)
/// is built and assigned sequential IDs. `ChannelId(n)` is the n-th name of
/// its group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChannelId(pub u32);

impl ChannelId {
    /// The channel's position as a slice index.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for ChannelId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Identifies one recorded telemetry signal within a run's log layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SignalId(pub u32);

impl SignalId {
    /// The signal's column as a slice index.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for SignalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for SignalId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Number of completed physics steps since the last reset.
///
/// `StepId(0)` is the state established by reset; each successful step
/// increments it by one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StepId(pub u64);

impl StepId {
    /// The following step.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }

    /// Simulation time of this step for a fixed `timestep`.
    ///
    /// Computed by multiplication rather than accumulation so that the
    /// clock is bit-identical across runs and across reset boundaries.
    pub fn time(self, timestep: f64) -> f64 {
        self.0 as f64 * timestep
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for StepId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}
