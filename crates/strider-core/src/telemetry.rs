//! Telemetry signal descriptors: dotted log keys, signal classes, and the
//! [`TelemetrySource`] trait implemented by anything that contributes
//! columns to a run's log.

use std::fmt;

use crate::options::TelemetryOptions;

/// Namespace for engine-global signals such as the simulation clock.
pub const GLOBAL_NAMESPACE: &str = "Global";

/// Namespace for controller targets and robot state.
pub const CONTROLLER_NAMESPACE: &str = "HighLevelController";

/// Check that `segment` can be used as one component of a dotted key.
///
/// Segments must be non-empty and must not contain `.` or whitespace.
/// Channel names share this rule since they end up inside log keys.
pub fn check_segment(segment: &str) -> Result<(), &'static str> {
    if segment.is_empty() {
        return Err("must not be empty");
    }
    if segment.contains('.') {
        return Err("must not contain '.'");
    }
    if segment.chars().any(char::is_whitespace) {
        return Err("must not contain whitespace");
    }
    Ok(())
}

/// A fully qualified log key: `namespace.instance.signal`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LogKey {
    namespace: String,
    instance: String,
    signal: String,
}

impl LogKey {
    /// Build a key from its three segments.
    ///
    /// Returns the first segment's rejection reason if any is invalid.
    pub fn new(
        namespace: impl Into<String>,
        instance: impl Into<String>,
        signal: impl Into<String>,
    ) -> Result<Self, &'static str> {
        let key = Self {
            namespace: namespace.into(),
            instance: instance.into(),
            signal: signal.into(),
        };
        check_segment(&key.namespace)?;
        check_segment(&key.instance)?;
        check_segment(&key.signal)?;
        Ok(key)
    }

    /// Parse a dotted key. Exactly three valid segments are required.
    pub fn parse(dotted: &str) -> Result<Self, &'static str> {
        let mut parts = dotted.split('.');
        match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(ns), Some(inst), Some(sig), None) => Self::new(ns, inst, sig),
            _ => Err("expected exactly three dot-separated segments"),
        }
    }

    /// The namespace segment.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The instance segment.
    pub fn instance(&self) -> &str {
        &self.instance
    }

    /// The signal segment.
    pub fn signal(&self) -> &str {
        &self.signal
    }
}

impl fmt::Display for LogKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.namespace, self.instance, self.signal)
    }
}

/// Which telemetry flag gates a signal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SignalClass {
    /// Recorded regardless of flags.
    Always,
    /// Joint positions.
    Configuration,
    /// Joint velocities.
    Velocity,
    /// Joint accelerations.
    Acceleration,
    /// Controller commands.
    Command,
    /// Measured motor efforts.
    MotorEffort,
    /// Kinetic and potential energy.
    Energy,
}

/// One signal a source contributes: its key and gating class.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignalSpec {
    /// Fully qualified key.
    pub key: LogKey,
    /// Flag that decides whether the signal is recorded.
    pub class: SignalClass,
}

impl SignalSpec {
    /// Convenience constructor.
    pub fn new(key: LogKey, class: SignalClass) -> Self {
        Self { key, class }
    }
}

/// Something that contributes named columns to the telemetry log.
///
/// `signals()` declares every signal the source can produce. At each step
/// `sample()` appends one value per signal enabled under `options`, in
/// declaration order, and nothing for disabled ones.
pub trait TelemetrySource {
    /// All signals this source can produce, in sampling order.
    fn signals(&self) -> Vec<SignalSpec>;

    /// Append this step's values for the enabled signals to `out`.
    fn sample(&self, options: &TelemetryOptions, out: &mut Vec<f64>);
}
