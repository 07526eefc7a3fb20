//! Column layout of a telemetry log.

use indexmap::IndexMap;
use strider_core::{SignalId, SignalSpec, TelemetryError, TelemetryOptions};

#[derive(Clone, Debug)]
struct SourceLayout {
    name: String,
    /// First column owned by this source.
    start: usize,
    /// Number of enabled signals.
    len: usize,
}

/// The ordered set of columns recorded during one run.
///
/// Columns are grouped by source in registration order and, within a
/// source, follow the source's declaration order. Only signals whose class
/// is enabled by the layout's [`TelemetryOptions`] get a column.
#[derive(Clone, Debug)]
pub struct LogLayout {
    options: TelemetryOptions,
    sources: Vec<SourceLayout>,
    keys: IndexMap<String, SignalId>,
}

impl LogLayout {
    /// Start a layout for runs recorded under `options`.
    pub fn builder(options: TelemetryOptions) -> LogLayoutBuilder {
        LogLayoutBuilder {
            options,
            sources: Vec::new(),
        }
    }

    /// The telemetry options this layout was filtered with.
    pub fn options(&self) -> &TelemetryOptions {
        &self.options
    }

    /// Number of registered sources.
    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Name of source `index`.
    pub fn source_name(&self, index: usize) -> Option<&str> {
        self.sources.get(index).map(|s| s.name.as_str())
    }

    /// Number of enabled signals of source `index`.
    pub fn source_len(&self, index: usize) -> Option<usize> {
        self.sources.get(index).map(|s| s.len)
    }

    /// Total number of columns.
    pub fn signal_count(&self) -> usize {
        self.keys.len()
    }

    /// Column id of a dotted key.
    pub fn signal_id(&self, key: &str) -> Option<SignalId> {
        self.keys.get(key).copied()
    }

    /// Dotted key of a column.
    pub fn key(&self, id: SignalId) -> Option<&str> {
        self.keys.get_index(id.index()).map(|(k, _)| k.as_str())
    }

    /// All dotted keys in column order.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.keys.keys().map(String::as_str)
    }
}

/// Builder for [`LogLayout`].
#[derive(Clone, Debug)]
pub struct LogLayoutBuilder {
    options: TelemetryOptions,
    sources: Vec<(String, Vec<SignalSpec>)>,
}

impl LogLayoutBuilder {
    /// Register a source with every signal it can produce.
    ///
    /// Sources are sampled in registration order.
    pub fn source(mut self, name: impl Into<String>, specs: Vec<SignalSpec>) -> Self {
        self.sources.push((name.into(), specs));
        self
    }

    /// Filter by options and intern the surviving keys.
    ///
    /// Fails with [`TelemetryError::DuplicateKey`] if two enabled signals,
    /// from the same or different sources, share a key.
    pub fn build(self) -> Result<LogLayout, TelemetryError> {
        let mut keys = IndexMap::new();
        let mut sources = Vec::with_capacity(self.sources.len());
        for (name, specs) in self.sources {
            let start = keys.len();
            for spec in specs.iter().filter(|s| self.options.enables(s.class)) {
                let key = spec.key.to_string();
                let id = SignalId(u32::try_from(keys.len()).map_err(|_| {
                    TelemetryError::InvalidKey {
                        key: key.clone(),
                        reason: "too many signals",
                    }
                })?);
                if keys.contains_key(&key) {
                    return Err(TelemetryError::DuplicateKey { key });
                }
                keys.insert(key, id);
            }
            sources.push(SourceLayout {
                name,
                start,
                len: keys.len() - start,
            });
        }
        Ok(LogLayout {
            options: self.options,
            sources,
            keys,
        })
    }
}

impl LogLayout {
    /// Column range owned by source `index`.
    pub(crate) fn source_columns(&self, index: usize) -> std::ops::Range<usize> {
        let s = &self.sources[index];
        s.start..s.start + s.len
    }
}
