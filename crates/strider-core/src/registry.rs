//! The [`FieldRegistry`]: named channels, their indices, and the index
//! correspondences between channel groups.
//!
//! The registry is built once from a robot model and never mutated. Every
//! component that needs to turn a channel name into an index (controller,
//! sensor adapters, telemetry) resolves it here, so all of them agree on
//! ordering for the whole run.

use std::fmt;

use indexmap::IndexMap;

use crate::error::RegistryError;
use crate::id::ChannelId;
use crate::telemetry::check_segment;

/// A family of scalar channels sharing one index space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ChannelGroup {
    /// Encoder sensors (one per measured joint).
    Encoder,
    /// Effort sensors (one per measured motor).
    Effort,
    /// Actuated motors, in engine command order.
    Motor,
}

impl ChannelGroup {
    /// Lower-case identifier used in messages.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Encoder => "encoder",
            Self::Effort => "effort",
            Self::Motor => "motor",
        }
    }
}

impl fmt::Display for ChannelGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A channel to register: its name and the joint it is attached to.
///
/// Correspondences pair channels of two groups that share a joint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChannelDef {
    /// Unique name within the group.
    pub name: String,
    /// Joint this channel drives or observes.
    pub joint: String,
}

impl ChannelDef {
    /// Convenience constructor.
    pub fn new(name: impl Into<String>, joint: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            joint: joint.into(),
        }
    }
}

#[derive(Clone, Debug)]
struct Group {
    names: Vec<String>,
    joints: Vec<String>,
    lookup: IndexMap<String, ChannelId>,
}

/// Immutable mapping between channel names and indices for every group,
/// plus fixed index correspondences between groups.
///
/// All accessors take `&self` and have no side effects; the registry is
/// `Send + Sync` and can be shared freely between readers.
#[derive(Clone, Debug)]
pub struct FieldRegistry {
    groups: IndexMap<ChannelGroup, Group>,
    correspondences: IndexMap<(ChannelGroup, ChannelGroup), Vec<usize>>,
}

impl FieldRegistry {
    /// Start building a registry.
    pub fn builder() -> FieldRegistryBuilder {
        FieldRegistryBuilder {
            groups: Vec::new(),
            correspondences: Vec::new(),
        }
    }

    /// Channel names of `group` in index order.
    pub fn names(&self, group: ChannelGroup) -> Option<&[String]> {
        self.groups.get(&group).map(|g| g.names.as_slice())
    }

    /// Joint names of `group`'s channels in index order.
    pub fn joints(&self, group: ChannelGroup) -> Option<&[String]> {
        self.groups.get(&group).map(|g| g.joints.as_slice())
    }

    /// Number of channels in `group` (0 if unregistered).
    pub fn len(&self, group: ChannelGroup) -> usize {
        self.groups.get(&group).map_or(0, |g| g.names.len())
    }

    /// Whether `group` is registered.
    pub fn contains_group(&self, group: ChannelGroup) -> bool {
        self.groups.contains_key(&group)
    }

    /// Resolve a channel name to its index.
    pub fn index_of(&self, group: ChannelGroup, name: &str) -> Option<ChannelId> {
        self.groups.get(&group)?.lookup.get(name).copied()
    }

    /// Resolve an index back to its channel name.
    pub fn name(&self, group: ChannelGroup, id: ChannelId) -> Option<&str> {
        self.groups
            .get(&group)?
            .names
            .get(id.index())
            .map(String::as_str)
    }

    /// Index correspondence from `from` to `to`.
    ///
    /// `correspondence[i]` is the index in `to` of the channel sharing a
    /// joint with channel `i` of `from`. Only pairs requested at build
    /// time are available.
    pub fn correspondence(&self, from: ChannelGroup, to: ChannelGroup) -> Option<&[usize]> {
        self.correspondences.get(&(from, to)).map(Vec::as_slice)
    }

    /// Registered groups in registration order.
    pub fn groups(&self) -> impl Iterator<Item = ChannelGroup> + '_ {
        self.groups.keys().copied()
    }
}

/// Builder for [`FieldRegistry`].
///
/// Validation is deferred to [`build()`](FieldRegistryBuilder::build), which
/// reports the first problem found.
#[derive(Clone, Debug)]
pub struct FieldRegistryBuilder {
    groups: Vec<(ChannelGroup, Vec<ChannelDef>)>,
    correspondences: Vec<(ChannelGroup, ChannelGroup)>,
}

impl FieldRegistryBuilder {
    /// Register a group with its channels in index order.
    pub fn group(mut self, group: ChannelGroup, channels: Vec<ChannelDef>) -> Self {
        self.groups.push((group, channels));
        self
    }

    /// Request the index correspondence `from → to`.
    pub fn correspondence(mut self, from: ChannelGroup, to: ChannelGroup) -> Self {
        self.correspondences.push((from, to));
        self
    }

    /// Validate names and compute every requested correspondence.
    pub fn build(self) -> Result<FieldRegistry, RegistryError> {
        let mut groups = IndexMap::with_capacity(self.groups.len());
        for (group, channels) in self.groups {
            if groups.contains_key(&group) {
                return Err(RegistryError::DuplicateGroup { group });
            }
            let mut names = Vec::with_capacity(channels.len());
            let mut joints = Vec::with_capacity(channels.len());
            let mut lookup = IndexMap::with_capacity(channels.len());
            for (i, def) in channels.into_iter().enumerate() {
                check_segment(&def.name).map_err(|reason| RegistryError::InvalidName {
                    group,
                    name: def.name.clone(),
                    reason,
                })?;
                let id = ChannelId(u32::try_from(i).map_err(|_| RegistryError::InvalidName {
                    group,
                    name: def.name.clone(),
                    reason: "channel index exceeds u32",
                })?);
                if lookup.insert(def.name.clone(), id).is_some() {
                    return Err(RegistryError::DuplicateName {
                        group,
                        name: def.name,
                    });
                }
                names.push(def.name);
                joints.push(def.joint);
            }
            groups.insert(
                group,
                Group {
                    names,
                    joints,
                    lookup,
                },
            );
        }

        let mut correspondences = IndexMap::with_capacity(self.correspondences.len());
        for (from, to) in self.correspondences {
            let source = groups
                .get(&from)
                .ok_or(RegistryError::UnknownGroup { group: from })?;
            let target = groups
                .get(&to)
                .ok_or(RegistryError::UnknownGroup { group: to })?;
            let map = match_by_joint(from, source, to, target)?;
            correspondences.insert((from, to), map);
        }

        Ok(FieldRegistry {
            groups,
            correspondences,
        })
    }
}

/// Pair each channel of `source` with the unclaimed `target` channel on the
/// same joint. Equal cardinality plus injectivity makes the result a
/// permutation.
fn match_by_joint(
    from: ChannelGroup,
    source: &Group,
    to: ChannelGroup,
    target: &Group,
) -> Result<Vec<usize>, RegistryError> {
    if source.names.len() != target.names.len() {
        return Err(RegistryError::CardinalityMismatch {
            from,
            to,
            from_len: source.names.len(),
            to_len: target.names.len(),
        });
    }
    let mut claimed = vec![false; target.joints.len()];
    let mut map = Vec::with_capacity(source.joints.len());
    for (i, joint) in source.joints.iter().enumerate() {
        let j = target
            .joints
            .iter()
            .enumerate()
            .position(|(j, other)| !claimed[j] && other == joint)
            .ok_or_else(|| RegistryError::UnmatchedChannel {
                from,
                to,
                name: source.names[i].clone(),
            })?;
        claimed[j] = true;
        map.push(j);
    }
    Ok(map)
}
