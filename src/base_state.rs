use std::collections::HashMap;

use crate::types::{NetId, Version};

/// One observer's last-acknowledged snapshot of the source array: the
/// id→version map the next delta is diffed against, plus the array version
/// at the time it was produced (the O(1) fast-path check).
///
/// Owned by the replication layer for one (source, observer) pair and
/// replaced wholesale after each successful write, never patched in place.
#[derive(Debug, Clone)]
pub struct BaseState {
    pub(crate) id_to_version: HashMap<NetId, Version>,
    pub(crate) array_version: Version,
}

impl BaseState {
    pub(crate) fn new(id_to_version: HashMap<NetId, Version>, array_version: Version) -> Self {
        Self {
            id_to_version,
            array_version,
        }
    }

    pub fn array_version(&self) -> Version {
        self.array_version
    }

    pub fn len(&self) -> usize {
        self.id_to_version.len()
    }

    pub fn is_empty(&self) -> bool {
        self.id_to_version.is_empty()
    }

    /// Whether every (id, version) pair in `self` is also present in
    /// `other`. Useful to callers deduplicating acknowledged states.
    pub fn is_equivalent(&self, other: &BaseState) -> bool {
        self.id_to_version
            .iter()
            .all(|(id, version)| other.id_to_version.get(id) == Some(version))
    }
}
