use crate::types::{NetId, Version, NET_ID_NONE};

/// One element of a replicated array: a stable identity, a change counter,
/// and the domain payload.
///
/// `id` and `version` are owned by the replication layer. The id starts
/// unassigned and is handed out by [`crate::SyncArray::mark_dirty`] the
/// first time the entry becomes eligible for replication; it never changes
/// afterwards and is never reused.
#[derive(Debug, Clone)]
pub struct Entry<P> {
    pub(crate) id: NetId,
    pub(crate) version: Version,
    pub payload: P,
}

impl<P> Entry<P> {
    pub fn new(payload: P) -> Self {
        Self {
            id: NET_ID_NONE,
            version: 0,
            payload,
        }
    }

    pub(crate) fn with_id(id: NetId, payload: P) -> Self {
        Self {
            id,
            version: 0,
            payload,
        }
    }

    pub fn id(&self) -> NetId {
        self.id
    }

    pub fn version(&self) -> Version {
        self.version
    }
}
