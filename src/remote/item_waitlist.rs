use std::collections::{HashMap, HashSet};

use crate::types::{NetId, RefHandle};

/// Stored state for one entry whose last decode referenced external
/// objects that were not resolvable yet: the outstanding handles and the
/// exact payload bits, kept for replay once references resolve.
#[derive(Debug, Clone)]
pub struct WaitlistEntry {
    pub(crate) unresolved: HashSet<RefHandle>,
    pub(crate) buffer: Vec<u8>,
    pub(crate) bit_length: u32,
}

/// Per-observer store of entries waiting on unresolved references.
///
/// An entry exists here if and only if the most recent decode of that item
/// reported at least one unresolved handle; it is removed as soon as a
/// replay fully resolves, or as soon as the item is deleted.
pub struct ItemWaitlist {
    entries: HashMap<NetId, WaitlistEntry>,
}

impl ItemWaitlist {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Track (or replace the tracking of) an entry whose decode left
    /// handles unresolved.
    pub(crate) fn insert(
        &mut self,
        id: NetId,
        unresolved: HashSet<RefHandle>,
        buffer: Vec<u8>,
        bit_length: u32,
    ) {
        self.entries.insert(
            id,
            WaitlistEntry {
                unresolved,
                buffer,
                bit_length,
            },
        );
    }

    pub(crate) fn remove(&mut self, id: NetId) -> Option<WaitlistEntry> {
        self.entries.remove(&id)
    }

    pub(crate) fn entry_mut(&mut self, id: NetId) -> Option<&mut WaitlistEntry> {
        self.entries.get_mut(&id)
    }

    pub(crate) fn ids(&self) -> Vec<NetId> {
        self.entries.keys().copied().collect()
    }

    /// The handles still outstanding for an id, if it is tracked.
    pub fn pending_handles(&self, id: NetId) -> Option<&HashSet<RefHandle>> {
        self.entries.get(&id).map(|entry| &entry.unresolved)
    }

    /// Whether any entry is still waiting; drives the caller's
    /// re-poll-next-tick signal.
    pub fn has_pending(&self) -> bool {
        !self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ItemWaitlist {
    fn default() -> Self {
        Self::new()
    }
}
