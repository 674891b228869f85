use std::collections::HashMap;

use log::trace;

use crate::{
    entry::Entry,
    error::SyncError,
    types::{NetId, Version, NET_ID_NONE},
};

/// An ordered collection of replicated entries, owned by the source side
/// (or mirrored on an observer side).
///
/// Mutating the payloads is the owner's business; the owner must call
/// [`mark_dirty`](Self::mark_dirty) after changing an entry so the change
/// is picked up by the next delta written against any observer's base
/// state. Removal marks the array dirty by itself.
///
/// `id_to_index` is a derived cache, never a source of truth: it is
/// considered stale whenever its size disagrees with the item count and is
/// rebuilt by a full scan before use.
pub struct SyncArray<P> {
    items: Vec<Entry<P>>,
    id_counter: NetId,
    array_version: Version,
    id_to_index: HashMap<NetId, usize>,
}

impl<P> SyncArray<P> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            id_counter: NET_ID_NONE,
            array_version: 0,
            id_to_index: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn array_version(&self) -> Version {
        self.array_version
    }

    pub fn get(&self, index: usize) -> Option<&Entry<P>> {
        self.items.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entry<P>> {
        self.items.iter()
    }

    /// Append a new entry. No id is assigned until the owner calls
    /// [`mark_dirty`](Self::mark_dirty) on it (or the writer self-heals it).
    pub fn push(&mut self, payload: P) -> usize {
        self.items.push(Entry::new(payload));
        self.items.len() - 1
    }

    /// Mutable payload access. Remember to call
    /// [`mark_dirty`](Self::mark_dirty) once the payload has changed.
    pub fn payload_mut(&mut self, index: usize) -> &mut P {
        &mut self.items[index].payload
    }

    /// Remove the entry at `index`, marking the array dirty so observers
    /// learn of the deletion.
    pub fn remove(&mut self, index: usize) -> Entry<P> {
        let entry = self.items.remove(index);
        self.mark_array_dirty();
        entry
    }

    /// Must be called after an entry's payload changes. Assigns the entry
    /// an id if it has none yet, bumps its version, and marks the whole
    /// array dirty.
    pub fn mark_dirty(&mut self, index: usize) -> Result<NetId, SyncError> {
        if self.items[index].id == NET_ID_NONE {
            let id = self.next_id()?;
            self.items[index].id = id;
        }
        self.items[index].version = self.items[index].version.wrapping_add(1);
        self.mark_array_dirty();
        Ok(self.items[index].id)
    }

    /// Invalidate the derived index and bump the array version, enabling
    /// the O(1) nothing-changed check on the next write.
    pub fn mark_array_dirty(&mut self) {
        // clearing (rather than patching) lets observers keep predicted
        // local entries without affecting replication
        self.id_to_index.clear();
        self.array_version = self.array_version.wrapping_add(1);
    }

    /// Look up the current position of an id, rebuilding the derived index
    /// if it is stale.
    pub fn index_of(&mut self, id: NetId) -> Option<usize> {
        self.ensure_index();
        self.lookup(id)
    }

    fn next_id(&mut self) -> Result<NetId, SyncError> {
        // ids are never reused, so running out is terminal for this array
        let id = self
            .id_counter
            .checked_add(1)
            .ok_or(SyncError::IdSpaceExhausted)?;
        self.id_counter = id;
        Ok(id)
    }

    pub(crate) fn index_is_stale(&self) -> bool {
        self.id_to_index.len() != self.items.len()
    }

    /// Rebuild the id map by a full scan. Entries without an id are
    /// skipped; on an observer they are benign local additions, on the
    /// source the writer assigns ids before calling this.
    pub(crate) fn ensure_index(&mut self) {
        if !self.index_is_stale() {
            return;
        }
        trace!(
            "rebuilding id map: {} items, map had {}",
            self.items.len(),
            self.id_to_index.len()
        );
        self.id_to_index.clear();
        for (index, entry) in self.items.iter().enumerate() {
            if entry.id == NET_ID_NONE {
                continue;
            }
            self.id_to_index.insert(entry.id, index);
        }
    }

    pub(crate) fn lookup(&self, id: NetId) -> Option<usize> {
        self.id_to_index.get(&id).copied()
    }

    pub(crate) fn entry_mut(&mut self, index: usize) -> &mut Entry<P> {
        &mut self.items[index]
    }

    /// Append an already-identified entry (observer side) and register it
    /// in the id map.
    pub(crate) fn push_entry(&mut self, entry: Entry<P>) -> usize {
        let index = self.items.len();
        if entry.id != NET_ID_NONE {
            self.id_to_index.insert(entry.id, index);
        }
        self.items.push(entry);
        index
    }

    /// Physically remove without touching the array version; the reader
    /// uses this when applying a frame, where the version bump is the
    /// source's business.
    pub(crate) fn remove_applied(&mut self, index: usize) -> Entry<P> {
        let entry = self.items.remove(index);
        self.id_to_index.clear();
        entry
    }
}

impl<P> Default for SyncArray<P> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mark_dirty_assigns_ids_once() {
        let mut array: SyncArray<u8> = SyncArray::new();
        let index = array.push(5);

        let id = array.mark_dirty(index).unwrap();
        assert_eq!(id, 1);
        assert_eq!(array.get(index).unwrap().version(), 1);

        let id_again = array.mark_dirty(index).unwrap();
        assert_eq!(id_again, id);
        assert_eq!(array.get(index).unwrap().version(), 2);
    }

    #[test]
    fn ids_are_unique_across_entries() {
        let mut array: SyncArray<u8> = SyncArray::new();
        let a = array.push(0);
        let b = array.push(1);
        let id_a = array.mark_dirty(a).unwrap();
        let id_b = array.mark_dirty(b).unwrap();
        assert_ne!(id_a, id_b);
    }

    #[test]
    fn mutation_bumps_array_version() {
        let mut array: SyncArray<u8> = SyncArray::new();
        let index = array.push(0);
        let before = array.array_version();
        array.mark_dirty(index).unwrap();
        assert_ne!(array.array_version(), before);

        let before = array.array_version();
        array.remove(index);
        assert_ne!(array.array_version(), before);
    }

    #[test]
    fn index_of_rebuilds_after_removal() {
        let mut array: SyncArray<u8> = SyncArray::new();
        for value in 0..4u8 {
            let index = array.push(value);
            array.mark_dirty(index).unwrap();
        }
        assert_eq!(array.index_of(3), Some(2));

        array.remove(0);
        assert_eq!(array.index_of(3), Some(1));
        assert_eq!(array.index_of(1), None);
    }
}
