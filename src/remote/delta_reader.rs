use std::collections::HashSet;

use log::{trace, warn};

use crate::{
    codec::{Resolver, StructCodec, SyncDelegate},
    constants::{MAX_CHANGED, MAX_DELETED},
    entry::Entry,
    error::SyncError,
    host::{DeltaFrame, WireUint},
    remote::item_waitlist::ItemWaitlist,
    serde::{BitReader, Serde, SerdeErr},
    sync_array::SyncArray,
    types::{HandleStatus, NetId, RefHandle},
};

/// One parsed changed entry, held until the whole frame has parsed.
struct ChangedEntry<P> {
    id: NetId,
    payload: P,
    unresolved: HashSet<RefHandle>,
    buffer: Vec<u8>,
    bit_length: u32,
}

/// Observer-side half of the protocol: applies incoming change frames to
/// the local array and runs the deferred-resolution pass.
pub struct DeltaReader;

impl DeltaReader {
    fn read_id(reader: &mut BitReader) -> Result<NetId, SyncError> {
        let raw = WireUint::de(reader)?.get();
        // an id wider than the id space cannot have come from our writer
        NetId::try_from(raw).map_err(|_| SyncError::Serde(SerdeErr))
    }

    /// Apply one change frame.
    ///
    /// The frame is parsed in full before anything is applied: a malformed
    /// or truncated frame returns an error and leaves the array, the
    /// waitlist, and the delegate untouched.
    pub fn read<P: Clone + Default>(
        frame: &DeltaFrame,
        array: &mut SyncArray<P>,
        waitlist: &mut ItemWaitlist,
        codec: &dyn StructCodec<P>,
        delegate: &mut dyn SyncDelegate<P>,
    ) -> Result<(), SyncError> {
        let mut reader = BitReader::with_bit_length(&frame.bytes, frame.bit_length);

        let deleted_count = WireUint::de(&mut reader)?.get();
        if deleted_count > MAX_DELETED {
            warn!("frame rejected: deleted count {deleted_count} over limit");
            return Err(SyncError::TooManyDeleted {
                count: deleted_count,
                max: MAX_DELETED,
            });
        }

        let changed_count = WireUint::de(&mut reader)?.get();
        if changed_count > MAX_CHANGED {
            warn!("frame rejected: changed count {changed_count} over limit");
            return Err(SyncError::TooManyChanged {
                count: changed_count,
                max: MAX_CHANGED,
            });
        }

        trace!("delta read: {changed_count} changed, {deleted_count} deleted");

        array.ensure_index();

        // Parse phase. Payloads decode into scratch values seeded from the
        // current entry (or default for ids we do not know yet), so a
        // failure part-way leaves no trace.
        let mut deleted_ids = Vec::with_capacity(deleted_count as usize);
        for _ in 0..deleted_count {
            deleted_ids.push(Self::read_id(&mut reader)?);
        }

        let mut changed_entries = Vec::with_capacity(changed_count as usize);
        for _ in 0..changed_count {
            let id = Self::read_id(&mut reader)?;

            let mut payload = match array.lookup(id) {
                Some(index) => match array.get(index) {
                    Some(entry) => entry.payload.clone(),
                    None => P::default(),
                },
                None => P::default(),
            };

            let start_bit = reader.bit_pos();
            let unresolved = codec.decode(&mut reader, &mut payload)?;
            let end_bit = reader.bit_pos();

            // only keep the raw bits if there is something to replay
            let (buffer, bit_length) = if unresolved.is_empty() {
                (Vec::new(), 0)
            } else {
                reader.copy_bit_range(start_bit, end_bit)
            };

            changed_entries.push(ChangedEntry {
                id,
                payload,
                unresolved,
                buffer,
                bit_length,
            });
        }

        // Apply phase: deletions first. Callbacks fire while entries are
        // still present; physical removal runs afterwards in descending
        // index order so earlier removals cannot shift later ones. A
        // hostile frame may repeat an id; the delegate sees each removal
        // once.
        deleted_ids.sort_unstable();
        deleted_ids.dedup();
        let mut delete_indices = Vec::new();
        for id in deleted_ids {
            waitlist.remove(id);

            match array.lookup(id) {
                Some(index) => {
                    if let Some(entry) = array.get(index) {
                        delegate.on_pre_remove(entry);
                    }
                    delete_indices.push(index);
                }
                None => {
                    // the source may be ahead of a removal we never saw
                    warn!("deletion for unknown id {id}, skipping");
                }
            }
        }
        delete_indices.sort_unstable();
        for index in delete_indices.into_iter().rev() {
            array.remove_applied(index);
        }
        array.ensure_index();

        // Apply phase: changed entries.
        for changed in changed_entries {
            if changed.unresolved.is_empty() {
                waitlist.remove(changed.id);
            } else {
                waitlist.insert(
                    changed.id,
                    changed.unresolved,
                    changed.buffer,
                    changed.bit_length,
                );
            }

            match array.lookup(changed.id) {
                Some(index) => {
                    array.entry_mut(index).payload = changed.payload;
                    if let Some(entry) = array.get(index) {
                        delegate.on_post_change(entry);
                    }
                }
                None => {
                    let index = array.push_entry(Entry::with_id(changed.id, changed.payload));
                    if let Some(entry) = array.get(index) {
                        delegate.on_post_add(entry);
                    }
                }
            }
        }

        Ok(())
    }

    /// Deferred-resolution pass, run once per tick per observer.
    ///
    /// Asks the resolver about every outstanding handle; once any handle
    /// for an item resolves, replays the stored payload bits through the
    /// codec and fires `on_post_change` for that item. Returns `true`
    /// while entries remain waiting (more work pending).
    pub fn update_pending<P>(
        array: &mut SyncArray<P>,
        waitlist: &mut ItemWaitlist,
        codec: &dyn StructCodec<P>,
        resolver: &dyn Resolver,
        delegate: &mut dyn SyncDelegate<P>,
    ) -> Result<bool, SyncError> {
        array.ensure_index();

        for id in waitlist.ids() {
            // the item may have been deleted since; its tracking goes too
            let Some(index) = array.lookup(id) else {
                waitlist.remove(id);
                continue;
            };

            let mut resolved_some = false;
            let mut replay: Option<(Vec<u8>, u32)> = None;
            let mut drop_entry = false;

            if let Some(entry) = waitlist.entry_mut(id) {
                entry.unresolved.retain(|&handle| match resolver.status(handle) {
                    HandleStatus::Pending => true,
                    HandleStatus::Resolved => {
                        resolved_some = true;
                        false
                    }
                    HandleStatus::Broken => {
                        // terminal for this one reference; the payload may
                        // stay partially decoded
                        warn!("reference handle {handle} is broken, dropping it");
                        false
                    }
                });

                if resolved_some {
                    replay = Some((entry.buffer.clone(), entry.bit_length));
                }

                drop_entry = entry.unresolved.is_empty();
            }

            if drop_entry {
                waitlist.remove(id);
            }

            if let Some((buffer, bit_length)) = replay {
                let mut reader = BitReader::with_bit_length(&buffer, bit_length);
                let item = array.entry_mut(index);
                codec.decode(&mut reader, &mut item.payload)?;

                if let Some(entry) = array.get(index) {
                    delegate.on_post_change(entry);
                }
            }
        }

        Ok(waitlist.has_pending())
    }
}
