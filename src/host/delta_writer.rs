use std::collections::HashMap;

use log::{trace, warn};

use crate::{
    base_state::BaseState,
    codec::StructCodec,
    constants::{MAX_CHANGED, MAX_DELETED},
    error::SyncError,
    serde::{BitWriter, Serde, UnsignedVariableInteger},
    sync_array::SyncArray,
    types::{NetId, Version, NET_ID_NONE},
};

/// Counts and ids on the wire: 7-bit chunks with a continue bit.
pub(crate) type WireUint = UnsignedVariableInteger<7>;

/// One encoded change frame, ready for the transport layer.
///
/// `bit_length` is the exact number of meaningful bits; the final byte of
/// `bytes` may carry padding.
#[derive(Debug, Clone)]
pub struct DeltaFrame {
    pub bytes: Vec<u8>,
    pub bit_length: u32,
}

impl DeltaFrame {
    pub fn new(bytes: Vec<u8>, bit_length: u32) -> Self {
        Self { bytes, bit_length }
    }
}

/// Source-side half of the protocol: diffs the current array against one
/// observer's base state and writes the change frame.
pub struct DeltaWriter;

impl DeltaWriter {
    /// Diff `array` against `old_state` and produce the frame to send,
    /// plus the new base state to persist for this observer once the
    /// transport accepts the frame. `None` means nothing to send.
    pub fn write<P>(
        array: &mut SyncArray<P>,
        old_state: Option<&BaseState>,
        codec: &dyn StructCodec<P>,
    ) -> Result<Option<(DeltaFrame, BaseState)>, SyncError> {
        // Rebuild the id map if it is stale. Entries still carrying no id
        // at this point were added without a mark_dirty call; assign them
        // one now so they replicate.
        if array.index_is_stale() {
            for index in 0..array.len() {
                if array.get(index).map(|entry| entry.id()) == Some(NET_ID_NONE) {
                    warn!("entry at index {index} has no net id; assigning one now");
                    array.mark_dirty(index)?;
                }
            }
            array.ensure_index();
        }

        // Fast path: this observer's snapshot already matches the array.
        if let Some(old) = old_state {
            if old.array_version == array.array_version() {
                if old.id_to_version.len() == array.len() {
                    trace!("delta write: array version matches, nothing to send");
                    return Ok(None);
                }
                warn!(
                    "array version matches but snapshot holds {} ids for {} items; taking the full diff",
                    old.id_to_version.len(),
                    array.len()
                );
            }
        }

        // Fresh snapshot, and the changed set against the old one. Absent
        // from the old map and version-differs both count as changed.
        let mut new_map: HashMap<NetId, Version> = HashMap::with_capacity(array.len());
        let mut changed: Vec<(usize, NetId)> = Vec::new();
        for (index, entry) in array.iter().enumerate() {
            new_map.insert(entry.id(), entry.version());
            match old_state.and_then(|old| old.id_to_version.get(&entry.id())) {
                Some(old_version) if *old_version == entry.version() => {
                    // unchanged; it may have moved, but positions are not
                    // part of the protocol
                }
                _ => changed.push((index, entry.id())),
            }
        }

        // Deleted: old ids with no current counterpart.
        let mut deleted: Vec<NetId> = Vec::new();
        if let Some(old) = old_state {
            for id in old.id_to_version.keys() {
                if !new_map.contains_key(id) {
                    deleted.push(*id);
                }
            }
        }

        if changed.is_empty() && deleted.is_empty() {
            trace!("delta write: mutations cancelled out, nothing to send");
            return Ok(None);
        }

        trace!(
            "delta write: {} changed, {} deleted",
            changed.len(),
            deleted.len()
        );

        // the frame still goes out, but a compliant reader will reject
        // counts over the protocol bounds and this observer wedges; make
        // that diagnosable at the source
        if deleted.len() as u64 > MAX_DELETED {
            warn!(
                "frame carries {} deleted entries, over the reader bound of {MAX_DELETED}",
                deleted.len()
            );
        }
        if changed.len() as u64 > MAX_CHANGED {
            warn!(
                "frame carries {} changed entries, over the reader bound of {MAX_CHANGED}",
                changed.len()
            );
        }

        let mut writer = BitWriter::new();
        WireUint::new(deleted.len() as u64).ser(&mut writer);
        WireUint::new(changed.len() as u64).ser(&mut writer);

        for id in &deleted {
            WireUint::new(*id).ser(&mut writer);
        }

        for (index, id) in &changed {
            WireUint::new(*id).ser(&mut writer);
            if let Some(entry) = array.get(*index) {
                codec.encode(&entry.payload, &mut writer);
            }
        }

        let new_state = BaseState::new(new_map, array.array_version());
        let bit_length = writer.bits_written();
        let frame = DeltaFrame::new(writer.to_bytes(), bit_length);
        Ok(Some((frame, new_state)))
    }
}
