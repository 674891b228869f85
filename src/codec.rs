use std::collections::HashSet;

use crate::{
    entry::Entry,
    serde::{BitReader, BitWrite, SerdeErr},
    types::{HandleStatus, RefHandle},
};

/// Per-payload-type wire codec, implemented once per domain payload and
/// injected into the writer/reader.
///
/// `decode` reports the set of external references found in the payload
/// that could not be resolved yet; an empty set means the payload is fully
/// mapped. Codec-level trouble is reported as data (the handle set) or as
/// a [`SerdeErr`] on buffer exhaustion — never by panicking.
pub trait StructCodec<P> {
    fn encode(&self, payload: &P, writer: &mut dyn BitWrite);

    fn decode(&self, reader: &mut BitReader, payload: &mut P)
        -> Result<HashSet<RefHandle>, SerdeErr>;
}

/// The external oracle that knows whether a [`RefHandle`] can be resolved.
///
/// The contract requires eventual liveness: a handle that will never
/// resolve must eventually report [`HandleStatus::Broken`], or its
/// waitlist entry is retried forever.
pub trait Resolver {
    fn status(&self, handle: RefHandle) -> HandleStatus;
}

/// Observer-side lifecycle notifications, fired by the reader as it
/// applies a frame.
///
/// All methods default to no-ops; implement only what the collection owner
/// cares about. `on_pre_remove` fires while the entry is still present in
/// the array.
pub trait SyncDelegate<P> {
    fn on_pre_remove(&mut self, _entry: &Entry<P>) {}
    fn on_post_add(&mut self, _entry: &Entry<P>) {}
    fn on_post_change(&mut self, _entry: &Entry<P>) {}
}

impl<P> SyncDelegate<P> for () {}
