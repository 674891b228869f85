//! # delta-array
//! Delta replication for an ordered collection of structured items: a
//! source diffs its authoritative array against each observer's last
//! acknowledged snapshot and sends only what changed, over a bit-packed
//! frame. Payloads that reference not-yet-known external objects are
//! buffered and replayed once those references resolve.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

mod base_state;
mod codec;
mod constants;
mod entry;
mod error;
mod host;
mod remote;
pub mod serde;
mod sync_array;
mod types;

pub use base_state::BaseState;
pub use codec::{Resolver, StructCodec, SyncDelegate};
pub use constants::{MAX_CHANGED, MAX_DELETED};
pub use entry::Entry;
pub use error::SyncError;
pub use host::{DeltaFrame, DeltaWriter};
pub use remote::{DeltaReader, ItemWaitlist};
pub use serde::{BitReader, BitWrite, BitWriter, Serde, SerdeErr, UnsignedVariableInteger};
pub use sync_array::SyncArray;
pub use types::{HandleStatus, NetId, RefHandle, Version, NET_ID_NONE};
