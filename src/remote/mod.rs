//! Observer-side half of the protocol: applying incoming change frames
//! and retrying payloads that wait on unresolved external references.

mod delta_reader;
mod item_waitlist;

pub use delta_reader::DeltaReader;
pub use item_waitlist::ItemWaitlist;
