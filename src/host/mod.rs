//! Source-side half of the protocol: diffing the authoritative array
//! against per-observer base states and writing change frames.

mod delta_writer;

pub use delta_writer::{DeltaFrame, DeltaWriter};

pub(crate) use delta_writer::WireUint;
