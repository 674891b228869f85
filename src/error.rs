use thiserror::Error;

use crate::serde::SerdeErr;

/// Errors that can occur while writing or applying a delta frame.
///
/// The reader processes untrusted network data. Structural and bounds
/// errors here are fatal for the frame: nothing from a frame that fails is
/// applied to the local array.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    /// Frame header claims more deleted entries than the protocol allows
    /// (SECURITY: rejected before any allocation proportional to the count)
    #[error("frame claims {count} deleted entries, limit is {max}. This may indicate a malformed or malicious frame")]
    TooManyDeleted { count: u64, max: u64 },

    /// Frame header claims more changed entries than the protocol allows
    /// (SECURITY: rejected before any allocation proportional to the count)
    #[error("frame claims {count} changed entries, limit is {max}. This may indicate a malformed or malicious frame")]
    TooManyChanged { count: u64, max: u64 },

    /// The per-array id counter has exhausted the id space. Ids are never
    /// reused, so this array can no longer replicate new entries.
    #[error("net id counter exhausted; no further ids can be assigned for this array")]
    IdSpaceExhausted,

    /// A read ran past the end of the frame buffer
    #[error("frame truncated: {0}")]
    Serde(#[from] SerdeErr),
}
