use thiserror::Error;

/// Error returned when a read runs past the end of the incoming bit buffer.
///
/// SECURITY: incoming frames are untrusted. Any overrun means the frame is
/// malformed (or hostile) and the whole decode must be abandoned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("bit stream read past the end of the buffer")]
pub struct SerdeErr;
