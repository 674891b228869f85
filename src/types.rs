/// Stable identity of a replicated entry. Assigned once, never reused.
pub type NetId = u32;

/// Sentinel for an entry that has not been assigned an id yet.
pub const NET_ID_NONE: NetId = 0;

/// Per-entry change counter.
pub type Version = u32;

/// Opaque handle to an external object a payload may reference.
pub type RefHandle = u64;

/// What the external resolver knows about a [`RefHandle`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HandleStatus {
    /// Not resolvable yet; retry next tick.
    Pending,
    /// Resolvable now.
    Resolved,
    /// Will never resolve.
    Broken,
}
