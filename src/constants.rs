/// Upper bound on deleted-entry count in a single frame. A frame claiming
/// more is rejected before any proportional allocation happens.
pub const MAX_DELETED: u64 = 2048;

/// Upper bound on changed-entry count in a single frame.
pub const MAX_CHANGED: u64 = 2048;
