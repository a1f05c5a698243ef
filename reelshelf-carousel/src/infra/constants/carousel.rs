//! Recommendation carousel constants
//!
//! Shared defaults for carousel layout, paging, auto-advance and control
//! visibility. Tuning should happen here so settings defaults and tests stay
//! in sync.

/// Layout defaults for the item strip.
pub mod layout {
    /// Distance between the left edges of two neighbouring items
    /// (card width plus spacing).
    pub const ITEM_STRIDE: f32 = 270.0;
    /// Items rendered beyond each viewport edge.
    pub const OVERSCAN_ITEMS: usize = 2;
    /// Viewport width changes smaller than this are treated as noise and do
    /// not rebuild the track.
    pub const RESIZE_EPSILON: f32 = 0.5;
}

/// Manual paging defaults.
pub mod paging {
    /// Fraction of the viewport width travelled by one page.
    pub const PAGE_FRACTION: f32 = 0.8;
    /// Duration (ms) of a page transition; the transition lock is held for
    /// exactly this long.
    pub const TRANSITION_MS: u64 = 300;
    /// Frame cadence (ms) while a page transition is in flight (~60 FPS).
    pub const FRAME_MS: u64 = 16;
}

/// Idle auto-advance defaults.
pub mod auto_advance {
    /// Tick cadence (ms).
    pub const TICK_MS: u64 = 20;
    /// Offset travelled per tick. Small enough to read as continuous motion.
    pub const STEP: f32 = 1.0;
}

/// Directional control visibility.
pub mod visibility {
    /// Slack subtracted from the right edge so rounding does not leave the
    /// right control visible at the end of a bounded strip.
    pub const EDGE_TOLERANCE: f32 = 10.0;
}
