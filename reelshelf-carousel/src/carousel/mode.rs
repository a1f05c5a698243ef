//! Carousel lifecycle mode and its transition table.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CarouselMode {
    /// No track (empty sequence).
    #[default]
    Empty,
    /// Track present, nothing moving on its own.
    Idle,
    AutoAdvancing,
    /// Transition lock held after a manual page.
    Paging,
    /// Terminal; every timer has been cancelled.
    TornDown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeEvent {
    TrackRebuilt { has_track: bool, auto_advance: bool },
    PageStarted,
    GestureStarted,
    LockReleased,
    TearDown,
}

impl CarouselMode {
    pub fn on(self, event: ModeEvent) -> CarouselMode {
        use CarouselMode::*;
        match (self, event) {
            (TornDown, _) | (_, ModeEvent::TearDown) => TornDown,
            (
                _,
                ModeEvent::TrackRebuilt {
                    has_track: false, ..
                },
            ) => Empty,
            (
                _,
                ModeEvent::TrackRebuilt {
                    auto_advance: true, ..
                },
            ) => AutoAdvancing,
            (_, ModeEvent::TrackRebuilt { .. }) => Idle,
            (Empty, _) => Empty,
            (_, ModeEvent::PageStarted) => Paging,
            (AutoAdvancing, ModeEvent::GestureStarted) => Idle,
            (Paging, ModeEvent::LockReleased) => Idle,
            (mode, ModeEvent::GestureStarted | ModeEvent::LockReleased) => mode,
        }
    }

    pub fn is_torn_down(self) -> bool {
        self == CarouselMode::TornDown
    }
}
