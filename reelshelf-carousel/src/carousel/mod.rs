//! Infinite recommendation carousel
//!
//! A headless, viewport-aware horizontal carousel. When the sequence
//! overflows the viewport the track is replicated three times and the offset
//! is kept inside the middle copy by whole-cycle teleports, so the strip
//! appears endless in both directions. While nobody has touched it, the
//! strip drifts on its own; the first page or gesture turns that off for
//! good.

pub mod auto_advance;
pub mod controller;
pub mod guard;
pub mod host;
pub mod mode;
pub mod position;
pub mod timers;
pub mod track;
pub mod transition;
pub mod types;
pub mod visibility;

pub use auto_advance::{AdvanceDirection, AutoAdvanceState};
pub use controller::{Carousel, CarouselSnapshot, PageIgnored, PageOutcome};
pub use host::{CarouselHost, ChangeCause, NullHost, PositionChange};
pub use mode::CarouselMode;
pub use position::Teleport;
pub use track::{Track, needs_wraparound};
pub use transition::Easing;
pub use types::*;
pub use visibility::ControlVisibility;
