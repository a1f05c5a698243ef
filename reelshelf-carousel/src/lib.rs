//! Reelshelf recommendation carousel
//!
//! The controller itself lives in [`carousel`]; [`driver`] runs one inside a
//! tokio task for hosts that want timers handled for them.

pub mod carousel;
pub mod driver;
pub mod infra;

pub use carousel::{
    Carousel, CarouselHost, CarouselMode, CarouselSnapshot, ControlVisibility,
    Direction, InputEvent, NullHost, PageOutcome, Sequence,
};
pub use driver::{CarouselHandle, DriverError};
pub use infra::{CarouselSettings, SettingsError};
