#![allow(dead_code)]

use std::time::{Duration, Instant};

use reelshelf_carousel::carousel::{
    Carousel, CarouselHost, ChangeCause, ControlVisibility, PositionChange,
    Sequence,
};
use reelshelf_carousel::CarouselSettings;

/// Host that keeps every notification for later assertions.
#[derive(Debug, Default)]
pub struct RecordingHost {
    pub changes: Vec<PositionChange>,
    pub controls: Vec<ControlVisibility>,
}

impl RecordingHost {
    pub fn teleports(&self) -> Vec<f32> {
        self.changes
            .iter()
            .filter_map(|change| change.teleport.map(|t| t.shift))
            .collect()
    }

    pub fn count(&self, cause: ChangeCause) -> usize {
        self.changes
            .iter()
            .filter(|change| change.cause == cause)
            .count()
    }
}

impl CarouselHost for RecordingHost {
    fn position_changed(&mut self, change: PositionChange) {
        self.changes.push(change);
    }

    fn controls_changed(&mut self, controls: ControlVisibility) {
        self.controls.push(controls);
    }
}

pub fn titles(count: usize) -> Sequence<String> {
    Sequence::new(
        (0..count)
            .map(|i| format!("Movie {i}"))
            .collect::<Vec<_>>(),
    )
}

pub fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

/// Carousel with a measured viewport and `count` items mounted at `t0`.
pub fn mounted(
    settings: CarouselSettings,
    count: usize,
    viewport: f32,
    t0: Instant,
) -> Carousel<String, RecordingHost> {
    let mut carousel = Carousel::new(settings, RecordingHost::default());
    carousel.set_viewport_width(viewport, t0);
    carousel.set_sequence(titles(count), t0);
    carousel
}

/// Fire timers in deadline order up to and including `until`.
pub fn run_until<H: CarouselHost>(
    carousel: &mut Carousel<String, H>,
    until: Instant,
) {
    while let Some(deadline) = carousel.next_deadline() {
        if deadline > until {
            break;
        }
        carousel.advance(deadline);
    }
}

pub fn assert_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < 0.01,
        "expected {expected}, got {actual}"
    );
}
