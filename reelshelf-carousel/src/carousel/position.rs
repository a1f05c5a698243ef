//! Scroll position controller
//!
//! Owns the scalar offset into the track. In wraparound mode the offset is
//! kept inside the middle copy `[stride, 2 * cycle)` by teleporting a whole
//! cycle whenever a change lands outside it; in bounded mode it is clamped to
//! `[0, max_scroll]`.

use std::time::{Duration, Instant};

use super::transition::{Easing, Transition};
use super::types::Direction;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bounds {
    /// Replicated track; `cycle` is the width of one copy.
    Wraparound { cycle: f32, stride: f32 },
    Clamped { max_scroll: f32 },
}

impl Bounds {
    pub fn new(
        source_len: usize,
        stride: f32,
        viewport_width: f32,
        wraparound: bool,
    ) -> Self {
        let content = source_len as f32 * stride;
        if wraparound {
            Bounds::Wraparound {
                cycle: content,
                stride,
            }
        } else {
            let viewport = if viewport_width.is_finite() {
                viewport_width.max(0.0)
            } else {
                0.0
            };
            Bounds::Clamped {
                max_scroll: (content - viewport).max(0.0),
            }
        }
    }

    /// Start of the middle copy, or the left edge for a bounded strip.
    pub fn initial_offset(&self) -> f32 {
        match *self {
            Bounds::Wraparound { cycle, .. } => cycle,
            Bounds::Clamped { .. } => 0.0,
        }
    }

    pub fn is_wraparound(&self) -> bool {
        matches!(self, Bounds::Wraparound { .. })
    }

    fn clamp(&self, offset: f32) -> f32 {
        match *self {
            Bounds::Wraparound { .. } => offset,
            Bounds::Clamped { max_scroll } => offset.clamp(0.0, max_scroll),
        }
    }

    /// Pin a freshly shifted offset inside `[stride, 2 * cycle)`. The shift
    /// itself is exact, but the f32 sum can round onto an edge when the
    /// cycle is a single stride.
    fn keep_in_window(&self, offset: f32) -> f32 {
        let Bounds::Wraparound { cycle, stride } = *self else {
            return offset;
        };
        let end = 2.0 * cycle;
        if offset >= end {
            end.next_down().max(stride)
        } else if offset < stride {
            stride
        } else {
            offset
        }
    }

    /// Whole-cycle shift that brings `offset` back into the middle copy.
    fn teleport_shift(&self, offset: f32) -> Option<f32> {
        let Bounds::Wraparound { cycle, stride } = *self else {
            return None;
        };
        if cycle <= 0.0 {
            return None;
        }
        if offset < stride {
            let cycles = ((stride - offset) / cycle).ceil().max(1.0);
            Some(cycles * cycle)
        } else if offset >= 2.0 * cycle {
            let cycles = ((offset - 2.0 * cycle) / cycle).floor() + 1.0;
            Some(-cycles * cycle)
        } else {
            None
        }
    }
}

/// Instantaneous, unanimated whole-cycle jump performed during a settle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Teleport {
    pub shift: f32,
}

/// Result of a position change that actually moved the offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settled {
    pub previous: f32,
    pub offset: f32,
    pub teleport: Option<Teleport>,
}

#[derive(Debug, Clone)]
pub struct ScrollPosition {
    offset: f32,
    bounds: Bounds,
    transition: Option<Transition>,
}

impl ScrollPosition {
    /// Position for a freshly built track; no transition.
    pub fn initialize(bounds: Bounds) -> Self {
        Self {
            offset: bounds.initial_offset(),
            bounds,
            transition: None,
        }
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    pub fn transition(&self) -> Option<&Transition> {
        self.transition.as_ref()
    }

    /// Target for one page in `direction`, clamped for bounded strips.
    pub fn page_target(
        &self,
        direction: Direction,
        viewport_width: f32,
        page_fraction: f32,
    ) -> f32 {
        let viewport = if viewport_width.is_finite() {
            viewport_width.max(0.0)
        } else {
            0.0
        };
        let delta = direction.sign() * viewport * page_fraction;
        self.bounds.clamp(self.offset + delta)
    }

    pub fn begin_transition(
        &mut self,
        target: f32,
        now: Instant,
        duration: Duration,
        easing: Easing,
    ) {
        self.transition =
            Some(Transition::new(self.offset, target, now, duration, easing));
    }

    pub fn cancel_transition(&mut self) -> bool {
        self.transition.take().is_some()
    }

    /// Sample the in-flight transition at `now` and apply it. The transition
    /// is dropped once it reaches its target.
    pub fn advance_transition(&mut self, now: Instant) -> Option<Settled> {
        let (value, done) = self.transition.as_ref()?.sample(now);
        if done {
            self.transition = None;
        }
        self.apply(value)
    }

    /// Move to `raw` and run the settle check. Returns `None` when the offset
    /// did not actually change.
    pub fn apply(&mut self, raw: f32) -> Option<Settled> {
        if !raw.is_finite() {
            log::warn!("Ignoring non-finite carousel offset {raw}");
            return None;
        }
        let next = self.bounds.clamp(raw);
        if next == self.offset {
            return None;
        }
        let previous = self.offset;
        self.offset = next;
        let teleport = self.settle();
        Some(Settled {
            previous,
            offset: self.offset,
            teleport,
        })
    }

    /// Runs once per actual change. Forward and backward teleports cover
    /// disjoint ranges, so at most one fires.
    fn settle(&mut self) -> Option<Teleport> {
        let shift = self.bounds.teleport_shift(self.offset)?;
        self.offset = self.bounds.keep_in_window(self.offset + shift);
        if let Some(transition) = self.transition.as_mut() {
            transition.shift(shift);
        }
        Some(Teleport { shift })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wrapped(n: usize) -> ScrollPosition {
        ScrollPosition::initialize(Bounds::new(n, 270.0, 800.0, true))
    }

    #[test]
    fn initialize_starts_in_middle_copy() {
        assert_eq!(wrapped(10).offset(), 2700.0);
        let bounded =
            ScrollPosition::initialize(Bounds::new(2, 270.0, 800.0, false));
        assert_eq!(bounded.offset(), 0.0);
    }

    #[test]
    fn forward_teleport_below_first_stride() {
        let mut position = wrapped(10);
        let settled = position.apply(269.0).unwrap();
        assert_eq!(settled.teleport, Some(Teleport { shift: 2700.0 }));
        assert_eq!(settled.offset, 2969.0);
        assert_eq!(settled.previous, 2700.0);
    }

    #[test]
    fn single_item_teleport_stays_below_end_of_middle_copy() {
        // One 270 tile in a 200 viewport: the cycle is one stride, and
        // 269.99997 + 270 rounds to exactly 540 in f32.
        let mut position =
            ScrollPosition::initialize(Bounds::new(1, 270.0, 200.0, true));
        let just_below = f32::from_bits(270f32.to_bits() - 1);
        let settled = position.apply(just_below).unwrap();
        assert_eq!(settled.teleport, Some(Teleport { shift: 270.0 }));
        assert!(settled.offset >= 270.0 && settled.offset < 540.0);
        assert_eq!(position.offset(), settled.offset);

        let settled = position.apply(540.0).unwrap();
        assert_eq!(settled.teleport, Some(Teleport { shift: -270.0 }));
        assert_eq!(settled.offset, 270.0);
    }

    #[test]
    fn backward_teleport_at_end_of_middle_copy() {
        let mut position = wrapped(10);
        let settled = position.apply(5400.0).unwrap();
        assert_eq!(settled.teleport, Some(Teleport { shift: -2700.0 }));
        assert_eq!(settled.offset, 2700.0);
    }

    #[test]
    fn no_teleport_inside_window() {
        let mut position = wrapped(10);
        assert_eq!(position.apply(270.0).unwrap().teleport, None);
        assert_eq!(position.apply(5399.0).unwrap().teleport, None);
    }

    #[test]
    fn oversized_jumps_land_in_window_with_one_shift() {
        let mut position = wrapped(4);
        let cycle = 1080.0;
        let settled = position.apply(-5000.0).unwrap();
        let shift = settled.teleport.unwrap().shift;
        assert!(shift > 0.0);
        assert_eq!(shift % cycle, 0.0);
        assert!(settled.offset >= 270.0 && settled.offset < 2.0 * cycle);

        let settled = position.apply(9000.0).unwrap();
        assert!(settled.teleport.unwrap().shift < 0.0);
        assert!(settled.offset >= 270.0 && settled.offset < 2.0 * cycle);
    }

    #[test]
    fn unchanged_or_non_finite_offsets_do_not_settle() {
        let mut position = wrapped(10);
        assert!(position.apply(2700.0).is_none());
        assert!(position.apply(f32::NAN).is_none());
        assert!(position.apply(f32::NEG_INFINITY).is_none());
        assert_eq!(position.offset(), 2700.0);
    }

    #[test]
    fn bounded_offsets_clamp_and_never_teleport() {
        let mut position =
            ScrollPosition::initialize(Bounds::new(5, 270.0, 800.0, false));
        let settled = position.apply(-50.0);
        assert!(settled.is_none());
        let settled = position.apply(10_000.0).unwrap();
        assert_eq!(settled.offset, 550.0);
        assert_eq!(settled.teleport, None);
    }

    #[test]
    fn page_target_uses_eighty_percent_of_viewport() {
        let position = wrapped(10);
        assert_eq!(position.page_target(Direction::Right, 800.0, 0.8), 3340.0);
        assert_eq!(position.page_target(Direction::Left, 800.0, 0.8), 2060.0);
    }

    #[test]
    fn teleport_mid_transition_shifts_the_tween() {
        let mut position = wrapped(4);
        let start = Instant::now();
        let duration = Duration::from_millis(300);
        position.apply(300.0);
        position.begin_transition(-340.0, start, duration, Easing::Linear);

        let settled = position
            .advance_transition(start + Duration::from_millis(150))
            .unwrap();
        assert_eq!(settled.teleport, Some(Teleport { shift: 1080.0 }));
        assert_eq!(position.transition().unwrap().target(), 740.0);

        let settled = position.advance_transition(start + duration).unwrap();
        assert_eq!(settled.offset, 740.0);
        assert!(!position.is_transitioning());
    }
}
