//! Property tests for the middle-copy window.
//!
//! Whatever mix of pages, wheel moves and elapsed time a host produces, every
//! settled offset of a wrapped track stays in `[stride, 2 * cycle)`. Edge
//! moves land exactly on, or a few ulps around, the two window boundaries.

mod common;

use std::time::Instant;

use common::{mounted, ms, run_until};
use proptest::prelude::*;
use reelshelf_carousel::CarouselSettings;
use reelshelf_carousel::carousel::{
    AdvanceDirection, ChangeCause, Direction, GestureSource, InputEvent,
};

#[derive(Debug, Clone)]
enum Op {
    Page(Direction),
    Wheel(f32),
    /// Move to a window boundary: `ulps` below the first stride, or `ulps`
    /// past the end of the middle copy.
    Edge { low: bool, ulps: u32 },
    Wait(u64),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        any::<bool>().prop_map(|right| {
            Op::Page(if right { Direction::Right } else { Direction::Left })
        }),
        (-6_000.0f32..6_000.0).prop_map(Op::Wheel),
        (any::<bool>(), 0u32..4).prop_map(|(low, ulps)| Op::Edge { low, ulps }),
        (1u64..400).prop_map(Op::Wait),
    ]
}

fn edge_target(low: bool, ulps: u32, stride: f32, cycle: f32) -> f32 {
    if low {
        f32::from_bits(stride.to_bits() - 1 - ulps)
    } else {
        f32::from_bits((2.0 * cycle).to_bits() + ulps)
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn settled_offsets_stay_in_middle_copy(
        len in 1usize..16,
        stride in 50.0f32..400.0,
        fill in 0.1f32..0.99,
        step in 0.5f32..300.0,
        backward in any::<bool>(),
        ops in prop::collection::vec(op(), 1..60),
    ) {
        let mut settings = CarouselSettings::default();
        settings.stride = stride;
        settings.auto_advance.step = step;
        if backward {
            settings.auto_advance.direction = AdvanceDirection::Backward;
        }
        let cycle = len as f32 * stride;
        let viewport = cycle * fill;

        let t0 = Instant::now();
        let mut carousel = mounted(settings, len, viewport, t0);
        prop_assert!(carousel.is_wraparound());

        let mut now = t0;
        for op in ops {
            match op {
                Op::Page(direction) => {
                    carousel.page(direction, now);
                }
                Op::Wheel(delta_x) => {
                    carousel.handle_input(InputEvent::moved(
                        GestureSource::Wheel,
                        delta_x,
                    ));
                }
                Op::Edge { low, ulps } => {
                    let target = edge_target(low, ulps, stride, cycle);
                    let delta_x = target - carousel.offset();
                    carousel.handle_input(InputEvent::moved(
                        GestureSource::Touch,
                        delta_x,
                    ));
                }
                Op::Wait(millis) => {
                    now += ms(millis);
                    run_until(&mut carousel, now);
                }
            }
        }

        for change in carousel
            .host()
            .changes
            .iter()
            .filter(|change| change.cause != ChangeCause::Reset)
        {
            prop_assert!(
                change.offset >= stride && change.offset < 2.0 * cycle,
                "{:?} left [{}, {})",
                change,
                stride,
                2.0 * cycle
            );
        }
        let offset = carousel.offset();
        prop_assert!(offset >= stride && offset < 2.0 * cycle);
    }
}

#[test]
fn single_tile_wider_than_viewport_keeps_window() {
    let t0 = Instant::now();
    let mut carousel = mounted(CarouselSettings::default(), 1, 200.0, t0);
    assert!(carousel.is_wraparound());
    assert_eq!(carousel.offset(), 270.0);

    for ulps in 0..4 {
        let target = edge_target(true, ulps, 270.0, 270.0);
        let delta_x = target - carousel.offset();
        carousel.handle_input(InputEvent::moved(GestureSource::Pointer, delta_x));
        let offset = carousel.offset();
        assert!((270.0..540.0).contains(&offset), "offset {offset}");
    }
    assert!(!carousel.host().teleports().is_empty());
}
