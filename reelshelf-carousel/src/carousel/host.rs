//! Host callbacks
//!
//! The controller never touches a rendering surface. It reports offset and
//! control changes through [`CarouselHost`]; the host applies them to
//! whatever scroll container it renders.

use super::position::Teleport;
use super::visibility::ControlVisibility;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeCause {
    /// Track rebuilt; jump without animation.
    Reset,
    Transition,
    AutoAdvance,
    Gesture,
}

/// One settled position change. `offset` already includes any teleport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionChange {
    pub previous: f32,
    pub offset: f32,
    pub cause: ChangeCause,
    pub teleport: Option<Teleport>,
}

impl PositionChange {
    /// Whether the host must apply the offset without animating.
    pub fn is_instant(&self) -> bool {
        self.teleport.is_some() || self.cause == ChangeCause::Reset
    }
}

pub trait CarouselHost {
    fn position_changed(&mut self, change: PositionChange) {
        let _ = change;
    }

    fn controls_changed(&mut self, controls: ControlVisibility) {
        let _ = controls;
    }
}

/// Host that ignores every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullHost;

impl CarouselHost for NullHost {}

impl<H: CarouselHost + ?Sized> CarouselHost for Box<H> {
    fn position_changed(&mut self, change: PositionChange) {
        (**self).position_changed(change);
    }

    fn controls_changed(&mut self, controls: ControlVisibility) {
        (**self).controls_changed(controls);
    }
}
