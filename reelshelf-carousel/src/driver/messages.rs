//! Commands a host sends to a running carousel driver

use crate::carousel::{Direction, InputEvent};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CarouselCommand {
    Page(Direction),
    ViewportResized(f32),
    Input(InputEvent),
    Shutdown,
}
