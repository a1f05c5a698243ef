//! Directional control visibility

use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ControlVisibility {
    pub can_page_left: bool,
    pub can_page_right: bool,
}

impl ControlVisibility {
    pub const HIDDEN: Self = Self {
        can_page_left: false,
        can_page_right: false,
    };

    pub const BOTH: Self = Self {
        can_page_left: true,
        can_page_right: true,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum VisibilityStrategy {
    /// No track.
    #[default]
    Hidden,
    /// Teleportation always leaves room on both sides.
    Wraparound,
    Bounded {
        content_width: f32,
        viewport_width: f32,
        tolerance: f32,
    },
}

impl VisibilityStrategy {
    pub fn evaluate(&self, offset: f32) -> ControlVisibility {
        match *self {
            VisibilityStrategy::Hidden => ControlVisibility::HIDDEN,
            VisibilityStrategy::Wraparound => ControlVisibility::BOTH,
            VisibilityStrategy::Bounded {
                content_width,
                viewport_width,
                tolerance,
            } => ControlVisibility {
                can_page_left: offset > 0.0,
                can_page_right: offset
                    < (content_width - viewport_width) - tolerance,
            },
        }
    }
}

/// Holds the last published visibility so hosts only hear about changes.
#[derive(Debug, Clone, Copy, Default)]
pub struct VisibilityEvaluator {
    strategy: VisibilityStrategy,
    current: ControlVisibility,
}

impl VisibilityEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> ControlVisibility {
        self.current
    }

    pub fn strategy(&self) -> VisibilityStrategy {
        self.strategy
    }

    pub fn set_strategy(&mut self, strategy: VisibilityStrategy) {
        self.strategy = strategy;
    }

    /// Re-evaluate at `offset`; returns the new pair when it changed.
    pub fn recompute(&mut self, offset: f32) -> Option<ControlVisibility> {
        let next = self.strategy.evaluate(offset);
        if next == self.current {
            return None;
        }
        self.current = next;
        Some(next)
    }
}
