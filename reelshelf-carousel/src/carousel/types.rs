//! Shared types for the carousel module

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

static NEXT_REVISION: AtomicU64 = AtomicU64::new(1);

/// Paging direction as bound to the host's chevron controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    /// -1 for left, +1 for right.
    pub const fn sign(self) -> f32 {
        match self {
            Direction::Left => -1.0,
            Direction::Right => 1.0,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Left => f.write_str("left"),
            Direction::Right => f.write_str("right"),
        }
    }
}

/// Ordered items handed to the carousel by its sequence source.
///
/// Every `Sequence::new` gets a fresh revision; clones share it. The revision
/// is the sequence's identity, so republishing an identical list still
/// counts as a change while re-sending a clone does not.
pub struct Sequence<T> {
    items: Arc<[T]>,
    revision: u64,
}

impl<T> Sequence<T> {
    pub fn new(items: impl Into<Arc<[T]>>) -> Self {
        Self {
            items: items.into(),
            revision: NEXT_REVISION.fetch_add(1, Ordering::Relaxed),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn same_identity(&self, other: &Self) -> bool {
        self.revision == other.revision && Arc::ptr_eq(&self.items, &other.items)
    }
}

impl<T> Clone for Sequence<T> {
    fn clone(&self) -> Self {
        Self {
            items: Arc::clone(&self.items),
            revision: self.revision,
        }
    }
}

impl<T> Default for Sequence<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> From<Vec<T>> for Sequence<T> {
    fn from(items: Vec<T>) -> Self {
        Self::new(items)
    }
}

impl<T> fmt::Debug for Sequence<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sequence")
            .field("len", &self.items.len())
            .field("revision", &self.revision)
            .finish()
    }
}

/// Which input device started or continued a gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GestureSource {
    Pointer,
    Wheel,
    Touch,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GesturePhase {
    Start,
    /// Content offset delta; positive moves the strip toward later items.
    Move { delta_x: f32 },
    End,
}

/// Raw interaction forwarded by the host input layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputEvent {
    pub source: GestureSource,
    pub phase: GesturePhase,
}

impl InputEvent {
    pub const fn start(source: GestureSource) -> Self {
        Self {
            source,
            phase: GesturePhase::Start,
        }
    }

    pub const fn moved(source: GestureSource, delta_x: f32) -> Self {
        Self {
            source,
            phase: GesturePhase::Move { delta_x },
        }
    }

    pub const fn end(source: GestureSource) -> Self {
        Self {
            source,
            phase: GesturePhase::End,
        }
    }
}

/// A rendered slot of the track, relative to the viewport's left edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VisibleSlot {
    pub track_index: usize,
    pub source_index: usize,
    pub x: f32,
}

/// Borrowed view of a visible slot together with its item.
#[derive(Debug, Clone, Copy)]
pub struct VisibleItem<'a, T> {
    pub slot: VisibleSlot,
    pub item: &'a T,
}
