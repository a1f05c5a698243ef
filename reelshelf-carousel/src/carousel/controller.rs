//! Carousel controller
//!
//! Ties the track model, position controller, auto-advance scheduler,
//! interaction guard and visibility evaluator together. Everything runs on
//! the caller's thread and every entry point takes the current time, so a
//! host event loop (or the tokio driver) decides when things happen.
//!
//! Ordering per change: input or tick, position update, settle check,
//! optional teleport, host notification, control visibility.

use std::fmt;
use std::time::Instant;

use serde::Serialize;

use super::auto_advance::{AutoAdvanceScheduler, AutoAdvanceState};
use super::guard::InteractionGuard;
use super::host::{CarouselHost, ChangeCause, NullHost, PositionChange};
use super::mode::{CarouselMode, ModeEvent};
use super::position::{Bounds, ScrollPosition, Settled};
use super::timers::{TimerHandle, TimerKind, TimerQueue};
use super::track::{Track, needs_wraparound};
use super::types::{
    Direction, GesturePhase, GestureSource, InputEvent, Sequence, VisibleItem,
    VisibleSlot,
};
use super::visibility::{
    ControlVisibility, VisibilityEvaluator, VisibilityStrategy,
};
use crate::infra::constants::carousel::layout::RESIZE_EPSILON;
use crate::infra::settings::CarouselSettings;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PageOutcome {
    Started { from: f32, target: f32 },
    Ignored(PageIgnored),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageIgnored {
    /// A previous page still holds the transition lock.
    Locked,
    NoTrack,
    TornDown,
}

/// Item-free view of the carousel, cheap to publish across tasks.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CarouselSnapshot {
    pub offset: f32,
    pub mode: CarouselMode,
    pub wraparound: bool,
    pub has_interacted: bool,
    pub locked: bool,
    pub controls: ControlVisibility,
    pub track_len: usize,
    pub source_len: usize,
    pub visible: Vec<VisibleSlot>,
}

struct Mounted<T> {
    track: Track<T>,
    position: ScrollPosition,
}

pub struct Carousel<T, H = NullHost> {
    settings: CarouselSettings,
    host: H,
    sequence: Sequence<T>,
    viewport_width: f32,
    mounted: Option<Mounted<T>>,
    timers: TimerQueue,
    auto_advance: AutoAdvanceScheduler,
    guard: InteractionGuard,
    frame_timer: Option<TimerHandle>,
    visibility: VisibilityEvaluator,
    mode: CarouselMode,
}

impl<T> Carousel<T, NullHost> {
    pub fn headless(settings: CarouselSettings) -> Self {
        Self::new(settings, NullHost)
    }
}

impl<T, H: CarouselHost> Carousel<T, H> {
    pub fn new(settings: CarouselSettings, host: H) -> Self {
        Self {
            auto_advance: AutoAdvanceScheduler::new(settings.auto_advance),
            settings,
            host,
            sequence: Sequence::empty(),
            viewport_width: 0.0,
            mounted: None,
            timers: TimerQueue::new(),
            guard: InteractionGuard::new(),
            frame_timer: None,
            visibility: VisibilityEvaluator::new(),
            mode: CarouselMode::Empty,
        }
    }

    // ---- Inputs ----------------------------------------------------------

    /// Replace the sequence. A clone of the current sequence is not a change.
    pub fn set_sequence(&mut self, sequence: Sequence<T>, now: Instant) {
        if self.mode.is_torn_down() {
            log::warn!("Ignoring sequence update on a torn down carousel");
            return;
        }
        if self.sequence.same_identity(&sequence) {
            return;
        }
        self.sequence = sequence;
        self.rebuild(now);
    }

    /// Report a new viewport width. Non-finite or negative widths count as
    /// unmeasured (zero).
    pub fn set_viewport_width(&mut self, width: f32, now: Instant) {
        if self.mode.is_torn_down() {
            return;
        }
        let width = if width.is_finite() { width.max(0.0) } else { 0.0 };
        if (width - self.viewport_width).abs() < RESIZE_EPSILON {
            return;
        }
        self.viewport_width = width;
        self.rebuild(now);
    }

    /// Page one viewport fraction in `direction`. Any call trips the
    /// interaction latch; calls inside the lock window are dropped.
    pub fn page(&mut self, direction: Direction, now: Instant) -> PageOutcome {
        if self.mode.is_torn_down() {
            return PageOutcome::Ignored(PageIgnored::TornDown);
        }
        if self.guard.note_interaction() {
            log::debug!("First manual page; auto-advance latched off");
        }
        self.auto_advance.disarm(&mut self.timers);

        let Some(mounted) = self.mounted.as_mut() else {
            return PageOutcome::Ignored(PageIgnored::NoTrack);
        };
        let duration = self.settings.transition_duration();
        if !self.guard.lock_mut().acquire(&mut self.timers, now, duration) {
            log::trace!("Page {direction} ignored: transition lock held");
            return PageOutcome::Ignored(PageIgnored::Locked);
        }

        let from = mounted.position.offset();
        let target = mounted.position.page_target(
            direction,
            self.viewport_width,
            self.settings.page_fraction,
        );
        mounted.position.begin_transition(
            target,
            now,
            duration,
            self.settings.easing,
        );
        log::debug!("Page {direction}: {from} -> {target}");

        self.mode = self.mode.on(ModeEvent::PageStarted);
        self.start_frames(now);
        PageOutcome::Started { from, target }
    }

    /// Pointer, wheel or touch input from the host.
    pub fn handle_input(&mut self, event: InputEvent) {
        if self.mode.is_torn_down() {
            log::warn!("Ignoring {:?} input on a torn down carousel", event.source);
            return;
        }
        match event.phase {
            GesturePhase::Start => self.take_manual_control(event.source),
            GesturePhase::Move { delta_x } => {
                self.take_manual_control(event.source);
                if let Some(offset) = self.current_offset() {
                    self.move_to(offset + delta_x, ChangeCause::Gesture);
                }
            }
            GesturePhase::End => {
                log::trace!("{:?} gesture ended", event.source);
            }
        }
    }

    /// Fire every timer due at `now`, in deadline order.
    pub fn advance(&mut self, now: Instant) {
        if self.mode.is_torn_down() {
            return;
        }
        while let Some(fired) = self.timers.pop_due(now) {
            match fired.kind {
                TimerKind::Frame => self.on_frame(fired.handle, now),
                TimerKind::LockRelease => {
                    self.on_lock_release(fired.handle, fired.deadline)
                }
                TimerKind::AutoAdvance => self.on_auto_advance(fired.handle),
            }
        }
    }

    /// When the host loop should call [`Carousel::advance`] next.
    pub fn next_deadline(&self) -> Option<Instant> {
        if self.mode.is_torn_down() {
            return None;
        }
        self.timers.next_deadline()
    }

    /// Cancel every timer and stop reacting to input. Terminal.
    pub fn shutdown(&mut self) {
        if self.mode.is_torn_down() {
            return;
        }
        self.auto_advance.disarm(&mut self.timers);
        self.guard.lock_mut().clear(&mut self.timers);
        self.cancel_frames();
        if let Some(mounted) = self.mounted.as_mut() {
            mounted.position.cancel_transition();
        }
        self.timers.cancel_all();
        self.mode = self.mode.on(ModeEvent::TearDown);
        log::debug!("Carousel torn down");
    }

    // ---- Internals -------------------------------------------------------

    fn rebuild(&mut self, now: Instant) {
        self.cancel_frames();
        self.guard.lock_mut().clear(&mut self.timers);

        let stride = self.settings.effective_stride();
        let wraparound =
            needs_wraparound(self.sequence.len(), self.viewport_width, stride);
        let previous = self.current_offset().unwrap_or(0.0);
        let viewport_width = self.viewport_width;
        self.mounted = Track::build(&self.sequence, wraparound).map(|track| {
            let bounds =
                Bounds::new(track.source_len(), stride, viewport_width, wraparound);
            Mounted {
                track,
                position: ScrollPosition::initialize(bounds),
            }
        });

        let has_track = self.mounted.is_some();
        let eligible = AutoAdvanceScheduler::should_arm(
            has_track,
            wraparound,
            self.guard.has_interacted(),
        );
        self.auto_advance.reconcile(eligible, &mut self.timers, now);
        self.mode = self.mode.on(ModeEvent::TrackRebuilt {
            has_track,
            auto_advance: eligible,
        });
        log::debug!(
            "Track rebuilt: {} items, viewport {}, wraparound {}, mode {:?}",
            self.sequence.len(),
            self.viewport_width,
            wraparound,
            self.mode
        );

        self.visibility.set_strategy(self.visibility_strategy());
        if let Some(offset) = self.current_offset() {
            self.host.position_changed(PositionChange {
                previous,
                offset,
                cause: ChangeCause::Reset,
                teleport: None,
            });
        }
        self.refresh_controls();
    }

    fn visibility_strategy(&self) -> VisibilityStrategy {
        match &self.mounted {
            None => VisibilityStrategy::Hidden,
            Some(mounted) if mounted.track.is_wraparound() => {
                VisibilityStrategy::Wraparound
            }
            Some(mounted) => VisibilityStrategy::Bounded {
                content_width: mounted
                    .track
                    .cycle_width(self.settings.effective_stride()),
                viewport_width: self.viewport_width,
                tolerance: self.settings.edge_tolerance,
            },
        }
    }

    fn take_manual_control(&mut self, source: GestureSource) {
        if self.guard.note_interaction() {
            log::debug!("First {source:?} gesture; auto-advance latched off");
        }
        self.auto_advance.disarm(&mut self.timers);
        if let Some(mounted) = self.mounted.as_mut()
            && mounted.position.cancel_transition()
        {
            log::debug!("{source:?} gesture took over an in-flight page");
        }
        self.cancel_frames();
        self.mode = self.mode.on(ModeEvent::GestureStarted);
    }

    fn move_to(&mut self, raw: f32, cause: ChangeCause) {
        let Some(mounted) = self.mounted.as_mut() else {
            return;
        };
        if let Some(settled) = mounted.position.apply(raw) {
            self.publish(settled, cause);
        }
    }

    fn publish(&mut self, settled: Settled, cause: ChangeCause) {
        if let Some(teleport) = settled.teleport {
            log::debug!(
                "Teleported by {} to {} ({cause:?})",
                teleport.shift,
                settled.offset
            );
        }
        self.host.position_changed(PositionChange {
            previous: settled.previous,
            offset: settled.offset,
            cause,
            teleport: settled.teleport,
        });
        self.refresh_controls();
    }

    fn refresh_controls(&mut self) {
        let offset = self.current_offset().unwrap_or(0.0);
        if let Some(controls) = self.visibility.recompute(offset) {
            self.host.controls_changed(controls);
        }
    }

    fn start_frames(&mut self, now: Instant) {
        self.cancel_frames();
        let interval = self.settings.frame_interval();
        self.frame_timer = Some(self.timers.schedule_repeating(
            TimerKind::Frame,
            now + interval,
            interval,
        ));
    }

    fn cancel_frames(&mut self) {
        if let Some(handle) = self.frame_timer.take() {
            self.timers.cancel(handle);
        }
    }

    fn on_frame(&mut self, handle: TimerHandle, now: Instant) {
        if self.frame_timer == Some(handle) {
            self.step_transition(now);
        }
    }

    fn step_transition(&mut self, at: Instant) {
        let Some(mounted) = self.mounted.as_mut() else {
            self.cancel_frames();
            return;
        };
        let settled = mounted.position.advance_transition(at);
        let finished = !mounted.position.is_transitioning();
        if let Some(settled) = settled {
            self.publish(settled, ChangeCause::Transition);
        }
        if finished {
            self.cancel_frames();
        }
    }

    fn on_lock_release(&mut self, handle: TimerHandle, deadline: Instant) {
        if !self.guard.lock_mut().on_release_timer(handle) {
            return;
        }
        let elapsed = self
            .mounted
            .as_ref()
            .and_then(|mounted| mounted.position.transition())
            .is_some_and(|transition| transition.finishes_at() <= deadline);
        if elapsed {
            self.step_transition(deadline);
        }
        self.mode = self.mode.on(ModeEvent::LockReleased);
        log::trace!("Transition lock released");
    }

    fn on_auto_advance(&mut self, handle: TimerHandle) {
        let Some(delta) = self.auto_advance.on_tick(handle) else {
            return;
        };
        if let Some(offset) = self.current_offset() {
            log::trace!("Auto-advance tick at {offset}");
            self.move_to(offset + delta, ChangeCause::AutoAdvance);
        }
    }

    fn current_offset(&self) -> Option<f32> {
        self.mounted
            .as_ref()
            .map(|mounted| mounted.position.offset())
    }

    // ---- Queries ---------------------------------------------------------

    pub fn settings(&self) -> &CarouselSettings {
        &self.settings
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn sequence(&self) -> &Sequence<T> {
        &self.sequence
    }

    pub fn track(&self) -> Option<&Track<T>> {
        self.mounted.as_ref().map(|mounted| &mounted.track)
    }

    pub fn viewport_width(&self) -> f32 {
        self.viewport_width
    }

    /// Current offset; zero without a track.
    pub fn offset(&self) -> f32 {
        self.current_offset().unwrap_or(0.0)
    }

    pub fn mode(&self) -> CarouselMode {
        self.mode
    }

    pub fn controls(&self) -> ControlVisibility {
        self.visibility.current()
    }

    pub fn has_interacted(&self) -> bool {
        self.guard.has_interacted()
    }

    pub fn is_locked(&self) -> bool {
        self.guard.lock().is_locked()
    }

    pub fn lock_release_at(&self) -> Option<Instant> {
        self.guard.lock().release_at()
    }

    pub fn is_wraparound(&self) -> bool {
        self.mounted
            .as_ref()
            .is_some_and(|mounted| mounted.track.is_wraparound())
    }

    pub fn is_transitioning(&self) -> bool {
        self.mounted
            .as_ref()
            .is_some_and(|mounted| mounted.position.is_transitioning())
    }

    pub fn auto_advance_state(&self) -> Option<AutoAdvanceState> {
        self.auto_advance.state().copied()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Source index of the item at the viewport's left edge.
    pub fn anchor_source_index(&self) -> Option<usize> {
        let mounted = self.mounted.as_ref()?;
        let stride = self.settings.effective_stride();
        let slot = (mounted.position.offset().max(0.0) / stride).floor();
        mounted.track.source_index(slot as usize)
    }

    /// Track slots intersecting the viewport plus overscan on each side.
    pub fn visible_slots(&self) -> Vec<VisibleSlot> {
        let Some(mounted) = self.mounted.as_ref() else {
            return Vec::new();
        };
        let stride = self.settings.effective_stride();
        let overscan = self.settings.overscan;
        let len = mounted.track.len();
        let offset = mounted.position.offset();

        let first = (offset.max(0.0) / stride).floor() as usize;
        let viewport_end = offset + self.viewport_width;
        let last = if self.viewport_width > 0.0 {
            ((viewport_end - 1e-3) / stride).floor() as usize
        } else {
            first
        };
        let start = first.saturating_sub(overscan).min(len);
        let end = last.saturating_add(1 + overscan).min(len);

        (start..end)
            .filter_map(|track_index| {
                mounted.track.source_index(track_index).map(|source_index| {
                    VisibleSlot {
                        track_index,
                        source_index,
                        x: track_index as f32 * stride - offset,
                    }
                })
            })
            .collect()
    }

    pub fn visible_items(&self) -> Vec<VisibleItem<'_, T>> {
        let Some(mounted) = self.mounted.as_ref() else {
            return Vec::new();
        };
        self.visible_slots()
            .into_iter()
            .filter_map(|slot| {
                mounted
                    .track
                    .get(slot.track_index)
                    .map(|item| VisibleItem { slot, item })
            })
            .collect()
    }

    pub fn snapshot(&self) -> CarouselSnapshot {
        CarouselSnapshot {
            offset: self.offset(),
            mode: self.mode,
            wraparound: self.is_wraparound(),
            has_interacted: self.has_interacted(),
            locked: self.is_locked(),
            controls: self.controls(),
            track_len: self.track().map_or(0, |track| track.len()),
            source_len: self.sequence.len(),
            visible: self.visible_slots(),
        }
    }
}

impl<T, H> fmt::Debug for Carousel<T, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Carousel")
            .field("mode", &self.mode)
            .field("sequence", &self.sequence)
            .field("viewport_width", &self.viewport_width)
            .field(
                "offset",
                &self.mounted.as_ref().map(|m| m.position.offset()),
            )
            .field("has_interacted", &self.guard.has_interacted())
            .field("locked", &self.guard.lock().is_locked())
            .field("pending_timers", &self.timers.len())
            .finish()
    }
}
