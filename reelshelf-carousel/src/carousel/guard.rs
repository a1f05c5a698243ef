//! Interaction guard: the transition lock and the interaction latch.

use std::time::{Duration, Instant};

use super::timers::{TimerHandle, TimerKind, TimerQueue};

/// One-way flag tripped by the first manual interaction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InteractionLatch {
    interacted: bool,
}

impl InteractionLatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_interacted(&self) -> bool {
        self.interacted
    }

    /// Returns true only for the call that flipped the latch.
    pub fn trip(&mut self) -> bool {
        !std::mem::replace(&mut self.interacted, true)
    }
}

/// Guard against overlapping page transitions. Released by its own timer,
/// never by animation completion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TransitionLock {
    #[default]
    Unlocked,
    Locked {
        release_at: Instant,
        timer: TimerHandle,
    },
}

impl TransitionLock {
    pub fn is_locked(&self) -> bool {
        matches!(self, TransitionLock::Locked { .. })
    }

    pub fn release_at(&self) -> Option<Instant> {
        match self {
            TransitionLock::Locked { release_at, .. } => Some(*release_at),
            TransitionLock::Unlocked => None,
        }
    }

    /// Take the lock for `hold`. Returns false when it is already held.
    pub fn acquire(
        &mut self,
        timers: &mut TimerQueue,
        now: Instant,
        hold: Duration,
    ) -> bool {
        if self.is_locked() {
            return false;
        }
        let release_at = now + hold;
        let timer = timers.schedule_once(TimerKind::LockRelease, release_at);
        *self = TransitionLock::Locked { release_at, timer };
        true
    }

    /// Called when a lock-release timer fires; stale handles are ignored.
    pub fn on_release_timer(&mut self, handle: TimerHandle) -> bool {
        match *self {
            TransitionLock::Locked { timer, .. } if timer == handle => {
                *self = TransitionLock::Unlocked;
                true
            }
            _ => false,
        }
    }

    /// Drop the lock and cancel its pending release.
    pub fn clear(&mut self, timers: &mut TimerQueue) {
        if let TransitionLock::Locked { timer, .. } = *self {
            timers.cancel(timer);
        }
        *self = TransitionLock::Unlocked;
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct InteractionGuard {
    latch: InteractionLatch,
    lock: TransitionLock,
}

impl InteractionGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn latch(&self) -> &InteractionLatch {
        &self.latch
    }

    pub fn lock(&self) -> &TransitionLock {
        &self.lock
    }

    pub fn lock_mut(&mut self) -> &mut TransitionLock {
        &mut self.lock
    }

    pub fn has_interacted(&self) -> bool {
        self.latch.has_interacted()
    }

    /// Record a manual interaction; true the first time.
    pub fn note_interaction(&mut self) -> bool {
        self.latch.trip()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latch_is_one_way() {
        let mut latch = InteractionLatch::new();
        assert!(!latch.has_interacted());
        assert!(latch.trip());
        assert!(!latch.trip());
        assert!(latch.has_interacted());
    }

    #[test]
    fn lock_rejects_reentry_until_released() {
        let t0 = Instant::now();
        let hold = Duration::from_millis(300);
        let mut timers = TimerQueue::new();
        let mut lock = TransitionLock::default();

        assert!(lock.acquire(&mut timers, t0, hold));
        assert!(!lock.acquire(&mut timers, t0 + Duration::from_millis(100), hold));
        assert_eq!(lock.release_at(), Some(t0 + hold));

        let fired = timers.pop_due(t0 + hold).unwrap();
        assert_eq!(fired.kind, TimerKind::LockRelease);
        assert!(lock.on_release_timer(fired.handle));
        assert!(!lock.is_locked());
        assert!(lock.acquire(&mut timers, t0 + hold, hold));
    }

    #[test]
    fn clear_cancels_pending_release() {
        let t0 = Instant::now();
        let mut timers = TimerQueue::new();
        let mut lock = TransitionLock::default();
        lock.acquire(&mut timers, t0, Duration::from_millis(300));
        lock.clear(&mut timers);
        assert!(!lock.is_locked());
        assert!(timers.is_empty());
    }
}
