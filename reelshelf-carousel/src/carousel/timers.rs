//! Owned, cancellable scheduled tasks for one carousel instance.
//!
//! Nothing here sleeps. The owner asks for [`TimerQueue::next_deadline`],
//! waits however its event loop waits, then drains due entries with
//! [`TimerQueue::pop_due`].

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    AutoAdvance,
    LockRelease,
    Frame,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FiredTimer {
    pub handle: TimerHandle,
    pub kind: TimerKind,
    pub deadline: Instant,
}

#[derive(Debug, Clone)]
struct Entry {
    kind: TimerKind,
    deadline: Instant,
    period: Option<Duration>,
}

/// Deadline-ordered timers. Cancelled or rescheduled entries leave stale
/// heap keys behind; they are skipped when they reach the top, and the top
/// is always a live entry.
#[derive(Debug, Default)]
pub struct TimerQueue {
    entries: HashMap<TimerHandle, Entry>,
    heap: BinaryHeap<Reverse<(Instant, TimerHandle)>>,
    next_id: u64,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule_once(
        &mut self,
        kind: TimerKind,
        deadline: Instant,
    ) -> TimerHandle {
        self.insert(kind, deadline, None)
    }

    /// Repeating timer. Late firings skip missed periods instead of
    /// replaying them.
    pub fn schedule_repeating(
        &mut self,
        kind: TimerKind,
        first: Instant,
        period: Duration,
    ) -> TimerHandle {
        self.insert(kind, first, Some(period.max(Duration::from_millis(1))))
    }

    fn insert(
        &mut self,
        kind: TimerKind,
        deadline: Instant,
        period: Option<Duration>,
    ) -> TimerHandle {
        self.next_id += 1;
        let handle = TimerHandle(self.next_id);
        self.entries.insert(
            handle,
            Entry {
                kind,
                deadline,
                period,
            },
        );
        self.heap.push(Reverse((deadline, handle)));
        handle
    }

    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let removed = self.entries.remove(&handle).is_some();
        self.prune();
        removed
    }

    pub fn cancel_all(&mut self) {
        self.entries.clear();
        self.heap.clear();
    }

    pub fn is_scheduled(&self, handle: TimerHandle) -> bool {
        self.entries.contains_key(&handle)
    }

    pub fn deadline_of(&self, handle: TimerHandle) -> Option<Instant> {
        self.entries.get(&handle).map(|entry| entry.deadline)
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.heap.peek().map(|Reverse((deadline, _))| *deadline)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Earliest entry due at `now`; ties go to the lower handle, i.e. the
    /// timer created first. One-shot entries are removed, repeating ones
    /// rescheduled past `now`.
    pub fn pop_due(&mut self, now: Instant) -> Option<FiredTimer> {
        let Reverse((deadline, handle)) = *self.heap.peek()?;
        if deadline > now {
            return None;
        }
        self.heap.pop();

        let entry = self.entries.get_mut(&handle)?;
        let fired = FiredTimer {
            handle,
            kind: entry.kind,
            deadline,
        };
        match entry.period {
            Some(period) => {
                let next = deadline + period;
                entry.deadline = if next > now { next } else { now + period };
                self.heap.push(Reverse((entry.deadline, handle)));
            }
            None => {
                self.entries.remove(&handle);
            }
        }
        self.prune();
        Some(fired)
    }

    fn is_live(&self, deadline: Instant, handle: TimerHandle) -> bool {
        self.entries
            .get(&handle)
            .is_some_and(|entry| entry.deadline == deadline)
    }

    fn prune(&mut self) {
        while let Some(&Reverse((deadline, handle))) = self.heap.peek() {
            if self.is_live(deadline, handle) {
                break;
            }
            self.heap.pop();
        }
    }
}
