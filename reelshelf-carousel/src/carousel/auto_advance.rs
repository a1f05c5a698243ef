//! Idle auto-advance scheduler

use std::str::FromStr;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use super::timers::{TimerHandle, TimerKind, TimerQueue};
use crate::infra::settings::AutoAdvanceSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvanceDirection {
    /// Increase the offset (strip drifts toward later items).
    #[default]
    Forward,
    Backward,
}

impl AdvanceDirection {
    pub const fn sign(self) -> f32 {
        match self {
            AdvanceDirection::Forward => 1.0,
            AdvanceDirection::Backward => -1.0,
        }
    }
}

impl FromStr for AdvanceDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "forward" => Ok(AdvanceDirection::Forward),
            "backward" => Ok(AdvanceDirection::Backward),
            other => Err(format!("unknown auto-advance direction '{other}'")),
        }
    }
}

/// Live state of an armed scheduler.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AutoAdvanceState {
    pub active: bool,
    pub tick_interval: Duration,
    pub step: f32,
}

#[derive(Debug)]
pub struct AutoAdvanceScheduler {
    settings: AutoAdvanceSettings,
    armed: Option<(AutoAdvanceState, TimerHandle)>,
}

impl AutoAdvanceScheduler {
    pub fn new(settings: AutoAdvanceSettings) -> Self {
        Self {
            settings,
            armed: None,
        }
    }

    pub fn should_arm(
        track_exists: bool,
        wraparound: bool,
        has_interacted: bool,
    ) -> bool {
        track_exists && wraparound && !has_interacted
    }

    pub fn state(&self) -> Option<&AutoAdvanceState> {
        self.armed.as_ref().map(|(state, _)| state)
    }

    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    /// Signed offset delta applied per tick.
    pub fn delta(&self) -> f32 {
        self.settings.direction.sign() * self.settings.step
    }

    /// Arm or disarm to match `eligible`. Re-arming restarts the cadence.
    pub fn reconcile(
        &mut self,
        eligible: bool,
        timers: &mut TimerQueue,
        now: Instant,
    ) {
        self.disarm(timers);
        if eligible {
            let interval = self.settings.interval();
            let timer = timers.schedule_repeating(
                TimerKind::AutoAdvance,
                now + interval,
                interval,
            );
            let state = AutoAdvanceState {
                active: true,
                tick_interval: interval,
                step: self.settings.step,
            };
            self.armed = Some((state, timer));
            log::debug!(
                "Auto-advance armed: every {}ms by {}",
                interval.as_millis(),
                self.delta()
            );
        }
    }

    pub fn disarm(&mut self, timers: &mut TimerQueue) {
        if let Some((_, timer)) = self.armed.take() {
            timers.cancel(timer);
            log::debug!("Auto-advance disarmed");
        }
    }

    /// Offset delta for a fired timer, if it belongs to this scheduler.
    pub fn on_tick(&self, handle: TimerHandle) -> Option<f32> {
        match self.armed {
            Some((_, timer)) if timer == handle => Some(self.delta()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arming_condition() {
        assert!(AutoAdvanceScheduler::should_arm(true, true, false));
        assert!(!AutoAdvanceScheduler::should_arm(false, true, false));
        assert!(!AutoAdvanceScheduler::should_arm(true, false, false));
        assert!(!AutoAdvanceScheduler::should_arm(true, true, true));
    }

    #[test]
    fn reconcile_arms_and_disarms_timer() {
        let t0 = Instant::now();
        let mut timers = TimerQueue::new();
        let mut scheduler =
            AutoAdvanceScheduler::new(AutoAdvanceSettings::default());

        scheduler.reconcile(true, &mut timers, t0);
        let state = *scheduler.state().unwrap();
        assert!(state.active);
        assert_eq!(state.tick_interval, Duration::from_millis(20));
        let fired = timers.pop_due(t0 + Duration::from_millis(20)).unwrap();
        assert_eq!(scheduler.on_tick(fired.handle), Some(1.0));

        scheduler.reconcile(false, &mut timers, t0);
        assert!(scheduler.state().is_none());
        assert!(timers.is_empty());
        assert_eq!(scheduler.on_tick(fired.handle), None);
    }

    #[test]
    fn backward_direction_negates_step() {
        let scheduler = AutoAdvanceScheduler::new(AutoAdvanceSettings {
            step: 2.5,
            direction: AdvanceDirection::Backward,
            ..AutoAdvanceSettings::default()
        });
        assert_eq!(scheduler.delta(), -2.5);
        assert_eq!(
            "Backward".parse::<AdvanceDirection>(),
            Ok(AdvanceDirection::Backward)
        );
    }
}
