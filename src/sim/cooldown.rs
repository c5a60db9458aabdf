//! Countdown primitive used by abilities, attacks, spawners and status effects

use serde::{Deserialize, Serialize};

/// A frame-counted cooldown
///
/// `remaining` is unsigned, so it can never go negative; `tick` floors at zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Cooldown {
    pub remaining: u32,
    pub duration: u32,
}

impl Cooldown {
    /// A cooldown that starts ready
    pub fn ready_at(duration: u32) -> Self {
        Self {
            remaining: 0,
            duration,
        }
    }

    /// A cooldown that starts fully charged (not ready for `duration` ticks)
    pub fn running(duration: u32) -> Self {
        Self {
            remaining: duration,
            duration,
        }
    }

    /// Advance by one frame
    #[inline]
    pub fn tick(&mut self) {
        self.remaining = self.remaining.saturating_sub(1);
    }

    #[inline]
    pub fn ready(&self) -> bool {
        self.remaining == 0
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        !self.ready()
    }

    /// Fire if ready; returns false without side effects otherwise
    pub fn trigger(&mut self) -> bool {
        if !self.ready() {
            return false;
        }
        self.remaining = self.duration;
        true
    }

    /// Restart unconditionally (expiry timers: power mode, combo, status effects)
    pub fn start(&mut self) {
        self.remaining = self.duration;
    }

    /// Restart with a new duration
    pub fn start_for(&mut self, duration: u32) {
        self.duration = duration;
        self.remaining = duration;
    }

    /// Clear back to ready
    pub fn reset(&mut self) {
        self.remaining = 0;
    }

    /// Remaining share of the duration (1.0 = just triggered), for HUD bars
    pub fn fraction(&self) -> f32 {
        if self.duration == 0 {
            0.0
        } else {
            self.remaining as f32 / self.duration as f32
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trigger_only_when_ready() {
        let mut cd = Cooldown::ready_at(3);
        assert!(cd.ready());
        assert!(cd.trigger());
        assert_eq!(cd.remaining, 3);
        assert!(!cd.trigger());
        assert_eq!(cd.remaining, 3, "failed trigger must not touch state");
    }

    #[test]
    fn test_tick_floors_at_zero() {
        let mut cd = Cooldown::running(2);
        cd.tick();
        cd.tick();
        assert!(cd.ready());
        cd.tick();
        assert_eq!(cd.remaining, 0);
    }

    #[test]
    fn test_full_cycle() {
        let mut cd = Cooldown::ready_at(8);
        assert!(cd.trigger());
        for _ in 0..7 {
            cd.tick();
            assert!(!cd.ready());
        }
        cd.tick();
        assert!(cd.trigger());
    }

    #[test]
    fn test_zero_duration_is_always_ready() {
        let mut cd = Cooldown::ready_at(0);
        assert!(cd.trigger());
        assert!(cd.trigger());
        assert_eq!(cd.fraction(), 0.0);
    }

    #[test]
    fn test_start_and_reset() {
        let mut cd = Cooldown::ready_at(5);
        cd.start();
        assert!(cd.is_running());
        assert!((cd.fraction() - 1.0).abs() < f32::EPSILON);
        cd.reset();
        assert!(cd.ready());
        cd.start_for(9);
        assert_eq!(cd.remaining, 9);
        assert_eq!(cd.duration, 9);
    }
}
