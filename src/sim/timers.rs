//! Delayed actions that fire at tick boundaries
//!
//! Attack swings and player banter run on wall-clock delays rather than the
//! tick count. They are only advanced at the start of a tick, so nothing they
//! trigger lands in the middle of one, and a level load clears them all.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerKind {
    /// End of a melee swing
    AttackSwing,
    /// Hide the banter line
    BanterHide,
    /// Hide the damage line, then schedule the next random line
    BanterHideThenSchedule,
    /// Show the next random banter line
    BanterNext,
}

impl TimerKind {
    pub fn is_banter(self) -> bool {
        !matches!(self, TimerKind::AttackSwing)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Timer {
    kind: TimerKind,
    remaining: f32,
}

/// Pending timers, at most one per kind
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Timers {
    pending: Vec<Timer>,
}

impl Timers {
    /// Start (or restart) a timer
    pub fn schedule(&mut self, kind: TimerKind, delay_ms: f32) {
        self.cancel(kind);
        self.pending.push(Timer { kind, remaining: delay_ms });
    }

    pub fn cancel(&mut self, kind: TimerKind) {
        self.pending.retain(|t| t.kind != kind);
    }

    /// Drop every banter timer
    pub fn cancel_banter(&mut self) {
        self.pending.retain(|t| !t.kind.is_banter());
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn is_pending(&self, kind: TimerKind) -> bool {
        self.pending.iter().any(|t| t.kind == kind)
    }

    pub fn any_banter_pending(&self) -> bool {
        self.pending.iter().any(|t| t.kind.is_banter())
    }

    /// Advance by `dt` ms and return the timers that fired, earliest first
    pub fn advance(&mut self, dt: f32) -> Vec<TimerKind> {
        let mut fired: Vec<Timer> = Vec::new();
        self.pending.retain_mut(|t| {
            t.remaining -= dt;
            if t.remaining <= 0.0 {
                fired.push(t.clone());
                false
            } else {
                true
            }
        });
        fired.sort_by(|a, b| a.remaining.total_cmp(&b.remaining));
        fired.into_iter().map(|t| t.kind).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_once_after_delay() {
        let mut timers = Timers::default();
        timers.schedule(TimerKind::AttackSwing, 150.0);
        assert!(timers.advance(100.0).is_empty());
        assert_eq!(timers.advance(50.0), vec![TimerKind::AttackSwing]);
        assert!(timers.advance(100.0).is_empty());
        assert!(!timers.is_pending(TimerKind::AttackSwing));
    }

    #[test]
    fn test_reschedule_replaces() {
        let mut timers = Timers::default();
        timers.schedule(TimerKind::BanterNext, 100.0);
        timers.schedule(TimerKind::BanterNext, 500.0);
        assert!(timers.advance(200.0).is_empty());
        assert!(timers.is_pending(TimerKind::BanterNext));
    }

    #[test]
    fn test_fired_in_deadline_order() {
        let mut timers = Timers::default();
        timers.schedule(TimerKind::BanterHide, 20.0);
        timers.schedule(TimerKind::AttackSwing, 10.0);
        assert_eq!(timers.advance(50.0), vec![TimerKind::AttackSwing, TimerKind::BanterHide]);
    }

    #[test]
    fn test_cancel_banter_keeps_swing() {
        let mut timers = Timers::default();
        timers.schedule(TimerKind::AttackSwing, 10.0);
        timers.schedule(TimerKind::BanterNext, 10.0);
        timers.schedule(TimerKind::BanterHide, 10.0);
        timers.cancel_banter();
        assert!(!timers.any_banter_pending());
        assert!(timers.is_pending(TimerKind::AttackSwing));
    }
}
