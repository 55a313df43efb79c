//! NPC conversations and player banter

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::state::{GameState, Npc};
use super::timers::TimerKind;

/// Idle one-liners
pub const RANDOM_PHRASES: [&str; 5] = [
    "For Elfioria!",
    "Let's do this!",
    "Adventure awaits!",
    "Where is she?",
    "Piece of cake!",
];

/// Lines for taking a hit
pub const DAMAGE_PHRASES: [&str; 5] = ["Ouch!", "That hurt!", "Not good...", "Need health!", "Argh!"];

/// How long an idle line stays up (ms)
pub const BANTER_SHOW_MS: f32 = 3000.0;
/// How long a damage line stays up (ms)
pub const DAMAGE_SHOW_MS: f32 = 2000.0;

/// Seeded phrase picker for the player's one-liners
#[derive(Debug, Clone)]
pub struct Banter {
    rng: Pcg32,
    /// Muted banter never schedules lines
    pub enabled: bool,
}

impl Default for Banter {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Banter {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            enabled: true,
        }
    }

    pub fn random_phrase(&mut self) -> &'static str {
        RANDOM_PHRASES[self.rng.random_range(0..RANDOM_PHRASES.len())]
    }

    pub fn damage_phrase(&mut self) -> &'static str {
        DAMAGE_PHRASES[self.rng.random_range(0..DAMAGE_PHRASES.len())]
    }

    /// Delay before the next idle line, 15 to 30 seconds
    pub fn next_delay(&mut self) -> f32 {
        self.rng.random_range(15_000.0..30_000.0)
    }
}

/// Nearest NPC whose centre is within `range` of `center`
pub fn nearest_npc(npcs: &[Npc], center: Vec2, range: f32) -> Option<&Npc> {
    npcs.iter()
        .map(|npc| (npc, npc.center().distance(center)))
        .filter(|&(_, d)| d < range)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(npc, _)| npc)
}

fn schedule_next(state: &mut GameState) {
    let delay = state.banter.next_delay();
    state.timers.schedule(TimerKind::BanterNext, delay);
}

/// React to a banter timer that fired this tick
pub fn on_timer(state: &mut GameState, kind: TimerKind) {
    match kind {
        TimerKind::AttackSwing => {}
        TimerKind::BanterHide => state.player_dialogue = None,
        TimerKind::BanterHideThenSchedule => {
            state.player_dialogue = None;
            if state.banter.enabled {
                schedule_next(state);
            }
        }
        TimerKind::BanterNext => {
            if state.banter.enabled {
                let line = state.banter.random_phrase();
                state.player_dialogue = Some(line.to_string());
                state.timers.schedule(TimerKind::BanterHide, BANTER_SHOW_MS);
                schedule_next(state);
            }
        }
    }
}

/// Per-tick banter bookkeeping after health has been settled
pub fn update_banter(state: &mut GameState, health_before: i32, health_after: i32) {
    if !state.banter.enabled {
        return;
    }
    if health_after < health_before {
        state.timers.cancel_banter();
        let line = state.banter.damage_phrase();
        state.player_dialogue = Some(line.to_string());
        state.timers.schedule(TimerKind::BanterHideThenSchedule, DAMAGE_SHOW_MS);
    } else if !state.timers.any_banter_pending() {
        schedule_next(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{ENTITY_SIZE, NpcKind};

    fn npc(id: u32, x: f32) -> Npc {
        Npc {
            id,
            kind: NpcKind::Standard,
            pos: Vec2::new(x, 0.0),
            size: ENTITY_SIZE,
            message: format!("npc {id}"),
        }
    }

    #[test]
    fn test_same_seed_same_lines() {
        let mut a = Banter::new(42);
        let mut b = Banter::new(42);
        for _ in 0..20 {
            assert_eq!(a.random_phrase(), b.random_phrase());
            assert_eq!(a.next_delay(), b.next_delay());
        }
    }

    #[test]
    fn test_delay_range() {
        let mut banter = Banter::new(7);
        for _ in 0..200 {
            let d = banter.next_delay();
            assert!((15_000.0..30_000.0).contains(&d));
        }
    }

    #[test]
    fn test_nearest_npc_in_range() {
        let npcs = vec![npc(1, 100.0), npc(2, 30.0), npc(3, 10.0)];
        let center = ENTITY_SIZE / 2.0;
        assert_eq!(nearest_npc(&npcs, center, 40.0).map(|n| n.id), Some(3));
        assert!(nearest_npc(&npcs, Vec2::new(500.0, 0.0), 40.0).is_none());
    }

    #[test]
    fn test_damage_line_then_reschedule() {
        let mut state = GameState::new(3);
        update_banter(&mut state, 3, 2);
        let line = state.player_dialogue.clone().expect("damage line");
        assert!(DAMAGE_PHRASES.contains(&line.as_str()));
        assert!(state.timers.is_pending(TimerKind::BanterHideThenSchedule));
        assert!(!state.timers.is_pending(TimerKind::BanterNext));

        for kind in state.timers.advance(DAMAGE_SHOW_MS) {
            on_timer(&mut state, kind);
        }
        assert!(state.player_dialogue.is_none());
        assert!(state.timers.is_pending(TimerKind::BanterNext));
    }

    #[test]
    fn test_idle_line_shows_then_hides() {
        let mut state = GameState::new(3);
        update_banter(&mut state, 3, 3);
        assert!(state.timers.is_pending(TimerKind::BanterNext));

        for kind in state.timers.advance(30_000.0) {
            on_timer(&mut state, kind);
        }
        let line = state.player_dialogue.clone().expect("idle line");
        assert!(RANDOM_PHRASES.contains(&line.as_str()));
        assert!(state.timers.is_pending(TimerKind::BanterNext));

        for kind in state.timers.advance(BANTER_SHOW_MS) {
            on_timer(&mut state, kind);
        }
        assert!(state.player_dialogue.is_none());
    }

    #[test]
    fn test_muted_banter_stays_quiet() {
        let mut state = GameState::new(3);
        state.banter.enabled = false;
        update_banter(&mut state, 3, 1);
        assert!(state.player_dialogue.is_none());
        assert!(!state.timers.any_banter_pending());
    }
}
