//! Level lifecycle for one play session
//!
//! Owns the settings, the generated-level cache and the live world, and moves
//! between the start screen, cutscenes and levels.

use crate::audio::MusicTrack;
use crate::settings::Settings;
use crate::sim::level::{LevelCache, level_name, music_for_level};
use crate::sim::tick::{self, TickInput};
use crate::sim::{GameEvent, GamePhase, GameState, Snapshot};

/// A play session from title screen to ending
#[derive(Debug)]
pub struct Session {
    settings: Settings,
    levels: LevelCache,
    state: GameState,
}

impl Session {
    /// New session on the start screen
    pub fn new(settings: Settings) -> Self {
        let mut state = GameState::new(settings.seed);
        state.banter.enabled = settings.banter;
        state.emit(GameEvent::Music(MusicTrack::Title));
        Self {
            settings,
            levels: LevelCache::new(),
            state,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn level_index(&self) -> usize {
        self.state.level_index
    }

    /// Name of the current level
    pub fn level_name(&self) -> String {
        level_name(self.state.level_index)
    }

    /// Start screen to the intro cutscene
    pub fn begin_cutscene(&mut self) {
        if self.state.phase != GamePhase::StartScreen {
            log::warn!("Cutscene requested from {:?}", self.state.phase);
            return;
        }
        self.state.phase = GamePhase::Cutscene;
        self.state.emit(GameEvent::Music(MusicTrack::Cutscene));
    }

    /// Start a level with a fresh player
    pub fn start_level(&mut self, level_index: usize) {
        self.load(level_index, false);
    }

    /// Continue to the next level after completing one
    pub fn advance_level(&mut self) {
        if self.state.phase == GamePhase::LevelComplete {
            self.load(self.state.level_index.saturating_add(1), true);
        }
    }

    /// Replay the current level after losing a life
    pub fn retry_level(&mut self) {
        if self.state.phase == GamePhase::Died {
            self.load(self.state.level_index, true);
        }
    }

    /// New run from the first level after game over or victory
    pub fn restart(&mut self) {
        if matches!(self.state.phase, GamePhase::Lost | GamePhase::Won) {
            self.load(0, false);
        }
    }

    /// Ending cutscene finished
    pub fn finish_ending(&mut self) {
        if self.state.phase == GamePhase::EndingCutscene {
            self.state.phase = GamePhase::Won;
            self.state.emit(GameEvent::StopMusic);
            log::info!("Run won with {} points", self.state.player.as_ref().map_or(0, |p| p.score));
        }
    }

    fn load(&mut self, level_index: usize, carry: bool) {
        let previous = if carry { self.state.player.clone() } else { None };
        let grid = self.levels.get_or_generate(level_index);
        self.state.load_level(level_index, grid, previous.as_ref(), &self.settings.tuning);
        log::info!("Starting level {}: {}", level_index.saturating_add(1), level_name(level_index));
        self.state.emit(GameEvent::Music(music_for_level(level_index)));
    }

    /// Advance the world by one frame
    pub fn advance(&mut self, delta_ms: f32, input: &TickInput) {
        tick::advance(&mut self.state, input, delta_ms, &self.settings.tuning);
        if self.settings.reduced_motion {
            self.state.screen_flash = 0.0;
        }
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        self.state.snapshot()
    }

    /// Take audio events queued since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.state.drain_events()
    }
}
