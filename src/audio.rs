//! Audio interface
//!
//! The simulation only names sounds; synthesis lives in whatever implements
//! `AudioSink`. Events are fire-and-forget.

use serde::{Deserialize, Serialize};

use crate::settings::Settings;
use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundEvent {
    /// Left the ground
    Jump,
    /// One or more enemies defeated this tick
    EnemyDeath,
    /// Lost a life
    PlayerDeath,
    /// Sword, axe or morning star collected
    WeaponPickup,
    /// Horse, invincibility or cheat bonus
    PowerUp,
    /// Timed power-up ran out
    PowerDown,
    /// Bomb bonus cleared the level
    BombExplosion,
}

/// Background music modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MusicTrack {
    Title,
    Cutscene,
    Field,
    Cave,
    Castle,
    Boss,
}

/// Consumer of simulation audio events
pub trait AudioSink {
    /// Play a sound effect
    fn play(&mut self, sound: SoundEvent);

    /// Switch background music
    fn play_music(&mut self, track: MusicTrack);

    /// Silence background music
    fn stop_music(&mut self);

    /// Route a batch of simulation events
    fn dispatch(&mut self, events: &[GameEvent]) {
        for event in events {
            match *event {
                GameEvent::Sound(sound) => self.play(sound),
                GameEvent::Music(track) => self.play_music(track),
                GameEvent::StopMusic => self.stop_music(),
            }
        }
    }
}

/// Sink that writes events to the log (headless runs)
#[derive(Debug, Clone, Default)]
pub struct LogAudio {
    sfx_volume: f32,
    music_volume: f32,
    /// Track currently "playing"
    pub current_track: Option<MusicTrack>,
    /// Sounds played so far
    pub sounds_played: usize,
}

impl LogAudio {
    pub fn new(settings: &Settings) -> Self {
        Self {
            sfx_volume: settings.effective_sfx_volume(),
            music_volume: settings.effective_music_volume(),
            current_track: None,
            sounds_played: 0,
        }
    }
}

impl AudioSink for LogAudio {
    fn play(&mut self, sound: SoundEvent) {
        self.sounds_played += 1;
        if self.sfx_volume > 0.0 {
            log::debug!("sfx {:?} @ {:.2}", sound, self.sfx_volume);
        }
    }

    fn play_music(&mut self, track: MusicTrack) {
        self.current_track = Some(track);
        if self.music_volume > 0.0 {
            log::info!("music {:?} @ {:.2}", track, self.music_volume);
        }
    }

    fn stop_music(&mut self) {
        if let Some(track) = self.current_track.take() {
            log::info!("music {:?} stopped", track);
        }
    }
}
