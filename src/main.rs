//! Bozo the Elf - headless runner
//!
//! Plays levels with a scripted autopilot and logs audio events.
//! Usage: `bozo-elf [level] [ticks]` (1-based level, default 1 and 3600).
//! Settings are read from `bozo-elf.json` in the working directory if present.

use bozo_elf::audio::{AudioSink, LogAudio};
use bozo_elf::consts::{FRAME_MS, TILE_SIZE};
use bozo_elf::sim::tick::next_weapon;
use bozo_elf::sim::{GamePhase, Snapshot, TickInput, TileKind, Weapon};
use bozo_elf::{Session, Settings};

const SETTINGS_FILE: &str = "bozo-elf.json";
const DEFAULT_TICKS: u64 = 3600;

/// Run right, hop over walls and gaps, swing at whatever is ahead
fn autopilot(snapshot: &Snapshot<'_>, tick: u64) -> TickInput {
    let Some(player) = snapshot.player else {
        return TickInput::default();
    };
    let grid = snapshot.grid;
    let ahead = player.pos.x + player.size.x + TILE_SIZE / 2.0;
    let wall = grid.tile_at(ahead, player.pos.y) == TileKind::Ground;
    // Pits and spikes both read as "not ground"
    let gap = grid.tile_at(ahead, player.pos.y + player.size.y + 1.0) != TileKind::Ground;
    let enemy_near = snapshot
        .enemies
        .iter()
        .any(|e| (e.pos.x - player.pos.x).abs() < TILE_SIZE * 3.0 && (e.pos.y - player.pos.y).abs() < TILE_SIZE);

    TickInput {
        right: true,
        jump: wall || gap,
        attack: enemy_near,
        // Out of fireballs with something else in hand; tap, don't hold
        switch_weapon: tick % 2 == 0
            && player.current_weapon == Weapon::Fireball
            && player.fireball_ammo == 0
            && next_weapon(player).is_some(),
        ..Default::default()
    }
}

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let level = args
        .next()
        .map(|a| {
            a.parse::<usize>().unwrap_or_else(|_| {
                log::warn!("Bad level '{}', starting at 1", a);
                1
            })
        })
        .unwrap_or(1)
        .max(1);
    let ticks = args
        .next()
        .map(|a| {
            a.parse::<u64>().unwrap_or_else(|_| {
                log::warn!("Bad tick count '{}', using {}", a, DEFAULT_TICKS);
                DEFAULT_TICKS
            })
        })
        .unwrap_or(DEFAULT_TICKS);

    let settings = Settings::load_or_default(SETTINGS_FILE);
    log::info!("Bozo the Elf (headless) starting at level {} for {} ticks", level, ticks);

    let mut audio = LogAudio::new(&settings);
    let mut session = Session::new(settings);
    session.begin_cutscene();
    session.start_level(level - 1);

    let mut levels_cleared = 0;
    for tick in 0..ticks {
        match session.phase() {
            GamePhase::Playing => {
                let input = autopilot(&session.snapshot(), tick);
                session.advance(FRAME_MS, &input);
            }
            GamePhase::LevelComplete => {
                levels_cleared += 1;
                session.advance_level();
            }
            GamePhase::Died => session.retry_level(),
            GamePhase::EndingCutscene => session.finish_ending(),
            GamePhase::Lost | GamePhase::Won => break,
            GamePhase::StartScreen | GamePhase::Cutscene => break,
        }
        audio.dispatch(&session.drain_events());

        if session.phase() == GamePhase::Playing && session.state().player.is_none() {
            log::warn!("No player on level {}; stopping", session.level_index() + 1);
            break;
        }
    }

    let snapshot = session.snapshot();
    println!("Level:   {} ({})", session.level_index() + 1, session.level_name());
    println!("Status:  {:?}", snapshot.phase);
    println!("Cleared: {}", levels_cleared);
    if let Some(player) = snapshot.player {
        println!("Score:   {}", player.score);
        println!("Lives:   {}", player.lives);
        println!("Health:  {}/{}", player.health, player.max_health);
        println!("Weapon:  {:?} (fireballs: {})", player.current_weapon, player.fireball_ammo);
    }
    println!("Enemies: {}", snapshot.enemies.len());
    println!("Sounds:  {}", audio.sounds_played);
}
