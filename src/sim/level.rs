//! Procedural level generation
//!
//! A level index is both the RNG seed and the difficulty driver, so the same
//! index always yields the same layout. Generation is a walker that carves a
//! ground path left to right, followed by a decoration pass that drops
//! enemies, spikes, items and floating platforms on the surfaces it made.

use std::collections::HashMap;

use super::rng::SeededRng;
use super::tile::{TileGrid, TileKind};
use crate::audio::MusicTrack;
use crate::consts::{LEVEL_HEIGHT, LEVEL_WIDTH, TOTAL_LEVELS};

/// Levels with a quest-giver NPC next to the goal
const NPC_LEVELS: [usize; 10] = [0, 4, 9, 14, 19, 24, 29, 34, 39, 44];

/// Row the walker starts on and never sinks below
const BASELINE_ROW: usize = LEVEL_HEIGHT - 3;
/// Highest row the walker may climb to
const CEILING_ROW: i32 = 5;
/// Row of solid ground in the out-of-range fallback level
const FALLBACK_FLOOR_ROW: usize = 13;

const CAVE_KEYWORDS: [&str; 13] = [
    "Cavern", "Mines", "Abyss", "Chasm", "Depths", "Gulch", "Labyrinth", "Trench", "Sanctum", "Vein", "Core",
    "Heart", "Sunless",
];
const CASTLE_KEYWORDS: [&str; 12] = [
    "Castle", "Citadel", "Ramparts", "Keep", "Tower", "Armory", "Halls", "Monastery", "Vault", "Ruins", "Palace",
    "Spire",
];

const LEVEL_NAMES: [&str; TOTAL_LEVELS] = [
    "Elfioria Meadows",
    "Whispering Woods",
    "Mossy Hollow",
    "Goblin Gulch",
    "Sunpetal Fields",
    "Crystal Cavern",
    "Old Mill Road",
    "Misty Marsh",
    "Copper Mines",
    "Bramble Ramparts",
    "Thornwood Keep",
    "Windy Bluffs",
    "Echoing Chasm",
    "Willow Creek",
    "Forgotten Ruins",
    "Amber Plains",
    "Deepstone Depths",
    "Foxglove Valley",
    "Stormwatch Tower",
    "Silverleaf Grove",
    "Glimmering Abyss",
    "Hollow Hills",
    "Ironclad Armory",
    "Twilight Orchard",
    "Serpent Labyrinth",
    "Frostfall Peaks",
    "Moonlit Monastery",
    "Bog of Lanterns",
    "Sapphire Trench",
    "Emberfield",
    "Shadow Citadel",
    "Howling Steppes",
    "Gilded Vault",
    "Ashen Wastes",
    "Molten Vein",
    "Ravenwood",
    "Halls of Echoes",
    "Crimson Canyon",
    "Sunless Sea",
    "Obsidian Spire",
    "Withered Heath",
    "Dragon's Heart",
    "Stormcrown Palace",
    "Bleak Moor",
    "Cursed Sanctum",
    "Lightning Ridge",
    "Core of the Mountain",
    "Sorcerer's Ramparts",
    "Gate of Night",
    "The Sorcerer's Castle",
];

/// Probabilities derived from difficulty (0 at level 0, 1 at level 50)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Difficulty {
    pub scalar: f64,
    pub pit_chance: f64,
    pub max_pit_width: i32,
    pub enemy_chance: f64,
    pub trap_chance: f64,
    /// Inverse: early levels get more items
    pub item_chance: f64,
    pub platform_chance: f64,
}

impl Difficulty {
    pub fn for_level(level_index: usize) -> Self {
        let d = (level_index as f64 / TOTAL_LEVELS as f64).clamp(0.0, 1.0);
        Self {
            scalar: d,
            pit_chance: 0.1 + d * 0.15,
            max_pit_width: 2 + (d * 3.0).floor() as i32,
            enemy_chance: 0.1 + d * 0.2,
            trap_chance: 0.05 + d * 0.1,
            item_chance: 0.05 + (1.0 - d) * 0.1,
            platform_chance: 0.01 + d * 0.03,
        }
    }

    /// Enemy marker for a roll in [0, 1); harder kinds unlock as difficulty rises
    fn enemy_marker(&self, roll: f64) -> TileKind {
        let d = self.scalar;
        if d > 0.8 && roll > 0.85 {
            TileKind::GhostStart
        } else if d > 0.6 && roll > 0.8 {
            TileKind::LavaSlimeStart
        } else if d > 0.5 && roll > 0.7 {
            TileKind::ShooterStart
        } else if d > 0.3 && roll > 0.6 {
            TileKind::SpikySlimeStart
        } else if roll > 0.4 {
            TileKind::BatStart
        } else {
            TileKind::EnemyStart
        }
    }
}

/// Build the tile grid for a level
pub fn generate_level(level_index: usize) -> TileGrid {
    let mut rng = SeededRng::new(level_index as u64);
    let params = Difficulty::for_level(level_index);
    let (w, h) = (LEVEL_WIDTH, LEVEL_HEIGHT);
    let mut level = TileGrid::new(w, h);

    let mut current_y = BASELINE_ROW;
    let mut current_x = 1usize;

    level.set(current_x, current_y - 1, TileKind::PlayerStart);

    // Carve the main path
    while current_x < w - 10 {
        fill_column(&mut level, current_x, current_y, false);

        let next_step = rng.next_int(1, 10);
        let pit = rng.chance(params.pit_chance);
        if pit && current_x < w - 15 {
            current_x += rng.next_int(2, params.max_pit_width) as usize;
        } else {
            if next_step <= 2 {
                let up = rng.next_int(1, 2);
                current_y = (current_y as i32 - up).max(CEILING_ROW) as usize;
            } else if next_step <= 4 {
                let down = rng.next_int(1, 2) as usize;
                current_y = (current_y + down).min(BASELINE_ROW);
            }
            current_x += 1;
        }
    }

    // End platform
    for x in current_x..w - 2 {
        fill_column(&mut level, x, current_y, true);
    }

    let goal_x = w - 5;
    let goal_row = current_y - 1;
    if level_index == TOTAL_LEVELS - 1 {
        level.set(goal_x, goal_row, TileKind::Princess);
    } else {
        level.set(goal_x, goal_row, TileKind::Goal);
        if NPC_LEVELS.contains(&level_index) {
            level.set(goal_x - 2, goal_row, TileKind::Npc);
        }
    }

    decorate(&mut level, &mut rng, &params);

    // Weapons always show up on the same early levels
    match level_index {
        1 => level.set(10, h - 4, TileKind::Sword),
        3 => level.set(15, h - 6, TileKind::Axe),
        4 => level.set(20, h - 5, TileKind::MorningStar),
        _ => {}
    }

    log::debug!(
        "Generated level {} (difficulty {:.2}, {} ground tiles)",
        level_index.saturating_add(1),
        params.scalar,
        level.count(TileKind::Ground)
    );
    level
}

/// Ground from `top` down to the floor; `overwrite` also replaces markers
fn fill_column(level: &mut TileGrid, x: usize, top: usize, overwrite: bool) {
    for y in top..level.height() {
        if overwrite || level.get(x as i32, y as i32) == TileKind::Empty {
            level.set(x, y, TileKind::Ground);
        }
    }
}

/// Second pass: enemies, traps, items and floating platforms
fn decorate(level: &mut TileGrid, rng: &mut SeededRng, params: &Difficulty) {
    let (w, h) = (level.width(), level.height());
    let mut placed_health_pack = false;
    let mut placed_fireball = false;

    for x in 1..w - 1 {
        for y in 1..h - 2 {
            let (xi, yi) = (x as i32, y as i32);
            let surface = level.get(xi, yi) == TileKind::Ground && level.get(xi, yi - 1) == TileKind::Empty;
            if surface {
                if rng.chance(params.enemy_chance) {
                    let roll = rng.next();
                    level.set(x, y - 1, params.enemy_marker(roll));
                } else if rng.chance(params.trap_chance) {
                    level.set(x, y, TileKind::Spike);
                } else if rng.chance(params.item_chance) {
                    let roll = rng.next();
                    if roll > 0.5 && !placed_health_pack {
                        level.set(x, y - 1, TileKind::HealthPack);
                        placed_health_pack = true;
                    } else if !placed_fireball {
                        level.set(x, y - 1, TileKind::Fireball);
                        placed_fireball = true;
                    }
                }
            }

            let open_air = level.get(xi, yi) == TileKind::Empty && level.get(xi, yi - 1) == TileKind::Empty;
            if open_air && rng.chance(params.platform_chance) {
                let length = rng.next_int(3, 6) as usize;
                for i in 0..length {
                    level.set(x + i, y, TileKind::Ground);
                }
            }
        }
    }
}

/// Flat stand-in for indices past the last level; it has no player start
pub fn fallback_level() -> TileGrid {
    let mut level = TileGrid::new(LEVEL_WIDTH, LEVEL_HEIGHT);
    for x in 0..LEVEL_WIDTH {
        level.set(x, FALLBACK_FLOOR_ROW, TileKind::Ground);
    }
    level
}

/// Display name for a level
pub fn level_name(level_index: usize) -> String {
    LEVEL_NAMES
        .get(level_index)
        .map(|name| name.to_string())
        .unwrap_or_else(|| format!("The Lost Realm {}", level_index.saturating_add(1)))
}

/// Background music for a level, picked from its name
pub fn music_for_level(level_index: usize) -> MusicTrack {
    if level_index == TOTAL_LEVELS - 1 {
        return MusicTrack::Boss;
    }
    let name = level_name(level_index);
    if name_matches(&name, &CAVE_KEYWORDS) {
        MusicTrack::Cave
    } else if name_matches(&name, &CASTLE_KEYWORDS) {
        MusicTrack::Castle
    } else {
        MusicTrack::Field
    }
}

fn name_matches(name: &str, keywords: &[&str]) -> bool {
    let lower = name.to_lowercase();
    keywords.iter().any(|kw| lower.contains(&kw.to_lowercase()))
}

/// Generated levels for a session, keyed by index.
///
/// Entries are written once and never invalidated. Every out-of-range index
/// shares one fallback grid.
#[derive(Debug, Default)]
pub struct LevelCache {
    levels: HashMap<usize, TileGrid>,
    fallback: Option<TileGrid>,
}

impl LevelCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached grid for `level_index`, generating it on first use
    pub fn get_or_generate(&mut self, level_index: usize) -> &TileGrid {
        if level_index >= TOTAL_LEVELS {
            log::warn!("Level index {} out of range, using fallback level", level_index);
            return self.fallback.get_or_insert_with(fallback_level);
        }
        self.levels
            .entry(level_index)
            .or_insert_with(|| generate_level(level_index))
    }

    pub fn contains(&self, level_index: usize) -> bool {
        self.levels.contains_key(&level_index)
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}
