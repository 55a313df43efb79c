//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Level content comes from the seeded LCG only
//! - Stable iteration order (spawn order, by entity ID)
//! - No rendering, audio output or platform dependencies

pub mod ai;
pub mod collision;
pub mod dialogue;
pub mod interaction;
pub mod level;
pub mod physics;
pub mod rng;
pub mod state;
pub mod tick;
pub mod tile;
pub mod timers;

pub use collision::{Aabb, Body};
pub use level::{LevelCache, generate_level, level_name, music_for_level};
pub use rng::SeededRng;
pub use state::{
    Enemy, EnemyKind, Facing, GameEvent, GamePhase, GameState, Hazard, HazardKind, Npc, NpcKind, Owner, Player,
    Projectile, ProjectileKind, Snapshot, Weapon,
};
pub use tick::{CheatKey, TickInput, advance};
pub use tile::{TileError, TileGrid, TileKind};
