//! Bozo the Elf - a tile platformer simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, AI, combat, level generation)
//! - `session`: Level lifecycle and the per-session level cache
//! - `audio`: Sound/music events emitted by the simulation
//! - `tuning`: Data-driven game balance
//! - `settings`: User settings and config loading

pub mod audio;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use session::Session;
pub use settings::{ConfigError, Settings};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Edge length of a tile in pixels
    pub const TILE_SIZE: f32 = 16.0;
    /// Level width in tiles
    pub const LEVEL_WIDTH: usize = 100;
    /// Level height in tiles
    pub const LEVEL_HEIGHT: usize = 15;

    /// World dimensions in pixels
    pub const GAME_WIDTH: f32 = LEVEL_WIDTH as f32 * TILE_SIZE;
    pub const GAME_HEIGHT: f32 = LEVEL_HEIGHT as f32 * TILE_SIZE;
    /// Visible area width (26 tiles)
    pub const SCREEN_WIDTH: f32 = 26.0 * TILE_SIZE;

    /// Nominal frame time in milliseconds (60 Hz)
    pub const FRAME_MS: f32 = 1000.0 / 60.0;

    /// Number of levels in a run; the last one holds the princess
    pub const TOTAL_LEVELS: usize = 50;

    /// Projectiles survive this far outside the world before being culled
    pub const PROJECTILE_CULL_MARGIN: f32 = 100.0;
}

/// Horizontal camera offset that keeps `x` centered, clamped to the world
#[inline]
pub fn camera_x_for(x: f32) -> f32 {
    use consts::{GAME_WIDTH, SCREEN_WIDTH};
    (x - SCREEN_WIDTH / 2.0).clamp(0.0, GAME_WIDTH - SCREEN_WIDTH)
}
