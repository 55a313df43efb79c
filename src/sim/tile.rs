//! Tile kinds and the level grid
//!
//! Ordinals are wire-stable: front ends and saved level dumps index by them.

use serde::{Deserialize, Serialize};

use super::state::EnemyKind;
use crate::consts::TILE_SIZE;

/// Every kind of cell a level can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum TileKind {
    #[default]
    Empty = 0,
    Ground = 1,
    PlayerStart = 2,
    /// Slime spawn
    EnemyStart = 3,
    Goal = 4,
    Sword = 5,
    Fireball = 6,
    BatStart = 7,
    SpikySlimeStart = 8,
    Spike = 9,
    Axe = 10,
    MorningStar = 11,
    HealthPack = 12,
    ShooterStart = 13,
    GhostStart = 14,
    LavaSlimeStart = 15,
    Npc = 16,
    Princess = 17,
}

/// Tile decoding errors
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TileError {
    #[error("unknown tile ordinal {0}")]
    UnknownTile(u8),
    #[error("grid has {actual} cells, expected {expected}")]
    BadDimensions { expected: usize, actual: usize },
}

impl TryFrom<u8> for TileKind {
    type Error = TileError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        use TileKind::*;
        Ok(match value {
            0 => Empty,
            1 => Ground,
            2 => PlayerStart,
            3 => EnemyStart,
            4 => Goal,
            5 => Sword,
            6 => Fireball,
            7 => BatStart,
            8 => SpikySlimeStart,
            9 => Spike,
            10 => Axe,
            11 => MorningStar,
            12 => HealthPack,
            13 => ShooterStart,
            14 => GhostStart,
            15 => LavaSlimeStart,
            16 => Npc,
            17 => Princess,
            other => return Err(TileError::UnknownTile(other)),
        })
    }
}

impl TileKind {
    /// Tiles the player picks up by walking over them
    pub fn is_collectible(self) -> bool {
        matches!(
            self,
            TileKind::Sword
                | TileKind::Axe
                | TileKind::MorningStar
                | TileKind::Fireball
                | TileKind::HealthPack
                | TileKind::Goal
        )
    }

    /// The enemy spawned by this marker, if any
    pub fn enemy_spawn(self) -> Option<EnemyKind> {
        match self {
            TileKind::EnemyStart => Some(EnemyKind::Slime),
            TileKind::BatStart => Some(EnemyKind::Bat),
            TileKind::SpikySlimeStart => Some(EnemyKind::SpikySlime),
            TileKind::ShooterStart => Some(EnemyKind::Shooter),
            TileKind::GhostStart => Some(EnemyKind::Ghost),
            TileKind::LavaSlimeStart => Some(EnemyKind::LavaSlime),
            _ => None,
        }
    }
}

/// Fixed-size grid of tiles, row-major
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileGrid {
    width: usize,
    height: usize,
    cells: Vec<TileKind>,
}

impl TileGrid {
    /// All-empty grid
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![TileKind::Empty; width * height],
        }
    }

    /// Rebuild a grid from wire ordinals
    pub fn from_ordinals(width: usize, height: usize, ordinals: &[u8]) -> Result<Self, TileError> {
        if ordinals.len() != width * height {
            return Err(TileError::BadDimensions {
                expected: width * height,
                actual: ordinals.len(),
            });
        }
        let cells = ordinals
            .iter()
            .map(|&o| TileKind::try_from(o))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { width, height, cells })
    }

    /// Wire ordinals, row-major
    pub fn to_ordinals(&self) -> Vec<u8> {
        self.cells.iter().map(|&t| t as u8).collect()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Tile at a cell; anything off the grid reads as `Empty`
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> TileKind {
        if x < 0 || y < 0 {
            return TileKind::Empty;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return TileKind::Empty;
        }
        self.cells[y * self.width + x]
    }

    /// Write a cell; out-of-range writes are ignored
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, tile: TileKind) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = tile;
        }
    }

    /// Tile under a pixel position
    #[inline]
    pub fn tile_at(&self, px: f32, py: f32) -> TileKind {
        let (x, y) = pixel_to_cell(px, py);
        self.get(x, y)
    }

    #[inline]
    pub fn is_ground_at(&self, px: f32, py: f32) -> bool {
        self.tile_at(px, py) == TileKind::Ground
    }

    /// Iterate `(x, y, tile)` row by row
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, TileKind)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(i, &t)| (i % self.width, i / self.width, t))
    }

    /// Count tiles of a kind
    pub fn count(&self, kind: TileKind) -> usize {
        self.cells.iter().filter(|&&t| t == kind).count()
    }

    /// Width of the level in pixels
    pub fn pixel_width(&self) -> f32 {
        self.width as f32 * TILE_SIZE
    }

    /// Height of the level in pixels
    pub fn pixel_height(&self) -> f32 {
        self.height as f32 * TILE_SIZE
    }
}

/// Cell containing a pixel position
#[inline]
pub fn pixel_to_cell(px: f32, py: f32) -> (i32, i32) {
    ((px / TILE_SIZE).floor() as i32, (py / TILE_SIZE).floor() as i32)
}
