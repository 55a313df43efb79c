//! Game state and core simulation types
//!
//! Everything a front end reads and everything a tick rewrites lives here.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{Aabb, Body};
use super::dialogue::Banter;
use super::tick::TickInput;
use super::tile::{TileGrid, TileKind};
use super::timers::Timers;
use crate::audio::{MusicTrack, SoundEvent};
use crate::consts::{LEVEL_HEIGHT, LEVEL_WIDTH, TILE_SIZE};
use crate::tuning::Tuning;

/// Size of every tile-sized entity (player, enemies, NPCs)
pub const ENTITY_SIZE: Vec2 = Vec2::splat(TILE_SIZE);
/// Size of every projectile
pub const PROJECTILE_SIZE: Vec2 = Vec2::splat(TILE_SIZE / 2.0);

/// Princess greeting on the last level
pub const PRINCESS_MESSAGE: &str = "My Hero! You saved the kingdom!";
/// Quest giver on the first level
pub const FIRST_NPC_MESSAGE: &str = "Save the princess from the Sorcerer!";
/// Every other NPC
pub const NPC_MESSAGE: &str = "The princess is in another castle... just kidding, keep going!";

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    #[default]
    StartScreen,
    Cutscene,
    Playing,
    LevelComplete,
    /// Lost a life, more remain
    Died,
    /// Out of lives
    Lost,
    EndingCutscene,
    Won,
}

/// Horizontal facing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    /// -1.0 or +1.0
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }

    #[inline]
    pub fn flipped(self) -> Self {
        match self {
            Facing::Left => Facing::Right,
            Facing::Right => Facing::Left,
        }
    }
}

/// Player weapons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Weapon {
    #[default]
    Sword,
    Axe,
    MorningStar,
    Fireball,
}

impl Weapon {
    /// Cycle order for weapon switching
    pub const CYCLE: [Weapon; 4] = [Weapon::Sword, Weapon::Axe, Weapon::MorningStar, Weapon::Fireball];

    /// Swung weapons use the hitbox; the rest throw projectiles
    pub fn is_melee(self) -> bool {
        matches!(self, Weapon::Sword | Weapon::Axe)
    }
}

/// The player character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub size: Vec2,
    pub vel: Vec2,
    pub grounded: bool,
    pub facing: Facing,
    pub health: i32,
    pub max_health: i32,
    pub is_attacking: bool,
    /// Ready to attack again once <= 0
    pub attack_cooldown: f32,
    /// Damage immune while > 0
    pub invincibility_cooldown: f32,
    pub has_sword: bool,
    pub has_axe: bool,
    pub has_morning_star: bool,
    pub current_weapon: Weapon,
    pub fireball_ammo: u32,
    pub score: u32,
    pub lives: u32,
    pub next_life_score: u32,
    pub on_horse: bool,
    pub horse_cooldown: f32,
    pub horse_bonus_awarded: bool,
    pub bomb_bonus_awarded: bool,
    pub invincibility_bonus_cooldown: f32,
    pub invincibility_bonus_awarded: bool,
}

impl Player {
    /// Fresh player at the start of a run
    pub fn new(pos: Vec2, tuning: &Tuning) -> Self {
        Self {
            pos,
            size: ENTITY_SIZE,
            vel: Vec2::ZERO,
            grounded: false,
            facing: Facing::Right,
            health: tuning.player_max_health,
            max_health: tuning.player_max_health,
            is_attacking: false,
            attack_cooldown: 0.0,
            invincibility_cooldown: 0.0,
            has_sword: false,
            has_axe: false,
            has_morning_star: false,
            current_weapon: Weapon::Fireball,
            fireball_ammo: 0,
            score: 0,
            lives: tuning.initial_lives,
            next_life_score: tuning.extra_life_threshold,
            on_horse: false,
            horse_cooldown: 0.0,
            horse_bonus_awarded: false,
            bomb_bonus_awarded: false,
            invincibility_bonus_cooldown: 0.0,
            invincibility_bonus_awarded: false,
        }
    }

    /// Player for a new level, keeping progress from `previous`.
    ///
    /// Health carries over only when moving on to a later level; retries
    /// start at full health. Timed effects never carry.
    pub fn carried_over(pos: Vec2, previous: &Player, advancing: bool, tuning: &Tuning) -> Self {
        let mut player = Self::new(pos, tuning);
        player.has_sword = previous.has_sword;
        player.has_axe = previous.has_axe;
        player.has_morning_star = previous.has_morning_star;
        if player.owns(previous.current_weapon) {
            player.current_weapon = previous.current_weapon;
        }
        player.fireball_ammo = previous.fireball_ammo;
        player.score = previous.score;
        player.lives = previous.lives;
        player.next_life_score = previous.next_life_score;
        player.horse_bonus_awarded = previous.horse_bonus_awarded;
        player.bomb_bonus_awarded = previous.bomb_bonus_awarded;
        player.invincibility_bonus_awarded = previous.invincibility_bonus_awarded;
        if advancing {
            player.health = previous.health;
        }
        player
    }

    /// Can enemies, spikes, bullets and lava hurt us right now
    #[inline]
    pub fn is_vulnerable(&self) -> bool {
        !self.on_horse && self.invincibility_cooldown <= 0.0 && self.invincibility_bonus_cooldown <= 0.0
    }

    pub fn owns(&self, weapon: Weapon) -> bool {
        match weapon {
            Weapon::Sword => self.has_sword,
            Weapon::Axe => self.has_axe,
            Weapon::MorningStar => self.has_morning_star,
            Weapon::Fireball => true,
        }
    }

    /// Take damage and start the invincibility window
    pub fn hurt(&mut self, damage: i32, tuning: &Tuning) {
        self.health -= damage;
        self.invincibility_cooldown = tuning.invincibility_duration;
    }

    /// Add points, granting an extra life for every threshold crossed.
    /// Returns the number of lives granted.
    pub fn award_score(&mut self, points: u32, life_step: u32) -> u32 {
        self.score = self.score.saturating_add(points);
        if life_step == 0 {
            return 0;
        }
        let mut granted = 0;
        while self.score >= self.next_life_score {
            self.lives += 1;
            self.next_life_score = self.next_life_score.saturating_add(life_step);
            granted += 1;
            if self.next_life_score == u32::MAX {
                break;
            }
        }
        granted
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }
}

impl Body for Player {
    fn aabb(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }
}

/// Enemy types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    Slime,
    Bat,
    SpikySlime,
    Shooter,
    Ghost,
    LavaSlime,
}

impl EnemyKind {
    pub fn base_health(self, tuning: &Tuning) -> i32 {
        match self {
            EnemyKind::Slime => tuning.slime_health,
            EnemyKind::Bat => tuning.bat_health,
            EnemyKind::SpikySlime => tuning.spiky_slime_health,
            EnemyKind::Shooter => tuning.shooter_health,
            EnemyKind::Ghost => tuning.ghost_health,
            EnemyKind::LavaSlime => tuning.lava_slime_health,
        }
    }

    /// Points for a kill
    pub fn score(self, tuning: &Tuning) -> u32 {
        match self {
            EnemyKind::Slime => tuning.slime_score,
            EnemyKind::Bat => tuning.bat_score,
            EnemyKind::SpikySlime => tuning.spiky_slime_score,
            EnemyKind::Shooter => tuning.shooter_score,
            EnemyKind::Ghost => tuning.ghost_score,
            EnemyKind::LavaSlime => tuning.lava_slime_score,
        }
    }

    /// Whether landing on it hurts the enemy rather than the player
    pub fn is_stompable(self) -> bool {
        !matches!(self, EnemyKind::SpikySlime | EnemyKind::Shooter)
    }
}

/// An enemy entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub size: Vec2,
    pub vel: Vec2,
    pub health: i32,
    pub initial_pos: Vec2,
    pub facing: Facing,
    /// Only shooters attack
    pub attack_cooldown: Option<f32>,
}

impl Enemy {
    pub fn spawn(id: u32, kind: EnemyKind, pos: Vec2, tuning: &Tuning) -> Self {
        Self {
            id,
            kind,
            pos,
            size: ENTITY_SIZE,
            vel: Vec2::ZERO,
            health: kind.base_health(tuning),
            initial_pos: pos,
            facing: Facing::Right,
            attack_cooldown: (kind == EnemyKind::Shooter).then_some(tuning.shooter_attack_cooldown),
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.health > 0
    }
}

impl Body for Enemy {
    fn aabb(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }
}

/// Who fired a projectile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Owner {
    Player,
    Enemy,
}

/// Projectile types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectileKind {
    Fireball,
    /// Lobbed, falls at half gravity
    MorningStar,
    EnemyBullet,
}

/// A projectile in flight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub kind: ProjectileKind,
    pub owner: Owner,
    pub pos: Vec2,
    pub size: Vec2,
    pub vel: Vec2,
    pub facing: Facing,
}

impl Body for Projectile {
    fn aabb(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }
}

/// Hazard types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HazardKind {
    Lava,
}

/// A timed damaging area
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hazard {
    pub id: u32,
    pub kind: HazardKind,
    pub pos: Vec2,
    pub size: Vec2,
    pub vel: Vec2,
    /// Milliseconds left; removed at <= 0
    pub duration: f32,
}

impl Body for Hazard {
    fn aabb(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NpcKind {
    Standard,
    Princess,
}

/// A friendly character with one line of dialogue
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Npc {
    pub id: u32,
    pub kind: NpcKind,
    pub pos: Vec2,
    pub size: Vec2,
    pub message: String,
}

impl Npc {
    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }
}

/// Monotonic entity ID source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityIds {
    next: u32,
}

impl Default for EntityIds {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl EntityIds {
    pub fn next_id(&mut self) -> u32 {
        let id = self.next;
        self.next += 1;
        id
    }
}

/// Events for the audio layer, drained by the caller after each tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Sound(SoundEvent),
    Music(MusicTrack),
    StopMusic,
}

/// Complete game state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub phase: GamePhase,
    pub level_index: usize,
    /// Working copy of the level; pickups clear cells
    pub grid: TileGrid,
    /// `None` pauses the simulation
    pub player: Option<Player>,
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    pub hazards: Vec<Hazard>,
    pub npcs: Vec<Npc>,
    /// NPC line currently shown
    pub active_dialogue: Option<String>,
    /// Player one-liner currently shown
    pub player_dialogue: Option<String>,
    /// Milliseconds of bomb flash left
    pub screen_flash: f32,
    /// Ticks simulated this level
    pub time_ticks: u64,
    pub timers: Timers,
    /// Controls from the previous tick (edge detection)
    pub prev_input: TickInput,
    /// Recent control presses for the cheat code
    pub cheat_history: Vec<super::tick::CheatKey>,
    #[serde(skip)]
    pub banter: Banter,
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    ids: EntityIds,
}

impl GameState {
    /// Empty state on the start screen
    pub fn new(banter_seed: u64) -> Self {
        Self {
            phase: GamePhase::StartScreen,
            level_index: 0,
            grid: TileGrid::new(LEVEL_WIDTH, LEVEL_HEIGHT),
            player: None,
            enemies: Vec::new(),
            projectiles: Vec::new(),
            hazards: Vec::new(),
            npcs: Vec::new(),
            active_dialogue: None,
            player_dialogue: None,
            screen_flash: 0.0,
            time_ticks: 0,
            timers: Timers::default(),
            prev_input: TickInput::default(),
            cheat_history: Vec::new(),
            banter: Banter::new(banter_seed),
            events: Vec::new(),
            ids: EntityIds::default(),
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        self.ids.next_id()
    }

    pub fn ids_mut(&mut self) -> &mut EntityIds {
        &mut self.ids
    }

    /// Level grid and ID source, borrowed together
    pub fn grid_and_ids(&mut self) -> (&TileGrid, &mut EntityIds) {
        (&self.grid, &mut self.ids)
    }

    pub fn emit(&mut self, event: GameEvent) {
        log::debug!("event: {:?}", event);
        self.events.push(event);
    }

    pub fn play(&mut self, sound: SoundEvent) {
        self.emit(GameEvent::Sound(sound));
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Rebuild the world from a level grid.
    ///
    /// Discards every entity, timer and dialogue line. `previous` carries
    /// run progress unless it is out of lives.
    pub fn load_level(&mut self, level_index: usize, grid: &TileGrid, previous: Option<&Player>, tuning: &Tuning) {
        let advancing = previous.is_some() && level_index > self.level_index;
        let carry = previous.filter(|p| p.lives > 0);

        self.grid = grid.clone();
        self.player = None;
        self.enemies.clear();
        self.projectiles.clear();
        self.hazards.clear();
        self.npcs.clear();
        self.active_dialogue = None;
        self.player_dialogue = None;
        self.screen_flash = 0.0;
        self.time_ticks = 0;
        self.timers.clear();
        self.cheat_history.clear();
        self.prev_input = TickInput::default();

        for (x, y, tile) in grid.cells() {
            let pos = Vec2::new(x as f32 * TILE_SIZE, y as f32 * TILE_SIZE);
            match tile {
                TileKind::PlayerStart => {
                    self.player = Some(match carry {
                        Some(prev) => Player::carried_over(pos, prev, advancing, tuning),
                        None => Player::new(pos, tuning),
                    });
                }
                TileKind::Npc | TileKind::Princess => {
                    let (kind, message) = if tile == TileKind::Princess {
                        (NpcKind::Princess, PRINCESS_MESSAGE)
                    } else if level_index == 0 {
                        (NpcKind::Standard, FIRST_NPC_MESSAGE)
                    } else {
                        (NpcKind::Standard, NPC_MESSAGE)
                    };
                    let id = self.next_entity_id();
                    self.npcs.push(Npc {
                        id,
                        kind,
                        pos,
                        size: ENTITY_SIZE,
                        message: message.to_string(),
                    });
                }
                _ => {
                    if let Some(kind) = tile.enemy_spawn() {
                        let id = self.next_entity_id();
                        self.enemies.push(Enemy::spawn(id, kind, pos, tuning));
                    }
                }
            }
        }

        self.level_index = level_index;
        self.phase = GamePhase::Playing;

        if self.player.is_none() {
            log::warn!("Level {} has no player start; simulation paused", level_index.saturating_add(1));
        }
        log::info!(
            "Level {} loaded: {} enemies, {} npcs",
            level_index.saturating_add(1),
            self.enemies.len(),
            self.npcs.len()
        );
    }

    /// Read-only view for callers outside the tick
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            phase: self.phase,
            level_index: self.level_index,
            grid: &self.grid,
            player: self.player.as_ref(),
            enemies: &self.enemies,
            projectiles: &self.projectiles,
            hazards: &self.hazards,
            npcs: &self.npcs,
            active_dialogue: self.active_dialogue.as_deref(),
            player_dialogue: self.player_dialogue.as_deref(),
            screen_flash: self.screen_flash,
            camera_x: self.player.as_ref().map_or(0.0, |p| crate::camera_x_for(p.pos.x)),
        }
    }
}

/// Borrowed view of everything the presentation layer draws
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub phase: GamePhase,
    pub level_index: usize,
    pub grid: &'a TileGrid,
    pub player: Option<&'a Player>,
    pub enemies: &'a [Enemy],
    pub projectiles: &'a [Projectile],
    pub hazards: &'a [Hazard],
    pub npcs: &'a [Npc],
    pub active_dialogue: Option<&'a str>,
    pub player_dialogue: Option<&'a str>,
    pub screen_flash: f32,
    pub camera_x: f32,
}
