//! Per-frame simulation step
//!
//! Core game loop that advances one level's world by a variable `dt`
//! (milliseconds). Movement, AI and projectile velocities are per tick; only
//! cooldowns, timers and hazard lifetimes scale with `dt`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::dialogue;
use super::state::{GameEvent, GamePhase, GameState, NpcKind, Owner, PROJECTILE_SIZE, Player, Projectile, ProjectileKind, Weapon};
use super::tile::{TileKind, pixel_to_cell};
use super::timers::TimerKind;
use super::{ai, interaction, physics};
use crate::audio::{MusicTrack, SoundEvent};
use crate::consts::TOTAL_LEVELS;
use crate::tuning::Tuning;

/// Controls held during a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    /// Attack with the current weapon (repeats while held)
    pub attack: bool,
    /// Cycle weapons (on press)
    pub switch_weapon: bool,
}

impl TickInput {
    /// First control pressed this tick, in cheat code priority order
    pub fn newly_pressed(&self, prev: &TickInput) -> Option<CheatKey> {
        if self.left && !prev.left {
            Some(CheatKey::Left)
        } else if self.right && !prev.right {
            Some(CheatKey::Right)
        } else if self.attack && !prev.attack {
            Some(CheatKey::Attack)
        } else if self.jump && !prev.jump {
            Some(CheatKey::Jump)
        } else {
            None
        }
    }
}

/// Controls that count toward the cheat code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheatKey {
    Left,
    Right,
    Attack,
    Jump,
}

pub const CHEAT_CODE: [CheatKey; 6] = [
    CheatKey::Left,
    CheatKey::Right,
    CheatKey::Left,
    CheatKey::Right,
    CheatKey::Attack,
    CheatKey::Jump,
];

/// Advance the level by one tick.
///
/// Does nothing outside `Playing` or without a player. Events produced along
/// the way are queued on the state for the caller to drain.
pub fn advance(state: &mut GameState, input: &TickInput, dt: f32, tuning: &Tuning) {
    if state.phase != GamePhase::Playing {
        state.prev_input = *input;
        return;
    }
    let Some(player) = state.player.take() else {
        state.prev_input = *input;
        return;
    };

    let player = step(state, player, input, dt, tuning);
    state.player = Some(player);
    state.prev_input = *input;
    state.time_ticks += 1;
}

fn step(state: &mut GameState, mut player: Player, input: &TickInput, dt: f32, tuning: &Tuning) -> Player {
    for kind in state.timers.advance(dt) {
        match kind {
            TimerKind::AttackSwing => player.is_attacking = false,
            _ => dialogue::on_timer(state, kind),
        }
    }
    let health_before = player.health;

    // Actions
    handle_attack(state, &mut player, input, tuning);
    if input.switch_weapon && !state.prev_input.switch_weapon {
        if let Some(weapon) = next_weapon(&player) {
            log::debug!("weapon {:?} -> {:?}", player.current_weapon, weapon);
            player.current_weapon = weapon;
        }
    }
    track_cheat_code(state, &mut player, input, tuning);

    state.screen_flash = (state.screen_flash - dt).max(0.0);

    if input.jump && player.grounded {
        state.play(SoundEvent::Jump);
    }

    // Movement, AI, projectiles, hazards, then hits
    let player = physics::update_player(&player, input, &state.grid, dt, tuning);
    let enemies = std::mem::take(&mut state.enemies);
    let mut projectiles = std::mem::take(&mut state.projectiles);
    let hazards = std::mem::take(&mut state.hazards);
    let (grid, ids) = state.grid_and_ids();
    let (enemies, fired) = ai::update_enemies(&enemies, &player, grid, dt, tuning, ids);
    projectiles.extend(fired);
    let projectiles = physics::update_projectiles(projectiles, grid, tuning);
    let mut hazards = physics::update_hazards(&hazards, dt);
    let hits = interaction::resolve(&player, enemies, projectiles, &hazards, tuning, ids);

    let mut player = hits.player;
    let mut enemies = hits.enemies;
    if hits.defeated > 0 {
        state.play(SoundEvent::EnemyDeath);
    }
    hazards.extend(hits.new_hazards);
    award(&mut player, hits.score_gained, tuning);

    update_horse(state, &mut player, dt, tuning);
    let mut won = collect_pickup(state, &mut player, tuning);

    if player.score >= tuning.bomb_bonus_score && !player.bomb_bonus_awarded {
        player.bomb_bonus_awarded = true;
        state.play(SoundEvent::BombExplosion);
        state.screen_flash = tuning.bomb_flash_duration;
        let bonus: u32 = enemies.drain(..).map(|e| e.kind.score(tuning)).sum();
        log::info!("Bomb bonus cleared the level for {} points", bonus);
        award(&mut player, bonus, tuning);
    }

    update_invincibility_bonus(state, &mut player, dt, tuning);

    won |= talk_to_npcs(state, &player, tuning);
    dialogue::update_banter(state, health_before, player.health);

    state.enemies = enemies;
    state.projectiles = hits.projectiles;
    state.hazards = hazards;

    settle_outcome(state, &mut player, won, tuning);
    player.health = player.health.max(0);
    player
}

/// Add points, logging any extra lives
fn award(player: &mut Player, points: u32, tuning: &Tuning) {
    if points == 0 {
        return;
    }
    if player.award_score(points, tuning.extra_life_threshold) > 0 {
        log::info!("Extra life! {} lives", player.lives);
    }
}

fn handle_attack(state: &mut GameState, player: &mut Player, input: &TickInput, tuning: &Tuning) {
    if !input.attack || player.attack_cooldown > 0.0 {
        return;
    }
    match player.current_weapon {
        Weapon::Sword | Weapon::Axe => {
            if player.owns(player.current_weapon) {
                player.is_attacking = true;
                player.attack_cooldown = tuning.attack_cooldown;
                state.timers.schedule(TimerKind::AttackSwing, tuning.attack_duration);
            }
        }
        Weapon::Fireball => {
            if player.fireball_ammo > 0 {
                player.fireball_ammo -= 1;
                player.attack_cooldown = tuning.attack_cooldown;
                let vel = Vec2::new(tuning.fireball_speed * player.facing.sign(), 0.0);
                launch(state, player, ProjectileKind::Fireball, vel);
            }
        }
        Weapon::MorningStar => {
            if player.has_morning_star {
                player.attack_cooldown = tuning.attack_cooldown * tuning.morning_star_cooldown_factor;
                let vel = Vec2::new(
                    tuning.morning_star_speed_x * player.facing.sign(),
                    tuning.morning_star_speed_y,
                );
                launch(state, player, ProjectileKind::MorningStar, vel);
            }
        }
    }
}

fn launch(state: &mut GameState, player: &Player, kind: ProjectileKind, vel: Vec2) {
    let id = state.next_entity_id();
    state.projectiles.push(Projectile {
        id,
        kind,
        owner: Owner::Player,
        pos: Vec2::new(player.pos.x, player.pos.y + player.size.y / 4.0),
        size: PROJECTILE_SIZE,
        vel,
        facing: player.facing,
    });
}

/// Next owned weapon in cycle order, or `None` when there is nothing to switch to
pub fn next_weapon(player: &Player) -> Option<Weapon> {
    let owned: Vec<Weapon> = Weapon::CYCLE.into_iter().filter(|&w| player.owns(w)).collect();
    match owned.iter().position(|&w| w == player.current_weapon) {
        Some(_) if owned.len() <= 1 => None,
        Some(i) => Some(owned[(i + 1) % owned.len()]),
        None => owned.first().copied(),
    }
}

fn track_cheat_code(state: &mut GameState, player: &mut Player, input: &TickInput, tuning: &Tuning) {
    let Some(key) = input.newly_pressed(&state.prev_input) else {
        return;
    };
    state.cheat_history.push(key);
    if state.cheat_history.len() > CHEAT_CODE.len() {
        state.cheat_history.remove(0);
    }
    if state.cheat_history == CHEAT_CODE {
        log::info!("Cheat code entered");
        state.cheat_history.clear();
        state.play(SoundEvent::PowerUp);
        award(player, tuning.cheat_code_bonus, tuning);
    }
}

fn update_horse(state: &mut GameState, player: &mut Player, dt: f32, tuning: &Tuning) {
    if player.score >= tuning.horse_bonus_score && !player.horse_bonus_awarded {
        player.horse_bonus_awarded = true;
        player.on_horse = true;
        player.horse_cooldown = tuning.horse_duration;
        state.play(SoundEvent::PowerUp);
    }
    if player.on_horse {
        player.horse_cooldown -= dt;
        if player.horse_cooldown <= 0.0 {
            player.on_horse = false;
            player.horse_cooldown = 0.0;
            state.play(SoundEvent::PowerDown);
        }
    }
}

fn update_invincibility_bonus(state: &mut GameState, player: &mut Player, dt: f32, tuning: &Tuning) {
    if player.score >= tuning.invincibility_bonus_score && !player.invincibility_bonus_awarded {
        player.invincibility_bonus_awarded = true;
        player.invincibility_bonus_cooldown = tuning.invincibility_bonus_duration;
        state.play(SoundEvent::PowerUp);
    }
    if player.invincibility_bonus_cooldown > 0.0 {
        player.invincibility_bonus_cooldown -= dt;
        if player.invincibility_bonus_cooldown <= 0.0 {
            player.invincibility_bonus_cooldown = 0.0;
            state.play(SoundEvent::PowerDown);
        }
    }
}

/// Pick up whatever lies under the player's centre. Returns true on the goal.
fn collect_pickup(state: &mut GameState, player: &mut Player, tuning: &Tuning) -> bool {
    let center = player.center();
    let (cx, cy) = pixel_to_cell(center.x, center.y);
    let tile = state.grid.get(cx, cy);
    if !tile.is_collectible() {
        return false;
    }
    // get() only returns collectibles for in-range cells
    state.grid.set(cx as usize, cy as usize, TileKind::Empty);

    match tile {
        TileKind::Sword => {
            player.has_sword = true;
            equip(state, player, Weapon::Sword);
        }
        TileKind::Axe => {
            player.has_axe = true;
            equip(state, player, Weapon::Axe);
        }
        TileKind::MorningStar => {
            player.has_morning_star = true;
            equip(state, player, Weapon::MorningStar);
        }
        TileKind::Fireball => {
            player.fireball_ammo += tuning.fireball_pickup_ammo;
            award(player, tuning.fireball_pickup_bonus, tuning);
        }
        TileKind::HealthPack => {
            player.health = (player.health + tuning.health_pack_heal).min(player.max_health);
        }
        TileKind::Goal => return true,
        _ => {}
    }
    false
}

fn equip(state: &mut GameState, player: &mut Player, weapon: Weapon) {
    player.current_weapon = weapon;
    state.play(SoundEvent::WeaponPickup);
}

/// Show the nearest NPC's line. Returns true when the princess starts talking.
fn talk_to_npcs(state: &mut GameState, player: &Player, tuning: &Tuning) -> bool {
    if state.npcs.is_empty() {
        return false;
    }
    let Some(npc) = dialogue::nearest_npc(&state.npcs, player.center(), tuning.npc_talk_range) else {
        state.active_dialogue = None;
        return false;
    };
    if state.active_dialogue.as_deref() == Some(npc.message.as_str()) {
        return false;
    }
    state.active_dialogue = Some(npc.message.clone());
    npc.kind == NpcKind::Princess
}

/// Death beats victory when both happen on the same tick
fn settle_outcome(state: &mut GameState, player: &mut Player, won: bool, tuning: &Tuning) {
    let fell = player.pos.y > state.grid.pixel_height();
    if player.health <= 0 || fell {
        state.play(SoundEvent::PlayerDeath);
        player.lives = player.lives.saturating_sub(1);
        let phase = if player.lives > 0 { GamePhase::Died } else { GamePhase::Lost };
        leave_play(state, phase);
    } else if won {
        award(player, tuning.level_complete_bonus, tuning);
        let phase = if state.level_index.saturating_add(1) < TOTAL_LEVELS {
            GamePhase::LevelComplete
        } else {
            GamePhase::EndingCutscene
        };
        leave_play(state, phase);
    }
}

fn leave_play(state: &mut GameState, phase: GamePhase) {
    log::info!("Level {} over: {:?}", state.level_index.saturating_add(1), phase);
    state.phase = phase;
    state.timers.clear();
    state.player_dialogue = None;
    let music = match phase {
        GamePhase::EndingCutscene => GameEvent::Music(MusicTrack::Cutscene),
        _ => GameEvent::StopMusic,
    };
    state.emit(music);
}
