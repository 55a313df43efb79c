//! Data-driven game balance
//!
//! Every gameplay number lives here so balance files can override them.
//! Durations and cooldowns are milliseconds; speeds are pixels per tick.

use serde::{Deserialize, Serialize};

/// Gameplay constants. Missing fields in a JSON file keep their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Physics ===
    pub gravity: f32,
    pub max_fall_speed: f32,
    pub player_speed: f32,
    pub player_jump_strength: f32,
    pub stomp_bounce: f32,

    // === Enemy movement ===
    pub enemy_speed: f32,
    pub bat_speed: f32,
    pub ghost_speed: f32,

    // === Projectiles ===
    pub fireball_speed: f32,
    pub morning_star_speed_x: f32,
    pub morning_star_speed_y: f32,
    pub enemy_projectile_speed: f32,

    // === Player combat ===
    pub attack_duration: f32,
    pub attack_cooldown: f32,
    /// Morning star cooldown is the base cooldown times this
    pub morning_star_cooldown_factor: f32,
    pub attack_range: f32,
    pub fireball_pickup_ammo: u32,

    // === Health and damage ===
    pub player_max_health: i32,
    pub invincibility_duration: f32,
    pub health_pack_heal: i32,
    pub sword_damage: i32,
    pub axe_damage: i32,
    pub fireball_damage: i32,
    pub morning_star_damage: i32,
    pub contact_damage: i32,
    pub enemy_projectile_damage: i32,
    pub spike_damage: i32,
    pub lava_damage: i32,
    pub lava_duration: f32,

    // === Enemy stats ===
    pub slime_health: i32,
    pub bat_health: i32,
    pub spiky_slime_health: i32,
    pub shooter_health: i32,
    pub ghost_health: i32,
    pub lava_slime_health: i32,
    pub shooter_attack_range: f32,
    pub shooter_attack_cooldown: f32,
    pub ghost_aggro_range: f32,

    // === Scoring ===
    pub slime_score: u32,
    pub bat_score: u32,
    pub spiky_slime_score: u32,
    pub shooter_score: u32,
    pub ghost_score: u32,
    pub lava_slime_score: u32,
    pub initial_lives: u32,
    pub extra_life_threshold: u32,
    pub level_complete_bonus: u32,
    pub fireball_pickup_bonus: u32,
    pub cheat_code_bonus: u32,

    // === Power-ups ===
    pub horse_bonus_score: u32,
    pub horse_duration: f32,
    pub horse_speed: f32,
    pub horse_jump_strength: f32,
    pub bomb_bonus_score: u32,
    pub bomb_flash_duration: f32,
    pub invincibility_bonus_score: u32,
    pub invincibility_bonus_duration: f32,

    // === Dialogue ===
    pub npc_talk_range: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: 0.3,
            max_fall_speed: 6.0,
            player_speed: 2.0,
            player_jump_strength: -6.5,
            stomp_bounce: -4.0,

            enemy_speed: 0.5,
            bat_speed: 0.7,
            ghost_speed: 0.4,

            fireball_speed: 4.0,
            morning_star_speed_x: 2.5,
            morning_star_speed_y: -4.0,
            enemy_projectile_speed: 3.0,

            attack_duration: 150.0,
            attack_cooldown: 300.0,
            morning_star_cooldown_factor: 1.5,
            attack_range: 18.0,
            fireball_pickup_ammo: 5,

            player_max_health: 3,
            invincibility_duration: 1000.0,
            health_pack_heal: 1,
            sword_damage: 1,
            axe_damage: 2,
            fireball_damage: 1,
            morning_star_damage: 2,
            contact_damage: 1,
            enemy_projectile_damage: 1,
            spike_damage: 1,
            lava_damage: 1,
            lava_duration: 2000.0,

            slime_health: 1,
            bat_health: 1,
            spiky_slime_health: 2,
            shooter_health: 2,
            ghost_health: 2,
            lava_slime_health: 1,
            shooter_attack_range: 16.0 * 8.0,
            shooter_attack_cooldown: 2000.0,
            ghost_aggro_range: 16.0 * 7.0,

            slime_score: 100,
            bat_score: 150,
            spiky_slime_score: 250,
            shooter_score: 300,
            ghost_score: 350,
            lava_slime_score: 200,
            initial_lives: 3,
            extra_life_threshold: 2000,
            level_complete_bonus: 400,
            fireball_pickup_bonus: 100,
            cheat_code_bonus: 4500,

            horse_bonus_score: 5000,
            horse_duration: 5000.0,
            horse_speed: 4.0,
            horse_jump_strength: -7.5,
            bomb_bonus_score: 10_000,
            bomb_flash_duration: 250.0,
            invincibility_bonus_score: 20_000,
            invincibility_bonus_duration: 10_000.0,

            npc_talk_range: 16.0 * 2.5,
        }
    }
}
