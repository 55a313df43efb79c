//! Enemy behaviour, one routine per enemy kind

use glam::Vec2;

use super::physics::{apply_gravity, snap_to_floor};
use super::state::{Enemy, EnemyKind, EntityIds, Facing, Owner, PROJECTILE_SIZE, Player, Projectile, ProjectileKind};
use super::tile::{TileGrid, TileKind};
use crate::tuning::Tuning;

/// Advance every enemy one tick.
///
/// Returns the moved enemies (same order) and any bullets fired this tick.
pub fn update_enemies(
    enemies: &[Enemy],
    player: &Player,
    grid: &TileGrid,
    dt: f32,
    tuning: &Tuning,
    ids: &mut EntityIds,
) -> (Vec<Enemy>, Vec<Projectile>) {
    let mut fired = Vec::new();
    let moved = enemies
        .iter()
        .map(|enemy| {
            let mut e = enemy.clone();
            if let Some(cooldown) = e.attack_cooldown.as_mut() {
                if *cooldown > 0.0 {
                    *cooldown -= dt;
                }
            }
            let delta = player.pos - e.pos;

            match e.kind {
                EnemyKind::Bat => patrol_vertical(&mut e, grid, tuning),
                EnemyKind::Slime | EnemyKind::SpikySlime | EnemyKind::LavaSlime => {
                    patrol_ground(&mut e, grid, tuning);
                    fall(&mut e, grid, tuning);
                }
                EnemyKind::Shooter => {
                    fall(&mut e, grid, tuning);
                    if let Some(bullet) = try_shoot(&mut e, delta, tuning, ids) {
                        fired.push(bullet);
                    }
                }
                EnemyKind::Ghost => {
                    // Drifts through walls
                    e.vel = if delta.length() < tuning.ghost_aggro_range {
                        Vec2::from_angle(delta.y.atan2(delta.x)) * tuning.ghost_speed
                    } else {
                        Vec2::ZERO
                    };
                    e.pos += e.vel;
                }
            }
            e
        })
        .collect();
    (moved, fired)
}

/// Fly up and down, turning at ground
fn patrol_vertical(e: &mut Enemy, grid: &TileGrid, tuning: &Tuning) {
    e.vel.y = tuning.bat_speed * e.facing.sign();
    e.pos.y += e.vel.y;
    if grid.is_ground_at(e.pos.x, e.pos.y) || grid.is_ground_at(e.pos.x, e.pos.y + e.size.y) {
        e.facing = e.facing.flipped();
        e.pos.y -= e.vel.y * 2.0;
    }
}

/// Walk along the ground, turning at walls and ledges
fn patrol_ground(e: &mut Enemy, grid: &TileGrid, tuning: &Tuning) {
    e.vel.x = tuning.enemy_speed * e.facing.sign();
    e.pos.x += e.vel.x;

    let front = match e.facing {
        Facing::Right => e.pos.x + e.size.x,
        Facing::Left => e.pos.x,
    };
    let wall = grid.is_ground_at(front, e.pos.y);
    let ledge = grid.tile_at(front, e.pos.y + e.size.y + 1.0) == TileKind::Empty;
    if wall || ledge {
        e.facing = e.facing.flipped();
        e.pos.x -= e.vel.x * 2.0;
    }
}

fn fall(e: &mut Enemy, grid: &TileGrid, tuning: &Tuning) {
    e.vel.y = apply_gravity(e.vel.y, tuning);
    e.pos.y += e.vel.y;
    snap_to_floor(&mut e.pos, e.size, &mut e.vel, grid);
}

/// Fire at the player when in range and off cooldown
fn try_shoot(e: &mut Enemy, delta: Vec2, tuning: &Tuning, ids: &mut EntityIds) -> Option<Projectile> {
    let cooldown = e.attack_cooldown.as_mut()?;
    if delta.length() >= tuning.shooter_attack_range || *cooldown > 0.0 {
        return None;
    }
    *cooldown = tuning.shooter_attack_cooldown;
    Some(Projectile {
        id: ids.next_id(),
        kind: ProjectileKind::EnemyBullet,
        owner: Owner::Enemy,
        pos: e.pos + e.size / 4.0,
        size: PROJECTILE_SIZE,
        vel: Vec2::from_angle(delta.y.atan2(delta.x)) * tuning.enemy_projectile_speed,
        facing: Facing::Right,
    })
}
