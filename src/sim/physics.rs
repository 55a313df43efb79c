//! Movement integration and tile collision
//!
//! Velocities are pixels per tick; `dt` (milliseconds) only drives cooldowns
//! and hazard lifetimes. Axes are resolved one after the other, horizontal
//! first, so a very fast body can still skip a one-tile wall.

use glam::Vec2;

use super::collision::{snap_after_tile, snap_before_tile};
use super::state::{Facing, Hazard, Player, Projectile, ProjectileKind};
use super::tick::TickInput;
use super::tile::{TileGrid, TileKind};
use crate::consts::PROJECTILE_CULL_MARGIN;
use crate::tuning::Tuning;

/// Gravity step with terminal velocity
#[inline]
pub fn apply_gravity(vel_y: f32, tuning: &Tuning) -> f32 {
    (vel_y + tuning.gravity).min(tuning.max_fall_speed)
}

/// Land a falling body on the ground below it.
///
/// Samples the bottom-left and bottom-right corners; on ground the body's
/// bottom is snapped to the tile top and vertical speed zeroed.
/// Returns true if it landed.
pub fn snap_to_floor(pos: &mut Vec2, size: Vec2, vel: &mut Vec2, grid: &TileGrid) -> bool {
    let bottom = pos.y + size.y;
    if grid.is_ground_at(pos.x, bottom) || grid.is_ground_at(pos.x + size.x - 1.0, bottom) {
        pos.y = snap_before_tile(bottom, size.y);
        vel.y = 0.0;
        true
    } else {
        false
    }
}

/// Advance the player one tick
pub fn update_player(player: &Player, input: &TickInput, grid: &TileGrid, dt: f32, tuning: &Tuning) -> Player {
    let mut p = player.clone();

    if p.attack_cooldown > 0.0 {
        p.attack_cooldown -= dt;
    }
    if p.invincibility_cooldown > 0.0 {
        p.invincibility_cooldown -= dt;
    }

    let (speed, jump_strength) = if p.on_horse {
        (tuning.horse_speed, tuning.horse_jump_strength)
    } else {
        (tuning.player_speed, tuning.player_jump_strength)
    };

    // Horizontal
    if input.left {
        p.vel.x = -speed;
        p.facing = Facing::Left;
    } else if input.right {
        p.vel.x = speed;
        p.facing = Facing::Right;
    } else {
        p.vel.x = 0.0;
    }
    p.pos.x += p.vel.x;
    resolve_horizontal(&mut p, grid);
    if p.pos.x < 0.0 {
        p.pos.x = 0.0;
    }

    // Vertical
    p.vel.y = apply_gravity(p.vel.y, tuning);
    if input.jump && p.grounded {
        p.vel.y = jump_strength;
    }
    p.pos.y += p.vel.y;
    p.grounded = false;
    resolve_vertical(&mut p, grid);

    // Spikes
    if p.is_vulnerable() && touches_spike(&p, grid) {
        p.hurt(tuning.spike_damage, tuning);
    }

    p
}

fn resolve_horizontal(p: &mut Player, grid: &TileGrid) {
    let top = p.pos.y;
    let bottom = p.pos.y + p.size.y - 1.0;
    if p.vel.x < 0.0 {
        let left = p.pos.x;
        if grid.is_ground_at(left, top) || grid.is_ground_at(left, bottom) {
            p.pos.x = snap_after_tile(left);
        }
    } else if p.vel.x > 0.0 {
        let right = p.pos.x + p.size.x;
        if grid.is_ground_at(right, top) || grid.is_ground_at(right, bottom) {
            p.pos.x = snap_before_tile(right, p.size.x);
        }
    }
}

fn resolve_vertical(p: &mut Player, grid: &TileGrid) {
    if p.vel.y > 0.0 {
        if snap_to_floor(&mut p.pos, p.size, &mut p.vel, grid) {
            p.grounded = true;
        }
    } else if p.vel.y < 0.0 {
        let top = p.pos.y;
        if grid.is_ground_at(p.pos.x, top) || grid.is_ground_at(p.pos.x + p.size.x - 1.0, top) {
            p.pos.y = snap_after_tile(top);
            p.vel.y = 0.0;
        }
    }
}

/// Any corner of the player (bottom edge sampled just below the feet) on a spike
fn touches_spike(p: &Player, grid: &TileGrid) -> bool {
    let (left, right) = (p.pos.x, p.pos.x + p.size.x - 1.0);
    let (top, bottom) = (p.pos.y, p.pos.y + p.size.y);
    [(left, bottom), (right, bottom), (left, top), (right, top)]
        .iter()
        .any(|&(x, y)| grid.tile_at(x, y) == TileKind::Spike)
}

/// Move projectiles and drop the ones that hit a wall or left the world
pub fn update_projectiles(projectiles: Vec<Projectile>, grid: &TileGrid, tuning: &Tuning) -> Vec<Projectile> {
    let (max_x, max_y) = (grid.pixel_width() + PROJECTILE_CULL_MARGIN, grid.pixel_height() + PROJECTILE_CULL_MARGIN);
    projectiles
        .into_iter()
        .map(|mut p| {
            if p.kind == ProjectileKind::MorningStar {
                p.vel.y += tuning.gravity / 2.0;
            }
            p.pos += p.vel;
            p
        })
        .filter(|p| {
            let out_of_bounds = p.pos.x < -PROJECTILE_CULL_MARGIN
                || p.pos.x > max_x
                || p.pos.y < -PROJECTILE_CULL_MARGIN
                || p.pos.y > max_y;
            !out_of_bounds && !grid.is_ground_at(p.pos.x, p.pos.y)
        })
        .collect()
}

/// Count hazard lifetimes down; expired ones are dropped
pub fn update_hazards(hazards: &[Hazard], dt: f32) -> Vec<Hazard> {
    hazards
        .iter()
        .map(|h| Hazard {
            duration: h.duration - dt,
            ..h.clone()
        })
        .filter(|h| h.duration > 0.0)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::TILE_SIZE;
    use crate::sim::collision::{Aabb, Body};
    use crate::sim::state::{HazardKind, Owner, PROJECTILE_SIZE};

    /// 10x10 grid with a solid floor on row 8
    fn floor_grid() -> TileGrid {
        let mut grid = TileGrid::new(10, 10);
        for x in 0..10 {
            grid.set(x, 8, TileKind::Ground);
        }
        grid
    }

    fn player_at(x: f32, y: f32) -> Player {
        Player::new(Vec2::new(x, y), &Tuning::default())
    }

    fn ground_tiles_overlapping(p: &Player, grid: &TileGrid) -> usize {
        grid.cells()
            .filter(|&(_, _, t)| t == TileKind::Ground)
            .filter(|&(x, y, _)| {
                let tile = Aabb::new(Vec2::new(x as f32 * TILE_SIZE, y as f32 * TILE_SIZE), Vec2::splat(TILE_SIZE));
                tile.overlaps(&p.aabb())
            })
            .count()
    }

    #[test]
    fn test_fall_speed_clamp() {
        let tuning = Tuning::default();
        let grid = TileGrid::new(10, 40);
        let mut p = player_at(32.0, 0.0);
        p.vel.y = 10.0;
        let p = update_player(&p, &TickInput::default(), &grid, 16.0, &tuning);
        assert_eq!(p.vel.y, tuning.max_fall_speed);

        let mut p = p;
        for _ in 0..50 {
            p = update_player(&p, &TickInput::default(), &grid, 16.0, &tuning);
            assert!(p.vel.y <= tuning.max_fall_speed);
        }
    }

    #[test]
    fn test_lands_on_floor() {
        let tuning = Tuning::default();
        let grid = floor_grid();
        let mut p = player_at(32.0, 100.0);
        for _ in 0..60 {
            p = update_player(&p, &TickInput::default(), &grid, 16.0, &tuning);
        }
        assert!(p.grounded);
        assert_eq!(p.pos.y, 8.0 * TILE_SIZE - p.size.y);
        assert_eq!(p.vel.y, 0.0);
        assert_eq!(ground_tiles_overlapping(&p, &grid), 0);
    }

    #[test]
    fn test_jump_only_when_grounded() {
        let tuning = Tuning::default();
        let grid = floor_grid();
        let jump = TickInput {
            jump: true,
            ..Default::default()
        };

        let mut airborne = player_at(32.0, 40.0);
        airborne.grounded = false;
        let after = update_player(&airborne, &jump, &grid, 16.0, &tuning);
        assert!(after.vel.y > 0.0);

        let mut standing = player_at(32.0, 8.0 * TILE_SIZE - TILE_SIZE);
        standing.grounded = true;
        let after = update_player(&standing, &jump, &grid, 16.0, &tuning);
        assert_eq!(after.vel.y, tuning.player_jump_strength);
        assert!(!after.grounded);

        standing.on_horse = true;
        let after = update_player(&standing, &jump, &grid, 16.0, &tuning);
        assert_eq!(after.vel.y, tuning.horse_jump_strength);
    }

    #[test]
    fn test_wall_stops_horizontal_motion() {
        let tuning = Tuning::default();
        let mut grid = floor_grid();
        for y in 0..8 {
            grid.set(5, y, TileKind::Ground);
        }
        let right = TickInput {
            right: true,
            ..Default::default()
        };
        // Standing just left of the wall at x=80
        let mut p = player_at(63.0, 7.0 * TILE_SIZE);
        p.grounded = true;
        for _ in 0..10 {
            p = update_player(&p, &right, &grid, 16.0, &tuning);
            assert!(p.pos.x + p.size.x <= 5.0 * TILE_SIZE);
            assert_eq!(ground_tiles_overlapping(&p, &grid), 0);
        }
        assert_eq!(p.pos.x, 4.0 * TILE_SIZE);
        assert_eq!(p.facing, Facing::Right);

        let left = TickInput {
            left: true,
            ..Default::default()
        };
        let mut p = player_at(97.0, 7.0 * TILE_SIZE);
        for _ in 0..10 {
            p = update_player(&p, &left, &grid, 16.0, &tuning);
            assert!(p.pos.x >= 6.0 * TILE_SIZE);
        }
        assert_eq!(p.facing, Facing::Left);
    }

    #[test]
    fn test_head_bump() {
        let tuning = Tuning::default();
        let mut grid = floor_grid();
        for x in 0..10 {
            grid.set(x, 5, TileKind::Ground);
        }
        let mut p = player_at(32.0, 7.0 * TILE_SIZE);
        p.grounded = true;
        let jump = TickInput {
            jump: true,
            ..Default::default()
        };
        p = update_player(&p, &jump, &grid, 16.0, &tuning);
        for _ in 0..10 {
            p = update_player(&p, &TickInput::default(), &grid, 16.0, &tuning);
            assert!(p.pos.y >= 6.0 * TILE_SIZE);
            assert_eq!(ground_tiles_overlapping(&p, &grid), 0);
        }
    }

    #[test]
    fn test_left_world_edge_clamp() {
        let tuning = Tuning::default();
        let grid = floor_grid();
        let left = TickInput {
            left: true,
            ..Default::default()
        };
        let p = update_player(&player_at(1.0, 7.0 * TILE_SIZE), &left, &grid, 16.0, &tuning);
        assert_eq!(p.pos.x, 0.0);
    }

    #[test]
    fn test_spike_damage_once_then_invincible() {
        let tuning = Tuning::default();
        let mut grid = floor_grid();
        grid.set(2, 8, TileKind::Spike);
        // Standing in the spike's column, feet on row 8
        let mut p = player_at(32.0, 7.0 * TILE_SIZE);
        p.grounded = true;
        p = update_player(&p, &TickInput::default(), &grid, 16.0, &tuning);
        assert_eq!(p.health, tuning.player_max_health - 1);
        assert_eq!(p.invincibility_cooldown, tuning.invincibility_duration);

        let health = p.health;
        p = update_player(&p, &TickInput::default(), &grid, 16.0, &tuning);
        assert_eq!(p.health, health);
    }

    #[test]
    fn test_spike_ignored_on_horse() {
        let tuning = Tuning::default();
        let mut grid = floor_grid();
        grid.set(2, 8, TileKind::Spike);
        let mut p = player_at(32.0, 7.0 * TILE_SIZE);
        p.on_horse = true;
        p = update_player(&p, &TickInput::default(), &grid, 16.0, &tuning);
        assert_eq!(p.health, tuning.player_max_health);
    }

    #[test]
    fn test_cooldowns_tick_down() {
        let tuning = Tuning::default();
        let grid = floor_grid();
        let mut p = player_at(32.0, 7.0 * TILE_SIZE);
        p.attack_cooldown = 20.0;
        p.invincibility_cooldown = 10.0;
        p = update_player(&p, &TickInput::default(), &grid, 16.0, &tuning);
        assert_eq!(p.attack_cooldown, 4.0);
        assert!(p.invincibility_cooldown <= 0.0);
    }

    fn projectile(kind: ProjectileKind, pos: Vec2, vel: Vec2) -> Projectile {
        Projectile {
            id: 1,
            kind,
            owner: Owner::Player,
            pos,
            size: PROJECTILE_SIZE,
            vel,
            facing: Facing::Right,
        }
    }

    #[test]
    fn test_projectiles_move_and_cull() {
        let tuning = Tuning::default();
        let grid = floor_grid();
        let flying = projectile(ProjectileKind::Fireball, Vec2::new(20.0, 20.0), Vec2::new(4.0, 0.0));
        let into_floor = projectile(ProjectileKind::Fireball, Vec2::new(20.0, 126.0), Vec2::new(0.0, 4.0));
        let gone = projectile(ProjectileKind::Fireball, Vec2::new(258.0, 20.0), Vec2::new(4.0, 0.0));
        let out = update_projectiles(vec![flying, into_floor, gone], &grid, &tuning);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].pos, Vec2::new(24.0, 20.0));
    }

    #[test]
    fn test_morning_star_arcs() {
        let tuning = Tuning::default();
        let grid = TileGrid::new(10, 10);
        let star = projectile(ProjectileKind::MorningStar, Vec2::new(20.0, 60.0), Vec2::new(2.5, -4.0));
        let out = update_projectiles(vec![star], &grid, &tuning);
        assert!((out[0].vel.y - (-4.0 + tuning.gravity / 2.0)).abs() < 1e-6);
        let bullet = projectile(ProjectileKind::EnemyBullet, Vec2::new(20.0, 60.0), Vec2::new(2.5, -1.0));
        let out = update_projectiles(vec![bullet], &grid, &tuning);
        assert_eq!(out[0].vel.y, -1.0);
    }

    #[test]
    fn test_hazard_expiry() {
        let lava = Hazard {
            id: 1,
            kind: HazardKind::Lava,
            pos: Vec2::ZERO,
            size: Vec2::new(16.0, 8.0),
            vel: Vec2::ZERO,
            duration: 100.0,
        };
        let left = update_hazards(&[lava], 60.0);
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].duration, 40.0);
        assert!(update_hazards(&left, 40.0).is_empty());
    }
}
