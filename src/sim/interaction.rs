//! Combat and contact resolution
//!
//! Runs after movement and AI on the moved entities. Order matters: trample,
//! melee, projectiles, enemy contact, hazards, then cleanup of the dead.

use glam::Vec2;

use super::collision::{Aabb, Body};
use super::state::{Enemy, EnemyKind, EntityIds, Hazard, HazardKind, Owner, Player, Projectile, ProjectileKind, Weapon};
use crate::consts::TILE_SIZE;
use crate::tuning::Tuning;

/// Everything that changed this tick
#[derive(Debug, Clone)]
pub struct Interactions {
    pub player: Player,
    /// Survivors only
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    /// Lava left behind by lava slimes
    pub new_hazards: Vec<Hazard>,
    pub score_gained: u32,
    pub defeated: usize,
}

/// Melee reach in front of the player
pub fn melee_hitbox(player: &Player, tuning: &Tuning) -> Aabb {
    let x = if player.facing.sign() > 0.0 {
        player.pos.x + player.size.x
    } else {
        player.pos.x - tuning.attack_range
    };
    Aabb::new(Vec2::new(x, player.pos.y), Vec2::new(tuning.attack_range, player.size.y))
}

/// Resolve all hits for one tick
pub fn resolve(
    player: &Player,
    enemies: Vec<Enemy>,
    projectiles: Vec<Projectile>,
    hazards: &[Hazard],
    tuning: &Tuning,
    ids: &mut EntityIds,
) -> Interactions {
    let mut out = player.clone();
    let mut enemies = enemies;

    // Riding tramples everything it touches
    if player.on_horse {
        for enemy in enemies.iter_mut() {
            if enemy.is_alive() && player.overlaps(&*enemy) {
                enemy.health = 0;
            }
        }
    }

    if player.is_attacking && player.current_weapon.is_melee() {
        let hitbox = melee_hitbox(player, tuning);
        let damage = match player.current_weapon {
            Weapon::Axe => tuning.axe_damage,
            _ => tuning.sword_damage,
        };
        for enemy in enemies.iter_mut() {
            if enemy.is_alive() && hitbox.overlaps(&enemy.aabb()) {
                enemy.health -= damage;
            }
        }
    }

    let projectiles = projectiles
        .into_iter()
        .filter(|projectile| {
            let mut hit = false;
            match projectile.owner {
                Owner::Player => {
                    let damage = match projectile.kind {
                        ProjectileKind::MorningStar => tuning.morning_star_damage,
                        _ => tuning.fireball_damage,
                    };
                    for enemy in enemies.iter_mut() {
                        if enemy.is_alive() && projectile.overlaps(&*enemy) {
                            enemy.health -= damage;
                            hit = true;
                        }
                    }
                }
                Owner::Enemy => {
                    if out.is_vulnerable() && projectile.overlaps(&out) {
                        out.hurt(tuning.enemy_projectile_damage, tuning);
                        hit = true;
                    }
                }
            }
            !hit
        })
        .collect();

    // Contact uses the moved player box and fall speed
    if out.is_vulnerable() {
        for enemy in enemies.iter_mut() {
            if !enemy.is_alive() || !player.overlaps(&*enemy) {
                continue;
            }
            let stomping = player.vel.y > 0.0 && player.pos.y + player.size.y < enemy.pos.y + enemy.size.y / 2.0;
            if stomping && enemy.kind.is_stompable() {
                enemy.health -= 1;
                out.vel.y = tuning.stomp_bounce;
            } else {
                out.hurt(tuning.contact_damage, tuning);
            }
        }
    }

    if out.is_vulnerable() {
        for hazard in hazards {
            if hazard.kind == HazardKind::Lava && player.overlaps(hazard) {
                out.hurt(tuning.lava_damage, tuning);
            }
        }
    }

    let mut score_gained = 0;
    let mut defeated = 0;
    let mut new_hazards = Vec::new();
    enemies.retain(|enemy| {
        if enemy.is_alive() {
            return true;
        }
        defeated += 1;
        score_gained += enemy.kind.score(tuning);
        if enemy.kind == EnemyKind::LavaSlime {
            new_hazards.push(Hazard {
                id: ids.next_id(),
                kind: HazardKind::Lava,
                pos: Vec2::new(enemy.pos.x, enemy.pos.y + TILE_SIZE / 2.0),
                size: Vec2::new(TILE_SIZE, TILE_SIZE / 2.0),
                vel: Vec2::ZERO,
                duration: tuning.lava_duration,
            });
        }
        false
    });

    Interactions {
        player: out,
        enemies,
        projectiles,
        new_hazards,
        score_gained,
        defeated,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::physics::update_hazards;
    use crate::sim::state::{Facing, PROJECTILE_SIZE};

    fn player_at(x: f32, y: f32) -> Player {
        Player::new(Vec2::new(x, y), &Tuning::default())
    }

    fn enemy(id: u32, kind: EnemyKind, x: f32, y: f32) -> Enemy {
        Enemy::spawn(id, kind, Vec2::new(x, y), &Tuning::default())
    }

    fn run(player: &Player, enemies: Vec<Enemy>, projectiles: Vec<Projectile>, hazards: &[Hazard]) -> Interactions {
        let mut ids = EntityIds::default();
        resolve(player, enemies, projectiles, hazards, &Tuning::default(), &mut ids)
    }

    fn bolt(owner: Owner, kind: ProjectileKind, x: f32, y: f32) -> Projectile {
        Projectile {
            id: 77,
            kind,
            owner,
            pos: Vec2::new(x, y),
            size: PROJECTILE_SIZE,
            vel: Vec2::ZERO,
            facing: Facing::Right,
        }
    }

    #[test]
    fn test_sword_kills_slime() {
        let mut player = player_at(0.0, 100.0);
        player.has_sword = true;
        player.current_weapon = Weapon::Sword;
        player.is_attacking = true;
        player.invincibility_cooldown = 500.0;
        let result = run(&player, vec![enemy(1, EnemyKind::Slime, 20.0, 100.0)], Vec::new(), &[]);
        assert!(result.enemies.is_empty());
        assert_eq!(result.score_gained, 100);
        assert_eq!(result.defeated, 1);
    }

    #[test]
    fn test_melee_hitbox_faces_left() {
        let tuning = Tuning::default();
        let mut player = player_at(100.0, 50.0);
        player.facing = Facing::Left;
        let hitbox = melee_hitbox(&player, &tuning);
        assert_eq!(hitbox.pos, Vec2::new(82.0, 50.0));
        assert_eq!(hitbox.size, Vec2::new(18.0, 16.0));
    }

    #[test]
    fn test_axe_hits_harder() {
        let mut player = player_at(0.0, 100.0);
        player.invincibility_cooldown = 500.0;
        player.is_attacking = true;
        player.current_weapon = Weapon::Axe;
        let result = run(&player, vec![enemy(1, EnemyKind::Shooter, 20.0, 100.0)], Vec::new(), &[]);
        assert_eq!(result.defeated, 1);
        assert_eq!(result.score_gained, 300);
    }

    #[test]
    fn test_stomp_slime_bounces() {
        let tuning = Tuning::default();
        let mut player = player_at(100.0, 90.0);
        player.vel.y = 3.0;
        let result = run(&player, vec![enemy(1, EnemyKind::Slime, 100.0, 100.0)], Vec::new(), &[]);
        assert_eq!(result.defeated, 1);
        assert_eq!(result.player.vel.y, tuning.stomp_bounce);
        assert_eq!(result.player.health, tuning.player_max_health);
    }

    #[test]
    fn test_stomp_spiky_hurts_without_bounce() {
        let tuning = Tuning::default();
        let mut player = player_at(100.0, 90.0);
        player.vel.y = 3.0;
        let result = run(&player, vec![enemy(1, EnemyKind::SpikySlime, 100.0, 100.0)], Vec::new(), &[]);
        assert_eq!(result.enemies.len(), 1);
        assert_eq!(result.enemies[0].health, 2);
        assert_eq!(result.player.health, tuning.player_max_health - 1);
        assert_eq!(result.player.invincibility_cooldown, tuning.invincibility_duration);
        assert_eq!(result.player.vel.y, 3.0);
    }

    #[test]
    fn test_every_side_contact_hurts() {
        let tuning = Tuning::default();
        let player = player_at(100.0, 100.0);
        let enemies = vec![
            enemy(1, EnemyKind::Slime, 105.0, 100.0),
            enemy(2, EnemyKind::Bat, 95.0, 100.0),
        ];
        let result = run(&player, enemies, Vec::new(), &[]);
        assert_eq!(result.player.health, tuning.player_max_health - 2);
        assert_eq!(result.enemies.len(), 2);
    }

    #[test]
    fn test_landing_on_spiky_and_slime_together() {
        let tuning = Tuning::default();
        let mut player = player_at(100.0, 90.0);
        player.vel.y = 3.0;
        let enemies = vec![
            enemy(1, EnemyKind::SpikySlime, 96.0, 100.0),
            enemy(2, EnemyKind::Slime, 104.0, 100.0),
        ];
        let result = run(&player, enemies, Vec::new(), &[]);
        assert_eq!(result.defeated, 1);
        assert_eq!(result.score_gained, 100);
        assert_eq!(result.enemies.len(), 1);
        assert_eq!(result.enemies[0].id, 1);
        assert_eq!(result.enemies[0].health, 2);
        assert_eq!(result.player.health, tuning.player_max_health - 1);
        assert_eq!(result.player.vel.y, tuning.stomp_bounce);
    }

    #[test]
    fn test_invincible_player_ignores_contact() {
        let tuning = Tuning::default();
        let mut player = player_at(100.0, 100.0);
        player.invincibility_bonus_cooldown = 5000.0;
        let result = run(&player, vec![enemy(1, EnemyKind::Ghost, 100.0, 100.0)], Vec::new(), &[]);
        assert_eq!(result.player.health, tuning.player_max_health);
    }

    #[test]
    fn test_lava_slime_leaves_lava() {
        let tuning = Tuning::default();
        let mut player = player_at(0.0, 100.0);
        player.has_sword = true;
        player.current_weapon = Weapon::Sword;
        player.is_attacking = true;
        player.invincibility_cooldown = 500.0;
        let result = run(&player, vec![enemy(1, EnemyKind::LavaSlime, 20.0, 100.0)], Vec::new(), &[]);
        assert_eq!(result.score_gained, 200);
        assert_eq!(result.new_hazards.len(), 1);
        let lava = &result.new_hazards[0];
        assert_eq!(lava.kind, HazardKind::Lava);
        assert_eq!(lava.pos, Vec2::new(20.0, 108.0));
        assert_eq!(lava.size, Vec2::new(16.0, 8.0));
        assert_eq!(lava.duration, tuning.lava_duration);

        let remaining = update_hazards(&result.new_hazards, 1999.0);
        assert_eq!(remaining.len(), 1);
        assert!(update_hazards(&remaining, 1.0).is_empty());
    }

    #[test]
    fn test_lava_burns() {
        let tuning = Tuning::default();
        let player = player_at(100.0, 100.0);
        let lava = Hazard {
            id: 3,
            kind: HazardKind::Lava,
            pos: Vec2::new(100.0, 108.0),
            size: Vec2::new(16.0, 8.0),
            vel: Vec2::ZERO,
            duration: 500.0,
        };
        let result = run(&player, Vec::new(), Vec::new(), &[lava]);
        assert_eq!(result.player.health, tuning.player_max_health - 1);
    }

    #[test]
    fn test_horse_tramples() {
        let tuning = Tuning::default();
        let mut player = player_at(100.0, 100.0);
        player.on_horse = true;
        let enemies = vec![
            enemy(1, EnemyKind::Ghost, 104.0, 100.0),
            enemy(2, EnemyKind::Slime, 300.0, 100.0),
        ];
        let result = run(&player, enemies, Vec::new(), &[]);
        assert_eq!(result.defeated, 1);
        assert_eq!(result.enemies[0].id, 2);
        assert_eq!(result.player.health, tuning.player_max_health);
    }

    #[test]
    fn test_player_projectiles() {
        let mut player = player_at(0.0, 0.0);
        player.invincibility_cooldown = 500.0;
        let enemies = vec![enemy(1, EnemyKind::Ghost, 200.0, 100.0)];
        let projectiles = vec![
            bolt(Owner::Player, ProjectileKind::Fireball, 204.0, 104.0),
            bolt(Owner::Player, ProjectileKind::Fireball, 400.0, 104.0),
        ];
        let result = run(&player, enemies, projectiles, &[]);
        assert_eq!(result.projectiles.len(), 1);
        assert_eq!(result.projectiles[0].pos.x, 400.0);
        assert_eq!(result.enemies[0].health, 1);

        let result = run(
            &player,
            result.enemies,
            vec![bolt(Owner::Player, ProjectileKind::MorningStar, 204.0, 104.0)],
            &[],
        );
        assert!(result.projectiles.is_empty());
        assert_eq!(result.score_gained, 350);
    }

    #[test]
    fn test_enemy_bullet_hits_vulnerable_player() {
        let tuning = Tuning::default();
        let player = player_at(100.0, 100.0);
        let bullet = bolt(Owner::Enemy, ProjectileKind::EnemyBullet, 104.0, 104.0);
        let result = run(&player, Vec::new(), vec![bullet.clone()], &[]);
        assert!(result.projectiles.is_empty());
        assert_eq!(result.player.health, tuning.player_max_health - 1);

        let mut riding = player.clone();
        riding.on_horse = true;
        let result = run(&riding, Vec::new(), vec![bullet], &[]);
        assert_eq!(result.projectiles.len(), 1);
    }
}
