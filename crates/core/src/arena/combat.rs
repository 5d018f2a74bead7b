//! Entity update passes: enemy steering and status effects, bullet flight
//! and impact, pickup collection, and turret targeting. Spawns and
//! removals go through side buffers applied after each pass.

use super::*;
use crate::content;
use crate::pathfinding::next_step_toward;
use crate::state::{Bullet, Pickup};

impl Arena {
    pub(super) fn update_enemies(&mut self, dt: f32) {
        let tile = self.config.tile_size;
        let ids: Vec<EnemyId> = self.state.enemies.keys().collect();
        let mut killed: Vec<EnemyId> = Vec::new();

        for id in ids {
            let base_cell = self.state.base_cell;
            let grid = &self.state.grid;
            let Some(enemy) = self.state.enemies.get_mut(id) else {
                continue;
            };

            // Effects first: the slow factor is read before ticking so a
            // stack applied this tick still bites this tick.
            let slow_factor = enemy.effects.slow_factor();
            enemy.hp -= enemy.effects.tick(dt);
            enemy.hit_timer = (enemy.hit_timer - dt).max(0.0);

            enemy.path_timer -= dt;
            if enemy.path_timer <= 0.0 {
                enemy.next_cell = next_step_toward(grid, enemy.cell, base_cell);
                enemy.path_timer = content::ENEMY_PATH_REFRESH;
            }

            let target = grid.cell_center(enemy.next_cell, tile);
            let direction = enemy.pos.direction_to(target);
            enemy.pos = enemy.pos.offset(direction.scaled(enemy.speed * slow_factor * dt));

            // Snap back to the last valid cell center rather than cutting
            // a corner through a wall.
            let landed = grid.cell_of(enemy.pos, tile);
            if grid.is_wall(landed) {
                enemy.pos = grid.cell_center(enemy.cell, tile);
            } else {
                enemy.cell = landed;
            }

            // Resident enemies drain the base continuously, no cooldown.
            if enemy.cell == base_cell {
                self.state.base_hp = (self.state.base_hp - enemy.contact_damage * dt).max(0.0);
            }

            if enemy.hp <= 0.0 {
                killed.push(id);
            }
        }

        for id in killed {
            if let Some(enemy) = self.state.enemies.remove(id) {
                self.events.push(ArenaEvent::EnemyKilled { tier: enemy.tier });
                self.drop_loot(enemy.pos);
            }
        }
    }

    /// Independent drop rolls; a single death can yield both kinds.
    fn drop_loot(&mut self, pos: Vec2) {
        if self.roll(content::DROP_SCRAP_CHANCE) {
            self.state.pickups.insert(Pickup { pos, kind: PickupKind::Scrap, pulse: 0.0 });
            self.events.push(ArenaEvent::PickupDropped { kind: PickupKind::Scrap });
        }
        if self.roll(content::DROP_CORE_CHANCE) {
            self.state.pickups.insert(Pickup { pos, kind: PickupKind::Core, pulse: 0.0 });
            self.events.push(ArenaEvent::PickupDropped { kind: PickupKind::Core });
        }
    }

    pub(super) fn update_bullets(&mut self, dt: f32) {
        let tile = self.config.tile_size;
        let ids: Vec<BulletId> = self.state.bullets.keys().collect();
        let mut expired: Vec<BulletId> = Vec::new();

        for id in ids {
            let grid = &self.state.grid;
            let enemies = &mut self.state.enemies;
            let Some(bullet) = self.state.bullets.get_mut(id) else {
                continue;
            };

            bullet.pos = bullet.pos.offset(bullet.vel.scaled(dt));
            bullet.traveled += bullet.vel.length() * dt;
            bullet.life -= dt;

            let mut alive = bullet.life > 0.0;
            if alive
                && bullet.traveled > content::BULLET_WALL_GRACE
                && grid.is_wall(grid.cell_of(bullet.pos, tile))
            {
                alive = false;
            }

            if alive {
                // First enemy found within the tier-scaled radius, in
                // iteration order; bullets are single-target.
                let hit = enemies.iter_mut().find(|(_, enemy)| {
                    bullet.pos.distance(enemy.pos)
                        < content::BULLET_HIT_RADIUS + enemy.tier as f32
                });
                if let Some((_, enemy)) = hit {
                    enemy.hp -= bullet.damage;
                    enemy.hit_timer = 0.1;
                    if let Some(dot) = bullet.dot {
                        enemy.effects.apply_dot(dot);
                    }
                    if let Some(slow) = bullet.slow {
                        enemy.effects.apply_slow(slow);
                    }
                    alive = false;
                }
            }

            if !alive {
                expired.push(id);
            }
        }

        for id in expired {
            self.state.bullets.remove(id);
        }
    }

    pub(super) fn update_pickups(&mut self, dt: f32) {
        for pickup in self.state.pickups.values_mut() {
            pickup.pulse = (pickup.pulse + dt) % 1.0;
        }

        let ids: Vec<PickupId> = self.state.pickups.keys().collect();
        for id in ids {
            let player = &self.state.player;
            if player.backpack.len() >= player.backpack_capacity {
                break;
            }
            let Some(pickup) = self.state.pickups.get(id) else {
                continue;
            };
            if player.pos.distance(pickup.pos) < content::PICKUP_RADIUS {
                let kind = pickup.kind;
                self.state.pickups.remove(id);
                self.state.player.backpack.push(kind);
                self.events.push(ArenaEvent::PickupCollected { kind });
            }
        }
    }

    pub(super) fn update_turrets(&mut self, dt: f32) {
        let tile = self.config.tile_size;
        let ids: Vec<TurretId> = self.state.turrets.keys().collect();
        let mut fired: Vec<Bullet> = Vec::new();

        for id in ids {
            let enemies = &self.state.enemies;
            let grid = &self.state.grid;
            let Some(turret) = self.state.turrets.get_mut(id) else {
                continue;
            };

            turret.cooldown = (turret.cooldown - dt).max(0.0);
            if turret.cooldown > 0.0 || enemies.is_empty() {
                continue;
            }

            let origin = grid.cell_center(turret.cell, tile);
            // Nearest by Euclidean distance; ties go to the first minimal
            // enemy in iteration order.
            let Some(target) = enemies
                .values()
                .min_by(|a, b| origin.distance(a.pos).total_cmp(&origin.distance(b.pos)))
            else {
                continue;
            };

            let stats = turret.stats();
            if origin.distance(target.pos) < stats.range {
                // Aimed at the target's current position, no lead.
                let direction = origin.direction_to(target.pos);
                let mut bullet =
                    Bullet::new(origin, direction.scaled(stats.projectile_speed), stats.damage);
                bullet.dot = stats.dot;
                bullet.slow = stats.slow;
                fired.push(bullet);
                turret.cooldown = stats.cooldown;
            }
        }

        for bullet in fired {
            self.state.bullets.insert(bullet);
        }
    }

    /// Spawns a player bullet toward the aim point. Fired as a discrete
    /// action, so it lands before the bullet pass of the same tick.
    pub(super) fn fire(&mut self, input: &TickInput) {
        if self.mode != SimMode::Running || self.state.player.fire_cooldown > 0.0 {
            return;
        }
        let player = &self.state.player;
        let mut direction = player.pos.direction_to(input.aim);
        if direction == Vec2::ZERO {
            direction = Vec2::new(1.0, 0.0);
        }
        let bullet = Bullet::new(
            player.pos,
            direction.scaled(content::PLAYER_BULLET_SPEED),
            player.attack_damage,
        );
        self.state.bullets.insert(bullet);
        self.state.player.fire_cooldown = content::PLAYER_FIRE_COOLDOWN;
    }
}
