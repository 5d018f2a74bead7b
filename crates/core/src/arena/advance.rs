//! Per-tick update loop. The pass order is load-bearing: player, enemies,
//! bullets, pickups, turrets, then the wave scheduler.

use super::*;
use crate::content;

impl Arena {
    /// Advances the simulation by `dt` seconds, consuming this tick's
    /// input exactly once. While suspended (shop, placement, upgrade
    /// panel) only the player stays interactive; after base destruction
    /// everything but `Restart` is frozen.
    pub fn tick(&mut self, dt: f32, input: &TickInput) {
        self.tick_count += 1;

        if let Some(message) = &mut self.message {
            message.remaining -= dt;
            if message.remaining <= 0.0 {
                self.message = None;
            }
        }

        for &action in &input.actions {
            self.apply_action(action, input);
        }

        if self.mode != SimMode::Suspended(SuspendReason::BaseDestroyed) {
            self.update_player(dt, input);
        }

        if self.mode == SimMode::Running {
            self.update_enemies(dt);
            self.update_bullets(dt);
            self.update_pickups(dt);
            self.update_turrets(dt);
            self.update_spawner(dt);

            if self.state.base_hp <= 0.0 {
                self.mode = SimMode::Suspended(SuspendReason::BaseDestroyed);
                self.events.push(ArenaEvent::BaseDestroyed);
                self.say("BASE DESTROYED! Restart to try again.");
            }
        }

        self.update_camera();
    }

    fn update_player(&mut self, dt: f32, input: &TickInput) {
        let tile = self.config.tile_size;
        let step = input.move_dir.scaled(self.state.player.speed * dt);

        // Axis-separated movement so the player slides along walls instead
        // of sticking to them.
        let player = &mut self.state.player;
        let next_x = Vec2::new(player.pos.x + step.x, player.pos.y);
        if !self.state.grid.is_wall(self.state.grid.cell_of(next_x, tile)) {
            player.pos.x = next_x.x;
        }
        let next_y = Vec2::new(player.pos.x, player.pos.y + step.y);
        if !self.state.grid.is_wall(self.state.grid.cell_of(next_y, tile)) {
            player.pos.y = next_y.y;
        }

        let extent = self.config.map_extent();
        player.pos.x = player.pos.x.clamp(0.0, extent.x - 1.0);
        player.pos.y = player.pos.y.clamp(0.0, extent.y - 1.0);

        player.fire_cooldown = (player.fire_cooldown - dt).max(0.0);

        // Contact damage only while combat is live.
        if self.mode == SimMode::Running {
            let player_pos = self.state.player.pos;
            let mut contact_damage = 0.0;
            for enemy in self.state.enemies.values() {
                if player_pos.distance(enemy.pos)
                    < content::CONTACT_RADIUS + enemy.tier as f32
                {
                    contact_damage += content::ENEMY_CONTACT_DPS * dt;
                }
            }
            if contact_damage > 0.0 {
                self.state.player.hp -= contact_damage;
                if self.state.player.hp <= 0.0 {
                    self.respawn_player();
                }
            }
        }
    }

    /// Knocked-out players return to the base with full hp, dropping the
    /// front of their backpack.
    fn respawn_player(&mut self) {
        let base_center = self.state.base_center(self.config.tile_size);
        let player = &mut self.state.player;
        player.pos = base_center;
        player.hp = player.max_hp;
        let lost = (player.backpack.len() as f32 * content::RESPAWN_BACKPACK_LOSS) as usize;
        player.backpack.drain(..lost);
        self.events.push(ArenaEvent::PlayerDowned);
        self.say("You were knocked out! Dropped some loot.");
    }

    pub(super) fn update_camera(&mut self) {
        let viewport = self.config.viewport;
        let extent = self.config.map_extent();
        let max_x = (extent.x - viewport.x).max(0.0);
        let max_y = (extent.y - viewport.y).max(0.0);
        self.state.camera = Vec2::new(
            (self.state.player.pos.x - viewport.x / 2.0).clamp(0.0, max_x),
            (self.state.player.pos.y - viewport.y / 2.0).clamp(0.0, max_y),
        );
    }
}
