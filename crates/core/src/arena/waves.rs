//! Wave scheduling: a shrinking countdown that spills enemies onto random
//! boundary floor cells, with tier rising every fourth wave.

use super::*;
use crate::content;
use crate::state::Enemy;

impl Arena {
    pub(super) fn update_spawner(&mut self, dt: f32) {
        self.state.spawn_timer -= dt;
        if self.state.spawn_timer <= 0.0 {
            self.spawn_wave();
        }
    }

    pub(super) fn spawn_wave(&mut self) {
        let wave = self.state.wave;
        let count = content::wave_size(wave);
        let tier = content::wave_tier(wave);
        let tile = self.config.tile_size;

        let mut spawned = 0;
        for _ in 0..count {
            // Rejection-sample boundary cells; dense mazes always have
            // open edge-adjacent cells long before the attempt cap.
            for _attempt in 0..100 {
                let cell = self.random_boundary_cell();
                if self.state.grid.is_floor(cell) {
                    let enemy = Enemy::spawn(cell, tier, &self.state.grid, tile);
                    self.state.enemies.insert(enemy);
                    spawned += 1;
                    break;
                }
            }
        }

        self.events.push(ArenaEvent::WaveSpawned { wave, count: spawned });
        self.say(format!("Wave {wave}!"));
        self.state.wave += 1;
        self.state.spawn_timer = content::spawn_interval(self.state.wave);
    }

    /// Random cell on the arena rim, one tile inside the outer wall.
    fn random_boundary_cell(&mut self) -> Pos {
        let width = self.state.grid.width() as i32;
        let height = self.state.grid.height() as i32;

        if self.roll(0.5) {
            let x = self.sample_range(1, width - 1);
            let y = if self.roll(0.5) { 1 } else { height - 2 };
            Pos { y, x }
        } else {
            let x = if self.roll(0.5) { 1 } else { width - 2 };
            let y = self.sample_range(1, height - 1);
            Pos { y, x }
        }
    }
}
