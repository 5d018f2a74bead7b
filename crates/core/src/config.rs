//! Session configuration. Everything the simulation previously would have
//! reached for as an ambient constant is threaded through here instead.

use crate::types::Vec2;

#[derive(Clone, Debug)]
pub struct ArenaConfig {
    pub grid_width: usize,
    pub grid_height: usize,
    pub tile_size: f32,
    /// Viewport extent used only to clamp the exported camera offset.
    pub viewport: Vec2,
    pub seed: u64,
    pub starting_base_hp: f32,
    pub max_base_hp: f32,
    pub deposit_radius: f32,
    /// Countdown before the first wave spawns.
    pub first_wave_delay: f32,
    /// Half-extent of the square room carved around the base cell.
    pub base_room_half: i32,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            grid_width: 32,
            grid_height: 20,
            tile_size: 32.0,
            viewport: Vec2::new(1024.0, 640.0),
            seed: 0,
            starting_base_hp: 100.0,
            max_base_hp: 200.0,
            deposit_radius: 48.0,
            first_wave_delay: 3.0,
            base_room_half: 2,
        }
    }
}

impl ArenaConfig {
    pub fn with_seed(seed: u64) -> Self {
        Self { seed, ..Self::default() }
    }

    pub fn map_extent(&self) -> Vec2 {
        Vec2::new(
            self.grid_width as f32 * self.tile_size,
            self.grid_height as f32 * self.tile_size,
        )
    }
}
