//! Arena orchestration: owns the grid, every entity collection, the base,
//! the economy, and the wave scheduler. Per-tick logic lives in focused
//! submodules; this file wires them together.

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::{Rng, SeedableRng};
use slotmap::SlotMap;

use crate::config::ArenaConfig;
use crate::mapgen;
use crate::state::{ArenaState, Player};
use crate::types::*;

mod actions;
mod advance;
mod combat;
mod waves;


#[derive(Clone, Debug)]
struct Message {
    text: String,
    remaining: f32,
}

const MESSAGE_DURATION: f32 = 2.0;

pub struct Arena {
    config: ArenaConfig,
    rng: ChaCha8Rng,
    state: ArenaState,
    mode: SimMode,
    tick_count: u64,
    /// Turret type currently selected while in placement mode.
    placement_kind: TurretKind,
    /// Turret whose upgrade panel is open, if any.
    upgrade_target: Option<TurretId>,
    message: Option<Message>,
    events: Vec<ArenaEvent>,
}

impl Arena {
    /// Builds a fresh session: generates and repairs the maze, carves the
    /// base room, and spawns the player at the base center.
    pub fn new(config: ArenaConfig) -> Self {
        let (grid, base_cell) = mapgen::generate_grid(&config);
        let player = Player::spawn(grid.cell_center(base_cell, config.tile_size));

        let state = ArenaState {
            grid,
            base_cell,
            base_hp: config.starting_base_hp,
            wave: 1,
            spawn_timer: config.first_wave_delay,
            enemies: SlotMap::with_key(),
            bullets: SlotMap::with_key(),
            pickups: SlotMap::with_key(),
            turrets: SlotMap::with_key(),
            player,
            camera: Vec2::ZERO,
        };

        // The maze consumes the seed directly; the live-session stream is
        // decorrelated so wave spawns do not mirror layout randomness.
        let rng = ChaCha8Rng::seed_from_u64(mix_seed(config.seed, 0x51_AB));

        let mut arena = Self {
            config,
            rng,
            state,
            mode: SimMode::Running,
            tick_count: 0,
            placement_kind: TurretKind::Kinetic,
            upgrade_target: None,
            message: None,
            events: Vec::new(),
        };
        arena.update_camera();
        arena
    }

    /// Tears the session down and rebuilds it with a fresh seed drawn from
    /// the session stream. The only way out of a destroyed base.
    pub fn restart(&mut self) {
        let seed = self.rng.next_u64();
        let config = ArenaConfig { seed, ..self.config.clone() };
        *self = Arena::new(config);
    }

    pub fn state(&self) -> &ArenaState {
        &self.state
    }

    pub fn mode(&self) -> SimMode {
        self.mode
    }

    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Camera top-left offset, already clamped to map bounds.
    pub fn camera(&self) -> Vec2 {
        self.state.camera
    }

    pub fn placement_kind(&self) -> TurretKind {
        self.placement_kind
    }

    pub fn upgrade_target(&self) -> Option<TurretId> {
        self.upgrade_target
    }

    /// Transient informational message for the HUD, if one is live.
    pub fn message(&self) -> Option<&str> {
        self.message.as_ref().map(|message| message.text.as_str())
    }

    pub fn events(&self) -> &[ArenaEvent] {
        &self.events
    }

    pub fn take_events(&mut self) -> Vec<ArenaEvent> {
        std::mem::take(&mut self.events)
    }

    /// Order-insensitive digest of the observable session state, for
    /// determinism checks in tooling and tests.
    pub fn snapshot_hash(&self) -> u64 {
        use std::hash::Hasher;
        use xxhash_rust::xxh3::Xxh3;

        let mut hasher = Xxh3::new();
        hasher.write_u64(self.config.seed);
        hasher.write_u64(self.tick_count);
        hasher.write_u32(self.state.wave);
        hasher.write_u32(self.state.base_hp.to_bits());
        hasher.write_u32(self.state.player.pos.x.to_bits());
        hasher.write_u32(self.state.player.pos.y.to_bits());
        hasher.write_u64(self.state.enemies.len() as u64);
        hasher.write_u64(self.state.bullets.len() as u64);
        hasher.write_u64(self.state.pickups.len() as u64);
        hasher.write_u64(self.state.turrets.len() as u64);
        hasher.finish()
    }

    fn say(&mut self, text: impl Into<String>) {
        self.message = Some(Message { text: text.into(), remaining: MESSAGE_DURATION });
    }

    fn reject(&mut self, reason: Rejection) {
        self.events.push(ArenaEvent::Rejected { reason });
        self.say(reason.text());
    }

    /// Bernoulli roll on the session stream.
    fn roll(&mut self, probability: f32) -> bool {
        let sample = self.rng.next_u32() as f64 / u32::MAX as f64;
        sample < probability as f64
    }

    /// Uniform sample in `[low, high)` on the session stream.
    fn sample_range(&mut self, low: i32, high: i32) -> i32 {
        debug_assert!(low < high);
        low + (self.rng.next_u32() % (high - low) as u32) as i32
    }
}

fn mix_seed(seed: u64, stream: u64) -> u64 {
    let mut mixed = seed ^ stream.wrapping_mul(0xD6E8_FD9A_5B89_7A4D);
    mixed ^= mixed >> 33;
    mixed = mixed.wrapping_mul(0xFF51_AFD7_ED55_8CCD);
    mixed ^= mixed >> 33;
    mixed = mixed.wrapping_mul(0xC4CE_B9FE_1A85_EC53);
    mixed ^ (mixed >> 33)
}
