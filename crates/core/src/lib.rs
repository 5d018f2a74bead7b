pub mod arena;
pub mod config;
pub mod content;
pub mod effects;
pub mod mapgen;
pub mod pathfinding;
pub mod state;
pub mod types;

pub use arena::Arena;
pub use config::ArenaConfig;
pub use effects::{DotPayload, SlowPayload, StatusEffects};
pub use state::{ArenaState, Bullet, Enemy, Grid, KitInventory, Pickup, Player, Turret};
pub use types::*;
