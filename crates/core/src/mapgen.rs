//! Procedural arena generation: randomized maze carving, base room
//! carving, and the connectivity repair pass that makes every floor cell
//! reachable from the base.

mod connectivity;
mod maze;

pub use connectivity::repair_connectivity;
pub use maze::{carve_maze, open_loops};

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::SeedableRng;

use crate::config::ArenaConfig;
use crate::state::Grid;
use crate::types::{Pos, TileKind};

/// Builds the session grid for a config. The result is frozen afterwards:
/// every floor cell is guaranteed reachable from the base cell.
pub fn generate_grid(config: &ArenaConfig) -> (Grid, Pos) {
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let mut grid = carve_maze(&mut rng, config.grid_width, config.grid_height);
    open_loops(&mut rng, &mut grid);

    let base_cell =
        Pos { y: (config.grid_height / 2) as i32, x: (config.grid_width / 2) as i32 };
    carve_base_room(&mut grid, base_cell, config.base_room_half);

    repair_connectivity(&mut grid, base_cell);
    (grid, base_cell)
}

/// Opens a square room around the base cell. This can strand maze pockets
/// behind the room's former walls, which is exactly what the repair pass
/// exists to fix.
fn carve_base_room(grid: &mut Grid, base_cell: Pos, half: i32) {
    for y in (base_cell.y - half)..=(base_cell.y + half) {
        for x in (base_cell.x - half)..=(base_cell.x + half) {
            grid.set_tile(Pos { y, x }, TileKind::Floor);
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use xxhash_rust::xxh3::xxh3_64;

    use super::*;
    use crate::pathfinding::reachable_cells;

    fn config(seed: u64, width: usize, height: usize) -> ArenaConfig {
        ArenaConfig { seed, grid_width: width, grid_height: height, ..ArenaConfig::default() }
    }

    fn fully_connected(grid: &Grid, base_cell: Pos) -> bool {
        let reached = reachable_cells(grid, base_cell);
        grid.floor_cells().iter().all(|&cell| reached[grid.index(cell)])
    }

    #[test]
    fn same_seed_produces_byte_identical_grids() {
        let (a, _) = generate_grid(&config(987_654, 32, 20));
        let (b, _) = generate_grid(&config(987_654, 32, 20));
        assert_eq!(a.canonical_bytes(), b.canonical_bytes());
        assert_eq!(xxh3_64(&a.canonical_bytes()), xxh3_64(&b.canonical_bytes()));
    }

    #[test]
    fn different_seeds_produce_different_grids() {
        let (a, _) = generate_grid(&config(1, 32, 20));
        let (b, _) = generate_grid(&config(2, 32, 20));
        assert_ne!(a.canonical_bytes(), b.canonical_bytes());
    }

    #[test]
    fn base_room_is_open_around_the_base_cell() {
        let (grid, base_cell) = generate_grid(&config(7, 32, 20));
        for dy in -2..=2 {
            for dx in -2..=2 {
                let pos = Pos { y: base_cell.y + dy, x: base_cell.x + dx };
                assert_eq!(grid.tile_at(pos), TileKind::Floor);
            }
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(256))]
        #[test]
        fn every_floor_cell_is_reachable_from_the_base(
            seed in any::<u64>(),
            width in 11_usize..48,
            height in 11_usize..32
        ) {
            let (grid, base_cell) = generate_grid(&config(seed, width, height));
            prop_assert!(
                fully_connected(&grid, base_cell),
                "seed={seed}, {width}x{height} left unreachable floor cells"
            );
        }
    }
}
