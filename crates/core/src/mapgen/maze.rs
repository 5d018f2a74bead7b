//! Randomized depth-first maze carving on a step-2 lattice, plus loop
//! opening so corridors are not a pure tree.

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::Rng;

use crate::state::Grid;
use crate::types::{Pos, TileKind};

const LATTICE_DIRS: [(i32, i32); 4] = [(2, 0), (-2, 0), (0, 2), (0, -2)];

/// Carves a maze from all-wall. Every carved cell is connected to the
/// start of the carve; connectivity can still break later when loop
/// opening and base carving punch extra holes.
pub fn carve_maze(rng: &mut ChaCha8Rng, width: usize, height: usize) -> Grid {
    let mut grid = Grid::new_filled(width, height, TileKind::Wall);
    let start = Pos { y: 1, x: 1 };
    grid.set_tile(start, TileKind::Floor);
    let mut stack = vec![start];

    while let Some(&cell) = stack.last() {
        let mut carved = false;
        for (dx, dy) in shuffled_dirs(rng) {
            let target = Pos { y: cell.y + dy, x: cell.x + dx };
            if !interior(&grid, target) || grid.tile_at(target) != TileKind::Wall {
                continue;
            }
            // Open the wall between, then the lattice target itself.
            let between = Pos { y: cell.y + dy / 2, x: cell.x + dx / 2 };
            grid.set_tile(between, TileKind::Floor);
            grid.set_tile(target, TileKind::Floor);
            stack.push(target);
            carved = true;
            break;
        }
        if !carved {
            stack.pop();
        }
    }
    grid
}

/// Opens `(w*h)/40` random interior cells to create loops.
pub fn open_loops(rng: &mut ChaCha8Rng, grid: &mut Grid) {
    let openings = (grid.width() * grid.height()) / 40;
    for _ in 0..openings {
        let x = range_sample(rng, 1, grid.width() as i32 - 1);
        let y = range_sample(rng, 1, grid.height() as i32 - 1);
        grid.set_tile(Pos { y, x }, TileKind::Floor);
    }
}

fn interior(grid: &Grid, pos: Pos) -> bool {
    pos.x >= 1
        && pos.y >= 1
        && (pos.x as usize) < grid.width() - 1
        && (pos.y as usize) < grid.height() - 1
}

fn shuffled_dirs(rng: &mut ChaCha8Rng) -> [(i32, i32); 4] {
    let mut dirs = LATTICE_DIRS;
    // Fisher-Yates over four entries.
    for i in (1..dirs.len()).rev() {
        let j = (rng.next_u32() as usize) % (i + 1);
        dirs.swap(i, j);
    }
    dirs
}

/// Uniform sample in `[low, high)`.
fn range_sample(rng: &mut ChaCha8Rng, low: i32, high: i32) -> i32 {
    debug_assert!(low < high);
    low + (rng.next_u32() % (high - low) as u32) as i32
}

#[cfg(test)]
mod tests {
    use rand_chacha::rand_core::SeedableRng;

    use super::*;

    #[test]
    fn carve_keeps_the_outer_ring_solid() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let grid = carve_maze(&mut rng, 21, 15);
        for x in 0..21 {
            assert_eq!(grid.tile_at(Pos { y: 0, x }), TileKind::Wall);
            assert_eq!(grid.tile_at(Pos { y: 14, x }), TileKind::Wall);
        }
        for y in 0..15 {
            assert_eq!(grid.tile_at(Pos { y, x: 0 }), TileKind::Wall);
            assert_eq!(grid.tile_at(Pos { y, x: 20 }), TileKind::Wall);
        }
    }

    #[test]
    fn carve_opens_a_substantial_floor_region() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let grid = carve_maze(&mut rng, 33, 21);
        let floors = grid.floor_cells().len();
        // The step-2 lattice alone gives 16*10 cells before walls between.
        assert!(floors >= 160, "only {floors} floor cells carved");
    }

    #[test]
    fn loop_opening_never_touches_the_border() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut grid = Grid::new_filled(16, 12, TileKind::Wall);
        open_loops(&mut rng, &mut grid);
        for x in 0..16 {
            assert_eq!(grid.tile_at(Pos { y: 0, x }), TileKind::Wall);
            assert_eq!(grid.tile_at(Pos { y: 11, x }), TileKind::Wall);
        }
    }
}
