//! Connectivity repair: after carving, every floor cell must be reachable
//! from the anchor (base) cell. Disconnected components are merged one at a
//! time, preferring a single wall knockdown and falling back to carving a
//! Manhattan corridor.

use std::collections::VecDeque;

use crate::pathfinding::reachable_cells;
use crate::state::Grid;
use crate::types::{Pos, TileKind};

const DIRS: [(i32, i32); 4] = [(-1, 0), (0, 1), (1, 0), (0, -1)];

/// Repairs the grid in place. Terminates because every iteration merges at
/// least one disconnected component into the anchor's region; the corridor
/// fallback cannot fail.
pub fn repair_connectivity(grid: &mut Grid, anchor: Pos) {
    debug_assert!(grid.is_floor(anchor), "anchor must be a floor cell");
    loop {
        let main = reachable_cells(grid, anchor);
        let Some(orphan) = first_unreached_floor(grid, &main) else {
            return;
        };
        let component = component_cells(grid, orphan);
        if !knock_shared_wall(grid, &component, &main) {
            carve_corridor(grid, &component, &main);
        }
    }
}

/// Scan-order first floor cell outside the anchor's region.
fn first_unreached_floor(grid: &Grid, main: &[bool]) -> Option<Pos> {
    grid.floor_cells().into_iter().find(|&cell| !main[grid.index(cell)])
}

/// All cells of the disconnected component containing `start`, in grid
/// scan order for deterministic repair decisions.
fn component_cells(grid: &Grid, start: Pos) -> Vec<Pos> {
    let mut member = vec![false; grid.width() * grid.height()];
    let mut queue = VecDeque::from([start]);
    member[grid.index(start)] = true;
    while let Some(current) = queue.pop_front() {
        for neighbor in current.neighbors() {
            if !grid.is_floor(neighbor) {
                continue;
            }
            let idx = grid.index(neighbor);
            if !member[idx] {
                member[idx] = true;
                queue.push_back(neighbor);
            }
        }
    }
    grid.floor_cells().into_iter().filter(|&cell| member[grid.index(cell)]).collect()
}

/// Cheap repair: find a wall cell separating the component from the main
/// region by exactly one tile and open it. First match in scan order wins.
fn knock_shared_wall(grid: &mut Grid, component: &[Pos], main: &[bool]) -> bool {
    for &cell in component {
        for (dy, dx) in DIRS {
            let wall = Pos { y: cell.y + dy, x: cell.x + dx };
            let beyond = Pos { y: cell.y + 2 * dy, x: cell.x + 2 * dx };
            if grid.is_wall(wall)
                && grid.in_bounds(wall)
                && grid.is_floor(beyond)
                && main[grid.index(beyond)]
            {
                grid.set_tile(wall, TileKind::Floor);
                return true;
            }
        }
    }
    false
}

/// Fallback: carve an L-shaped corridor (horizontal run, then vertical)
/// between the closest component/main cell pair by Manhattan distance.
fn carve_corridor(grid: &mut Grid, component: &[Pos], main: &[bool]) {
    let main_cells: Vec<Pos> =
        grid.floor_cells().into_iter().filter(|&cell| main[grid.index(cell)]).collect();

    let mut best: Option<(Pos, Pos, u32)> = None;
    for &from in component {
        for &to in &main_cells {
            let distance = from.manhattan(to);
            if best.is_none_or(|(_, _, best_distance)| distance < best_distance) {
                best = Some((from, to, distance));
            }
        }
    }
    let Some((from, to, _)) = best else {
        return;
    };

    let step_x = if to.x >= from.x { 1 } else { -1 };
    let mut x = from.x;
    while x != to.x {
        x += step_x;
        grid.set_tile(Pos { y: from.y, x }, TileKind::Floor);
    }
    let step_y = if to.y >= from.y { 1 } else { -1 };
    let mut y = from.y;
    while y != to.y {
        y += step_y;
        grid.set_tile(Pos { y, x: to.x }, TileKind::Floor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_fully_connected(grid: &Grid, anchor: Pos) -> bool {
        let reached = reachable_cells(grid, anchor);
        grid.floor_cells().iter().all(|&cell| reached[grid.index(cell)])
    }

    #[test]
    fn already_connected_grid_is_left_untouched() {
        let mut grid = Grid::new_filled(9, 9, TileKind::Wall);
        for x in 1..8 {
            grid.set_tile(Pos { y: 4, x }, TileKind::Floor);
        }
        let before = grid.canonical_bytes();
        repair_connectivity(&mut grid, Pos { y: 4, x: 1 });
        assert_eq!(grid.canonical_bytes(), before);
    }

    #[test]
    fn pocket_one_wall_away_is_reconnected_by_a_single_knockdown() {
        let mut grid = Grid::new_filled(9, 5, TileKind::Wall);
        for x in 1..4 {
            grid.set_tile(Pos { y: 2, x }, TileKind::Floor);
        }
        // One wall at x=4, pocket on the far side.
        for x in 5..8 {
            grid.set_tile(Pos { y: 2, x }, TileKind::Floor);
        }
        let floors_before = grid.floor_cells().len();
        repair_connectivity(&mut grid, Pos { y: 2, x: 1 });
        assert!(is_fully_connected(&grid, Pos { y: 2, x: 1 }));
        assert_eq!(grid.floor_cells().len(), floors_before + 1, "exactly one wall opened");
    }

    #[test]
    fn distant_pocket_falls_back_to_a_carved_corridor() {
        let mut grid = Grid::new_filled(13, 11, TileKind::Wall);
        grid.set_tile(Pos { y: 1, x: 1 }, TileKind::Floor);
        grid.set_tile(Pos { y: 9, x: 11 }, TileKind::Floor);
        repair_connectivity(&mut grid, Pos { y: 1, x: 1 });
        assert!(is_fully_connected(&grid, Pos { y: 1, x: 1 }));
    }

    #[test]
    fn many_isolated_pockets_all_merge_and_repair_terminates() {
        let mut grid = Grid::new_filled(15, 15, TileKind::Wall);
        let anchor = Pos { y: 7, x: 7 };
        grid.set_tile(anchor, TileKind::Floor);
        for &pos in &[
            Pos { y: 1, x: 1 },
            Pos { y: 1, x: 13 },
            Pos { y: 13, x: 1 },
            Pos { y: 13, x: 13 },
            Pos { y: 3, x: 7 },
        ] {
            grid.set_tile(pos, TileKind::Floor);
        }
        repair_connectivity(&mut grid, anchor);
        assert!(is_fully_connected(&grid, anchor));
    }

    #[test]
    fn knockdown_is_preferred_over_corridor_when_both_would_work() {
        let mut grid = Grid::new_filled(7, 7, TileKind::Wall);
        grid.set_tile(Pos { y: 3, x: 1 }, TileKind::Floor);
        grid.set_tile(Pos { y: 3, x: 3 }, TileKind::Floor);
        let floors_before = grid.floor_cells().len();
        repair_connectivity(&mut grid, Pos { y: 3, x: 1 });
        assert!(is_fully_connected(&grid, Pos { y: 3, x: 1 }));
        assert_eq!(
            grid.floor_cells().len(),
            floors_before + 1,
            "single shared wall should open instead of carving a corridor"
        );
    }
}
