//! Grid pathfinding queried periodically by every enemy. Returns only the
//! next step toward the goal, not a full path; callers cache the result on
//! their own refresh timer to bound BFS cost.

use std::collections::VecDeque;

use crate::state::Grid;
use crate::types::Pos;

/// Breadth-first next step from `source` toward `goal` over floor cells.
/// Returns `source` when the goal is unreachable (should be structurally
/// impossible after connectivity repair) so callers degrade to staying put.
pub fn next_step_toward(grid: &Grid, source: Pos, goal: Pos) -> Pos {
    if source == goal || !grid.in_bounds(source) {
        return source;
    }

    let mut came_from: Vec<Option<Pos>> = vec![None; grid.width() * grid.height()];
    let mut visited = vec![false; grid.width() * grid.height()];
    let mut queue = VecDeque::from([source]);
    visited[grid.index(source)] = true;

    let mut reached_goal = false;
    'search: while let Some(current) = queue.pop_front() {
        for neighbor in current.neighbors() {
            if !grid.is_floor(neighbor) {
                continue;
            }
            let idx = grid.index(neighbor);
            if visited[idx] {
                continue;
            }
            visited[idx] = true;
            came_from[idx] = Some(current);
            if neighbor == goal {
                reached_goal = true;
                break 'search;
            }
            queue.push_back(neighbor);
        }
    }

    if !reached_goal {
        return source;
    }

    // Walk predecessors back from the goal until the cell whose
    // predecessor is the source; that cell is the first step.
    let mut current = goal;
    while let Some(previous) = came_from[grid.index(current)] {
        if previous == source {
            return current;
        }
        current = previous;
    }
    source
}

/// Flood fill over floor cells, 4-directional. Used by connectivity repair
/// and by invariant checks in tests and tooling.
pub fn reachable_cells(grid: &Grid, start: Pos) -> Vec<bool> {
    let mut reached = vec![false; grid.width() * grid.height()];
    if !grid.is_floor(start) {
        return reached;
    }

    let mut queue = VecDeque::from([start]);
    reached[grid.index(start)] = true;
    while let Some(current) = queue.pop_front() {
        for neighbor in current.neighbors() {
            if !grid.is_floor(neighbor) {
                continue;
            }
            let idx = grid.index(neighbor);
            if !reached[idx] {
                reached[idx] = true;
                queue.push_back(neighbor);
            }
        }
    }
    reached
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TileKind;

    fn open_grid(width: usize, height: usize) -> Grid {
        let mut grid = Grid::new_filled(width, height, TileKind::Wall);
        for y in 1..(height - 1) {
            for x in 1..(width - 1) {
                grid.set_tile(Pos { y: y as i32, x: x as i32 }, TileKind::Floor);
            }
        }
        grid
    }

    #[test]
    fn straight_corridor_steps_directly_toward_goal() {
        let grid = open_grid(9, 5);
        let step = next_step_toward(&grid, Pos { y: 2, x: 2 }, Pos { y: 2, x: 6 });
        assert_eq!(step, Pos { y: 2, x: 3 });
    }

    #[test]
    fn step_routes_around_walls() {
        let mut grid = open_grid(9, 7);
        for y in 1..5 {
            grid.set_tile(Pos { y, x: 4 }, TileKind::Wall);
        }
        let step = next_step_toward(&grid, Pos { y: 2, x: 3 }, Pos { y: 2, x: 5 });
        // The only opening is the bottom row, so the first step heads down.
        assert_eq!(step, Pos { y: 3, x: 3 });
    }

    #[test]
    fn step_is_shortest_path_successor() {
        let grid = open_grid(12, 12);
        let source = Pos { y: 5, x: 2 };
        let goal = Pos { y: 5, x: 9 };
        let mut current = source;
        let mut hops = 0;
        while current != goal {
            current = next_step_toward(&grid, current, goal);
            hops += 1;
            assert!(hops <= 20, "walk must terminate");
        }
        assert_eq!(hops, source.manhattan(goal), "open grid path must be manhattan-optimal");
    }

    #[test]
    fn repeated_queries_are_idempotent() {
        let mut grid = open_grid(10, 10);
        grid.set_tile(Pos { y: 4, x: 4 }, TileKind::Wall);
        let source = Pos { y: 4, x: 3 };
        let goal = Pos { y: 4, x: 6 };
        let first = next_step_toward(&grid, source, goal);
        for _ in 0..5 {
            assert_eq!(next_step_toward(&grid, source, goal), first);
        }
    }

    #[test]
    fn unreachable_goal_degrades_to_staying_put() {
        let mut grid = open_grid(9, 9);
        let pocket = Pos { y: 4, x: 4 };
        for neighbor in pocket.neighbors() {
            grid.set_tile(neighbor, TileKind::Wall);
        }
        assert_eq!(next_step_toward(&grid, pocket, Pos { y: 1, x: 1 }), pocket);
    }

    #[test]
    fn source_at_goal_returns_source() {
        let grid = open_grid(5, 5);
        let cell = Pos { y: 2, x: 2 };
        assert_eq!(next_step_toward(&grid, cell, cell), cell);
    }

    #[test]
    fn reachable_cells_covers_exactly_the_connected_region() {
        let mut grid = open_grid(9, 5);
        for y in 0..5 {
            grid.set_tile(Pos { y, x: 4 }, TileKind::Wall);
        }
        let reached = reachable_cells(&grid, Pos { y: 2, x: 2 });
        assert!(reached[grid.index(Pos { y: 1, x: 3 })]);
        assert!(!reached[grid.index(Pos { y: 1, x: 5 })], "cells past the divider stay unreached");
    }
}
