use anyhow::Result;
use arena_core::{Arena, ArenaConfig, Pos, TileKind};
use clap::Parser;
use serde::Serialize;

/// Generates an arena layout for a seed and prints it, either as an ASCII
/// map or as a JSON summary for diffing across revisions.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    /// Emit a JSON summary instead of the ASCII map
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Serialize)]
struct MapSummary {
    seed: u64,
    width: usize,
    height: usize,
    floor_cells: usize,
    base_cell: (i32, i32),
    snapshot_hash: u64,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let arena = Arena::new(ArenaConfig::with_seed(args.seed));
    let state = arena.state();
    let grid = &state.grid;

    if args.json {
        let summary = MapSummary {
            seed: args.seed,
            width: grid.width(),
            height: grid.height(),
            floor_cells: grid.floor_cells().len(),
            base_cell: (state.base_cell.y, state.base_cell.x),
            snapshot_hash: arena.snapshot_hash(),
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    for y in 0..grid.height() as i32 {
        let mut row = String::with_capacity(grid.width());
        for x in 0..grid.width() as i32 {
            let cell = Pos { y, x };
            row.push(if cell == state.base_cell {
                'B'
            } else if grid.tile_at(cell) == TileKind::Wall {
                '#'
            } else {
                '.'
            });
        }
        println!("{row}");
    }
    println!("seed {}: {} floor cells", args.seed, grid.floor_cells().len());

    Ok(())
}
