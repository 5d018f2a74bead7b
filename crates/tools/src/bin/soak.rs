use anyhow::Result;
use arena_core::{
    Action, Arena, ArenaConfig, Pos, ShopItem, SimMode, SuspendReason, TickInput, TurretKind,
    UpgradeTrack, Vec2,
};
use clap::Parser;
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};
use serde::Serialize;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short, long, default_value_t = 10_000)]
    ticks: u32,
    /// Fixed timestep in seconds
    #[arg(short, long, default_value_t = 1.0 / 60.0)]
    dt: f32,
}

#[derive(Serialize)]
struct SoakSummary {
    seed: u64,
    ticks: u32,
    restarts: u32,
    max_wave: u32,
    base_hp: f32,
    enemies: usize,
    bullets: usize,
    pickups: usize,
    turrets: usize,
    snapshot_hash: u64,
}

fn choose<T: Clone>(rng: &mut ChaCha8Rng, slice: &[T]) -> T {
    let p = rng.next_u64() as usize % slice.len();
    slice[p].clone()
}

/// Random but plausible input: mostly movement and fire, with occasional
/// economy and placement actions sprinkled in.
fn random_input(rng: &mut ChaCha8Rng, arena: &Arena) -> TickInput {
    if arena.mode() == SimMode::Suspended(SuspendReason::BaseDestroyed) {
        return TickInput { actions: vec![Action::Restart], ..TickInput::default() };
    }

    let angle = (rng.next_u32() % 6283) as f32 / 1000.0;
    let move_dir = if rng.next_u32() % 5 == 0 {
        Vec2::ZERO
    } else {
        Vec2::new(angle.cos(), angle.sin())
    };
    let player = arena.state().player.pos;
    let aim = player.offset(Vec2::new(angle.cos() * 250.0, angle.sin() * 250.0));

    let mut actions = Vec::new();
    match rng.next_u32() % 16 {
        0..=7 => actions.push(Action::Fire),
        8 => actions.push(Action::Deposit),
        9 => actions.push(Action::OpenShop),
        10 => actions.push(Action::Purchase(choose(
            rng,
            &[
                ShopItem::Speed,
                ShopItem::Damage,
                ShopItem::MaxHp,
                ShopItem::Capacity,
                ShopItem::BaseRepair,
                ShopItem::Kit(TurretKind::Kinetic),
                ShopItem::Kit(TurretKind::Flame),
                ShopItem::Kit(TurretKind::Ice),
            ],
        ))),
        11 => actions.push(Action::CloseShop),
        12 => actions.push(Action::EnterPlacement),
        13 => {
            // A random cell; the arena is expected to reject bad ones
            // without panicking.
            let width = arena.config().grid_width as i32;
            let height = arena.config().grid_height as i32;
            let cell = Pos {
                y: (rng.next_u32() % height as u32) as i32,
                x: (rng.next_u32() % width as u32) as i32,
            };
            actions.push(Action::PlaceTurretAt(cell));
        }
        14 => actions.push(Action::BuyUpgrade(choose(
            rng,
            &[UpgradeTrack::Damage, UpgradeTrack::Range, UpgradeTrack::Rate],
        ))),
        _ => {}
    }

    TickInput { move_dir, aim, actions }
}

fn assert_invariants(arena: &Arena) {
    let state = arena.state();
    let extent = arena.config().map_extent();

    let player = &state.player;
    assert!(
        player.pos.x >= 0.0 && player.pos.x < extent.x,
        "Invariant failed: player outside map"
    );
    assert!(player.hp <= player.max_hp, "Invariant failed: HP > Max HP");
    assert!(
        player.backpack.len() <= player.backpack_capacity,
        "Invariant failed: backpack over capacity"
    );
    assert!(
        state.base_hp >= 0.0 && state.base_hp <= arena.config().max_base_hp,
        "Invariant failed: base HP out of range"
    );
    for enemy in state.enemies.values() {
        assert!(state.grid.is_floor(enemy.cell), "Invariant failed: enemy inside wall");
    }
    for turret in state.turrets.values() {
        assert!(state.grid.is_wall(turret.cell), "Invariant failed: turret off wall");
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    println!("Starting soak on seed {} for {} ticks...", args.seed, args.ticks);
    let mut arena = Arena::new(ArenaConfig::with_seed(args.seed));
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);

    let mut restarts = 0;
    let mut max_wave = 0;
    for _ in 0..args.ticks {
        let input = random_input(&mut rng, &arena);
        if input.actions.contains(&Action::Restart) {
            restarts += 1;
        }
        arena.tick(args.dt, &input);
        assert_invariants(&arena);
        max_wave = max_wave.max(arena.state().wave);
    }

    let state = arena.state();
    let summary = SoakSummary {
        seed: args.seed,
        ticks: args.ticks,
        restarts,
        max_wave,
        base_hp: state.base_hp,
        enemies: state.enemies.len(),
        bullets: state.bullets.len(),
        pickups: state.pickups.len(),
        turrets: state.turrets.len(),
        snapshot_hash: arena.snapshot_hash(),
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}
