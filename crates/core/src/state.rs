//! Arena-owned world state: the frozen grid plus every live entity.

use slotmap::SlotMap;

use crate::content::{self, TurretStats, UpgradeLevels};
use crate::effects::{DotPayload, SlowPayload, StatusEffects};
use crate::types::*;

/// Wall/floor grid. Immutable once world setup (generation + connectivity
/// repair + base room carving) has finished.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    tiles: Vec<TileKind>,
}

impl Grid {
    pub fn new_filled(width: usize, height: usize, fill: TileKind) -> Self {
        Self { width, height, tiles: vec![fill; width * height] }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.x >= 0
            && pos.y >= 0
            && (pos.x as usize) < self.width
            && (pos.y as usize) < self.height
    }

    /// Out-of-bounds reads as `Wall` so boundary checks need no special
    /// casing anywhere else.
    pub fn tile_at(&self, pos: Pos) -> TileKind {
        if !self.in_bounds(pos) {
            return TileKind::Wall;
        }
        self.tiles[self.index(pos)]
    }

    pub fn set_tile(&mut self, pos: Pos, tile: TileKind) {
        if !self.in_bounds(pos) {
            return;
        }
        let idx = self.index(pos);
        self.tiles[idx] = tile;
    }

    pub fn is_wall(&self, pos: Pos) -> bool {
        self.tile_at(pos) == TileKind::Wall
    }

    pub fn is_floor(&self, pos: Pos) -> bool {
        self.tile_at(pos) == TileKind::Floor
    }

    pub fn index(&self, pos: Pos) -> usize {
        (pos.y as usize) * self.width + (pos.x as usize)
    }

    pub fn floor_cells(&self) -> Vec<Pos> {
        let mut cells = Vec::new();
        for y in 0..self.height {
            for x in 0..self.width {
                let pos = Pos { y: y as i32, x: x as i32 };
                if self.is_floor(pos) {
                    cells.push(pos);
                }
            }
        }
        cells
    }

    /// World-space center of a cell.
    pub fn cell_center(&self, pos: Pos, tile_size: f32) -> Vec2 {
        Vec2::new(
            pos.x as f32 * tile_size + tile_size / 2.0,
            pos.y as f32 * tile_size + tile_size / 2.0,
        )
    }

    /// Cell containing a world-space point (truncating division).
    pub fn cell_of(&self, point: Vec2, tile_size: f32) -> Pos {
        Pos { y: (point.y / tile_size) as i32, x: (point.x / tile_size) as i32 }
    }

    /// Stable byte encoding for determinism checks.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(8 + self.tiles.len());
        bytes.extend((self.width as u32).to_le_bytes());
        bytes.extend((self.height as u32).to_le_bytes());
        for tile in &self.tiles {
            bytes.push(match tile {
                TileKind::Wall => 0,
                TileKind::Floor => 1,
            });
        }
        bytes
    }
}

#[derive(Clone, Debug)]
pub struct Enemy {
    pub pos: Vec2,
    /// Last grid cell the enemy validly occupied; movement snaps back here
    /// when a step would cut through a wall.
    pub cell: Pos,
    pub hp: f32,
    pub max_hp: f32,
    pub speed: f32,
    pub contact_damage: f32,
    pub tier: u32,
    /// Countdown until the cached path step is re-queried.
    pub path_timer: f32,
    pub next_cell: Pos,
    pub effects: StatusEffects,
    /// Cosmetic flash timer set when a bullet connects.
    pub hit_timer: f32,
}

impl Enemy {
    pub fn spawn(cell: Pos, tier: u32, grid: &Grid, tile_size: f32) -> Self {
        let stats = content::enemy_stats(tier);
        Self {
            pos: grid.cell_center(cell, tile_size),
            cell,
            hp: stats.max_hp,
            max_hp: stats.max_hp,
            speed: stats.speed,
            contact_damage: stats.contact_damage,
            tier,
            path_timer: 0.0,
            next_cell: cell,
            effects: StatusEffects::default(),
            hit_timer: 0.0,
        }
    }

    pub fn hp_ratio(&self) -> f32 {
        if self.max_hp <= 0.0 { 0.0 } else { (self.hp / self.max_hp).clamp(0.0, 1.0) }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Bullet {
    pub pos: Vec2,
    pub vel: Vec2,
    pub life: f32,
    pub damage: f32,
    pub dot: Option<DotPayload>,
    pub slow: Option<SlowPayload>,
    /// Cumulative distance flown; wall collision is ignored until this
    /// clears the spawn grace threshold.
    pub traveled: f32,
}

impl Bullet {
    pub fn new(pos: Vec2, vel: Vec2, damage: f32) -> Self {
        Self {
            pos,
            vel,
            life: content::BULLET_LIFETIME,
            damage,
            dot: None,
            slow: None,
            traveled: 0.0,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Pickup {
    pub pos: Vec2,
    pub kind: PickupKind,
    /// Cosmetic pulsing phase in [0, 1); irrelevant to logic.
    pub pulse: f32,
}

#[derive(Clone, Copy, Debug)]
pub struct Turret {
    /// Mounting cell; always a `Wall` cell.
    pub cell: Pos,
    pub kind: TurretKind,
    pub levels: UpgradeLevels,
    pub cooldown: f32,
}

impl Turret {
    pub fn new(cell: Pos, kind: TurretKind) -> Self {
        Self { cell, kind, levels: UpgradeLevels::default(), cooldown: 0.0 }
    }

    /// Current effective stats, derived fresh from template and levels.
    pub fn stats(&self) -> TurretStats {
        content::effective_turret_stats(self.kind, self.levels)
    }
}

/// Turret kits held by the player, one counter per turret type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KitInventory {
    counts: [u32; 3],
}

impl KitInventory {
    fn slot(kind: TurretKind) -> usize {
        match kind {
            TurretKind::Kinetic => 0,
            TurretKind::Flame => 1,
            TurretKind::Ice => 2,
        }
    }

    pub fn count(&self, kind: TurretKind) -> u32 {
        self.counts[Self::slot(kind)]
    }

    pub fn grant(&mut self, kind: TurretKind) {
        self.counts[Self::slot(kind)] += 1;
    }

    /// Consumes one kit if available.
    pub fn take(&mut self, kind: TurretKind) -> bool {
        let slot = Self::slot(kind);
        if self.counts[slot] == 0 {
            return false;
        }
        self.counts[slot] -= 1;
        true
    }
}

#[derive(Clone, Debug)]
pub struct Player {
    pub pos: Vec2,
    pub speed: f32,
    pub hp: f32,
    pub max_hp: f32,
    pub attack_damage: f32,
    /// Ordered collected loot; deposits drain it, respawns drop the front.
    pub backpack: Vec<PickupKind>,
    pub backpack_capacity: usize,
    pub scrap: u32,
    pub cores: u32,
    pub kits: KitInventory,
    pub fire_cooldown: f32,
}

impl Player {
    pub fn spawn(pos: Vec2) -> Self {
        Self {
            pos,
            speed: content::PLAYER_SPEED,
            hp: content::PLAYER_MAX_HP,
            max_hp: content::PLAYER_MAX_HP,
            attack_damage: content::PLAYER_ATTACK_DAMAGE,
            backpack: Vec::new(),
            backpack_capacity: content::BACKPACK_CAPACITY,
            scrap: 0,
            cores: 0,
            kits: KitInventory::default(),
            fire_cooldown: 0.0,
        }
    }

    pub fn hp_ratio(&self) -> f32 {
        if self.max_hp <= 0.0 { 0.0 } else { (self.hp / self.max_hp).clamp(0.0, 1.0) }
    }
}

/// Everything the arena owns. Exposed read-only to the presentation layer
/// through `Arena::state`; all mutation happens inside the arena's tick.
pub struct ArenaState {
    pub grid: Grid,
    pub base_cell: Pos,
    pub base_hp: f32,
    pub wave: u32,
    pub spawn_timer: f32,
    pub enemies: SlotMap<EnemyId, Enemy>,
    pub bullets: SlotMap<BulletId, Bullet>,
    pub pickups: SlotMap<PickupId, Pickup>,
    pub turrets: SlotMap<TurretId, Turret>,
    pub player: Player,
    /// Top-left world offset for the viewport, clamped to map bounds.
    pub camera: Vec2,
}

impl ArenaState {
    pub fn turret_at(&self, cell: Pos) -> Option<TurretId> {
        self.turrets.iter().find(|(_, turret)| turret.cell == cell).map(|(id, _)| id)
    }

    pub fn base_center(&self, tile_size: f32) -> Vec2 {
        self.grid.cell_center(self.base_cell, tile_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_reads_wall_outside_bounds() {
        let grid = Grid::new_filled(4, 3, TileKind::Floor);
        assert_eq!(grid.tile_at(Pos { y: -1, x: 0 }), TileKind::Wall);
        assert_eq!(grid.tile_at(Pos { y: 0, x: 4 }), TileKind::Wall);
        assert_eq!(grid.tile_at(Pos { y: 1, x: 1 }), TileKind::Floor);
    }

    #[test]
    fn cell_center_and_cell_of_round_trip() {
        let grid = Grid::new_filled(8, 8, TileKind::Floor);
        let cell = Pos { y: 3, x: 5 };
        let center = grid.cell_center(cell, 32.0);
        assert_eq!(grid.cell_of(center, 32.0), cell);
    }

    #[test]
    fn kit_inventory_take_fails_when_empty_and_consumes_one_otherwise() {
        let mut kits = KitInventory::default();
        assert!(!kits.take(TurretKind::Flame));
        kits.grant(TurretKind::Flame);
        kits.grant(TurretKind::Flame);
        assert!(kits.take(TurretKind::Flame));
        assert_eq!(kits.count(TurretKind::Flame), 1);
        assert_eq!(kits.count(TurretKind::Ice), 0);
    }
}
