use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

new_key_type! {
    pub struct EnemyId;
    pub struct BulletId;
    pub struct PickupId;
    pub struct TurretId;
}

/// Grid cell coordinate. Row-major, `y` before `x` so derived ordering
/// matches scan order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pos {
    pub y: i32,
    pub x: i32,
}

impl Pos {
    pub fn manhattan(self, other: Pos) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    pub fn neighbors(self) -> [Pos; 4] {
        [
            Pos { y: self.y - 1, x: self.x },
            Pos { y: self.y, x: self.x + 1 },
            Pos { y: self.y + 1, x: self.x },
            Pos { y: self.y, x: self.x - 1 },
        ]
    }
}

/// Continuous world-space point or direction, in world units.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn distance(self, other: Vec2) -> f32 {
        Vec2 { x: self.x - other.x, y: self.y - other.y }.length()
    }

    /// Unit vector toward `other`, or zero when the points coincide.
    pub fn direction_to(self, other: Vec2) -> Vec2 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        let len = (dx * dx + dy * dy).sqrt();
        if len <= f32::EPSILON {
            return Vec2::ZERO;
        }
        Vec2 { x: dx / len, y: dy / len }
    }

    pub fn scaled(self, factor: f32) -> Vec2 {
        Vec2 { x: self.x * factor, y: self.y * factor }
    }

    pub fn offset(self, other: Vec2) -> Vec2 {
        Vec2 { x: self.x + other.x, y: self.y + other.y }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TileKind {
    Wall,
    Floor,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TurretKind {
    Kinetic,
    Flame,
    Ice,
}

impl TurretKind {
    pub const ALL: [TurretKind; 3] = [TurretKind::Kinetic, TurretKind::Flame, TurretKind::Ice];
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpgradeTrack {
    Damage,
    Range,
    Rate,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PickupKind {
    Scrap,
    Core,
}

/// Items purchasable at the base shop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShopItem {
    Speed,
    Damage,
    MaxHp,
    Capacity,
    Kit(TurretKind),
    BaseRepair,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SuspendReason {
    Shop,
    PlacingTurret,
    UpgradePanel,
    BaseDestroyed,
}

/// Top-level simulation mode consulted once per tick. While suspended the
/// combat simulation does not progress; the player stays interactive except
/// after base destruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimMode {
    Running,
    Suspended(SuspendReason),
}

/// Discrete, already-resolved player commands for one tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Action {
    Fire,
    Deposit,
    OpenShop,
    CloseShop,
    Purchase(ShopItem),
    EnterPlacement,
    CyclePlacementKind,
    CancelPlacement,
    PlaceTurretAt(Pos),
    OpenUpgrade(TurretId),
    CloseUpgrade,
    BuyUpgrade(UpgradeTrack),
    Restart,
}

/// Input consumed exactly once per tick. Movement comes pre-normalized and
/// the aim point is in world coordinates; translating devices into these is
/// the presentation layer's job.
#[derive(Clone, Debug, Default)]
pub struct TickInput {
    pub move_dir: Vec2,
    pub aim: Vec2,
    pub actions: Vec<Action>,
}

/// Domain rejection. Never an error path: state is left untouched and the
/// reason is surfaced through the event log and transient message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rejection {
    NotNearBase,
    ShopClosed,
    NotPlacing,
    InsufficientScrap,
    InsufficientCores,
    NoKit,
    InvalidTurretCell,
    TurretOccupied,
    NoUpgradeTarget,
    TrackMaxed,
    BackpackEmpty,
}

impl Rejection {
    pub fn text(self) -> &'static str {
        match self {
            Rejection::NotNearBase => "Stand on the base to do that",
            Rejection::ShopClosed => "The shop is not open",
            Rejection::NotPlacing => "Not in placement mode",
            Rejection::InsufficientScrap => "Not enough scrap",
            Rejection::InsufficientCores => "Not enough cores",
            Rejection::NoKit => "No turret kit of that type",
            Rejection::InvalidTurretCell => "Turrets mount on walls",
            Rejection::TurretOccupied => "A turret already occupies that wall",
            Rejection::NoUpgradeTarget => "No turret selected",
            Rejection::TrackMaxed => "Track is already at maximum level",
            Rejection::BackpackEmpty => "Backpack is empty",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ArenaEvent {
    WaveSpawned { wave: u32, count: usize },
    EnemyKilled { tier: u32 },
    PickupDropped { kind: PickupKind },
    PickupCollected { kind: PickupKind },
    Deposited { scrap: u32, cores: u32 },
    Purchased { item: ShopItem },
    TurretPlaced { kind: TurretKind, cell: Pos },
    TurretUpgraded { turret: TurretId, track: UpgradeTrack, new_level: u8 },
    PlayerDowned,
    BaseDestroyed,
    Rejected { reason: Rejection },
}
