//! Discrete action handling: deposits, the shop, turret placement, and
//! upgrades. Every purchase-like operation is atomic — it either fully
//! applies and fully deducts, or rejects leaving all state unchanged.

use super::*;
use crate::content;
use crate::state::Turret;

impl Arena {
    pub(super) fn apply_action(&mut self, action: Action, input: &TickInput) {
        match action {
            Action::Fire => self.fire(input),
            Action::Deposit => self.deposit(),
            Action::OpenShop => self.open_shop(),
            Action::CloseShop => {
                if self.mode == SimMode::Suspended(SuspendReason::Shop) {
                    self.mode = SimMode::Running;
                }
            }
            Action::Purchase(item) => self.purchase(item),
            Action::EnterPlacement => {
                if self.mode == SimMode::Running {
                    self.mode = SimMode::Suspended(SuspendReason::PlacingTurret);
                }
            }
            Action::CyclePlacementKind => {
                if self.mode == SimMode::Suspended(SuspendReason::PlacingTurret) {
                    self.placement_kind = next_kind(self.placement_kind);
                }
            }
            Action::CancelPlacement => {
                if self.mode == SimMode::Suspended(SuspendReason::PlacingTurret) {
                    self.mode = SimMode::Running;
                }
            }
            Action::PlaceTurretAt(cell) => self.place_turret(cell),
            Action::OpenUpgrade(turret) => self.open_upgrade(turret),
            Action::CloseUpgrade => {
                if self.mode == SimMode::Suspended(SuspendReason::UpgradePanel) {
                    self.mode = SimMode::Running;
                    self.upgrade_target = None;
                }
            }
            Action::BuyUpgrade(track) => self.buy_upgrade(track),
            Action::Restart => self.restart(),
        }
    }

    /// Converts the whole backpack into currency, 1:1, when standing
    /// within the deposit radius of the base.
    fn deposit(&mut self) {
        if self.mode != SimMode::Running {
            return;
        }
        if !self.player_near_base() {
            self.reject(Rejection::NotNearBase);
            return;
        }

        let backpack = &self.state.player.backpack;
        let scrap = backpack.iter().filter(|&&kind| kind == PickupKind::Scrap).count() as u32;
        let cores = backpack.iter().filter(|&&kind| kind == PickupKind::Core).count() as u32;
        if scrap == 0 && cores == 0 {
            self.reject(Rejection::BackpackEmpty);
            return;
        }

        let player = &mut self.state.player;
        player.backpack.clear();
        player.scrap += scrap;
        player.cores += cores;
        self.events.push(ArenaEvent::Deposited { scrap, cores });
        self.say(format!("Deposited: {scrap} scrap, {cores} cores"));
    }

    fn open_shop(&mut self) {
        if self.mode != SimMode::Running {
            return;
        }
        if !self.player_near_base() {
            self.reject(Rejection::NotNearBase);
            return;
        }
        self.mode = SimMode::Suspended(SuspendReason::Shop);
    }

    fn purchase(&mut self, item: ShopItem) {
        if self.mode != SimMode::Suspended(SuspendReason::Shop) {
            self.reject(Rejection::ShopClosed);
            return;
        }

        let (scrap_cost, core_cost) = content::shop_cost(item);
        if self.state.player.scrap < scrap_cost {
            self.reject(Rejection::InsufficientScrap);
            return;
        }
        if self.state.player.cores < core_cost {
            self.reject(Rejection::InsufficientCores);
            return;
        }

        let player = &mut self.state.player;
        player.scrap -= scrap_cost;
        player.cores -= core_cost;
        match item {
            ShopItem::Speed => player.speed *= 1.08,
            ShopItem::Damage => player.attack_damage += 0.5,
            ShopItem::MaxHp => {
                player.max_hp += 10.0;
                player.hp = player.max_hp;
            }
            ShopItem::Capacity => player.backpack_capacity += 3,
            ShopItem::Kit(kind) => player.kits.grant(kind),
            ShopItem::BaseRepair => {
                self.state.base_hp = (self.state.base_hp + 30.0).min(self.config.max_base_hp);
            }
        }
        self.events.push(ArenaEvent::Purchased { item });
        self.say(content::purchase_text(item));
    }

    /// Mounts a turret of the selected kind on a wall cell, consuming one
    /// matching kit. All checks precede the consumption.
    fn place_turret(&mut self, cell: Pos) {
        if self.mode != SimMode::Suspended(SuspendReason::PlacingTurret) {
            self.reject(Rejection::NotPlacing);
            return;
        }
        if !self.state.grid.in_bounds(cell) || !self.state.grid.is_wall(cell) {
            self.reject(Rejection::InvalidTurretCell);
            return;
        }
        if self.state.turret_at(cell).is_some() {
            self.reject(Rejection::TurretOccupied);
            return;
        }
        let kind = self.placement_kind;
        if !self.state.player.kits.take(kind) {
            self.reject(Rejection::NoKit);
            return;
        }

        self.state.turrets.insert(Turret::new(cell, kind));
        self.events.push(ArenaEvent::TurretPlaced { kind, cell });
        self.say("Turret installed");
        self.mode = SimMode::Running;
    }

    fn open_upgrade(&mut self, turret: TurretId) {
        if self.mode != SimMode::Running {
            return;
        }
        if !self.state.turrets.contains_key(turret) {
            self.reject(Rejection::NoUpgradeTarget);
            return;
        }
        self.upgrade_target = Some(turret);
        self.mode = SimMode::Suspended(SuspendReason::UpgradePanel);
    }

    /// Buys the next level on one track of the selected turret.
    fn buy_upgrade(&mut self, track: UpgradeTrack) {
        if self.mode != SimMode::Suspended(SuspendReason::UpgradePanel) {
            self.reject(Rejection::NoUpgradeTarget);
            return;
        }
        let Some(id) = self.upgrade_target else {
            self.reject(Rejection::NoUpgradeTarget);
            return;
        };
        let Some(turret) = self.state.turrets.get(id) else {
            self.reject(Rejection::NoUpgradeTarget);
            return;
        };

        let level = turret.levels.level(track);
        if level >= content::MAX_UPGRADE_LEVEL {
            self.reject(Rejection::TrackMaxed);
            return;
        }
        let cost = content::upgrade_cost(track, level);
        if self.state.player.scrap < cost {
            self.reject(Rejection::InsufficientScrap);
            return;
        }

        self.state.player.scrap -= cost;
        let Some(turret) = self.state.turrets.get_mut(id) else {
            return;
        };
        *turret.levels.level_mut(track) += 1;
        let new_level = turret.levels.level(track);
        self.events.push(ArenaEvent::TurretUpgraded { turret: id, track, new_level });
        self.say(format!("{track:?} upgraded to level {new_level}"));
    }

    fn player_near_base(&self) -> bool {
        let base_center = self.state.base_center(self.config.tile_size);
        self.state.player.pos.distance(base_center) < self.config.deposit_radius
    }
}

fn next_kind(kind: TurretKind) -> TurretKind {
    match kind {
        TurretKind::Kinetic => TurretKind::Flame,
        TurretKind::Flame => TurretKind::Ice,
        TurretKind::Ice => TurretKind::Kinetic,
    }
}
