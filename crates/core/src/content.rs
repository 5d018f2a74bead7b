//! Stat templates and economy tables. Effective turret stats are always
//! derived from (template, levels) here, never stored on the instance.

use crate::effects::{DotPayload, SlowPayload};
use crate::types::{ShopItem, TurretKind, UpgradeTrack};

pub const PLAYER_MAX_HP: f32 = 100.0;
pub const PLAYER_SPEED: f32 = 252.0;
pub const PLAYER_ATTACK_DAMAGE: f32 = 1.0;
pub const PLAYER_FIRE_COOLDOWN: f32 = 0.2;
pub const PLAYER_BULLET_SPEED: f32 = 520.0;
pub const BACKPACK_CAPACITY: usize = 5;
/// Hp drained per second while an enemy is in contact with the player.
pub const ENEMY_CONTACT_DPS: f32 = 12.0;
/// Fraction of the backpack (front of the queue) dropped on respawn.
pub const RESPAWN_BACKPACK_LOSS: f32 = 0.7;

pub const BULLET_LIFETIME: f32 = 1.5;
/// Distance a bullet travels before wall collision is checked, so
/// wall-mounted turrets do not shoot themselves.
pub const BULLET_WALL_GRACE: f32 = 16.0;
/// Base bullet-vs-enemy hit radius; the enemy's tier is added on top.
pub const BULLET_HIT_RADIUS: f32 = 12.0;
/// Base player-vs-enemy contact radius; the enemy's tier is added on top.
pub const CONTACT_RADIUS: f32 = 14.0;
pub const PICKUP_RADIUS: f32 = 14.0;

pub const ENEMY_PATH_REFRESH: f32 = 0.4;
pub const DROP_SCRAP_CHANCE: f32 = 0.85;
pub const DROP_CORE_CHANCE: f32 = 0.18;

pub const MAX_WAVE_SIZE: usize = 18;
pub const MIN_SPAWN_INTERVAL: f32 = 2.0;

pub const MAX_UPGRADE_LEVEL: u8 = 5;

#[derive(Clone, Copy, Debug)]
pub struct EnemyStats {
    pub max_hp: f32,
    /// World units per second.
    pub speed: f32,
    /// Base hp drained per second while resident on the base cell.
    pub contact_damage: f32,
}

pub fn enemy_stats(tier: u32) -> EnemyStats {
    let tier = tier as f32;
    EnemyStats {
        max_hp: 2.0 + tier,
        speed: (1.2 + 0.2 * tier) * 60.0,
        contact_damage: 4.0 + 2.0 * tier,
    }
}

/// Wave size grows with the wave number and saturates.
pub fn wave_size(wave: u32) -> usize {
    ((3 + wave) as usize).min(MAX_WAVE_SIZE)
}

/// Enemy difficulty tier for a given wave.
pub fn wave_tier(wave: u32) -> u32 {
    1 + wave / 4
}

/// Spawn interval applied after a wave fires, shrinking monotonically.
pub fn spawn_interval(wave: u32) -> f32 {
    (8.0 - wave as f32 * 0.5).max(MIN_SPAWN_INTERVAL)
}

#[derive(Clone, Copy, Debug)]
pub struct TurretTemplate {
    pub damage: f32,
    pub range: f32,
    pub cooldown: f32,
    pub projectile_speed: f32,
    pub dot: Option<DotPayload>,
    pub slow: Option<SlowPayload>,
}

pub fn turret_template(kind: TurretKind) -> TurretTemplate {
    match kind {
        TurretKind::Kinetic => TurretTemplate {
            damage: 1.0,
            range: 220.0,
            cooldown: 0.7,
            projectile_speed: 420.0,
            dot: None,
            slow: None,
        },
        TurretKind::Flame => TurretTemplate {
            damage: 0.4,
            range: 160.0,
            cooldown: 0.5,
            projectile_speed: 380.0,
            dot: Some(DotPayload { dps: 2.0, duration: 2.0 }),
            slow: None,
        },
        TurretKind::Ice => TurretTemplate {
            damage: 0.2,
            range: 180.0,
            cooldown: 0.9,
            projectile_speed: 400.0,
            dot: None,
            slow: Some(SlowPayload { factor: 0.55, duration: 1.5 }),
        },
    }
}

/// Per-instance upgrade levels, one independent track each.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UpgradeLevels {
    pub damage: u8,
    pub range: u8,
    pub rate: u8,
}

impl UpgradeLevels {
    pub fn level(self, track: UpgradeTrack) -> u8 {
        match track {
            UpgradeTrack::Damage => self.damage,
            UpgradeTrack::Range => self.range,
            UpgradeTrack::Rate => self.rate,
        }
    }

    pub fn level_mut(&mut self, track: UpgradeTrack) -> &mut u8 {
        match track {
            UpgradeTrack::Damage => &mut self.damage,
            UpgradeTrack::Range => &mut self.range,
            UpgradeTrack::Rate => &mut self.rate,
        }
    }
}

/// Scrap cost of buying the level *after* `level` on a track. Strictly
/// increasing in `level`.
pub fn upgrade_cost(track: UpgradeTrack, level: u8) -> u32 {
    let level = level as u32;
    match track {
        UpgradeTrack::Damage => 4 + 2 * level,
        UpgradeTrack::Range => 3 + 2 * level,
        UpgradeTrack::Rate => 4 + 3 * level,
    }
}

#[derive(Clone, Copy, Debug)]
pub struct TurretStats {
    pub damage: f32,
    pub range: f32,
    pub cooldown: f32,
    pub projectile_speed: f32,
    pub dot: Option<DotPayload>,
    pub slow: Option<SlowPayload>,
}

/// Pure function of template and levels. Damage, DoT rate, and slow
/// duration scale linearly with the damage track; range and projectile
/// speed with the range track; cooldown decays multiplicatively per rate
/// level for bounded diminishing returns.
pub fn effective_turret_stats(kind: TurretKind, levels: UpgradeLevels) -> TurretStats {
    let template = turret_template(kind);
    let damage_scale = 1.0 + 0.35 * levels.damage as f32;
    let range_scale = 1.0 + 0.15 * levels.range as f32;
    let rate_scale = 0.85_f32.powi(levels.rate as i32);

    TurretStats {
        damage: template.damage * damage_scale,
        range: template.range * range_scale,
        cooldown: template.cooldown * rate_scale,
        projectile_speed: template.projectile_speed * range_scale,
        dot: template
            .dot
            .map(|dot| DotPayload { dps: dot.dps * damage_scale, duration: dot.duration }),
        slow: template
            .slow
            .map(|slow| SlowPayload { factor: slow.factor, duration: slow.duration * damage_scale }),
    }
}

/// (scrap, cores) price of a shop item.
pub fn shop_cost(item: ShopItem) -> (u32, u32) {
    match item {
        ShopItem::Speed => (5, 0),
        ShopItem::Damage => (7, 0),
        ShopItem::MaxHp => (6, 0),
        ShopItem::Capacity => (8, 0),
        ShopItem::Kit(TurretKind::Kinetic) => (0, 3),
        ShopItem::Kit(TurretKind::Flame) => (0, 4),
        ShopItem::Kit(TurretKind::Ice) => (0, 4),
        ShopItem::BaseRepair => (0, 2),
    }
}

pub fn purchase_text(item: ShopItem) -> &'static str {
    match item {
        ShopItem::Speed => "Speed +8%",
        ShopItem::Damage => "Damage +0.5",
        ShopItem::MaxHp => "HP +10",
        ShopItem::Capacity => "Backpack +3",
        ShopItem::Kit(TurretKind::Kinetic) => "Kinetic turret kit acquired",
        ShopItem::Kit(TurretKind::Flame) => "Flame turret kit acquired",
        ShopItem::Kit(TurretKind::Ice) => "Ice turret kit acquired",
        ShopItem::BaseRepair => "Base repaired +30",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upgrade_costs_are_strictly_increasing_on_every_track() {
        for track in [UpgradeTrack::Damage, UpgradeTrack::Range, UpgradeTrack::Rate] {
            for level in 0..MAX_UPGRADE_LEVEL {
                assert!(
                    upgrade_cost(track, level + 1) > upgrade_cost(track, level),
                    "{track:?} cost must grow with level"
                );
            }
        }
        assert_eq!(upgrade_cost(UpgradeTrack::Damage, 0), 4);
        assert_eq!(upgrade_cost(UpgradeTrack::Range, 2), 7);
        assert_eq!(upgrade_cost(UpgradeTrack::Rate, 3), 13);
    }

    #[test]
    fn rate_upgrades_shrink_cooldown_with_diminishing_bounded_returns() {
        let base = effective_turret_stats(TurretKind::Kinetic, UpgradeLevels::default());
        let mut previous = base.cooldown;
        for rate in 1..=MAX_UPGRADE_LEVEL {
            let levels = UpgradeLevels { rate, ..UpgradeLevels::default() };
            let stats = effective_turret_stats(TurretKind::Kinetic, levels);
            assert!(stats.cooldown < previous);
            assert!(stats.cooldown > 0.0);
            previous = stats.cooldown;
        }
        // Five levels at 0.85 each: still above 40% of the base rate.
        assert!(previous > base.cooldown * 0.4);
    }

    #[test]
    fn damage_track_scales_payloads_linearly() {
        let levels = UpgradeLevels { damage: 2, ..UpgradeLevels::default() };
        let flame = effective_turret_stats(TurretKind::Flame, levels);
        let flame_dot = flame.dot.expect("flame template carries a dot payload");
        assert!((flame_dot.dps - 2.0 * 1.7).abs() < 1e-5);

        let ice = effective_turret_stats(TurretKind::Ice, levels);
        let ice_slow = ice.slow.expect("ice template carries a slow payload");
        assert!((ice_slow.duration - 1.5 * 1.7).abs() < 1e-5);
        assert!((ice_slow.factor - 0.55).abs() < 1e-6, "slow strength is not damage-scaled");
    }

    #[test]
    fn wave_scaling_matches_schedule() {
        assert_eq!(wave_size(1), 4);
        assert_eq!(wave_size(20), MAX_WAVE_SIZE);
        assert_eq!(wave_tier(1), 1);
        assert_eq!(wave_tier(8), 3);
        assert!((spawn_interval(2) - 7.0).abs() < 1e-6);
        assert_eq!(spawn_interval(40), MIN_SPAWN_INTERVAL);
    }
}
