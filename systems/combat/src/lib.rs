#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that emits projectile firing commands from targeting data.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rampart_core::{Command, TowerTarget, TowerView};

/// Configuration parameters required to construct the combat system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided damage-roll seed.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self { rng_seed }
    }
}

/// Tower combat system that queues firing commands for ready towers.
///
/// The emitted `Command::FireProjectile` carries the fully rolled damage so
/// the world itself stays free of randomness.
#[derive(Debug)]
pub struct TowerCombat {
    rng: ChaCha8Rng,
}

impl TowerCombat {
    /// Creates a new combat system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Emits `Command::FireProjectile` entries for towers ready to fire.
    ///
    /// A tower is ready when its cooldown snapshot reads zero; firing order
    /// follows the target list, which arrives in ascending tower-id order.
    pub fn handle(
        &mut self,
        tower_targets: &[TowerTarget],
        towers: &TowerView,
        out: &mut Vec<Command>,
    ) {
        if tower_targets.is_empty() || towers.is_empty() {
            return;
        }

        for target in tower_targets {
            let Some(snapshot) = towers.get(target.tower) else {
                continue;
            };
            if snapshot.ready_in > 0.0 {
                continue;
            }
            let damage = self.roll_damage(snapshot.damage, snapshot.damage_variance);
            out.push(Command::FireProjectile {
                tower: target.tower,
                target: target.enemy,
                damage,
            });
        }
    }

    /// Applies the symmetric variance roll and rounds to whole damage.
    ///
    /// A zero variance keeps rolls deterministic; every shot deals at least
    /// one point.
    fn roll_damage(&mut self, base: f32, variance: f32) -> f32 {
        let rolled = if variance > 0.0 {
            let offset: f32 = self.rng.gen_range(-1.0..=1.0);
            base * (1.0 + variance * offset)
        } else {
            base
        };
        rolled.round().max(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::{Config, TowerCombat};
    use rampart_core::{
        CellCoord, Command, EnemyId, TargetingStrategy, TowerId, TowerKindId, TowerSnapshot,
        TowerTarget, TowerView, WorldPoint,
    };

    fn snapshot(id: u32, ready_in: f32, damage: f32, variance: f32) -> TowerSnapshot {
        TowerSnapshot {
            id: TowerId::new(id),
            kind: TowerKindId::new(0),
            cell: CellCoord::new(0, 0),
            position: WorldPoint::new(0.0, 0.0),
            level: 1,
            range: 5.0,
            damage,
            damage_variance: variance,
            fire_rate: 1.0,
            ready_in,
            strategy: TargetingStrategy::Closest,
        }
    }

    fn target(tower: u32, enemy: u32) -> TowerTarget {
        TowerTarget {
            tower: TowerId::new(tower),
            enemy: EnemyId::new(enemy),
            tower_position: WorldPoint::new(0.0, 0.0),
            enemy_position: WorldPoint::new(1.0, 0.0),
        }
    }

    #[test]
    fn only_ready_towers_fire() {
        let mut system = TowerCombat::new(Config::new(7));
        let towers = TowerView::from_snapshots(vec![
            snapshot(1, 0.0, 10.0, 0.0),
            snapshot(2, 0.4, 10.0, 0.0),
        ]);
        let targets = vec![target(1, 8), target(2, 9)];
        let mut out = Vec::new();

        system.handle(&targets, &towers, &mut out);

        assert_eq!(
            out,
            vec![Command::FireProjectile {
                tower: TowerId::new(1),
                target: EnemyId::new(8),
                damage: 10.0,
            }],
        );
    }

    #[test]
    fn targets_without_snapshots_are_skipped() {
        let mut system = TowerCombat::new(Config::new(7));
        let towers = TowerView::from_snapshots(vec![snapshot(1, 0.0, 10.0, 0.0)]);
        let targets = vec![target(42, 8)];
        let mut out = Vec::new();

        system.handle(&targets, &towers, &mut out);

        assert!(out.is_empty());
    }

    #[test]
    fn variance_stays_within_the_symmetric_band() {
        let mut system = TowerCombat::new(Config::new(0x5eed));
        let towers = TowerView::from_snapshots(vec![snapshot(1, 0.0, 100.0, 0.1)]);
        let targets = vec![target(1, 8)];

        for _ in 0..64 {
            let mut out = Vec::new();
            system.handle(&targets, &towers, &mut out);
            match out.as_slice() {
                [Command::FireProjectile { damage, .. }] => {
                    assert!((90.0..=110.0).contains(damage), "rolled {damage}");
                    assert!((damage.fract()).abs() < f32::EPSILON, "damage is rounded");
                }
                other => panic!("expected one fire command, got {other:?}"),
            }
        }
    }

    #[test]
    fn identical_seeds_roll_identical_damage() {
        let towers = TowerView::from_snapshots(vec![snapshot(1, 0.0, 100.0, 0.25)]);
        let targets = vec![target(1, 8)];

        let mut first = Vec::new();
        let mut second = Vec::new();
        TowerCombat::new(Config::new(99)).handle(&targets, &towers, &mut first);
        TowerCombat::new(Config::new(99)).handle(&targets, &towers, &mut second);

        assert_eq!(first, second);
    }

    #[test]
    fn tiny_base_damage_still_lands_one_point() {
        let mut system = TowerCombat::new(Config::new(3));
        let towers = TowerView::from_snapshots(vec![snapshot(1, 0.0, 0.2, 0.0)]);
        let targets = vec![target(1, 8)];
        let mut out = Vec::new();

        system.handle(&targets, &towers, &mut out);

        match out.as_slice() {
            [Command::FireProjectile { damage, .. }] => {
                assert!((damage - 1.0).abs() < f32::EPSILON);
            }
            other => panic!("expected one fire command, got {other:?}"),
        }
    }
}
