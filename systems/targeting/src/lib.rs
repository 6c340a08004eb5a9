#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that computes deterministic tower target assignments.

use std::collections::BTreeMap;

use rampart_core::{
    EnemyId, EnemySnapshot, EnemyView, TargetingStrategy, TowerId, TowerSnapshot, TowerTarget,
    TowerView,
};

/// Tower targeting system holding the per-tower engagement state.
///
/// Assignments persist across ticks: an engaged tower keeps its target until
/// the target dies, leaves range, or disappears from the view, and only then
/// re-acquires in the same tick. Candidates are scanned in ascending enemy-id
/// order with strict comparisons, so the lowest id wins every tie.
#[derive(Debug, Default)]
pub struct TowerTargeting {
    assignments: BTreeMap<TowerId, EnemyId>,
}

impl TowerTargeting {
    /// Creates a new targeting system with no standing assignments.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes tower targets for the provided world snapshot.
    ///
    /// The output buffer is cleared before populating it with the latest
    /// assignments.
    pub fn handle(&mut self, towers: &TowerView, enemies: &EnemyView, out: &mut Vec<TowerTarget>) {
        out.clear();

        self.assignments
            .retain(|tower, _| towers.get(*tower).is_some());

        if towers.is_empty() || enemies.is_empty() {
            self.assignments.clear();
            return;
        }

        for tower in towers.iter() {
            let engaged = self
                .assignments
                .get(&tower.id)
                .copied()
                .and_then(|enemy| validated(tower, enemies.get(enemy)?));

            let selected = match engaged {
                Some(enemy) => Some(enemy),
                None => acquire(tower, enemies),
            };

            match selected {
                Some(enemy) => {
                    let _ = self.assignments.insert(tower.id, enemy.id);
                    out.push(TowerTarget {
                        tower: tower.id,
                        enemy: enemy.id,
                        tower_position: tower.position,
                        enemy_position: enemy.position,
                    });
                }
                None => {
                    let _ = self.assignments.remove(&tower.id);
                }
            }
        }
    }
}

fn validated<'view>(
    tower: &TowerSnapshot,
    enemy: &'view EnemySnapshot,
) -> Option<&'view EnemySnapshot> {
    in_range(tower, enemy).then_some(enemy)
}

fn in_range(tower: &TowerSnapshot, enemy: &EnemySnapshot) -> bool {
    tower.position.distance_squared(enemy.position) <= tower.range * tower.range
}

fn acquire<'view>(tower: &TowerSnapshot, enemies: &'view EnemyView) -> Option<&'view EnemySnapshot> {
    let mut best: Option<&EnemySnapshot> = None;
    for candidate in enemies.iter() {
        if !in_range(tower, candidate) {
            continue;
        }
        best = Some(match best {
            None => candidate,
            Some(current) => {
                if prefers(tower, candidate, current) {
                    candidate
                } else {
                    current
                }
            }
        });
    }
    best
}

/// Whether `candidate` beats `current` under the tower's strategy.
///
/// Strict comparisons keep the earlier candidate on ties.
fn prefers(tower: &TowerSnapshot, candidate: &EnemySnapshot, current: &EnemySnapshot) -> bool {
    let candidate_distance = tower.position.distance_squared(candidate.position);
    let current_distance = tower.position.distance_squared(current.position);
    match tower.strategy {
        TargetingStrategy::Closest => candidate_distance < current_distance,
        TargetingStrategy::Furthest => candidate_distance > current_distance,
        TargetingStrategy::Weakest => candidate.health < current.health,
        TargetingStrategy::Strongest => candidate.health > current.health,
        TargetingStrategy::PathProgress => candidate.progress > current.progress,
    }
}

#[cfg(test)]
mod tests {
    use super::TowerTargeting;
    use rampart_core::{
        CellCoord, DamageType, EnemyId, EnemySnapshot, EnemyTypeId, EnemyView, TargetingStrategy,
        TowerId, TowerSnapshot, TowerView, WorldPoint,
    };

    fn tower(strategy: TargetingStrategy, range: f32) -> TowerSnapshot {
        TowerSnapshot {
            id: TowerId::new(1),
            kind: rampart_core::TowerKindId::new(0),
            cell: CellCoord::new(0, 0),
            position: WorldPoint::new(0.0, 0.0),
            level: 1,
            range,
            damage: 10.0,
            damage_variance: 0.0,
            fire_rate: 1.0,
            ready_in: 0.0,
            strategy,
        }
    }

    fn enemy(id: u32, x: f32, health: f32, progress: f32) -> EnemySnapshot {
        EnemySnapshot {
            id: EnemyId::new(id),
            enemy_type: EnemyTypeId::new(0),
            position: WorldPoint::new(x, 0.0),
            rotation: 0.0,
            health,
            max_health: 100.0,
            progress,
            radius: 0.4,
            stunned: false,
            frozen: false,
            slow_factor: 1.0,
        }
    }

    fn views(
        tower: TowerSnapshot,
        enemies: Vec<EnemySnapshot>,
    ) -> (TowerView, EnemyView) {
        (
            TowerView::from_snapshots(vec![tower]),
            EnemyView::from_snapshots(enemies),
        )
    }

    fn selected(system: &mut TowerTargeting, towers: &TowerView, enemies: &EnemyView) -> Option<u32> {
        let mut out = Vec::new();
        system.handle(towers, enemies, &mut out);
        out.first().map(|target| target.enemy.get())
    }

    #[test]
    fn strategies_pick_their_respective_extremes() {
        let enemies = vec![
            enemy(1, 5.0, 50.0, 0.2),
            enemy(2, 2.0, 80.0, 0.6),
            enemy(3, 8.0, 20.0, 0.4),
        ];

        let cases = [
            (TargetingStrategy::Closest, 2),
            (TargetingStrategy::Furthest, 3),
            (TargetingStrategy::Weakest, 3),
            (TargetingStrategy::Strongest, 2),
            (TargetingStrategy::PathProgress, 2),
        ];
        for (strategy, expected) in cases {
            let mut system = TowerTargeting::new();
            let (towers, view) = views(tower(strategy, 10.0), enemies.clone());
            assert_eq!(
                selected(&mut system, &towers, &view),
                Some(expected),
                "{strategy:?} selects enemy {expected}"
            );
        }
    }

    #[test]
    fn ties_fall_to_the_lowest_enemy_id() {
        let mut system = TowerTargeting::new();
        let (towers, enemies) = views(
            tower(TargetingStrategy::Weakest, 10.0),
            vec![enemy(7, 1.0, 30.0, 0.1), enemy(4, 2.0, 30.0, 0.1)],
        );

        assert_eq!(selected(&mut system, &towers, &enemies), Some(4));
    }

    #[test]
    fn out_of_range_enemies_are_ignored() {
        let mut system = TowerTargeting::new();
        let (towers, enemies) = views(
            tower(TargetingStrategy::Closest, 3.0),
            vec![enemy(1, 9.0, 10.0, 0.5)],
        );

        assert_eq!(selected(&mut system, &towers, &enemies), None);
    }

    #[test]
    fn engaged_towers_keep_a_valid_target() {
        let mut system = TowerTargeting::new();
        let (towers, enemies) = views(
            tower(TargetingStrategy::Closest, 10.0),
            vec![enemy(5, 4.0, 40.0, 0.3)],
        );
        assert_eq!(selected(&mut system, &towers, &enemies), Some(5));

        // A closer enemy appears; the standing assignment survives.
        let (towers, enemies) = views(
            tower(TargetingStrategy::Closest, 10.0),
            vec![enemy(5, 4.0, 40.0, 0.3), enemy(6, 1.0, 40.0, 0.1)],
        );
        assert_eq!(selected(&mut system, &towers, &enemies), Some(5));
    }

    #[test]
    fn towers_reacquire_when_the_target_disappears() {
        let mut system = TowerTargeting::new();
        let (towers, enemies) = views(
            tower(TargetingStrategy::Closest, 10.0),
            vec![enemy(5, 4.0, 40.0, 0.3), enemy(6, 6.0, 40.0, 0.1)],
        );
        assert_eq!(selected(&mut system, &towers, &enemies), Some(5));

        // Target five died; the tower re-acquires in the same tick.
        let (towers, enemies) = views(
            tower(TargetingStrategy::Closest, 10.0),
            vec![enemy(6, 6.0, 40.0, 0.1)],
        );
        assert_eq!(selected(&mut system, &towers, &enemies), Some(6));
    }

    #[test]
    fn towers_reacquire_when_the_target_leaves_range() {
        let mut system = TowerTargeting::new();
        let (towers, enemies) = views(
            tower(TargetingStrategy::Closest, 5.0),
            vec![enemy(5, 4.0, 40.0, 0.3), enemy(6, 4.5, 40.0, 0.1)],
        );
        assert_eq!(selected(&mut system, &towers, &enemies), Some(5));

        let (towers, enemies) = views(
            tower(TargetingStrategy::Closest, 5.0),
            vec![enemy(5, 9.0, 40.0, 0.3), enemy(6, 4.5, 40.0, 0.1)],
        );
        assert_eq!(selected(&mut system, &towers, &enemies), Some(6));
    }

    #[test]
    fn empty_views_clear_all_assignments() {
        let mut system = TowerTargeting::new();
        let (towers, enemies) = views(
            tower(TargetingStrategy::Closest, 10.0),
            vec![enemy(5, 4.0, 40.0, 0.3)],
        );
        assert_eq!(selected(&mut system, &towers, &enemies), Some(5));

        let mut out = Vec::new();
        system.handle(&TowerView::default(), &EnemyView::default(), &mut out);
        assert!(out.is_empty());
    }
}
