use std::time::Duration;

use rampart_core::{
    CellCoord, Command, DamageType, EnemyId, EnemyTypeConfig, EnemyTypeId, Event, LevelLayout,
    PlacementError, ProjectileConfig, ResistanceProfile, TargetingStrategy, TowerId,
    TowerKindConfig, TowerKindId, WorldPoint,
};
use rampart_world::{self as world, query, World};

fn layout() -> LevelLayout {
    LevelLayout {
        waypoints: vec![WorldPoint::new(0.5, 0.5), WorldPoint::new(7.5, 0.5)],
        columns: 8,
        rows: 8,
        cell_size: 1.0,
    }
}

fn raider() -> EnemyTypeConfig {
    EnemyTypeConfig {
        name: "raider".to_owned(),
        cost: 4,
        health: 30.0,
        speed: 1.0,
        armor: 0.0,
        bounty: 3,
        radius: 0.4,
        resistances: ResistanceProfile::default(),
        intro_wave: 1,
        ramp_waves: 0,
    }
}

fn dummy() -> EnemyTypeConfig {
    EnemyTypeConfig {
        name: "dummy".to_owned(),
        cost: 1,
        health: 100.0,
        speed: 0.0,
        armor: 0.0,
        bounty: 1,
        radius: 0.4,
        resistances: ResistanceProfile::default(),
        intro_wave: 1,
        ramp_waves: 0,
    }
}

fn bolt_tower() -> TowerKindConfig {
    TowerKindConfig {
        name: "bolt".to_owned(),
        cost: 50,
        range: 3.0,
        fire_rate: 1.0,
        damage: 10.0,
        damage_type: DamageType::Normal,
        damage_variance: 0.0,
        strategy: TargetingStrategy::Closest,
        projectile: ProjectileConfig {
            speed: 4.0,
            homing: true,
            piercing: false,
            lifetime: 5.0,
            max_distance: 20.0,
            on_hit: None,
        },
    }
}

fn lance_tower() -> TowerKindConfig {
    TowerKindConfig {
        name: "lance".to_owned(),
        cost: 80,
        range: 4.0,
        fire_rate: 2.0,
        damage: 6.0,
        damage_type: DamageType::Arcane,
        damage_variance: 0.0,
        strategy: TargetingStrategy::PathProgress,
        projectile: ProjectileConfig {
            speed: 4.0,
            homing: false,
            piercing: true,
            lifetime: 5.0,
            max_distance: 20.0,
            on_hit: None,
        },
    }
}

fn configured_world() -> World {
    let mut world = World::new();
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::ConfigureLevel {
            layout: layout(),
            enemy_types: vec![raider(), dummy()],
            tower_kinds: vec![bolt_tower(), lance_tower()],
        },
        &mut events,
    );
    assert!(events.contains(&Event::LevelConfigured));
    world
}

fn spawn(world: &mut World, enemy_type: u32, health: f32) -> EnemyId {
    let mut events = Vec::new();
    world::apply(
        world,
        Command::SpawnEnemy {
            enemy_type: EnemyTypeId::new(enemy_type),
            health,
        },
        &mut events,
    );
    match events.as_slice() {
        [Event::EnemySpawned { enemy, .. }] => *enemy,
        other => panic!("expected EnemySpawned, got {other:?}"),
    }
}

fn place(world: &mut World, kind: u32, cell: CellCoord) -> TowerId {
    let mut events = Vec::new();
    world::apply(
        world,
        Command::PlaceTower {
            kind: TowerKindId::new(kind),
            cell,
        },
        &mut events,
    );
    match events.as_slice() {
        [Event::TowerPlaced { tower, .. }] => *tower,
        other => panic!("expected TowerPlaced, got {other:?}"),
    }
}

fn tick(world: &mut World, dt: f32) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(
        world,
        Command::Tick {
            dt: Duration::from_secs_f32(dt),
        },
        &mut events,
    );
    events
}

#[test]
fn enemies_walk_the_path_monotonically() {
    let mut world = configured_world();
    let enemy = spawn(&mut world, 0, 30.0);

    let mut previous = 0.0;
    for _ in 0..5 {
        let _ = tick(&mut world, 0.5);
        let view = query::enemy_view(&world);
        let snapshot = view.get(enemy).expect("enemy alive");
        assert!(snapshot.progress >= previous);
        previous = snapshot.progress;
        assert!(snapshot.position.x() > 0.0);
    }
}

#[test]
fn escaped_enemies_cost_no_bounty() {
    let mut world = configured_world();
    let enemy = spawn(&mut world, 0, 30.0);

    let mut escaped = false;
    for _ in 0..16 {
        let events = tick(&mut world, 0.5);
        assert!(!events
            .iter()
            .any(|event| matches!(event, Event::EnemyDied { .. })));
        if events.contains(&Event::EnemyEscaped { enemy }) {
            escaped = true;
            break;
        }
    }

    assert!(escaped, "enemy should reach the terminus");
    assert_eq!(query::live_enemy_count(&world), 0);
    assert_eq!(query::pool_stats(&world).enemies, 1);
}

#[test]
fn unknown_spawn_requests_are_rejected_and_skipped() {
    let mut world = configured_world();
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::SpawnEnemy {
            enemy_type: EnemyTypeId::new(99),
            health: 10.0,
        },
        &mut events,
    );

    assert_eq!(
        events,
        vec![Event::SpawnRejected {
            enemy_type: EnemyTypeId::new(99),
        }],
    );
    assert_eq!(query::live_enemy_count(&world), 0);
}

#[test]
fn placement_validation_reports_reason_codes() {
    let mut world = configured_world();

    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::PlaceTower {
            kind: TowerKindId::new(0),
            cell: CellCoord::new(20, 0),
        },
        &mut events,
    );
    assert!(matches!(
        events.as_slice(),
        [Event::TowerPlacementRejected {
            reason: PlacementError::OutOfBounds,
            ..
        }],
    ));

    // Row zero carries the enemy path.
    events.clear();
    world::apply(
        &mut world,
        Command::PlaceTower {
            kind: TowerKindId::new(0),
            cell: CellCoord::new(3, 0),
        },
        &mut events,
    );
    assert!(matches!(
        events.as_slice(),
        [Event::TowerPlacementRejected {
            reason: PlacementError::OnPath,
            ..
        }],
    ));

    let cell = CellCoord::new(3, 1);
    let _ = place(&mut world, 0, cell);
    events.clear();
    world::apply(
        &mut world,
        Command::PlaceTower {
            kind: TowerKindId::new(0),
            cell,
        },
        &mut events,
    );
    assert!(matches!(
        events.as_slice(),
        [Event::TowerPlacementRejected {
            reason: PlacementError::Occupied,
            ..
        }],
    ));

    events.clear();
    world::apply(
        &mut world,
        Command::PlaceTower {
            kind: TowerKindId::new(9),
            cell: CellCoord::new(4, 4),
        },
        &mut events,
    );
    assert!(matches!(
        events.as_slice(),
        [Event::TowerPlacementRejected {
            reason: PlacementError::UnknownKind,
            ..
        }],
    ));
}

#[test]
fn upgrades_scale_damage_and_range() {
    let mut world = configured_world();
    let tower = place(&mut world, 0, CellCoord::new(3, 1));

    let mut events = Vec::new();
    world::apply(&mut world, Command::UpgradeTower { tower }, &mut events);
    assert_eq!(events, vec![Event::TowerUpgraded { tower, level: 2 }]);

    let view = query::tower_view(&world);
    let snapshot = view.get(tower).expect("tower exists");
    assert_eq!(snapshot.level, 2);
    assert!((snapshot.damage - 11.5).abs() < 1e-4);
    assert!((snapshot.range - 3.45).abs() < 1e-4);
}

#[test]
fn removal_refunds_half_the_base_cost() {
    let mut world = configured_world();
    let tower = place(&mut world, 0, CellCoord::new(3, 1));

    let mut events = Vec::new();
    world::apply(&mut world, Command::RemoveTower { tower }, &mut events);
    assert_eq!(events, vec![Event::TowerRemoved { tower, refund: 25 }]);
    assert_eq!(query::tower_count(&world), 0);
    assert_eq!(query::pool_stats(&world).towers, 1);

    events.clear();
    world::apply(&mut world, Command::RemoveTower { tower }, &mut events);
    assert!(matches!(
        events.as_slice(),
        [Event::TowerRemovalRejected { .. }],
    ));
}

#[test]
fn non_piercing_projectile_hits_once_and_is_reaped() {
    let mut world = configured_world();
    // Stationary target one cell below the tower.
    let enemy = spawn(&mut world, 1, 100.0);
    let tower = place(&mut world, 0, CellCoord::new(0, 1));

    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::FireProjectile {
            tower,
            target: enemy,
            damage: 10.0,
        },
        &mut events,
    );
    assert!(matches!(
        events.as_slice(),
        [Event::ProjectileFired { .. }],
    ));

    let mut hits = 0;
    for _ in 0..10 {
        let events = tick(&mut world, 0.1);
        hits += events
            .iter()
            .filter(|event| matches!(event, Event::ProjectileHit { .. }))
            .count();
    }

    assert_eq!(hits, 1, "non-piercing projectile hits exactly once");
    assert_eq!(query::projectile_view(&world).len(), 0);
    assert_eq!(query::pool_stats(&world).projectiles, 1);

    let view = query::enemy_view(&world);
    let snapshot = view.get(enemy).expect("enemy survives one bolt");
    assert!((snapshot.health - 90.0).abs() < 1e-4);
}

#[test]
fn piercing_projectile_never_damages_the_same_enemy_twice() {
    let mut world = configured_world();
    // Two stationary enemies stacked on the spawn point.
    let first = spawn(&mut world, 1, 100.0);
    let second = spawn(&mut world, 1, 100.0);
    let tower = place(&mut world, 1, CellCoord::new(0, 1));

    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::FireProjectile {
            tower,
            target: first,
            damage: 6.0,
        },
        &mut events,
    );

    let mut hits: Vec<EnemyId> = Vec::new();
    for _ in 0..20 {
        for event in tick(&mut world, 0.1) {
            if let Event::ProjectileHit { enemy, .. } = event {
                hits.push(enemy);
            }
        }
    }

    assert_eq!(hits.len(), 2, "one hit per enemy");
    assert!(hits.contains(&first));
    assert!(hits.contains(&second));
    // Lower id wins the shared contact point on the earlier tick.
    assert_eq!(hits[0], first);
}

#[test]
fn world_rejects_double_firing_within_cooldown() {
    let mut world = configured_world();
    let enemy = spawn(&mut world, 1, 100.0);
    let tower = place(&mut world, 0, CellCoord::new(0, 1));

    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::FireProjectile {
            tower,
            target: enemy,
            damage: 10.0,
        },
        &mut events,
    );
    world::apply(
        &mut world,
        Command::FireProjectile {
            tower,
            target: enemy,
            damage: 10.0,
        },
        &mut events,
    );

    let fired = events
        .iter()
        .filter(|event| matches!(event, Event::ProjectileFired { .. }))
        .count();
    assert_eq!(fired, 1, "cooldown gates the second shot");
}

#[test]
fn dead_enemies_are_pooled_and_slots_reused() {
    let mut world = configured_world();
    let enemy = spawn(&mut world, 1, 100.0);
    let tower = place(&mut world, 0, CellCoord::new(0, 1));

    // Ten bolts of ten kill the hundred-point dummy.
    let mut died = false;
    for _ in 0..40 {
        let mut events = Vec::new();
        world::apply(
            &mut world,
            Command::FireProjectile {
                tower,
                target: enemy,
                damage: 10.0,
            },
            &mut events,
        );
        let events = tick(&mut world, 0.5);
        if events
            .iter()
            .any(|event| matches!(event, Event::EnemyDied { bounty: 1, .. }))
        {
            died = true;
            break;
        }
    }

    assert!(died, "dummy should die to repeated bolts");
    assert_eq!(query::live_enemy_count(&world), 0);
    assert_eq!(query::pool_stats(&world).enemies, 1);

    // The recycled slot returns with a fresh identifier.
    let replacement = spawn(&mut world, 0, 30.0);
    assert!(replacement > enemy);
    assert_eq!(query::pool_stats(&world).enemies, 0);
    assert_eq!(query::live_enemy_count(&world), 1);
}

#[test]
fn reconfiguring_a_level_recycles_every_entity() {
    let mut world = configured_world();
    let _ = spawn(&mut world, 0, 30.0);
    let _ = spawn(&mut world, 1, 100.0);
    let _ = place(&mut world, 0, CellCoord::new(3, 1));

    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::ConfigureLevel {
            layout: layout(),
            enemy_types: vec![raider()],
            tower_kinds: vec![bolt_tower()],
        },
        &mut events,
    );

    assert_eq!(query::live_enemy_count(&world), 0);
    assert_eq!(query::tower_count(&world), 0);
    let stats = query::pool_stats(&world);
    assert_eq!(stats.enemies, 2);
    assert_eq!(stats.towers, 1);
}

#[test]
fn towers_are_selectable_by_cell() {
    let mut world = configured_world();
    let cell = CellCoord::new(5, 2);
    let tower = place(&mut world, 0, cell);

    assert_eq!(query::tower_at(&world, cell), Some(tower));
    assert_eq!(query::tower_at(&world, CellCoord::new(6, 2)), None);
}

#[test]
fn path_cells_cover_the_walked_row() {
    let world = configured_world();
    let cells = query::path_cells(&world);
    assert!(cells.contains(&CellCoord::new(0, 0)));
    assert!(cells.contains(&CellCoord::new(7, 0)));
    assert!(cells.iter().all(|cell| cell.row() == 0));
}
