#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state for the Rampart simulation.
//!
//! The [`World`] value exclusively owns the live enemy, tower, and projectile
//! collections together with their object pools. All mutation flows through
//! [`apply`], which executes one [`Command`] and appends the resulting
//! [`Event`] values; all reads flow through the [`query`] module, which
//! captures deterministic snapshot views.

mod effects;
mod enemies;
mod path;
mod pool;
mod projectiles;
mod towers;

use std::collections::BTreeSet;
use std::time::Duration;

use rampart_core::{
    CellCoord, Command, EnemyId, EnemyTypeConfig, EnemyTypeId, Event, LevelLayout, PlacementError,
    ProjectileId, RemovalError, TowerId, TowerKindConfig, TowerKindId, WorldPoint,
};

use enemies::EnemyState;
use path::Path;
use pool::EntityPool;
use projectiles::{find_contact, Contact, ProjectileState, ProjectileTarget};
use towers::{TowerRegistry, TowerState};

#[derive(Debug)]
struct LevelState {
    layout: LevelLayout,
    path: Path,
    path_cells: BTreeSet<CellCoord>,
    enemy_types: Vec<EnemyTypeConfig>,
    tower_kinds: Vec<TowerKindConfig>,
}

/// Represents the authoritative Rampart world state.
#[derive(Debug)]
pub struct World {
    level: Option<LevelState>,
    enemies: Vec<EnemyState>,
    towers: TowerRegistry,
    projectiles: Vec<ProjectileState>,
    enemy_pool: EntityPool<EnemyState>,
    tower_pool: EntityPool<TowerState>,
    projectile_pool: EntityPool<ProjectileState>,
    contacts: Vec<Contact>,
    next_enemy_id: u32,
    next_projectile_id: u32,
}

impl World {
    /// Creates an empty world awaiting level configuration.
    #[must_use]
    pub fn new() -> Self {
        Self {
            level: None,
            enemies: Vec::new(),
            towers: TowerRegistry::new(),
            projectiles: Vec::new(),
            enemy_pool: EntityPool::new(),
            tower_pool: EntityPool::new(),
            projectile_pool: EntityPool::new(),
            contacts: Vec::new(),
            next_enemy_id: 0,
            next_projectile_id: 0,
        }
    }

    fn configure_level(
        &mut self,
        layout: LevelLayout,
        enemy_types: Vec<EnemyTypeConfig>,
        tower_kinds: Vec<TowerKindConfig>,
        out_events: &mut Vec<Event>,
    ) {
        let Some(path) = Path::from_waypoints(layout.waypoints.clone()) else {
            debug_assert!(false, "level layout requires at least two waypoints");
            return;
        };

        while let Some(enemy) = self.enemies.pop() {
            self.enemy_pool.release(enemy);
        }
        while let Some(mut projectile) = self.projectiles.pop() {
            projectile.hit_enemies.clear();
            self.projectile_pool.release(projectile);
        }
        for tower in self.towers.drain() {
            self.tower_pool.release(tower);
        }

        let path_cells = trace_path_cells(&layout, &path);
        self.level = Some(LevelState {
            layout,
            path,
            path_cells,
            enemy_types,
            tower_kinds,
        });
        out_events.push(Event::LevelConfigured);
    }

    fn tick(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        out_events.push(Event::TimeAdvanced { dt });

        let World {
            level,
            enemies,
            towers,
            projectiles,
            enemy_pool,
            projectile_pool,
            contacts,
            ..
        } = self;
        let Some(level) = level.as_ref() else {
            return;
        };
        let dt = dt.as_secs_f32();

        // Status effects resolve before movement so a burn can kill an enemy
        // mid-path; stun blocks the step without blocking the burn.
        for enemy in enemies.iter_mut() {
            let burn = enemy.effects.tick(dt);
            if burn > 0.0 && !enemy.dead {
                let _ = enemy.apply_direct_damage(burn);
            }
            if !enemy.dead && !enemy.effects.is_stunned() {
                let speed = enemy.speed * enemy.effects.speed_multiplier();
                if speed > 0.0 {
                    enemy.progress.advance(&level.path, speed * dt);
                }
            }
        }

        // Dead enemies leave before escape checks run, so an enemy burned
        // down on its final step never also costs a life.
        reap_enemies(&level.path, enemies, enemy_pool, out_events);

        for tower in towers.iter_mut() {
            tower.cooldown = (tower.cooldown - dt).max(0.0);
        }

        contacts.clear();
        contacts.extend(enemies.iter().map(|enemy| Contact {
            enemy: enemy.id,
            position: enemy.progress.position(&level.path),
            radius: enemy.radius,
        }));

        for index in 0..projectiles.len() {
            {
                let projectile = &mut projectiles[index];
                projectile.age += dt;

                // Homing shots re-aim at the live target; a shot whose target
                // died mid-flight, or whose fixed point is behind it, flies
                // straight on its last heading.
                let aim = match projectile.target {
                    ProjectileTarget::Enemy(enemy_id) => enemy_index_of(enemies, enemy_id)
                        .filter(|enemy_index| !enemies[*enemy_index].dead)
                        .map(|enemy_index| contacts[enemy_index].position),
                    ProjectileTarget::Point {
                        point,
                        reached: false,
                    } => Some(point),
                    ProjectileTarget::Point { reached: true, .. } => None,
                };

                let step = projectile.speed * dt;
                match aim {
                    Some(aim) => {
                        let distance = projectile.position.distance(aim);
                        if let Some(direction) = projectile.position.direction_to(aim) {
                            projectile.heading = direction;
                        }
                        if distance <= step {
                            projectile.position = aim;
                            projectile.traveled += distance;
                            if let ProjectileTarget::Point { reached, .. } =
                                &mut projectile.target
                            {
                                *reached = true;
                            }
                        } else {
                            projectile.position = projectile.position.translated(
                                projectile.heading.x() * step,
                                projectile.heading.y() * step,
                            );
                            projectile.traveled += step;
                        }
                    }
                    None => {
                        projectile.position = projectile.position.translated(
                            projectile.heading.x() * step,
                            projectile.heading.y() * step,
                        );
                        projectile.traveled += step;
                    }
                }
            }

            if let Some(enemy_index) = find_contact(&projectiles[index], contacts, enemies) {
                let damage = projectiles[index].damage;
                let damage_type = projectiles[index].damage_type;
                let on_hit = projectiles[index].on_hit;
                let enemy = &mut enemies[enemy_index];
                let applied = enemy.take_damage(damage, damage_type);
                if let Some(effect) = on_hit {
                    enemy.effects.apply(effect);
                }
                let enemy_id = enemy.id;
                projectiles[index].register_hit(enemy_id);
                // A piercing shot that damaged its own tracked enemy stops
                // steering and carries on straight.
                if projectiles[index].piercing
                    && projectiles[index].target == ProjectileTarget::Enemy(enemy_id)
                {
                    projectiles[index].target = ProjectileTarget::Point {
                        point: projectiles[index].position,
                        reached: true,
                    };
                }
                out_events.push(Event::ProjectileHit {
                    projectile: projectiles[index].id,
                    enemy: enemy_id,
                    damage: applied,
                });
            }

            if projectiles[index].expire_if_exhausted() {
                out_events.push(Event::ProjectileExpired {
                    projectile: projectiles[index].id,
                });
            }
        }

        reap_projectiles(projectiles, projectile_pool);
        // Kills landed during the projectile sweep pay out in the same tick.
        reap_enemies(&level.path, enemies, enemy_pool, out_events);
    }

    fn spawn_enemy(&mut self, enemy_type: EnemyTypeId, health: f32, out_events: &mut Vec<Event>) {
        let config = self
            .level
            .as_ref()
            .and_then(|level| level.enemy_types.get(enemy_type.get() as usize))
            .cloned();
        let Some(config) = config else {
            out_events.push(Event::SpawnRejected { enemy_type });
            return;
        };

        let id = EnemyId::new(self.next_enemy_id);
        self.next_enemy_id = self.next_enemy_id.wrapping_add(1);
        let mut enemy = self.enemy_pool.acquire_with(EnemyState::inert);
        enemy.activate(id, enemy_type, &config, health);
        self.enemies.push(enemy);
        out_events.push(Event::EnemySpawned {
            enemy: id,
            enemy_type,
        });
    }

    fn fire_projectile(
        &mut self,
        tower_id: TowerId,
        target: EnemyId,
        damage: f32,
        out_events: &mut Vec<Event>,
    ) {
        let Some(level) = self.level.as_ref() else {
            return;
        };
        let Some(enemy_index) = enemy_index_of(&self.enemies, target) else {
            return;
        };
        if self.enemies[enemy_index].dead {
            return;
        }
        let Some(tower) = self.towers.get_mut(tower_id) else {
            return;
        };
        if tower.cooldown > 0.0 {
            return;
        }
        let Some(kind) = level.tower_kinds.get(tower.kind.get() as usize) else {
            return;
        };

        let origin = level.layout.cell_center(tower.cell);
        let enemy_position = self.enemies[enemy_index].progress.position(&level.path);
        let heading = origin
            .direction_to(enemy_position)
            .unwrap_or(WorldPoint::new(0.0, 0.0));
        tower.cooldown = kind.fire_rate;

        let id = ProjectileId::new(self.next_projectile_id);
        self.next_projectile_id = self.next_projectile_id.wrapping_add(1);
        let mut projectile = self.projectile_pool.acquire_with(ProjectileState::inert);
        projectile.id = id;
        projectile.position = origin;
        projectile.heading = heading;
        projectile.target = if kind.projectile.homing {
            ProjectileTarget::Enemy(target)
        } else {
            ProjectileTarget::Point {
                point: enemy_position,
                reached: false,
            }
        };
        projectile.speed = kind.projectile.speed;
        projectile.damage = damage;
        projectile.damage_type = kind.damage_type;
        projectile.piercing = kind.projectile.piercing;
        projectile.on_hit = kind.projectile.on_hit;
        projectile.has_hit = false;
        projectile.dead = false;
        projectile.age = 0.0;
        projectile.lifetime = kind.projectile.lifetime;
        projectile.traveled = 0.0;
        projectile.max_distance = kind.projectile.max_distance;
        projectile.hit_enemies.clear();
        self.projectiles.push(projectile);

        out_events.push(Event::ProjectileFired {
            projectile: id,
            tower: tower_id,
            target,
        });
    }

    fn place_tower(&mut self, kind: TowerKindId, cell: CellCoord, out_events: &mut Vec<Event>) {
        let reject = |reason| Event::TowerPlacementRejected { kind, cell, reason };

        let Some(level) = self.level.as_ref() else {
            out_events.push(reject(PlacementError::UnknownKind));
            return;
        };
        if level.tower_kinds.get(kind.get() as usize).is_none() {
            out_events.push(reject(PlacementError::UnknownKind));
            return;
        }
        if !level.layout.contains(cell) {
            out_events.push(reject(PlacementError::OutOfBounds));
            return;
        }
        if level.path_cells.contains(&cell) {
            out_events.push(reject(PlacementError::OnPath));
            return;
        }
        if self.towers.occupies(cell) {
            out_events.push(reject(PlacementError::Occupied));
            return;
        }

        let id = self.towers.allocate_id();
        let mut tower = self.tower_pool.acquire_with(TowerState::inert);
        tower.activate(id, kind, cell);
        self.towers.insert(tower);
        out_events.push(Event::TowerPlaced {
            tower: id,
            kind,
            cell,
        });
    }

    fn remove_tower(&mut self, tower: TowerId, out_events: &mut Vec<Event>) {
        match self.towers.remove(tower) {
            Some(state) => {
                let refund = self
                    .level
                    .as_ref()
                    .and_then(|level| level.tower_kinds.get(state.kind.get() as usize))
                    .map_or(0, |kind| kind.cost / 2);
                self.tower_pool.release(state);
                out_events.push(Event::TowerRemoved { tower, refund });
            }
            None => out_events.push(Event::TowerRemovalRejected {
                tower,
                reason: RemovalError::MissingTower,
            }),
        }
    }

    fn upgrade_tower(&mut self, tower: TowerId, out_events: &mut Vec<Event>) {
        match self.towers.get_mut(tower) {
            Some(state) => {
                state.level = state.level.saturating_add(1);
                out_events.push(Event::TowerUpgraded {
                    tower,
                    level: state.level,
                });
            }
            None => out_events.push(Event::TowerUpgradeRejected {
                tower,
                reason: RemovalError::MissingTower,
            }),
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureLevel {
            layout,
            enemy_types,
            tower_kinds,
        } => world.configure_level(layout, enemy_types, tower_kinds, out_events),
        Command::Tick { dt } => world.tick(dt, out_events),
        Command::SpawnEnemy { enemy_type, health } => {
            world.spawn_enemy(enemy_type, health, out_events);
        }
        Command::FireProjectile {
            tower,
            target,
            damage,
        } => world.fire_projectile(tower, target, damage, out_events),
        Command::PlaceTower { kind, cell } => world.place_tower(kind, cell, out_events),
        Command::RemoveTower { tower } => world.remove_tower(tower, out_events),
        Command::UpgradeTower { tower } => world.upgrade_tower(tower, out_events),
    }
}

fn enemy_index_of(enemies: &[EnemyState], id: EnemyId) -> Option<usize> {
    enemies.binary_search_by_key(&id, |enemy| enemy.id).ok()
}

fn reap_enemies(
    path: &Path,
    enemies: &mut Vec<EnemyState>,
    pool: &mut EntityPool<EnemyState>,
    out_events: &mut Vec<Event>,
) {
    let mut index = 0;
    while index < enemies.len() {
        let reap = if enemies[index].dead {
            out_events.push(Event::EnemyDied {
                enemy: enemies[index].id,
                bounty: enemies[index].bounty,
            });
            true
        } else if enemies[index].progress.has_reached_end(path) {
            out_events.push(Event::EnemyEscaped {
                enemy: enemies[index].id,
            });
            true
        } else {
            false
        };
        if reap {
            let enemy = enemies.remove(index);
            pool.release(enemy);
        } else {
            index += 1;
        }
    }
}

fn reap_projectiles(
    projectiles: &mut Vec<ProjectileState>,
    pool: &mut EntityPool<ProjectileState>,
) {
    let mut index = 0;
    while index < projectiles.len() {
        if projectiles[index].dead {
            let mut projectile = projectiles.remove(index);
            projectile.hit_enemies.clear();
            pool.release(projectile);
        } else {
            index += 1;
        }
    }
}

fn trace_path_cells(layout: &LevelLayout, path: &Path) -> BTreeSet<CellCoord> {
    let mut cells = BTreeSet::new();
    if layout.cell_size <= 0.0 {
        return cells;
    }
    let step = layout.cell_size * 0.5;
    for pair in path.waypoints().windows(2) {
        let length = pair[0].distance(pair[1]);
        let samples = (length / step).ceil().max(1.0) as u32;
        for sample in 0..=samples {
            let t = sample as f32 / samples as f32;
            if let Some(cell) = layout.cell_at(pair[0].lerp(pair[1], t)) {
                let _ = cells.insert(cell);
            }
        }
    }
    cells
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use rampart_core::{
        level_multiplier, CellCoord, EnemySnapshot, EnemyView, LevelLayout, ProjectileSnapshot,
        ProjectileView, TowerSnapshot, TowerView,
    };

    use super::World;

    /// Captures a read-only view of the live enemies in ascending id order.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        let Some(level) = world.level.as_ref() else {
            return EnemyView::default();
        };
        EnemyView::from_snapshots(
            world
                .enemies
                .iter()
                .map(|enemy| EnemySnapshot {
                    id: enemy.id,
                    enemy_type: enemy.enemy_type,
                    position: enemy.progress.position(&level.path),
                    rotation: enemy
                        .progress
                        .heading(&level.path)
                        .map_or(0.0, |heading| heading.angle()),
                    health: enemy.health,
                    max_health: enemy.max_health,
                    progress: enemy.progress.progress_fraction(&level.path),
                    radius: enemy.radius,
                    stunned: enemy.effects.is_stunned(),
                    frozen: enemy.effects.is_frozen(),
                    slow_factor: enemy.effects.speed_multiplier(),
                })
                .collect(),
        )
    }

    /// Captures a read-only view of the placed towers in ascending id order.
    ///
    /// Damage and range carry the tower's level scaling; damage variance is
    /// left for the combat system to roll.
    #[must_use]
    pub fn tower_view(world: &World) -> TowerView {
        let Some(level) = world.level.as_ref() else {
            return TowerView::default();
        };
        TowerView::from_snapshots(
            world
                .towers
                .iter()
                .filter_map(|tower| {
                    let kind = level.tower_kinds.get(tower.kind.get() as usize)?;
                    let multiplier = level_multiplier(tower.level);
                    Some(TowerSnapshot {
                        id: tower.id,
                        kind: tower.kind,
                        cell: tower.cell,
                        position: level.layout.cell_center(tower.cell),
                        level: tower.level,
                        range: kind.range * multiplier,
                        damage: kind.damage * multiplier,
                        damage_variance: kind.damage_variance,
                        fire_rate: kind.fire_rate,
                        ready_in: tower.cooldown,
                        strategy: kind.strategy,
                    })
                })
                .collect(),
        )
    }

    /// Captures a read-only view of the projectiles in ascending id order.
    #[must_use]
    pub fn projectile_view(world: &World) -> ProjectileView {
        ProjectileView::from_snapshots(
            world
                .projectiles
                .iter()
                .map(|projectile| ProjectileSnapshot {
                    id: projectile.id,
                    position: projectile.position,
                    rotation: projectile.heading.angle(),
                    piercing: projectile.piercing,
                    has_hit: projectile.has_hit,
                })
                .collect(),
        )
    }

    /// Number of enemies currently alive on the path.
    #[must_use]
    pub fn live_enemy_count(world: &World) -> usize {
        world.enemies.len()
    }

    /// Number of towers currently placed.
    #[must_use]
    pub fn tower_count(world: &World) -> usize {
        world.towers.len()
    }

    /// Tower occupying the provided cell, if any.
    #[must_use]
    pub fn tower_at(world: &World, cell: CellCoord) -> Option<rampart_core::TowerId> {
        world
            .towers
            .iter()
            .find(|tower| tower.cell == cell)
            .map(|tower| tower.id)
    }

    /// Level geometry installed by `Command::ConfigureLevel`, if any.
    #[must_use]
    pub fn layout(world: &World) -> Option<&LevelLayout> {
        world.level.as_ref().map(|level| &level.layout)
    }

    /// Grid cells crossed by the enemy path, for placement previews.
    #[must_use]
    pub fn path_cells(world: &World) -> Vec<CellCoord> {
        world
            .level
            .as_ref()
            .map(|level| level.path_cells.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Idle object counts per pool, for diagnostics and tests.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct PoolStats {
        /// Enemies parked in the pool.
        pub enemies: usize,
        /// Towers parked in the pool.
        pub towers: usize,
        /// Projectiles parked in the pool.
        pub projectiles: usize,
    }

    /// Captures the idle object counts of every pool.
    #[must_use]
    pub fn pool_stats(world: &World) -> PoolStats {
        PoolStats {
            enemies: world.enemy_pool.len(),
            towers: world.tower_pool.len(),
            projectiles: world.projectile_pool.len(),
        }
    }
}
