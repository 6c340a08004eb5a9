#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Frame orchestration for the Rampart simulation.
//!
//! [`Simulation`] wires the authoritative world to the pure systems and
//! drives one fixed tick per [`Simulation::step`] call: wave direction,
//! world tick, targeting, combat. It settles bounties and costs against the
//! injected [`Economy`] and reports each frame's outcome as a
//! [`FrameSummary`]; it holds no money, score, or life state of its own.

mod config;

use std::time::Duration;

use sha2::{Digest, Sha256};

use rampart_core::{
    CellCoord, Command, Economy, EnemyTypeConfig, EnemyView, Event, PlacementError, ProjectileView,
    RemovalError, TowerId, TowerKindConfig, TowerKindId, TowerTarget, TowerView,
};
use rampart_system_combat::TowerCombat;
use rampart_system_targeting::TowerTargeting;
use rampart_system_wave_director::WaveDirector;
use rampart_world::{self as world, query, World};

pub use config::{ConfigError, GameConfig};
pub use rampart_system_wave_director::WaveStatus;

/// Upper bound on one tick of simulated time.
///
/// Resuming a suspended browser tab can hand the loop a multi-second delta;
/// clamping keeps the integration stable instead of spiralling.
pub const MAX_TICK: Duration = Duration::from_millis(100);

const RNG_STREAM_WAVES: &str = "waves";
const RNG_STREAM_COMBAT: &str = "combat";

/// Outcome of one simulation step, reported to external collaborators.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameSummary {
    /// Enemies that entered the path this tick.
    pub enemies_spawned: u32,
    /// Enemies that died this tick.
    pub enemies_killed: u32,
    /// Bounty credited to the economy this tick.
    pub bounty_earned: u32,
    /// Shots fired by towers this tick.
    pub shots_fired: u32,
    /// Enemies that reached the terminus this tick.
    pub lives_lost: u32,
    /// Wave being played after this tick.
    pub wave: u32,
    /// Wave number that finished during this tick, if any.
    pub wave_completed: Option<u32>,
}

/// Owns the world, the systems, and the frame pipeline.
#[derive(Debug)]
pub struct Simulation {
    world: World,
    targeting: TowerTargeting,
    combat: TowerCombat,
    director: WaveDirector,
    enemy_types: Vec<EnemyTypeConfig>,
    tower_kinds: Vec<TowerKindConfig>,
    commands: Vec<Command>,
    events: Vec<Event>,
    targets: Vec<TowerTarget>,
}

impl Simulation {
    /// Builds a simulation from a validated configuration.
    ///
    /// Fails fast on configuration errors; nothing about a broken type table
    /// is recoverable at runtime.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let GameConfig {
            seed,
            level,
            enemies,
            towers,
            waves,
        } = config;

        let mut world = World::new();
        let mut events = Vec::new();
        world::apply(
            &mut world,
            Command::ConfigureLevel {
                layout: level,
                enemy_types: enemies.clone(),
                tower_kinds: towers.clone(),
            },
            &mut events,
        );
        debug_assert!(events.contains(&Event::LevelConfigured));

        Ok(Self {
            world,
            targeting: TowerTargeting::new(),
            combat: TowerCombat::new(rampart_system_combat::Config::new(derive_stream_seed(
                seed,
                RNG_STREAM_COMBAT,
            ))),
            director: WaveDirector::new(rampart_system_wave_director::Config::new(
                waves,
                derive_stream_seed(seed, RNG_STREAM_WAVES),
            )),
            enemy_types: enemies,
            tower_kinds: towers,
            commands: Vec::new(),
            events: Vec::new(),
            targets: Vec::new(),
        })
    }

    /// Runs one simulation tick and reports what happened.
    ///
    /// The pipeline per frame: wave director spawns, world tick (movement,
    /// effects, projectiles, collisions, reaping), targeting, combat.
    /// Bounties are credited to `economy` as kills land.
    pub fn step(&mut self, dt: Duration, economy: &mut dyn Economy) -> FrameSummary {
        let dt = dt.min(MAX_TICK);
        self.commands.clear();
        self.events.clear();

        let wave_before = self.director.status().wave;

        let live = query::live_enemy_count(&self.world);
        self.director
            .handle(dt, &self.enemy_types, live, &mut self.commands);
        for command in self.commands.drain(..) {
            world::apply(&mut self.world, command, &mut self.events);
        }

        world::apply(&mut self.world, Command::Tick { dt }, &mut self.events);

        let towers = query::tower_view(&self.world);
        let enemies = query::enemy_view(&self.world);
        self.targeting.handle(&towers, &enemies, &mut self.targets);
        self.combat.handle(&self.targets, &towers, &mut self.commands);
        for command in self.commands.drain(..) {
            world::apply(&mut self.world, command, &mut self.events);
        }

        let mut summary = FrameSummary::default();
        for event in &self.events {
            match event {
                Event::EnemySpawned { .. } => summary.enemies_spawned += 1,
                Event::EnemyDied { bounty, .. } => {
                    summary.enemies_killed += 1;
                    summary.bounty_earned += bounty;
                    economy.earn(*bounty);
                }
                Event::EnemyEscaped { .. } => summary.lives_lost += 1,
                Event::ProjectileFired { .. } => summary.shots_fired += 1,
                Event::SpawnRejected { enemy_type } => {
                    tracing::warn!(
                        enemy_type = enemy_type.get(),
                        "spawn request referenced an unknown enemy type; skipping"
                    );
                }
                _ => {}
            }
        }

        let status = self.director.status();
        summary.wave = status.wave;
        if status.wave > wave_before {
            summary.wave_completed = Some(wave_before);
            tracing::info!(wave = wave_before, "wave cleared");
        }
        summary
    }

    /// Places a tower, charging the economy on success.
    pub fn place_tower(
        &mut self,
        kind: TowerKindId,
        cell: CellCoord,
        economy: &mut dyn Economy,
    ) -> Result<TowerId, PlacementError> {
        let cost = self
            .tower_kinds
            .get(kind.get() as usize)
            .map(|config| config.cost)
            .ok_or(PlacementError::UnknownKind)?;
        if !economy.spend(cost) {
            return Err(PlacementError::InsufficientFunds);
        }

        let mut events = Vec::new();
        world::apply(
            &mut self.world,
            Command::PlaceTower { kind, cell },
            &mut events,
        );
        for event in &events {
            match event {
                Event::TowerPlaced { tower, .. } => return Ok(*tower),
                Event::TowerPlacementRejected { reason, .. } => {
                    economy.earn(cost);
                    return Err(*reason);
                }
                _ => {}
            }
        }
        economy.earn(cost);
        Err(PlacementError::UnknownKind)
    }

    /// Sells a tower, crediting half its base cost to the economy.
    pub fn remove_tower(
        &mut self,
        tower: TowerId,
        economy: &mut dyn Economy,
    ) -> Result<(), RemovalError> {
        let mut events = Vec::new();
        world::apply(&mut self.world, Command::RemoveTower { tower }, &mut events);
        for event in &events {
            match event {
                Event::TowerRemoved { refund, .. } => {
                    economy.earn(*refund);
                    return Ok(());
                }
                Event::TowerRemovalRejected { reason, .. } => return Err(*reason),
                _ => {}
            }
        }
        Err(RemovalError::MissingTower)
    }

    /// Raises a tower's level, charging `base cost * current level`.
    pub fn upgrade_tower(
        &mut self,
        tower: TowerId,
        economy: &mut dyn Economy,
    ) -> Result<u32, RemovalError> {
        let view = query::tower_view(&self.world);
        let snapshot = view.get(tower).ok_or(RemovalError::MissingTower)?;
        let base_cost = self
            .tower_kinds
            .get(snapshot.kind.get() as usize)
            .map(|config| config.cost)
            .ok_or(RemovalError::MissingTower)?;
        let cost = base_cost.saturating_mul(snapshot.level);
        if !economy.spend(cost) {
            return Err(RemovalError::InsufficientFunds);
        }

        let mut events = Vec::new();
        world::apply(&mut self.world, Command::UpgradeTower { tower }, &mut events);
        for event in &events {
            match event {
                Event::TowerUpgraded { level, .. } => return Ok(*level),
                Event::TowerUpgradeRejected { reason, .. } => {
                    economy.earn(cost);
                    return Err(*reason);
                }
                _ => {}
            }
        }
        economy.earn(cost);
        Err(RemovalError::MissingTower)
    }

    /// Progress of the wave currently being played.
    #[must_use]
    pub fn wave_status(&self) -> WaveStatus {
        self.director.status()
    }

    /// Read-only snapshot of the live enemies for rendering.
    #[must_use]
    pub fn enemies(&self) -> EnemyView {
        query::enemy_view(&self.world)
    }

    /// Read-only snapshot of the placed towers for rendering.
    #[must_use]
    pub fn towers(&self) -> TowerView {
        query::tower_view(&self.world)
    }

    /// Read-only snapshot of the projectiles in flight for rendering.
    #[must_use]
    pub fn projectiles(&self) -> ProjectileView {
        query::projectile_view(&self.world)
    }

    /// Grid cells crossed by the enemy path, for placement previews.
    #[must_use]
    pub fn path_cells(&self) -> Vec<CellCoord> {
        query::path_cells(&self.world)
    }

    /// Tower occupying the provided cell, for pointer selection.
    #[must_use]
    pub fn tower_at(&self, cell: CellCoord) -> Option<TowerId> {
        query::tower_at(&self.world, cell)
    }

    /// Constructible tower kinds, indexed by [`TowerKindId`].
    #[must_use]
    pub fn tower_kinds(&self) -> &[TowerKindConfig] {
        &self.tower_kinds
    }

    /// Spawnable enemy types, indexed by `EnemyTypeId`.
    #[must_use]
    pub fn enemy_types(&self) -> &[EnemyTypeConfig] {
        &self.enemy_types
    }
}

/// Derives a labeled sub-seed from the global seed.
///
/// Each randomised system draws from its own stream so adding a roll in one
/// system never perturbs another.
fn derive_stream_seed(global_seed: u64, label: &str) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(global_seed.to_le_bytes());
    hasher.update(label.as_bytes());
    let digest = hasher.finalize();
    let bytes: [u8; 8] = digest[0..8].try_into().expect("sha256 digest slice length");
    u64::from_le_bytes(bytes)
}
