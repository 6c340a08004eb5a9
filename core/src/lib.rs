#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Rampart simulation.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Callers submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values describing what
//! actually happened. Systems consume event streams and immutable snapshot
//! views, and respond exclusively with new command batches.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Unique identifier assigned to an enemy.
///
/// Identifiers are allocated monotonically by the world; a pooled enemy slot
/// that returns to play receives a fresh identifier, so stale references can
/// never resolve to a recycled occupant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TowerId(u32);

impl TowerId {
    /// Creates a new tower identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectileId(u32);

impl ProjectileId {
    /// Creates a new projectile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Index of an enemy type inside the configured roster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyTypeId(u32);

impl EnemyTypeId {
    /// Creates a new enemy type index.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the underlying roster index.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Index of a tower kind inside the configured kind table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TowerKindId(u32);

impl TowerKindId {
    /// Creates a new tower kind index.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the underlying table index.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Point in continuous world space measured in world units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldPoint {
    x: f32,
    y: f32,
}

impl WorldPoint {
    /// Creates a new world point from explicit coordinates.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Horizontal coordinate of the point.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical coordinate of the point.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Squared Euclidean distance between two points.
    #[must_use]
    pub fn distance_squared(self, other: WorldPoint) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dx * dx + dy * dy
    }

    /// Euclidean distance between two points.
    #[must_use]
    pub fn distance(self, other: WorldPoint) -> f32 {
        self.distance_squared(other).sqrt()
    }

    /// Unit vector pointing from `self` toward `other`.
    ///
    /// Returns `None` when the points coincide, since no direction exists.
    #[must_use]
    pub fn direction_to(self, other: WorldPoint) -> Option<WorldPoint> {
        let length = self.distance(other);
        if length <= f32::EPSILON {
            return None;
        }
        Some(WorldPoint::new(
            (other.x - self.x) / length,
            (other.y - self.y) / length,
        ))
    }

    /// Linear interpolation between `self` and `other` at parameter `t`.
    #[must_use]
    pub fn lerp(self, other: WorldPoint, t: f32) -> WorldPoint {
        WorldPoint::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }

    /// Returns the point translated by the provided deltas.
    #[must_use]
    pub fn translated(self, dx: f32, dy: f32) -> WorldPoint {
        WorldPoint::new(self.x + dx, self.y + dy)
    }

    /// Angle of the vector `self`, in radians, measured from the x axis.
    #[must_use]
    pub fn angle(&self) -> f32 {
        self.y.atan2(self.x)
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }
}

/// Category of damage carried by projectiles and checked against resistances.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageType {
    /// Plain kinetic damage without an elemental affinity.
    Normal,
    /// Fire damage, typically paired with burn effects.
    Fire,
    /// Frost damage, typically paired with slow or freeze effects.
    Frost,
    /// Arcane damage that few enemies resist.
    Arcane,
}

/// Per-damage-type mitigation fractions, each in `[0, 1)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResistanceProfile {
    /// Mitigation applied to [`DamageType::Normal`].
    pub normal: f32,
    /// Mitigation applied to [`DamageType::Fire`].
    pub fire: f32,
    /// Mitigation applied to [`DamageType::Frost`].
    pub frost: f32,
    /// Mitigation applied to [`DamageType::Arcane`].
    pub arcane: f32,
}

impl ResistanceProfile {
    /// Mitigation fraction for the provided damage type.
    #[must_use]
    pub fn fraction(&self, damage_type: DamageType) -> f32 {
        match damage_type {
            DamageType::Normal => self.normal,
            DamageType::Fire => self.fire,
            DamageType::Frost => self.frost,
            DamageType::Arcane => self.arcane,
        }
    }

    /// Reports whether every fraction lies inside the permitted `[0, 1)` band.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        [self.normal, self.fire, self.frost, self.arcane]
            .iter()
            .all(|fraction| (0.0..1.0).contains(fraction))
    }
}

/// Rule a tower uses to pick which in-range enemy to attack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetingStrategy {
    /// Minimum distance to the tower.
    Closest,
    /// Maximum distance to the tower.
    Furthest,
    /// Minimum current health.
    Weakest,
    /// Maximum current health.
    Strongest,
    /// Maximum path progress, prioritising enemies closest to escaping.
    PathProgress,
}

/// Timed modifier a projectile may apply to the enemy it hits.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EffectConfig {
    /// Multiplies movement speed by `factor` for `duration` seconds.
    Slow {
        /// Speed multiplier in `[0, 1]`.
        factor: f32,
        /// Seconds the slow remains active.
        duration: f32,
    },
    /// Blocks all movement for `duration` seconds.
    Stun {
        /// Seconds the stun remains active.
        duration: f32,
    },
    /// Applies `damage_per_second` of direct damage while active.
    Burn {
        /// Damage applied per second of simulated time.
        damage_per_second: f32,
        /// Seconds the burn remains active.
        duration: f32,
    },
    /// Halts movement entirely for `duration` seconds.
    Freeze {
        /// Seconds the freeze remains active.
        duration: f32,
    },
}

/// Data-driven description of one enemy type in the roster.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemyTypeConfig {
    /// Human-readable name used in configuration files and logs.
    pub name: String,
    /// Spawn-budget cost deducted when the wave director spawns this type.
    pub cost: u32,
    /// Base health before any wave scaling.
    pub health: f32,
    /// Movement speed in world units per second.
    pub speed: f32,
    /// Flat damage reduction; at least one point of damage always lands.
    #[serde(default)]
    pub armor: f32,
    /// Money credited to the economy when an enemy of this type dies.
    pub bounty: u32,
    /// Collision radius in world units.
    pub radius: f32,
    /// Per-damage-type mitigation fractions.
    #[serde(default)]
    pub resistances: ResistanceProfile,
    /// First wave this type may appear in.
    #[serde(default = "default_intro_wave")]
    pub intro_wave: u32,
    /// Number of waves over which the appearance probability ramps to one.
    #[serde(default)]
    pub ramp_waves: u32,
}

fn default_intro_wave() -> u32 {
    1
}

/// Data-driven description of the projectile a tower kind fires.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProjectileConfig {
    /// Travel speed in world units per second.
    pub speed: f32,
    /// Whether the projectile re-aims at its target every tick.
    #[serde(default)]
    pub homing: bool,
    /// Whether the projectile survives its first hit.
    #[serde(default)]
    pub piercing: bool,
    /// Seconds of flight after which the projectile expires.
    pub lifetime: f32,
    /// Total distance after which the projectile expires.
    pub max_distance: f32,
    /// Optional status effect applied to each enemy hit.
    #[serde(default)]
    pub on_hit: Option<EffectConfig>,
}

/// Data-driven description of one tower kind.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TowerKindConfig {
    /// Human-readable name used in configuration files and logs.
    pub name: String,
    /// Placement cost charged against the external economy.
    pub cost: u32,
    /// Targeting range in world units at level one.
    pub range: f32,
    /// Seconds between consecutive shots.
    pub fire_rate: f32,
    /// Base damage per projectile at level one.
    pub damage: f32,
    /// Damage type carried by fired projectiles.
    pub damage_type: DamageType,
    /// Symmetric damage variance fraction, e.g. `0.1` for plus or minus 10%.
    #[serde(default)]
    pub damage_variance: f32,
    /// Strategy used to pick targets among in-range enemies.
    pub strategy: TargetingStrategy,
    /// Projectile fired by this tower kind.
    pub projectile: ProjectileConfig,
}

/// Multiplier applied to damage and range for a tower of the given level.
#[must_use]
pub fn level_multiplier(level: u32) -> f32 {
    1.0 + (level.saturating_sub(1) as f32) * 0.15
}

/// Tuning parameters for wave budget progression.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveTuning {
    /// Spawn budget of the first wave.
    pub base_budget: f32,
    /// Multiplier applied per wave: wave `n` holds `base * growth^(n-1)`.
    pub growth_factor: f32,
    /// Seconds between spawn attempts while budget remains.
    pub spawn_interval: f32,
    /// Extra health per wave elapsed since a type's first appearance.
    pub health_ramp_per_wave: f32,
}

impl Default for WaveTuning {
    fn default() -> Self {
        Self {
            base_budget: 20.0,
            growth_factor: 2.0,
            spawn_interval: 1.0,
            health_ramp_per_wave: 5.0,
        }
    }
}

/// Immutable level geometry: the waypoint path and the placement grid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelLayout {
    /// Ordered waypoints enemies walk in sequence; at least two entries.
    pub waypoints: Vec<WorldPoint>,
    /// Number of placement grid columns.
    pub columns: u32,
    /// Number of placement grid rows.
    pub rows: u32,
    /// Side length of one square grid cell in world units.
    pub cell_size: f32,
}

impl LevelLayout {
    /// World-space center of the provided grid cell.
    #[must_use]
    pub fn cell_center(&self, cell: CellCoord) -> WorldPoint {
        WorldPoint::new(
            (cell.column() as f32 + 0.5) * self.cell_size,
            (cell.row() as f32 + 0.5) * self.cell_size,
        )
    }

    /// Reports whether the cell lies inside the placement grid.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }

    /// Grid cell containing the provided world point, if any.
    #[must_use]
    pub fn cell_at(&self, point: WorldPoint) -> Option<CellCoord> {
        if self.cell_size <= 0.0 || point.x() < 0.0 || point.y() < 0.0 {
            return None;
        }
        let column = (point.x() / self.cell_size) as u32;
        let row = (point.y() / self.cell_size) as u32;
        let cell = CellCoord::new(column, row);
        self.contains(cell).then_some(cell)
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Installs level geometry and the entity type tables.
    ConfigureLevel {
        /// Waypoint path and placement grid for the level.
        layout: LevelLayout,
        /// Roster of spawnable enemy types, indexed by [`EnemyTypeId`].
        enemy_types: Vec<EnemyTypeConfig>,
        /// Table of constructible tower kinds, indexed by [`TowerKindId`].
        tower_kinds: Vec<TowerKindConfig>,
    },
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests that an enemy of the given type enter the path at its start.
    SpawnEnemy {
        /// Roster index of the type to spawn.
        enemy_type: EnemyTypeId,
        /// Health the enemy spawns with, wave scaling already applied.
        health: f32,
    },
    /// Requests that a tower fire a projectile at the given enemy.
    FireProjectile {
        /// Tower doing the firing.
        tower: TowerId,
        /// Enemy the projectile is aimed at.
        target: EnemyId,
        /// Damage the projectile carries, variance already rolled.
        damage: f32,
    },
    /// Requests placement of a tower at the provided grid cell.
    PlaceTower {
        /// Kind of tower to construct.
        kind: TowerKindId,
        /// Grid cell that anchors the tower.
        cell: CellCoord,
    },
    /// Requests removal of an existing tower.
    RemoveTower {
        /// Identifier of the tower targeted for removal.
        tower: TowerId,
    },
    /// Requests a level increase for an existing tower.
    UpgradeTower {
        /// Identifier of the tower targeted for the upgrade.
        tower: TowerId,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Confirms that level geometry and type tables were installed.
    LevelConfigured,
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that an enemy entered the path.
    EnemySpawned {
        /// Identifier assigned to the newly spawned enemy.
        enemy: EnemyId,
        /// Roster index of the spawned type.
        enemy_type: EnemyTypeId,
    },
    /// Reports that a spawn request referenced an unknown enemy type.
    SpawnRejected {
        /// Roster index provided in the rejected request.
        enemy_type: EnemyTypeId,
    },
    /// Confirms that an enemy's health reached zero.
    EnemyDied {
        /// Identifier of the dead enemy.
        enemy: EnemyId,
        /// Money owed to the player economy for the kill.
        bounty: u32,
    },
    /// Confirms that an enemy reached the final waypoint alive.
    EnemyEscaped {
        /// Identifier of the escaped enemy.
        enemy: EnemyId,
    },
    /// Confirms that a tower fired a projectile.
    ProjectileFired {
        /// Identifier assigned to the projectile.
        projectile: ProjectileId,
        /// Tower that fired.
        tower: TowerId,
        /// Enemy the projectile was aimed at.
        target: EnemyId,
    },
    /// Confirms that a projectile damaged an enemy.
    ProjectileHit {
        /// Projectile that landed the hit.
        projectile: ProjectileId,
        /// Enemy that was damaged.
        enemy: EnemyId,
        /// Damage actually applied after armor and resistance.
        damage: f32,
    },
    /// Confirms that a projectile expired without further hits.
    ProjectileExpired {
        /// Identifier of the expired projectile.
        projectile: ProjectileId,
    },
    /// Confirms that a tower was placed into the world.
    TowerPlaced {
        /// Identifier assigned to the tower by the world.
        tower: TowerId,
        /// Kind of tower that was placed.
        kind: TowerKindId,
        /// Grid cell that anchors the tower.
        cell: CellCoord,
    },
    /// Reports that a tower placement request was rejected.
    TowerPlacementRejected {
        /// Kind of tower requested for placement.
        kind: TowerKindId,
        /// Cell provided in the placement request.
        cell: CellCoord,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Confirms that a tower was removed from the world.
    TowerRemoved {
        /// Identifier of the tower that was removed.
        tower: TowerId,
        /// Money owed back to the player economy for the sale.
        refund: u32,
    },
    /// Reports that a tower removal request was rejected.
    TowerRemovalRejected {
        /// Identifier of the tower targeted for removal.
        tower: TowerId,
        /// Specific reason the removal failed.
        reason: RemovalError,
    },
    /// Confirms that a tower's level increased.
    TowerUpgraded {
        /// Identifier of the upgraded tower.
        tower: TowerId,
        /// Level the tower now holds.
        level: u32,
    },
    /// Reports that a tower upgrade request was rejected.
    TowerUpgradeRejected {
        /// Identifier of the tower targeted for the upgrade.
        tower: TowerId,
        /// Specific reason the upgrade failed.
        reason: RemovalError,
    },
}

/// Reasons a tower placement request may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementError {
    /// The requested cell lies outside the placement grid.
    OutOfBounds,
    /// The requested cell is crossed by the enemy path.
    OnPath,
    /// The requested cell already holds a tower.
    Occupied,
    /// The external economy cannot cover the placement cost.
    InsufficientFunds,
    /// No tower kind with the provided index is configured.
    UnknownKind,
}

/// Reasons a tower removal or upgrade request may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RemovalError {
    /// No tower with the provided identifier exists.
    MissingTower,
    /// The external economy cannot cover the upgrade cost.
    InsufficientFunds,
}

/// Immutable representation of a single enemy's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// Roster index of the enemy's type.
    pub enemy_type: EnemyTypeId,
    /// Interpolated world position derived from path progress.
    pub position: WorldPoint,
    /// Facing angle in radians along the current path segment.
    pub rotation: f32,
    /// Current health.
    pub health: f32,
    /// Health the enemy spawned with.
    pub max_health: f32,
    /// Fraction of the path completed, zero at spawn, one at the terminus.
    pub progress: f32,
    /// Collision radius in world units.
    pub radius: f32,
    /// Whether a stun currently blocks movement.
    pub stunned: bool,
    /// Whether a freeze currently halts movement.
    pub frozen: bool,
    /// Current speed multiplier from slow and freeze effects.
    pub slow_factor: f32,
}

impl EnemySnapshot {
    /// Remaining health as a fraction of maximum health.
    #[must_use]
    pub fn health_fraction(&self) -> f32 {
        if self.max_health <= 0.0 {
            return 0.0;
        }
        self.health / self.max_health
    }
}

/// Read-only snapshot describing all live enemies.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Looks up a snapshot by identifier.
    #[must_use]
    pub fn get(&self, enemy: EnemyId) -> Option<&EnemySnapshot> {
        self.snapshots
            .binary_search_by_key(&enemy, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Number of live enemies captured in the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view holds no enemies.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single tower's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerSnapshot {
    /// Identifier allocated to the tower by the world.
    pub id: TowerId,
    /// Kind table index of the tower.
    pub kind: TowerKindId,
    /// Grid cell that anchors the tower.
    pub cell: CellCoord,
    /// World-space center of the tower's cell.
    pub position: WorldPoint,
    /// Current upgrade level, starting at one.
    pub level: u32,
    /// Targeting range in world units, level scaling applied.
    pub range: f32,
    /// Damage per projectile, level scaling applied, variance not yet rolled.
    pub damage: f32,
    /// Symmetric variance fraction the combat system rolls on each shot.
    pub damage_variance: f32,
    /// Seconds between consecutive shots.
    pub fire_rate: f32,
    /// Seconds until the tower may fire again; zero when ready.
    pub ready_in: f32,
    /// Strategy used to pick targets.
    pub strategy: TargetingStrategy,
}

/// Read-only snapshot describing all placed towers.
#[derive(Clone, Debug, Default)]
pub struct TowerView {
    snapshots: Vec<TowerSnapshot>,
}

impl TowerView {
    /// Creates a new tower view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TowerSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &TowerSnapshot> {
        self.snapshots.iter()
    }

    /// Looks up a snapshot by identifier.
    #[must_use]
    pub fn get(&self, tower: TowerId) -> Option<&TowerSnapshot> {
        self.snapshots
            .binary_search_by_key(&tower, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Reports whether the view holds no towers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TowerSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single projectile used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    /// Identifier allocated to the projectile by the world.
    pub id: ProjectileId,
    /// Current world position.
    pub position: WorldPoint,
    /// Heading angle in radians.
    pub rotation: f32,
    /// Whether the projectile survives its first hit.
    pub piercing: bool,
    /// Whether the projectile has damaged at least one enemy.
    pub has_hit: bool,
}

/// Read-only snapshot describing all live projectiles.
#[derive(Clone, Debug, Default)]
pub struct ProjectileView {
    snapshots: Vec<ProjectileSnapshot>,
}

impl ProjectileView {
    /// Creates a new projectile view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<ProjectileSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &ProjectileSnapshot> {
        self.snapshots.iter()
    }

    /// Number of live projectiles captured in the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view holds no projectiles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<ProjectileSnapshot> {
        self.snapshots
    }
}

/// Assignment of one tower to the enemy it should engage this tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerTarget {
    /// Tower holding the assignment.
    pub tower: TowerId,
    /// Enemy the tower should engage.
    pub enemy: EnemyId,
    /// World-space center of the tower.
    pub tower_position: WorldPoint,
    /// World position of the enemy when the assignment was computed.
    pub enemy_position: WorldPoint,
}

/// Player money ledger consumed by the orchestrator.
///
/// The simulation core never reads or stores a balance; it only asks the
/// ledger whether costs are coverable and credits bounties and refunds.
pub trait Economy {
    /// Reports whether the balance covers the provided cost.
    fn can_afford(&self, cost: u32) -> bool;

    /// Deducts the cost, returning `false` when the balance cannot cover it.
    fn spend(&mut self, cost: u32) -> bool;

    /// Credits the provided amount to the balance.
    fn earn(&mut self, amount: u32);
}
