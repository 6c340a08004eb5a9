//! Game configuration loading and fail-fast validation.

use rampart_core::{
    DamageType, EffectConfig, EnemyTypeConfig, LevelLayout, ProjectileConfig, TargetingStrategy,
    TowerKindConfig, WaveTuning, WorldPoint,
};
use serde::Deserialize;
use thiserror::Error;

/// Reasons a configuration is rejected at startup.
///
/// A broken type table is a data bug, not a runtime condition, so loading
/// fails fast instead of limping into the simulation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The TOML document could not be parsed.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    /// The enemy roster is empty.
    #[error("the enemy roster is empty")]
    NoEnemyTypes,
    /// The tower kind table is empty.
    #[error("the tower kind table is empty")]
    NoTowerKinds,
    /// The waypoint path is too short to walk.
    #[error("the level path needs at least two waypoints")]
    TooFewWaypoints,
    /// The placement grid has no area or no cell size.
    #[error("the level grid is degenerate")]
    DegenerateGrid,
    /// An enemy type carries an out-of-range field.
    #[error("enemy type `{name}`: {reason}")]
    InvalidEnemyType {
        /// Name of the offending roster entry.
        name: String,
        /// Field-level explanation.
        reason: &'static str,
    },
    /// A tower kind carries an out-of-range field.
    #[error("tower kind `{name}`: {reason}")]
    InvalidTowerKind {
        /// Name of the offending table entry.
        name: String,
        /// Field-level explanation.
        reason: &'static str,
    },
}

/// Complete configuration for one game: level, type tables, and wave tuning.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct GameConfig {
    /// Global seed from which every random stream is derived.
    #[serde(default)]
    pub seed: u64,
    /// Level geometry.
    pub level: LevelLayout,
    /// Roster of spawnable enemy types.
    pub enemies: Vec<EnemyTypeConfig>,
    /// Table of constructible tower kinds.
    pub towers: Vec<TowerKindConfig>,
    /// Wave budget progression tuning.
    #[serde(default)]
    pub waves: WaveTuning,
}

impl GameConfig {
    /// Parses a TOML document and validates it.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every cross-reference and numeric range in the tables.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.enemies.is_empty() {
            return Err(ConfigError::NoEnemyTypes);
        }
        if self.towers.is_empty() {
            return Err(ConfigError::NoTowerKinds);
        }
        if self.level.waypoints.len() < 2 {
            return Err(ConfigError::TooFewWaypoints);
        }
        if self.level.columns == 0 || self.level.rows == 0 || self.level.cell_size <= 0.0 {
            return Err(ConfigError::DegenerateGrid);
        }

        for enemy in &self.enemies {
            let invalid = |reason| ConfigError::InvalidEnemyType {
                name: enemy.name.clone(),
                reason,
            };
            if enemy.health <= 0.0 {
                return Err(invalid("health must be positive"));
            }
            if enemy.speed < 0.0 {
                return Err(invalid("speed must be non-negative"));
            }
            if enemy.armor < 0.0 {
                return Err(invalid("armor must be non-negative"));
            }
            if enemy.radius <= 0.0 {
                return Err(invalid("radius must be positive"));
            }
            if enemy.cost == 0 {
                return Err(invalid("cost must be positive"));
            }
            if enemy.intro_wave == 0 {
                return Err(invalid("intro_wave counts from one"));
            }
            if !enemy.resistances.is_valid() {
                return Err(invalid("resistances must lie in [0, 1)"));
            }
        }

        for tower in &self.towers {
            let invalid = |reason| ConfigError::InvalidTowerKind {
                name: tower.name.clone(),
                reason,
            };
            if tower.range <= 0.0 {
                return Err(invalid("range must be positive"));
            }
            if tower.fire_rate <= 0.0 {
                return Err(invalid("fire_rate must be positive"));
            }
            if tower.damage <= 0.0 {
                return Err(invalid("damage must be positive"));
            }
            if !(0.0..1.0).contains(&tower.damage_variance) {
                return Err(invalid("damage_variance must lie in [0, 1)"));
            }
            validate_projectile(&tower.projectile).map_err(invalid)?;
        }

        Ok(())
    }
}

fn validate_projectile(projectile: &ProjectileConfig) -> Result<(), &'static str> {
    if projectile.speed <= 0.0 {
        return Err("projectile speed must be positive");
    }
    if projectile.lifetime <= 0.0 {
        return Err("projectile lifetime must be positive");
    }
    if projectile.max_distance <= 0.0 {
        return Err("projectile max_distance must be positive");
    }
    if let Some(effect) = &projectile.on_hit {
        validate_effect(effect)?;
    }
    Ok(())
}

fn validate_effect(effect: &EffectConfig) -> Result<(), &'static str> {
    match *effect {
        EffectConfig::Slow { factor, duration } => {
            if !(0.0..=1.0).contains(&factor) {
                return Err("slow factor must lie in [0, 1]");
            }
            if duration <= 0.0 {
                return Err("slow duration must be positive");
            }
        }
        EffectConfig::Stun { duration } | EffectConfig::Freeze { duration } => {
            if duration <= 0.0 {
                return Err("effect duration must be positive");
            }
        }
        EffectConfig::Burn {
            damage_per_second,
            duration,
        } => {
            if damage_per_second <= 0.0 {
                return Err("burn damage must be positive");
            }
            if duration <= 0.0 {
                return Err("burn duration must be positive");
            }
        }
    }
    Ok(())
}

impl Default for GameConfig {
    /// Built-in skirmish setup used when no configuration file is provided.
    fn default() -> Self {
        Self {
            seed: 0,
            level: LevelLayout {
                waypoints: vec![
                    WorldPoint::new(0.5, 4.5),
                    WorldPoint::new(11.5, 4.5),
                    WorldPoint::new(11.5, 9.5),
                    WorldPoint::new(19.5, 9.5),
                ],
                columns: 20,
                rows: 14,
                cell_size: 1.0,
            },
            enemies: vec![
                EnemyTypeConfig {
                    name: "scurrier".to_owned(),
                    cost: 3,
                    health: 24.0,
                    speed: 2.0,
                    armor: 0.0,
                    bounty: 2,
                    radius: 0.35,
                    resistances: Default::default(),
                    intro_wave: 1,
                    ramp_waves: 0,
                },
                EnemyTypeConfig {
                    name: "shellback".to_owned(),
                    cost: 6,
                    health: 70.0,
                    speed: 1.1,
                    armor: 3.0,
                    bounty: 5,
                    radius: 0.5,
                    resistances: rampart_core::ResistanceProfile {
                        normal: 0.2,
                        ..Default::default()
                    },
                    intro_wave: 2,
                    ramp_waves: 3,
                },
                EnemyTypeConfig {
                    name: "emberkin".to_owned(),
                    cost: 9,
                    health: 110.0,
                    speed: 1.4,
                    armor: 1.0,
                    bounty: 8,
                    radius: 0.45,
                    resistances: rampart_core::ResistanceProfile {
                        fire: 0.6,
                        ..Default::default()
                    },
                    intro_wave: 4,
                    ramp_waves: 4,
                },
            ],
            towers: vec![
                TowerKindConfig {
                    name: "bolt".to_owned(),
                    cost: 40,
                    range: 3.5,
                    fire_rate: 0.8,
                    damage: 9.0,
                    damage_type: DamageType::Normal,
                    damage_variance: 0.1,
                    strategy: TargetingStrategy::Closest,
                    projectile: ProjectileConfig {
                        speed: 9.0,
                        homing: true,
                        piercing: false,
                        lifetime: 2.0,
                        max_distance: 8.0,
                        on_hit: None,
                    },
                },
                TowerKindConfig {
                    name: "frost".to_owned(),
                    cost: 60,
                    range: 3.0,
                    fire_rate: 1.4,
                    damage: 5.0,
                    damage_type: DamageType::Frost,
                    damage_variance: 0.0,
                    strategy: TargetingStrategy::PathProgress,
                    projectile: ProjectileConfig {
                        speed: 8.0,
                        homing: true,
                        piercing: false,
                        lifetime: 2.0,
                        max_distance: 7.0,
                        on_hit: Some(EffectConfig::Slow {
                            factor: 0.5,
                            duration: 2.0,
                        }),
                    },
                },
                TowerKindConfig {
                    name: "pyre".to_owned(),
                    cost: 75,
                    range: 4.0,
                    fire_rate: 1.8,
                    damage: 7.0,
                    damage_type: DamageType::Fire,
                    damage_variance: 0.15,
                    strategy: TargetingStrategy::Strongest,
                    projectile: ProjectileConfig {
                        speed: 7.0,
                        homing: false,
                        piercing: true,
                        lifetime: 2.5,
                        max_distance: 9.0,
                        on_hit: Some(EffectConfig::Burn {
                            damage_per_second: 4.0,
                            duration: 3.0,
                        }),
                    },
                },
            ],
            waves: WaveTuning::default(),
        }
    }
}
