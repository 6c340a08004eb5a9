//! Authoritative enemy state and the damage model.

use rampart_core::{DamageType, EnemyId, EnemyTypeConfig, EnemyTypeId, ResistanceProfile};

use crate::effects::StatusEffectSet;
use crate::path::PathProgress;

/// Mutable state of one live enemy.
#[derive(Clone, Debug)]
pub(crate) struct EnemyState {
    pub(crate) id: EnemyId,
    pub(crate) enemy_type: EnemyTypeId,
    pub(crate) progress: PathProgress,
    pub(crate) health: f32,
    pub(crate) max_health: f32,
    pub(crate) armor: f32,
    pub(crate) resistances: ResistanceProfile,
    pub(crate) bounty: u32,
    pub(crate) speed: f32,
    pub(crate) radius: f32,
    pub(crate) effects: StatusEffectSet,
    pub(crate) dead: bool,
}

impl EnemyState {
    /// Builds an inactive slot for pool storage.
    pub(crate) fn inert() -> Self {
        Self {
            id: EnemyId::new(0),
            enemy_type: EnemyTypeId::new(0),
            progress: PathProgress::at_start(),
            health: 0.0,
            max_health: 0.0,
            armor: 0.0,
            resistances: ResistanceProfile::default(),
            bounty: 0,
            speed: 0.0,
            radius: 0.0,
            effects: StatusEffectSet::new(),
            dead: true,
        }
    }

    /// Re-initialises the slot for a new life at the path start.
    pub(crate) fn activate(
        &mut self,
        id: EnemyId,
        enemy_type: EnemyTypeId,
        config: &EnemyTypeConfig,
        health: f32,
    ) {
        self.id = id;
        self.enemy_type = enemy_type;
        self.progress = PathProgress::at_start();
        self.health = health;
        self.max_health = health;
        self.armor = config.armor;
        self.resistances = config.resistances;
        self.bounty = config.bounty;
        self.speed = config.speed;
        self.radius = config.radius;
        self.effects.clear();
        self.dead = false;
    }

    /// Applies typed damage and returns the amount that actually landed.
    ///
    /// Armor reduces the raw amount but at least one point always gets
    /// through; the per-type resistance fraction then scales the remainder.
    pub(crate) fn take_damage(&mut self, amount: f32, damage_type: DamageType) -> f32 {
        let after_armor = (amount - self.armor).max(1.0);
        let effective = after_armor * (1.0 - self.resistances.fraction(damage_type));
        self.apply_direct_damage(effective)
    }

    /// Subtracts damage that bypasses armor and resistance, such as burns.
    pub(crate) fn apply_direct_damage(&mut self, amount: f32) -> f32 {
        debug_assert!(amount >= 0.0, "damage must be non-negative");
        self.health -= amount;
        if self.health <= 0.0 {
            self.health = 0.0;
            self.dead = true;
        }
        debug_assert!(self.health <= self.max_health);
        amount
    }
}

#[cfg(test)]
mod tests {
    use super::EnemyState;
    use rampart_core::{DamageType, EnemyId, EnemyTypeConfig, EnemyTypeId, ResistanceProfile};

    fn config() -> EnemyTypeConfig {
        EnemyTypeConfig {
            name: "raider".to_owned(),
            cost: 4,
            health: 30.0,
            speed: 5.0,
            armor: 0.0,
            bounty: 3,
            radius: 0.5,
            resistances: ResistanceProfile::default(),
            intro_wave: 1,
            ramp_waves: 0,
        }
    }

    fn enemy_with(config: &EnemyTypeConfig, health: f32) -> EnemyState {
        let mut enemy = EnemyState::inert();
        enemy.activate(EnemyId::new(1), EnemyTypeId::new(0), config, health);
        enemy
    }

    #[test]
    fn three_unmitigated_hits_kill_exactly() {
        let config = config();
        let mut enemy = enemy_with(&config, 30.0);

        for expected_alive in [true, true, false] {
            let applied = enemy.take_damage(10.0, DamageType::Normal);
            assert!((applied - 10.0).abs() < f32::EPSILON);
            assert_eq!(!enemy.dead, expected_alive);
        }
        assert!(enemy.health.abs() < f32::EPSILON);
    }

    #[test]
    fn armor_floor_always_lands_one_point() {
        let mut config = config();
        config.armor = 50.0;
        let mut enemy = enemy_with(&config, 10.0);

        let applied = enemy.take_damage(3.0, DamageType::Normal);

        assert!((applied - 1.0).abs() < f32::EPSILON);
        assert!((enemy.health - 9.0).abs() < f32::EPSILON);
    }

    #[test]
    fn resistance_scales_post_armor_damage() {
        let mut config = config();
        config.armor = 2.0;
        config.resistances.fire = 0.5;
        let mut enemy = enemy_with(&config, 20.0);

        let applied = enemy.take_damage(12.0, DamageType::Fire);

        // (12 - 2) * (1 - 0.5) = 5.
        assert!((applied - 5.0).abs() < f32::EPSILON);
        assert!((enemy.health - 15.0).abs() < f32::EPSILON);

        let applied = enemy.take_damage(12.0, DamageType::Normal);
        assert!((applied - 10.0).abs() < f32::EPSILON);
    }

    #[test]
    fn health_never_goes_negative() {
        let config = config();
        let mut enemy = enemy_with(&config, 5.0);

        let _ = enemy.take_damage(1_000.0, DamageType::Arcane);

        assert!(enemy.dead);
        assert!(enemy.health.abs() < f32::EPSILON);
    }

    #[test]
    fn activation_resets_a_recycled_slot() {
        let config = config();
        let mut enemy = enemy_with(&config, 30.0);
        let _ = enemy.take_damage(1_000.0, DamageType::Normal);
        assert!(enemy.dead);

        enemy.activate(EnemyId::new(2), EnemyTypeId::new(0), &config, 40.0);

        assert!(!enemy.dead);
        assert_eq!(enemy.id, EnemyId::new(2));
        assert!((enemy.health - 40.0).abs() < f32::EPSILON);
        assert!((enemy.max_health - 40.0).abs() < f32::EPSILON);
    }
}
