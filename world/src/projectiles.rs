//! Authoritative projectile state, motion, and the contact test.

use rampart_core::{DamageType, EffectConfig, EnemyId, ProjectileId, WorldPoint};

use crate::enemies::EnemyState;

/// Extra reach added to an enemy's radius when testing for contact.
pub(crate) const CONTACT_EPSILON: f32 = 0.05;

/// What a projectile steers toward.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum ProjectileTarget {
    /// Fixed point captured at fire time. Once the point is reached the
    /// projectile continues straight on its last heading.
    Point {
        /// Point the projectile flies toward.
        point: WorldPoint,
        /// Whether the point has already been reached.
        reached: bool,
    },
    /// Live enemy re-aimed at every tick while it remains alive.
    Enemy(EnemyId),
}

/// Mutable state of one projectile in flight.
#[derive(Clone, Debug)]
pub(crate) struct ProjectileState {
    pub(crate) id: ProjectileId,
    pub(crate) position: WorldPoint,
    /// Unit heading, or zero when spawned on top of the target.
    pub(crate) heading: WorldPoint,
    pub(crate) target: ProjectileTarget,
    pub(crate) speed: f32,
    pub(crate) damage: f32,
    pub(crate) damage_type: DamageType,
    pub(crate) piercing: bool,
    pub(crate) on_hit: Option<EffectConfig>,
    pub(crate) has_hit: bool,
    pub(crate) dead: bool,
    pub(crate) age: f32,
    pub(crate) lifetime: f32,
    pub(crate) traveled: f32,
    pub(crate) max_distance: f32,
    /// Enemies already damaged by this projectile; piercing shots must not
    /// damage the same enemy twice.
    pub(crate) hit_enemies: Vec<EnemyId>,
}

impl ProjectileState {
    /// Builds an inactive slot for pool storage.
    pub(crate) fn inert() -> Self {
        Self {
            id: ProjectileId::new(0),
            position: WorldPoint::new(0.0, 0.0),
            heading: WorldPoint::new(0.0, 0.0),
            target: ProjectileTarget::Point {
                point: WorldPoint::new(0.0, 0.0),
                reached: false,
            },
            speed: 0.0,
            damage: 0.0,
            damage_type: DamageType::Normal,
            piercing: false,
            on_hit: None,
            has_hit: false,
            dead: true,
            age: 0.0,
            lifetime: 0.0,
            traveled: 0.0,
            max_distance: 0.0,
            hit_enemies: Vec::new(),
        }
    }

    /// Reports whether the projectile already damaged the provided enemy.
    pub(crate) fn already_hit(&self, enemy: EnemyId) -> bool {
        self.hit_enemies.contains(&enemy)
    }

    /// Records a landed hit and resolves whether the projectile survives.
    pub(crate) fn register_hit(&mut self, enemy: EnemyId) {
        self.hit_enemies.push(enemy);
        self.has_hit = true;
        if !self.piercing {
            self.dead = true;
        }
    }

    /// Marks the projectile dead when its age or travel budget ran out.
    pub(crate) fn expire_if_exhausted(&mut self) -> bool {
        if self.dead {
            return false;
        }
        if self.age >= self.lifetime || self.traveled >= self.max_distance {
            self.dead = true;
            return true;
        }
        false
    }
}

/// Cached world position and contact radius for one live enemy, refreshed
/// once per tick before the projectile sweep.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Contact {
    pub(crate) enemy: EnemyId,
    pub(crate) position: WorldPoint,
    pub(crate) radius: f32,
}

/// Finds the first enemy the projectile is in contact with.
///
/// Contacts are scanned in ascending enemy-id order, which together with the
/// point-distance test keeps collision resolution deterministic. Enemies the
/// projectile already damaged and enemies that died earlier in this tick are
/// skipped. At most one contact is reported per projectile per tick.
pub(crate) fn find_contact(
    projectile: &ProjectileState,
    contacts: &[Contact],
    enemies: &[EnemyState],
) -> Option<usize> {
    for (index, contact) in contacts.iter().enumerate() {
        if enemies[index].dead || projectile.already_hit(contact.enemy) {
            continue;
        }
        let reach = contact.radius + CONTACT_EPSILON;
        if projectile.position.distance_squared(contact.position) <= reach * reach {
            return Some(index);
        }
    }
    None
}
