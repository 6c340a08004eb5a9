//! Timed status modifiers carried by each enemy.

use rampart_core::EffectConfig;

#[derive(Clone, Copy, Debug, PartialEq)]
struct Slow {
    factor: f32,
    remaining: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Burn {
    damage_per_second: f32,
    remaining: f32,
}

/// Active timed modifiers for one enemy.
///
/// Re-applying an active effect keeps the longer of the current and new
/// durations; magnitudes (slow factor, burn rate) are overwritten by the
/// latest application. Freeze is a full movement halt tracked separately
/// from slow so queries can distinguish the two.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct StatusEffectSet {
    slow: Option<Slow>,
    stun_remaining: Option<f32>,
    burn: Option<Burn>,
    freeze_remaining: Option<f32>,
}

impl StatusEffectSet {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Removes every active effect, used when an enemy slot is reactivated.
    pub(crate) fn clear(&mut self) {
        *self = Self::default();
    }

    /// Applies one effect according to the re-application policy.
    pub(crate) fn apply(&mut self, config: EffectConfig) {
        match config {
            EffectConfig::Slow { factor, duration } => match &mut self.slow {
                Some(slow) => {
                    slow.factor = factor;
                    slow.remaining = slow.remaining.max(duration);
                }
                None => {
                    self.slow = Some(Slow {
                        factor,
                        remaining: duration,
                    });
                }
            },
            EffectConfig::Stun { duration } => {
                self.stun_remaining = Some(match self.stun_remaining {
                    Some(remaining) => remaining.max(duration),
                    None => duration,
                });
            }
            EffectConfig::Burn {
                damage_per_second,
                duration,
            } => match &mut self.burn {
                Some(burn) => {
                    burn.damage_per_second = damage_per_second;
                    burn.remaining = burn.remaining.max(duration);
                }
                None => {
                    self.burn = Some(Burn {
                        damage_per_second,
                        remaining: duration,
                    });
                }
            },
            EffectConfig::Freeze { duration } => {
                self.freeze_remaining = Some(match self.freeze_remaining {
                    Some(remaining) => remaining.max(duration),
                    None => duration,
                });
            }
        }
    }

    /// Advances every active duration and returns the burn damage owed for
    /// this tick.
    ///
    /// Durations are decremented first and effects whose remaining time
    /// reaches zero are deactivated; a burn that survives the decrement then
    /// deals `damage_per_second * dt`.
    pub(crate) fn tick(&mut self, dt: f32) -> f32 {
        if let Some(slow) = &mut self.slow {
            slow.remaining -= dt;
            if slow.remaining <= 0.0 {
                self.slow = None;
            }
        }
        if let Some(remaining) = &mut self.stun_remaining {
            *remaining -= dt;
            if *remaining <= 0.0 {
                self.stun_remaining = None;
            }
        }
        if let Some(remaining) = &mut self.freeze_remaining {
            *remaining -= dt;
            if *remaining <= 0.0 {
                self.freeze_remaining = None;
            }
        }
        let mut burn_damage = 0.0;
        if let Some(burn) = &mut self.burn {
            burn.remaining -= dt;
            if burn.remaining <= 0.0 {
                self.burn = None;
            } else {
                burn_damage = burn.damage_per_second * dt;
            }
        }
        burn_damage
    }

    /// Movement speed multiplier from slow and freeze effects.
    ///
    /// Freeze dominates with a multiplier of zero; otherwise the active slow
    /// factor applies, or one when nothing modifies movement.
    pub(crate) fn speed_multiplier(&self) -> f32 {
        if self.freeze_remaining.is_some() {
            return 0.0;
        }
        self.slow.map_or(1.0, |slow| slow.factor)
    }

    /// Whether a stun currently blocks movement.
    pub(crate) fn is_stunned(&self) -> bool {
        self.stun_remaining.is_some()
    }

    /// Whether a freeze currently halts movement.
    pub(crate) fn is_frozen(&self) -> bool {
        self.freeze_remaining.is_some()
    }
}
