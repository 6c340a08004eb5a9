#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic wave progression driven by a per-wave spawn budget.

use std::collections::BTreeMap;
use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rampart_core::{Command, EnemyTypeConfig, EnemyTypeId, WaveTuning};

/// Configuration parameters required to construct the wave director.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    tuning: WaveTuning,
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration from tuning values and a selection seed.
    #[must_use]
    pub const fn new(tuning: WaveTuning, rng_seed: u64) -> Self {
        Self { tuning, rng_seed }
    }
}

/// Progress of the wave currently being played.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WaveStatus {
    /// One-based number of the current wave.
    pub wave: u32,
    /// Spawn budget of the current wave.
    pub budget: f32,
    /// Budget spent on spawns so far this wave.
    pub spent: f32,
    /// Whether the wave's spawning phase has ended.
    pub all_budget_spent: bool,
}

/// Spawn-budget state machine that emits enemy spawn commands.
///
/// A wave alternates between a spawning phase, which issues affordable
/// spawn requests on a fixed cadence until no eligible type fits the
/// remaining budget, and a draining phase that waits for the live enemies
/// to clear. The next wave then starts with `base_budget *
/// growth_factor^(wave-1)`.
#[derive(Debug)]
pub struct WaveDirector {
    tuning: WaveTuning,
    rng: ChaCha8Rng,
    wave: u32,
    budget: f32,
    spent: f32,
    all_budget_spent: bool,
    accumulator: f32,
    first_spawn_wave: BTreeMap<EnemyTypeId, u32>,
}

impl WaveDirector {
    /// Creates a new director positioned at the start of wave one.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            tuning: config.tuning,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            wave: 1,
            budget: config.tuning.base_budget,
            spent: 0.0,
            all_budget_spent: false,
            accumulator: 0.0,
            first_spawn_wave: BTreeMap::new(),
        }
    }

    /// Advances the director by `dt` and emits spawn commands.
    ///
    /// `live_enemies` is the number of enemies currently on the path;
    /// commands emitted by earlier calls must already be applied so the
    /// count reflects every spawn the director has requested.
    pub fn handle(
        &mut self,
        dt: Duration,
        roster: &[EnemyTypeConfig],
        live_enemies: usize,
        out: &mut Vec<Command>,
    ) {
        if self.all_budget_spent && live_enemies == 0 {
            self.begin_next_wave();
        }

        if self.all_budget_spent || roster.is_empty() {
            return;
        }

        self.accumulator += dt.as_secs_f32();
        let interval = self.tuning.spawn_interval.max(f32::EPSILON);
        while self.accumulator >= interval {
            self.accumulator -= interval;
            self.attempt_spawn(roster, out);
            if self.all_budget_spent {
                self.accumulator = 0.0;
                break;
            }
        }
    }

    /// Progress of the wave currently being played.
    #[must_use]
    pub fn status(&self) -> WaveStatus {
        WaveStatus {
            wave: self.wave,
            budget: self.budget,
            spent: self.spent,
            all_budget_spent: self.all_budget_spent,
        }
    }

    fn begin_next_wave(&mut self) {
        self.wave = self.wave.saturating_add(1);
        self.budget =
            self.tuning.base_budget * self.tuning.growth_factor.powi(self.wave as i32 - 1);
        self.spent = 0.0;
        self.all_budget_spent = false;
        self.accumulator = 0.0;
    }

    fn attempt_spawn(&mut self, roster: &[EnemyTypeConfig], out: &mut Vec<Command>) {
        let remaining = self.budget - self.spent;

        // Spawning ends exactly when no introduced type fits the remaining
        // budget; a failed probability roll below only skips one attempt.
        let affordable: Vec<usize> = roster
            .iter()
            .enumerate()
            .filter(|(_, config)| {
                self.wave >= config.intro_wave && config.cost as f32 <= remaining
            })
            .map(|(index, _)| index)
            .collect();
        if affordable.is_empty() {
            self.all_budget_spent = true;
            return;
        }

        let mut gated: Vec<usize> = Vec::with_capacity(affordable.len());
        for index in affordable {
            let probability = self.appearance_probability(&roster[index]);
            if probability >= 1.0 || self.rng.gen::<f32>() < probability {
                gated.push(index);
            }
        }
        if gated.is_empty() {
            return;
        }

        let index = gated[self.rng.gen_range(0..gated.len())];
        let config = &roster[index];
        let enemy_type = EnemyTypeId::new(index as u32);
        let first_wave = *self.first_spawn_wave.entry(enemy_type).or_insert(self.wave);
        let health =
            config.health + self.tuning.health_ramp_per_wave * (self.wave - first_wave) as f32;

        self.spent += config.cost as f32;
        debug_assert!(self.spent <= self.budget);
        out.push(Command::SpawnEnemy { enemy_type, health });
    }

    /// Probability that an introduced type passes this attempt's gate.
    ///
    /// Ramps linearly over `ramp_waves` waves after the introduction wave.
    /// The first eligible wave already carries one ramp step so a lone type
    /// can never gate a wave into a stall.
    fn appearance_probability(&self, config: &EnemyTypeConfig) -> f32 {
        if config.ramp_waves == 0 {
            return 1.0;
        }
        let steps = self.wave.saturating_sub(config.intro_wave).saturating_add(1);
        (steps as f32 / config.ramp_waves as f32).clamp(0.0, 1.0)
    }
}
