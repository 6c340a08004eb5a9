#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless Rampart defence.
//!
//! Towers are placed by a simple greedy builder next to the path; the
//! simulation then runs at a fixed tick until the requested number of waves
//! clears or the defence runs out of lives.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use rampart_core::{CellCoord, Economy, TowerKindId};
use rampart_engine::{GameConfig, Simulation};

const MAX_TICKS: u64 = 400_000;

#[derive(Debug, Parser)]
#[command(name = "rampart", about = "Headless tower-defence simulation driver")]
struct Args {
    /// Path to a TOML game configuration; defaults to the built-in skirmish.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Overrides the configuration's global seed.
    #[arg(long)]
    seed: Option<u64>,
    /// Waves to survive before declaring victory.
    #[arg(long, default_value_t = 5)]
    waves: u32,
    /// Lives before the defence falls.
    #[arg(long, default_value_t = 20)]
    lives: u32,
    /// Starting money.
    #[arg(long, default_value_t = 250)]
    money: u32,
    /// Simulated seconds per tick.
    #[arg(long, default_value_t = 0.05)]
    tick: f32,
}

#[derive(Debug)]
struct Bank {
    money: u32,
}

impl Economy for Bank {
    fn can_afford(&self, cost: u32) -> bool {
        self.money >= cost
    }

    fn spend(&mut self, cost: u32) -> bool {
        if self.money >= cost {
            self.money -= cost;
            true
        } else {
            false
        }
    }

    fn earn(&mut self, amount: u32) {
        self.money = self.money.saturating_add(amount);
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => {
            let source = std::fs::read_to_string(path)
                .with_context(|| format!("reading configuration from {}", path.display()))?;
            GameConfig::from_toml_str(&source)?
        }
        None => GameConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    let build_sites = plan_build_sites(&config);
    let mut simulation = Simulation::new(config)?;
    let mut bank = Bank { money: args.money };
    let dt = Duration::from_secs_f32(args.tick.max(0.001));

    let mut lives = args.lives;
    let mut score: u64 = 0;
    let mut waves_cleared = 0;
    let mut next_site = 0;

    for _ in 0..MAX_TICKS {
        build_when_affordable(&mut simulation, &mut bank, &build_sites, &mut next_site);

        let summary = simulation.step(dt, &mut bank);
        score += u64::from(summary.bounty_earned);
        lives = lives.saturating_sub(summary.lives_lost);
        if let Some(wave) = summary.wave_completed {
            waves_cleared = wave;
            score += 25 * u64::from(wave);
            tracing::info!(wave, money = bank.money, lives, "wave cleared");
        }

        if lives == 0 || waves_cleared >= args.waves {
            break;
        }
    }

    let outcome = if lives == 0 { "defeat" } else { "victory" };
    println!(
        "{outcome}: waves cleared {waves_cleared}, lives {lives}, money {}, final score {score}",
        bank.money,
    );
    Ok(())
}

/// Lists buildable cells bordering the path, nearest-to-spawn first.
fn plan_build_sites(config: &GameConfig) -> Vec<CellCoord> {
    let path_cells: BTreeSet<(u32, u32)> = trace_cells(config);
    let mut sites = Vec::new();
    let mut seen = BTreeSet::new();
    for &(column, row) in &path_cells {
        for (dc, dr) in [(0i64, 1i64), (0, -1), (1, 0), (-1, 0)] {
            let neighbor = (i64::from(column) + dc, i64::from(row) + dr);
            if neighbor.0 < 0 || neighbor.1 < 0 {
                continue;
            }
            let cell = (neighbor.0 as u32, neighbor.1 as u32);
            if cell.0 >= config.level.columns || cell.1 >= config.level.rows {
                continue;
            }
            if path_cells.contains(&cell) || !seen.insert(cell) {
                continue;
            }
            sites.push(CellCoord::new(cell.0, cell.1));
        }
    }
    sites
}

/// Approximates the cells the waypoint path crosses.
fn trace_cells(config: &GameConfig) -> BTreeSet<(u32, u32)> {
    let layout = &config.level;
    let mut cells = BTreeSet::new();
    for pair in layout.waypoints.windows(2) {
        let length = pair[0].distance(pair[1]);
        let samples = ((length / (layout.cell_size * 0.5)).ceil() as u32).max(1);
        for sample in 0..=samples {
            let t = sample as f32 / samples as f32;
            if let Some(cell) = layout.cell_at(pair[0].lerp(pair[1], t)) {
                let _ = cells.insert((cell.column(), cell.row()));
            }
        }
    }
    cells
}

/// Places the cheapest tower kind on the next planned site when affordable.
fn build_when_affordable(
    simulation: &mut Simulation,
    bank: &mut Bank,
    sites: &[CellCoord],
    next_site: &mut usize,
) {
    // Kind zero is the builder's workhorse; its cost gates construction.
    let Some(cost) = simulation.tower_kinds().first().map(|kind| kind.cost) else {
        return;
    };
    while *next_site < sites.len() {
        if !bank.can_afford(cost) {
            return;
        }
        let site = sites[*next_site];
        *next_site += 1;
        if simulation
            .place_tower(TowerKindId::new(0), site, bank)
            .is_ok()
        {
            return;
        }
    }
}
