//! Monte Carlo batch of win/loss projections
//!
//! Re-rolls the stochastic projection many times and summarizes where
//! capital ends up. Run `i` is seeded with `seed + i`, so a batch is
//! reproducible for a given seed while runs still execute in parallel.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::error::{CalcError, Result};
use super::projection::{project, ProjectionConfig};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchConfig {
    #[serde(flatten)]
    pub projection: ProjectionConfig,
    pub runs: usize,
    #[serde(default)]
    pub seed: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    pub runs: usize,
    pub mean_final_capital: f64,
    pub median_final_capital: f64,
    pub p5_final_capital: f64,
    pub p95_final_capital: f64,
    /// Share of runs that finished below initial capital
    pub loss_probability_pct: f64,
    pub mean_max_drawdown_pct: f64,
    pub worst_max_drawdown_pct: f64,
}

/// Outcome of a single run
struct RunOutcome {
    final_capital: f64,
    max_drawdown_pct: f64,
}

fn run_once(config: &ProjectionConfig, seed: u64) -> Result<RunOutcome> {
    let mut rng = StdRng::seed_from_u64(seed);
    let rows = project(config, &mut rng)?;

    let final_capital = rows
        .last()
        .map(|r| r.resulting_capital)
        .unwrap_or(config.initial_capital);
    let max_drawdown_pct = rows.iter().map(|r| r.drawdown_pct).fold(0.0, f64::max);

    Ok(RunOutcome {
        final_capital,
        max_drawdown_pct,
    })
}

/// Nearest-rank percentile over sorted values
fn percentile(sorted: &[f64], p: f64) -> f64 {
    let idx = ((sorted.len() as f64 * p) as usize).min(sorted.len() - 1);
    sorted[idx]
}

impl BatchConfig {
    /// Hard ceiling on runs, independent of any host-configured limit
    pub const MAX_RUNS: usize = 1_000_000;
}

pub fn simulate_batch(config: &BatchConfig) -> Result<BatchSummary> {
    config.projection.validate()?;

    if !config.projection.mode.is_stochastic() {
        return Err(CalcError::invalid(
            "mode",
            "batch simulation needs the win/loss mode; constant mode has one outcome",
        ));
    }
    if config.runs == 0 {
        return Err(CalcError::invalid("runs", "must be at least 1"));
    }
    if config.runs > BatchConfig::MAX_RUNS {
        return Err(CalcError::invalid(
            "runs",
            format!("must be at most {}, got {}", BatchConfig::MAX_RUNS, config.runs),
        ));
    }

    let outcomes: Vec<RunOutcome> = (0..config.runs)
        .into_par_iter()
        .map(|i| run_once(&config.projection, config.seed.wrapping_add(i as u64)))
        .collect::<Result<_>>()?;

    let n = outcomes.len() as f64;
    let initial = config.projection.initial_capital;

    let mut finals: Vec<f64> = outcomes.iter().map(|o| o.final_capital).collect();
    finals.sort_by(|a, b| a.total_cmp(b));

    let losers = finals.iter().filter(|&&c| c < initial).count();
    let mean_final_capital = finals.iter().sum::<f64>() / n;
    let mean_max_drawdown_pct = outcomes.iter().map(|o| o.max_drawdown_pct).sum::<f64>() / n;
    let worst_max_drawdown_pct = outcomes
        .iter()
        .map(|o| o.max_drawdown_pct)
        .fold(0.0, f64::max);

    let summary = BatchSummary {
        runs: config.runs,
        mean_final_capital,
        median_final_capital: percentile(&finals, 0.5),
        p5_final_capital: percentile(&finals, 0.05),
        p95_final_capital: percentile(&finals, 0.95),
        loss_probability_pct: losers as f64 / n * 100.0,
        mean_max_drawdown_pct,
        worst_max_drawdown_pct,
    };

    info!(
        runs = summary.runs,
        median = summary.median_final_capital,
        loss_pct = summary.loss_probability_pct,
        "Batch simulation complete ({})",
        config.projection.mode
    );

    Ok(summary)
}
