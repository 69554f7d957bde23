//! Monte Carlo projection over many independent growth simulations.
//!
//! Each simulation is a full single-run simulation with its own seed; runs are
//! spread across the rayon pool.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::error::{GrowthError, Result};
use crate::core::rng::{RngSource, Xoshiro256};
use crate::core::types::{ExecutionMode, SimulationConfig, TerminationReason};

use super::driver::GrowthSimulator;

/// Configuration for a batch projection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchConfig {
    pub n_simulations: usize,
    pub seed: u64,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self { n_simulations: 1_000, seed: 42 }
    }
}

/// Result of a batch projection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResult {
    /// Number of simulations run.
    pub simulations: usize,
    /// Fraction of runs that reached the target.
    pub target_probability: f64,
    /// Fraction of runs that went bankrupt.
    pub bankruptcy_probability: f64,
    /// Fraction of runs that exhausted the round cap.
    pub round_limit_probability: f64,
    /// Mean rounds among runs that reached the target.
    pub mean_rounds_to_target: Option<f64>,
    /// Mean total growth percentage across all runs.
    pub expected_growth_pct: f64,
    /// Percentile final amounts: (percentile, amount)
    pub percentile_final_amounts: Vec<(f64, f64)>,
    /// Final amount of each run, sorted ascending.
    pub final_amounts: Vec<f64>,
}

struct Outcome {
    final_amount: f64,
    growth_pct: f64,
    rounds: usize,
    termination: TerminationReason,
}

/// Run `batch.n_simulations` independent simulations of `config`.
pub fn simulate_batch(config: &SimulationConfig, batch: &BatchConfig) -> Result<BatchResult> {
    if batch.n_simulations == 0 {
        return Err(GrowthError::invalid_parameter("nSimulations", "must be at least 1"));
    }

    // Trades within a run stay sequential; parallelism is across runs.
    let config = config.clone().with_execution(ExecutionMode::Sequential);
    let simulator = GrowthSimulator::new(&config)?;

    let mut base_rng = Xoshiro256::new(batch.seed);
    let seeds: Vec<u64> = (0..batch.n_simulations).map(|_| base_rng.next_u64()).collect();

    info!(
        simulations = batch.n_simulations,
        seed = batch.seed,
        threads = rayon::current_num_threads(),
        "Running batch projection"
    );

    let outcomes: Vec<Outcome> = seeds
        .into_par_iter()
        .map(|seed| -> Result<Outcome> {
            let result = simulator.clone().with_rng(RngSource::deterministic(seed)).run()?;
            Ok(Outcome {
                final_amount: result.summary.final_amount,
                growth_pct: result.summary.total_growth_pct,
                rounds: result.summary.rounds_required,
                termination: result.summary.termination,
            })
        })
        .collect::<Result<_>>()?;

    let n = outcomes.len();
    let fraction = |reason: TerminationReason| {
        outcomes.iter().filter(|o| o.termination == reason).count() as f64 / n as f64
    };

    let hit_rounds: Vec<usize> = outcomes
        .iter()
        .filter(|o| o.termination == TerminationReason::TargetReached)
        .map(|o| o.rounds)
        .collect();
    let mean_rounds_to_target = if hit_rounds.is_empty() {
        None
    } else {
        Some(hit_rounds.iter().sum::<usize>() as f64 / hit_rounds.len() as f64)
    };

    let expected_growth_pct = outcomes.iter().map(|o| o.growth_pct).sum::<f64>() / n as f64;

    let mut final_amounts: Vec<f64> = outcomes.iter().map(|o| o.final_amount).collect();
    final_amounts.sort_by(|a, b| a.total_cmp(b));

    let percentile_final_amounts = [5.0, 25.0, 50.0, 75.0, 95.0]
        .iter()
        .map(|&pct| {
            let idx = ((pct / 100.0) * (n as f64 - 1.0)).round() as usize;
            (pct, final_amounts[idx.min(n - 1)])
        })
        .collect();

    Ok(BatchResult {
        simulations: n,
        target_probability: fraction(TerminationReason::TargetReached),
        bankruptcy_probability: fraction(TerminationReason::Bankrupt),
        round_limit_probability: fraction(TerminationReason::RoundLimit),
        mean_rounds_to_target,
        expected_growth_pct,
        percentile_final_amounts,
        final_amounts,
    })
}
