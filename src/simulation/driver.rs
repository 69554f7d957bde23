//! Simulation driver: validates input and runs compounding rounds to completion.

use tracing::{debug, info, warn};

use crate::core::error::Result;
use crate::core::rng::RngSource;
use crate::core::types::{SimulationConfig, SimulationResult};

use super::round::run_round;
use super::summary::summarize;

/// Fast-tracking growth simulator.
///
/// Holds a validated, normalized copy of the caller's configuration. Each call
/// to [`GrowthSimulator::run`] produces one complete, independent result.
#[derive(Debug, Clone)]
pub struct GrowthSimulator {
    config: SimulationConfig,
    rng: RngSource,
}

impl GrowthSimulator {
    /// Validate `config` and prepare a simulator drawing from the system RNG.
    pub fn new(config: &SimulationConfig) -> Result<Self> {
        if let Err(err) = config.validate() {
            warn!(error = %err, "Rejected simulation config");
            return Err(err);
        }

        Ok(Self {
            config: config.normalized(),
            rng: RngSource::System,
        })
    }

    /// Set the randomness source.
    pub fn with_rng(mut self, rng: RngSource) -> Self {
        self.rng = rng;
        self
    }

    /// Normalized configuration this simulator runs with.
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Run rounds until the target is reached, capital is exhausted, or the
    /// round cap is hit.
    pub fn run(&self) -> Result<SimulationResult> {
        let config = &self.config;
        let streams = self.rng.resolve()?;

        info!(
            initial = config.initial_amount,
            target = config.target_amount,
            tokens = config.num_tokens,
            levels = config.profit_levels.len(),
            seed = ?streams.seed(),
            "Running growth simulation"
        );

        let mut timeline = Vec::new();
        let mut current = config.initial_amount;

        while current < config.target_amount && timeline.len() < config.max_rounds && current > 0.0 {
            let round = run_round(timeline.len() + 1, current, config, &streams);
            debug!(
                round = round.index,
                start = round.starting_amount,
                end = round.ending_amount,
                wins = round.success_count,
                stops = round.stop_loss_count,
                "Round complete"
            );
            current = round.ending_amount;
            timeline.push(round);
        }

        let summary = summarize(config.initial_amount, config.target_amount, &timeline);
        info!(
            rounds = summary.rounds_required,
            final_amount = summary.final_amount,
            termination = ?summary.termination,
            "Growth simulation finished"
        );

        Ok(SimulationResult {
            timeline,
            summary,
            seed: streams.seed(),
        })
    }
}

/// Run one simulation with the system RNG.
pub fn run(config: &SimulationConfig) -> Result<SimulationResult> {
    GrowthSimulator::new(config)?.run()
}

/// Run one simulation with an explicit randomness source.
pub fn run_with_rng(config: &SimulationConfig, rng: RngSource) -> Result<SimulationResult> {
    GrowthSimulator::new(config)?.with_rng(rng).run()
}
