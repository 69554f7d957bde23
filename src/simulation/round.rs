//! Round execution: one capital deployment across all tokens.

use std::collections::BTreeMap;

use rayon::prelude::*;

use crate::core::rng::TradeStreams;
use crate::core::types::{ExecutionMode, Round, SimulationConfig, Trade};

use super::trade::resolve_trade;

/// Simulate one round.
///
/// Capital is split equally across `num_tokens` trades. Only realized profit
/// compounds into the ending amount.
///
/// # Arguments
/// * `index` - 1-based round number
/// * `starting_amount` - Capital at the start of the round
/// * `config` - Normalized simulation configuration
/// * `streams` - Per-trade draw streams for this run
pub fn run_round(
    index: usize,
    starting_amount: f64,
    config: &SimulationConfig,
    streams: &TradeStreams,
) -> Round {
    let n = config.num_tokens;
    let allocation = starting_amount / n as f64;

    let resolve = |slot: usize| {
        let mut rng = streams.stream(index, slot, n);
        resolve_trade(allocation, slot, config, &mut rng)
    };

    let trades: Vec<Trade> = match config.execution {
        ExecutionMode::Sequential => (0..n).map(resolve).collect(),
        ExecutionMode::Parallel => (0..n).into_par_iter().map(resolve).collect(),
    };

    let mut success_count = 0;
    let mut profit_level_hit_counts: BTreeMap<String, usize> = BTreeMap::new();
    for trade in trades.iter().filter(|t| t.is_success()) {
        success_count += 1;
        for fill in &trade.fills {
            *profit_level_hit_counts.entry(fill.key()).or_insert(0) += 1;
        }
    }

    // Summed per trade so a round of total losses ends at exactly zero
    let ending_amount: f64 = trades.iter().map(|t| t.invested + t.realized_profit).sum();
    let profit = ending_amount - starting_amount;

    Round {
        index,
        starting_amount,
        ending_amount,
        profit,
        profit_percentage: profit / starting_amount * 100.0,
        stop_loss_count: trades.len() - success_count,
        success_count,
        trades,
        profit_level_hit_counts,
    }
}
