//! Core data types for fasttrack.
//!
//! Field names serialize in camelCase because a presentation layer renders
//! them directly; round and trade records use the names that layer expects.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::error::{GrowthError, Result};

/// Type alias for price values.
pub type Price = f64;

/// Reference unit price. Coin quantities are denominated in dollars invested.
pub const DEFAULT_BASE_PRICE: Price = 1.0;

/// Hard cap on the number of rounds a single simulation may run.
pub const DEFAULT_MAX_ROUNDS: usize = 100;

/// One step of sequential take-profit liquidation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfitLevel {
    /// Percentage of the currently remaining coins to sell at this level.
    pub sell_percentage: f64,
    /// Price appreciation over the base price that triggers this level.
    pub price_increase_pct: f64,
}

impl ProfitLevel {
    /// Create a new profit level.
    pub fn new(sell_percentage: f64, price_increase_pct: f64) -> Self {
        Self {
            sell_percentage,
            price_increase_pct,
        }
    }

    /// Price at which this level fills.
    #[inline]
    pub fn trigger_price(&self, base_price: Price) -> Price {
        base_price * (1.0 + self.price_increase_pct / 100.0)
    }

    /// Key used for per-level hit counts, e.g. `"30%"`.
    pub fn key(&self) -> String {
        format!("{}%", self.price_increase_pct)
    }
}

/// How the trades of a single round are evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    /// Evaluate trades one after another on the calling thread.
    #[default]
    Sequential,
    /// Evaluate trades on the rayon thread pool.
    Parallel,
}

fn default_base_price() -> Price {
    DEFAULT_BASE_PRICE
}

fn default_max_rounds() -> usize {
    DEFAULT_MAX_ROUNDS
}

/// Simulation configuration, immutable for the duration of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationConfig {
    /// Starting capital.
    pub initial_amount: f64,
    /// Capital the simulation tries to reach.
    pub target_amount: f64,
    /// Loss applied to a failed trade, in percent.
    pub stop_loss_pct: f64,
    /// Number of tokens capital is split across each round.
    pub num_tokens: usize,
    /// Percentage chance that a single token trade succeeds.
    pub success_probability: f64,
    /// Take-profit ladder applied to successful trades.
    pub profit_levels: Vec<ProfitLevel>,
    /// Reference unit price.
    #[serde(default = "default_base_price")]
    pub base_price: Price,
    /// Iteration cap.
    #[serde(default = "default_max_rounds")]
    pub max_rounds: usize,
    /// Trade evaluation strategy within a round.
    #[serde(default)]
    pub execution: ExecutionMode,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            initial_amount: 1_000.0,
            target_amount: 10_000.0,
            stop_loss_pct: 15.0,
            num_tokens: 3,
            success_probability: 50.0,
            profit_levels: vec![ProfitLevel::new(50.0, 30.0)],
            base_price: DEFAULT_BASE_PRICE,
            max_rounds: DEFAULT_MAX_ROUNDS,
            execution: ExecutionMode::Sequential,
        }
    }
}

impl SimulationConfig {
    /// Create a new configuration with default base price, round cap and execution mode.
    pub fn new(
        initial_amount: f64,
        target_amount: f64,
        stop_loss_pct: f64,
        num_tokens: usize,
        success_probability: f64,
        profit_levels: Vec<ProfitLevel>,
    ) -> Self {
        Self {
            initial_amount,
            target_amount,
            stop_loss_pct,
            num_tokens,
            success_probability,
            profit_levels,
            ..Self::default()
        }
    }

    /// Parse a configuration from JSON.
    ///
    /// Counts below 1 fail as `InvalidParameter` rather than as a parse error,
    /// so negative `numTokens` or `maxRounds` report like any other bad input.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        for field in ["numTokens", "maxRounds"] {
            if let Some(count) = value.get(field).and_then(serde_json::Value::as_i64) {
                if count < 1 {
                    return Err(GrowthError::invalid_parameter(
                        field,
                        format!("must be at least 1, got {count}"),
                    ));
                }
            }
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Set the profit levels.
    pub fn with_profit_levels(mut self, levels: Vec<ProfitLevel>) -> Self {
        self.profit_levels = levels;
        self
    }

    /// Set the execution mode.
    pub fn with_execution(mut self, execution: ExecutionMode) -> Self {
        self.execution = execution;
        self
    }

    /// Set the round cap.
    pub fn with_max_rounds(mut self, max_rounds: usize) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    /// Liquidation price of a stopped-out trade.
    #[inline]
    pub fn stop_loss_price(&self) -> Price {
        self.base_price * (1.0 - self.stop_loss_pct / 100.0)
    }

    /// Check every field against its allowed range.
    pub fn validate(&self) -> Result<()> {
        positive("initialAmount", self.initial_amount)?;
        positive("targetAmount", self.target_amount)?;
        positive("basePrice", self.base_price)?;

        if self.num_tokens == 0 {
            return Err(GrowthError::invalid_parameter("numTokens", "must be at least 1"));
        }
        if self.max_rounds == 0 {
            return Err(GrowthError::invalid_parameter("maxRounds", "must be at least 1"));
        }
        if !(self.stop_loss_pct > 0.0 && self.stop_loss_pct <= 100.0) {
            return Err(GrowthError::invalid_parameter(
                "stopLossPct",
                format!("must be in (0, 100], got {}", self.stop_loss_pct),
            ));
        }
        if !(0.0..=100.0).contains(&self.success_probability) {
            return Err(GrowthError::invalid_parameter(
                "successProbability",
                format!("must be in [0, 100], got {}", self.success_probability),
            ));
        }
        if self.profit_levels.is_empty() {
            return Err(GrowthError::empty_data("profitLevels"));
        }

        for (i, level) in self.profit_levels.iter().enumerate() {
            if !(0.0..=100.0).contains(&level.sell_percentage) {
                return Err(GrowthError::invalid_parameter(
                    format!("profitLevels[{i}].sellPercentage"),
                    format!("must be in [0, 100], got {}", level.sell_percentage),
                ));
            }
            if !(level.price_increase_pct.is_finite() && level.price_increase_pct >= 0.0) {
                return Err(GrowthError::invalid_parameter(
                    format!("profitLevels[{i}].priceIncreasePct"),
                    format!("must be a non-negative number, got {}", level.price_increase_pct),
                ));
            }
        }

        Ok(())
    }

    /// Copy of this configuration with profit levels sorted ascending by price increase.
    ///
    /// The sort is stable, so levels with equal triggers keep their input order.
    pub fn normalized(&self) -> Self {
        let mut copy = self.clone();
        copy.profit_levels.sort_by(|a, b| a.price_increase_pct.total_cmp(&b.price_increase_pct));
        copy
    }
}

fn positive(field: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(GrowthError::invalid_parameter(field, format!("must be positive, got {value}")))
    }
}

/// Outcome of a single token trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeOutcome {
    /// The token appreciated and was sold down the profit ladder.
    Success,
    /// The token was fully liquidated at the stop-loss price.
    StopLoss,
}

/// One profit-level execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fill {
    /// Index into the sorted profit levels.
    pub level_index: usize,
    pub price_increase_pct: f64,
    pub sell_percentage: f64,
    pub coins_sold: f64,
    pub price_at_fill: Price,
    pub value_received: f64,
    pub profit: f64,
}

impl Fill {
    /// Hit-count key of the level that produced this fill, e.g. `"30%"`.
    pub fn key(&self) -> String {
        format!("{}%", self.price_increase_pct)
    }
}

/// A single token trade within a round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    /// Slot of this trade within its round.
    pub token_index: usize,
    /// Capital allocated to the trade.
    pub invested: f64,
    /// Coins bought at the base price.
    pub coins_purchased: f64,
    /// Trade outcome.
    pub outcome: TradeOutcome,
    /// Profit levels hit, in ascending trigger order. Empty on stop-loss.
    #[serde(rename = "profitLevelsHit")]
    pub fills: Vec<Fill>,
    /// Coins left unsold after the ladder.
    pub remaining_coins: f64,
    /// Proceeds of all sales.
    pub value_extracted: f64,
    /// Realized profit (negative on stop-loss).
    pub realized_profit: f64,
}

impl Trade {
    /// Check if the trade succeeded.
    #[inline]
    pub fn is_success(&self) -> bool {
        self.outcome == TradeOutcome::Success
    }

    /// Total coins sold across all fills.
    pub fn coins_sold(&self) -> f64 {
        self.fills.iter().map(|f| f.coins_sold).sum()
    }
}

/// One deployment cycle across all tokens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Round {
    /// 1-based round number.
    #[serde(rename = "round")]
    pub index: usize,
    #[serde(rename = "startAmount")]
    pub starting_amount: f64,
    #[serde(rename = "endAmount")]
    pub ending_amount: f64,
    /// `ending_amount - starting_amount`.
    pub profit: f64,
    /// Profit as a percentage of the starting amount.
    pub profit_percentage: f64,
    pub trades: Vec<Trade>,
    #[serde(rename = "successfulTokens")]
    pub success_count: usize,
    #[serde(rename = "stopLossTokens")]
    pub stop_loss_count: usize,
    /// Fill count per profit level key.
    #[serde(rename = "profitLevelHits")]
    pub profit_level_hit_counts: BTreeMap<String, usize>,
}

/// Why a simulation stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TerminationReason {
    /// Capital reached the target (possibly before any round ran).
    TargetReached,
    /// Capital fell to zero or below.
    Bankrupt,
    /// The round cap was exhausted first.
    RoundLimit,
}

/// Final statistics derived from a completed timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    /// Capital after the last round.
    pub final_amount: f64,
    /// Total growth percentage over the initial amount.
    pub total_growth_pct: f64,
    /// Number of rounds executed.
    pub rounds_required: usize,
    /// Total growth divided by rounds executed.
    pub average_round_growth_pct: f64,
    /// Whether the final amount reached the target.
    pub achieved_target: bool,
    /// Terminal state of the run.
    pub termination: TerminationReason,
    /// Total number of trades.
    pub total_trades: usize,
    /// Number of successful trades.
    pub successful_trades: usize,
    /// Number of stopped-out trades.
    pub stop_loss_trades: usize,
    /// Win rate percentage.
    pub win_rate_pct: f64,
    /// Best single-round growth percentage.
    pub best_round_growth_pct: f64,
    /// Worst single-round growth percentage.
    pub worst_round_growth_pct: f64,
    /// Highest round-end capital, including the initial amount.
    pub peak_amount: f64,
    /// Maximum peak-to-trough decline of round-end capital, in percent.
    pub max_drawdown_pct: f64,
}

/// Complete result of one simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    /// Rounds in execution order.
    pub timeline: Vec<Round>,
    /// Derived statistics.
    pub summary: Summary,
    /// Seed the run drew from, if it was seeded.
    pub seed: Option<u64>,
}

impl SimulationResult {
    /// Capital after each round, prefixed with the initial amount.
    pub fn capital_curve(&self) -> Vec<f64> {
        let mut curve = Vec::with_capacity(self.timeline.len() + 1);
        if let Some(first) = self.timeline.first() {
            curve.push(first.starting_amount);
        } else {
            curve.push(self.summary.final_amount);
        }
        curve.extend(self.timeline.iter().map(|r| r.ending_amount));
        curve
    }

    /// Serialize to JSON for a presentation layer.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
