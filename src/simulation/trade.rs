//! Single-token trade resolution.
//!
//! A trade either succeeds and is sold down the profit ladder level by level,
//! or is stopped out and fully liquidated at the stop-loss price.

use crate::core::rng::UniformSource;
use crate::core::types::{Fill, SimulationConfig, Trade, TradeOutcome};

/// Resolve one token trade.
///
/// `config` must be normalized (profit levels sorted ascending by price
/// increase); the driver guarantees this.
///
/// # Arguments
/// * `allocation` - Capital allocated to this token
/// * `token_index` - Slot of the trade within its round
/// * `config` - Normalized simulation configuration
/// * `rng` - Draw source for the success test
///
/// # Returns
/// Resolved trade
pub fn resolve_trade<R>(
    allocation: f64,
    token_index: usize,
    config: &SimulationConfig,
    rng: &mut R,
) -> Trade
where
    R: UniformSource + ?Sized,
{
    let coins_purchased = allocation / config.base_price;
    let draw = rng.next_f64();

    if draw * 100.0 < config.success_probability {
        take_profits(allocation, token_index, coins_purchased, config)
    } else {
        stop_out(allocation, token_index, coins_purchased, config)
    }
}

fn take_profits(
    allocation: f64,
    token_index: usize,
    coins_purchased: f64,
    config: &SimulationConfig,
) -> Trade {
    let base = config.base_price;
    let mut remaining = coins_purchased;
    let mut fills = Vec::with_capacity(config.profit_levels.len());

    for (level_index, level) in config.profit_levels.iter().enumerate() {
        if remaining <= 0.0 {
            break;
        }

        let coins_sold = remaining * (level.sell_percentage / 100.0);
        if coins_sold <= 0.0 {
            continue;
        }

        let price_at_fill = level.trigger_price(base);
        let value_received = coins_sold * price_at_fill;
        fills.push(Fill {
            level_index,
            price_increase_pct: level.price_increase_pct,
            sell_percentage: level.sell_percentage,
            coins_sold,
            price_at_fill,
            value_received,
            profit: value_received - coins_sold * base,
        });
        remaining -= coins_sold;
    }

    let value_extracted = fills.iter().map(|f| f.value_received).sum();
    let realized_profit = fills.iter().map(|f| f.profit).sum();

    // Unsold coins are reported but not valued back into the round.
    Trade {
        token_index,
        invested: allocation,
        coins_purchased,
        outcome: TradeOutcome::Success,
        fills,
        remaining_coins: remaining.max(0.0),
        value_extracted,
        realized_profit,
    }
}

fn stop_out(
    allocation: f64,
    token_index: usize,
    coins_purchased: f64,
    config: &SimulationConfig,
) -> Trade {
    let value_extracted = coins_purchased * config.stop_loss_price();

    Trade {
        token_index,
        invested: allocation,
        coins_purchased,
        outcome: TradeOutcome::StopLoss,
        fills: Vec::new(),
        remaining_coins: 0.0,
        value_extracted,
        realized_profit: value_extracted - allocation,
    }
}
