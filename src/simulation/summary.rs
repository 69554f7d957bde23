//! Summary statistics over a completed timeline.

use crate::core::types::{Round, Summary, TerminationReason};

/// Derive final statistics from the timeline.
///
/// An empty timeline means the target was already met before the first round.
pub fn summarize(initial_amount: f64, target_amount: f64, timeline: &[Round]) -> Summary {
    let final_amount = timeline.last().map_or(initial_amount, |r| r.ending_amount);
    let total_growth_pct = (final_amount - initial_amount) / initial_amount * 100.0;
    let rounds_required = timeline.len();
    let average_round_growth_pct = if rounds_required > 0 {
        total_growth_pct / rounds_required as f64
    } else {
        0.0
    };

    let achieved_target = final_amount >= target_amount;
    let termination = if achieved_target {
        TerminationReason::TargetReached
    } else if final_amount <= 0.0 {
        TerminationReason::Bankrupt
    } else {
        TerminationReason::RoundLimit
    };

    let successful_trades: usize = timeline.iter().map(|r| r.success_count).sum();
    let stop_loss_trades: usize = timeline.iter().map(|r| r.stop_loss_count).sum();
    let total_trades = successful_trades + stop_loss_trades;
    let win_rate_pct = if total_trades > 0 {
        successful_trades as f64 / total_trades as f64 * 100.0
    } else {
        0.0
    };

    let (best_round_growth_pct, worst_round_growth_pct) = if timeline.is_empty() {
        (0.0, 0.0)
    } else {
        timeline.iter().fold((f64::NEG_INFINITY, f64::INFINITY), |(best, worst), r| {
            (best.max(r.profit_percentage), worst.min(r.profit_percentage))
        })
    };

    // Drawdown over round-end capital
    let mut peak_amount = initial_amount;
    let mut max_drawdown_pct: f64 = 0.0;
    for round in timeline {
        peak_amount = peak_amount.max(round.ending_amount);
        let drawdown = (peak_amount - round.ending_amount) / peak_amount * 100.0;
        max_drawdown_pct = max_drawdown_pct.max(drawdown);
    }

    Summary {
        final_amount,
        total_growth_pct,
        rounds_required,
        average_round_growth_pct,
        achieved_target,
        termination,
        total_trades,
        successful_trades,
        stop_loss_trades,
        win_rate_pct,
        best_round_growth_pct,
        worst_round_growth_pct,
        peak_amount,
        max_drawdown_pct,
    }
}
