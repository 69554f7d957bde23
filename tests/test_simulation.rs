//! Integration tests for the fasttrack growth simulator.

use fasttrack::core::rng::RngSource;
use fasttrack::core::types::{
    ExecutionMode, ProfitLevel, SimulationConfig, TerminationReason, TradeOutcome,
};
use fasttrack::simulation::{run, run_with_rng, GrowthSimulator};
use fasttrack::GrowthError;

const EPS: f64 = 1e-9;

fn ladder_config() -> SimulationConfig {
    SimulationConfig::new(
        1_000.0,
        5_000.0,
        20.0,
        5,
        55.0,
        vec![
            ProfitLevel::new(50.0, 100.0),
            ProfitLevel::new(30.0, 25.0),
            ProfitLevel::new(40.0, 50.0),
        ],
    )
}

/// Worked example: every trade succeeds, one 50% level at +30%.
fn certain_success_config() -> SimulationConfig {
    SimulationConfig::new(1_000.0, 10_000.0, 15.0, 3, 100.0, vec![ProfitLevel::new(50.0, 30.0)])
}

#[test]
fn test_deterministic_success_first_round() {
    let result = run(&certain_success_config()).unwrap();
    let first = &result.timeline[0];

    assert_eq!(first.index, 1);
    assert_eq!(first.trades.len(), 3);
    assert_eq!(first.success_count, 3);
    assert_eq!(first.stop_loss_count, 0);

    for trade in &first.trades {
        assert_eq!(trade.outcome, TradeOutcome::Success);
        assert!((trade.invested - 1000.0 / 3.0).abs() < EPS);
        assert!((trade.coins_purchased - 1000.0 / 3.0).abs() < EPS);

        let fill = &trade.fills[0];
        assert!((fill.coins_sold - 1000.0 / 6.0).abs() < EPS);
        assert!((fill.price_at_fill - 1.3).abs() < EPS);
        assert!((fill.value_received - 1300.0 / 6.0).abs() < EPS);
        assert!((fill.profit - 50.0).abs() < EPS);
        assert!((trade.realized_profit - 50.0).abs() < EPS);
    }

    assert!((first.profit - 150.0).abs() < EPS);
    assert!((first.ending_amount - 1150.0).abs() < EPS);
    assert!((first.profit_percentage - 15.0).abs() < 1e-6);
    assert_eq!(first.profit_level_hit_counts.get("30%"), Some(&3));
}

#[test]
fn test_deterministic_success_compounds_to_target() {
    let result = run(&certain_success_config()).unwrap();

    // Every round grows by exactly 15%
    for round in &result.timeline {
        assert!((round.profit_percentage - 15.0).abs() < 1e-6);
    }
    // 1.15^16 < 10 <= 1.15^17
    assert_eq!(result.timeline.len(), 17);
    assert!(result.summary.achieved_target);
    assert_eq!(result.summary.termination, TerminationReason::TargetReached);
    assert!(result.summary.final_amount >= 10_000.0);
}

#[test]
fn test_continuity_invariant() {
    let result = run_with_rng(&ladder_config(), RngSource::deterministic(2024)).unwrap();
    assert!(!result.timeline.is_empty());

    for pair in result.timeline.windows(2) {
        assert_eq!(pair[1].starting_amount, pair[0].ending_amount);
        assert_eq!(pair[1].index, pair[0].index + 1);
    }
    let last = result.timeline.last().unwrap();
    assert_eq!(result.summary.final_amount, last.ending_amount);
}

#[test]
fn test_coin_depletion_bound() {
    for seed in 0..20 {
        let result = run_with_rng(&ladder_config(), RngSource::deterministic(seed)).unwrap();
        for round in &result.timeline {
            for trade in &round.trades {
                assert!(trade.coins_sold() <= trade.coins_purchased + EPS);
                assert!(
                    (trade.coins_sold() + trade.remaining_coins - trade.coins_purchased).abs()
                        < EPS
                        || trade.outcome == TradeOutcome::StopLoss
                );
                // Fills follow ascending trigger order
                assert!(trade
                    .fills
                    .windows(2)
                    .all(|w| w[0].price_increase_pct <= w[1].price_increase_pct));
            }
        }
    }
}

#[test]
fn test_stop_loss_trades_have_no_fills() {
    let result = run_with_rng(&ladder_config(), RngSource::deterministic(5)).unwrap();
    let stops: Vec<_> = result
        .timeline
        .iter()
        .flat_map(|r| r.trades.iter())
        .filter(|t| t.outcome == TradeOutcome::StopLoss)
        .collect();
    assert!(!stops.is_empty());

    for trade in stops {
        assert!(trade.fills.is_empty());
        assert_eq!(trade.remaining_coins, 0.0);
        assert!((trade.value_extracted - trade.coins_purchased * 0.8).abs() < EPS);
        assert!(trade.realized_profit <= 0.0);
    }
}

#[test]
fn test_monotonic_failure() {
    let config = SimulationConfig {
        success_probability: 0.0,
        target_amount: 2_000.0,
        ..ladder_config()
    };
    let result = run(&config).unwrap();

    for round in &result.timeline {
        assert_eq!(round.success_count, 0);
        assert_eq!(round.stop_loss_count, config.num_tokens);
        assert!(round.ending_amount < round.starting_amount);
        assert!((round.profit_percentage + 20.0).abs() < 1e-6);
    }
    assert!(!result.summary.achieved_target);
    assert_eq!(result.summary.termination, TerminationReason::RoundLimit);
    assert_eq!(result.timeline.len(), config.max_rounds);
}

#[test]
fn test_bankruptcy_stops_early() {
    let config = SimulationConfig {
        success_probability: 0.0,
        stop_loss_pct: 100.0,
        ..ladder_config()
    };
    let result = run(&config).unwrap();

    assert_eq!(result.timeline.len(), 1);
    assert_eq!(result.timeline[0].ending_amount, 0.0);
    assert!(!result.summary.achieved_target);
    assert_eq!(result.summary.termination, TerminationReason::Bankrupt);
}

#[test]
fn test_total_loss_with_uneven_split_is_bankrupt() {
    // Allocations that do not divide the capital evenly
    for (initial, tokens) in [(999.99, 6), (1_000.0, 7)] {
        let config = SimulationConfig::new(
            initial,
            1e9,
            100.0,
            tokens,
            0.0,
            vec![ProfitLevel::new(50.0, 30.0)],
        );
        let result = run_with_rng(&config, RngSource::deterministic(7)).unwrap();

        assert_eq!(result.timeline.len(), 1);
        assert_eq!(result.timeline[0].ending_amount, 0.0);
        assert_eq!(result.summary.final_amount, 0.0);
        assert_eq!(result.summary.rounds_required, 1);
        assert_eq!(result.summary.termination, TerminationReason::Bankrupt);
    }
}

#[test]
fn test_termination_bound() {
    for seed in 0..10 {
        for &max_rounds in &[1usize, 3, 100] {
            let config = SimulationConfig {
                target_amount: 1e12,
                ..ladder_config()
            }
            .with_max_rounds(max_rounds);
            let result = run_with_rng(&config, RngSource::deterministic(seed)).unwrap();
            assert!(result.timeline.len() <= max_rounds);
        }
    }
}

#[test]
fn test_profit_level_order_does_not_matter() {
    let a = ladder_config();
    let mut reversed = a.profit_levels.clone();
    reversed.reverse();
    let b = a.clone().with_profit_levels(reversed);

    let ra = run_with_rng(&a, RngSource::deterministic(77)).unwrap();
    let rb = run_with_rng(&b, RngSource::deterministic(77)).unwrap();
    assert_eq!(ra, rb);
}

#[test]
fn test_caller_config_untouched() {
    let config = ladder_config();
    let before = config.clone();
    let _ = run_with_rng(&config, RngSource::deterministic(1)).unwrap();
    assert_eq!(config, before);
    assert_eq!(config.profit_levels[0].price_increase_pct, 100.0);
}

#[test]
fn test_same_seed_reproduces_run() {
    let simulator = GrowthSimulator::new(&ladder_config())
        .unwrap()
        .with_rng(RngSource::deterministic(31337));
    let first = simulator.run().unwrap();
    let second = simulator.run().unwrap();
    assert_eq!(first, second);
    assert_eq!(first.seed, Some(31337));
}

#[test]
fn test_system_rng_seed_replays() {
    let config = ladder_config();
    let original = run(&config).unwrap();
    let seed = original.seed.unwrap();
    let replay = run_with_rng(&config, RngSource::deterministic(seed)).unwrap();
    assert_eq!(original, replay);
}

#[test]
fn test_parallel_execution_matches_sequential() {
    let sequential = ladder_config().with_execution(ExecutionMode::Sequential);
    let parallel = ladder_config().with_execution(ExecutionMode::Parallel);

    let a = run_with_rng(&sequential, RngSource::deterministic(8)).unwrap();
    let b = run_with_rng(&parallel, RngSource::deterministic(8)).unwrap();
    assert_eq!(a.timeline, b.timeline);
    assert_eq!(a.summary, b.summary);
}

#[test]
fn test_scripted_outcomes() {
    // Token 0 always wins, tokens 1 and 2 always lose
    let config = certain_success_config();
    let config = SimulationConfig {
        success_probability: 50.0,
        ..config
    }
    .with_max_rounds(2);
    let result = run_with_rng(&config, RngSource::scripted(vec![0.0, 0.9, 0.9])).unwrap();

    for round in &result.timeline {
        assert_eq!(round.success_count, 1);
        assert_eq!(round.stop_loss_count, 2);
        assert_eq!(round.trades[0].outcome, TradeOutcome::Success);
    }
    // +15% on one third, -15% on two thirds
    let expected = 1000.0 * (1.0 + (0.15 - 0.30) / 3.0);
    assert!((result.timeline[0].ending_amount - expected).abs() < EPS);
    assert!(result.seed.is_none());
}

#[test]
fn test_unsold_coins_do_not_compound() {
    // One level sells half at +100%; the other half is never valued back in
    let config = SimulationConfig::new(
        1_000.0,
        1_000_000.0,
        10.0,
        1,
        100.0,
        vec![ProfitLevel::new(50.0, 100.0)],
    )
    .with_max_rounds(1);
    let result = run(&config).unwrap();
    let round = &result.timeline[0];

    assert!((round.trades[0].remaining_coins - 500.0).abs() < EPS);
    assert!((round.trades[0].value_extracted - 1000.0).abs() < EPS);
    assert!((round.ending_amount - 1500.0).abs() < EPS);
}

#[test]
fn test_validation_errors() {
    let base = ladder_config();
    let cases = vec![
        (SimulationConfig { initial_amount: 0.0, ..base.clone() }, "initialAmount"),
        (SimulationConfig { initial_amount: -10.0, ..base.clone() }, "initialAmount"),
        (SimulationConfig { target_amount: 0.0, ..base.clone() }, "targetAmount"),
        (SimulationConfig { num_tokens: 0, ..base.clone() }, "numTokens"),
    ];

    for (config, expected_field) in cases {
        match run(&config) {
            Err(GrowthError::InvalidParameter { field, .. }) => assert_eq!(field, expected_field),
            other => panic!("expected InvalidParameter for {expected_field}, got {other:?}"),
        }
    }
}

#[test]
fn test_empty_profit_levels_rejected() {
    let config = ladder_config().with_profit_levels(Vec::new());
    let err = run(&config).unwrap_err();
    assert!(matches!(err, GrowthError::EmptyData { .. }));
    assert!(err.is_validation());
}

#[test]
fn test_json_field_names() {
    let result = run_with_rng(&certain_success_config(), RngSource::deterministic(1)).unwrap();
    let value: serde_json::Value = serde_json::from_str(&result.to_json().unwrap()).unwrap();

    let round = &value["timeline"][0];
    for key in [
        "round",
        "startAmount",
        "endAmount",
        "profit",
        "profitPercentage",
        "successfulTokens",
        "stopLossTokens",
        "profitLevelHits",
        "trades",
    ] {
        assert!(round.get(key).is_some(), "missing round field {key}");
    }
    assert_eq!(round["round"], 1);
    assert_eq!(round["trades"][0]["outcome"], "SUCCESS");
    assert!(round["trades"][0]["profitLevelsHit"].is_array());
    assert_eq!(value["summary"]["achievedTarget"], true);
    assert_eq!(value["summary"]["termination"], "TARGET_REACHED");
}

#[test]
fn test_config_from_ui_json() {
    let json = r#"{
        "initialAmount": 1000,
        "targetAmount": 10000,
        "stopLossPct": 15,
        "numTokens": 3,
        "successProbability": 100,
        "profitLevels": [{"sellPercentage": 50, "priceIncreasePct": 30}],
        "execution": "parallel"
    }"#;
    let config = SimulationConfig::from_json(json).unwrap();
    assert_eq!(config.execution, ExecutionMode::Parallel);

    let result = run(&config).unwrap();
    assert!((result.timeline[0].ending_amount - 1150.0).abs() < EPS);
}

#[test]
fn test_capital_curve() {
    let result = run(&certain_success_config()).unwrap();
    let curve = result.capital_curve();

    assert_eq!(curve.len(), result.timeline.len() + 1);
    assert_eq!(curve[0], 1000.0);
    assert_eq!(*curve.last().unwrap(), result.summary.final_amount);
}
