//! Behavioral tests for the RSI mean-reversion strategy.
//!
//! These pin the observable contract of `generate_signals`:
//! - one output row per input bar, dates preserved
//! - no signal value depends on bars after its own row (causality)
//! - warmup rows hold with NaN RSI
//! - entries are capped at `max_positions`, exits need an open position
//! - entry weights scale with `position_size`, exit weights do not

use chrono::NaiveDate;
use rig_core::domain::Bar;
use rig_core::strategy::{
    RsiMeanReversion, Strategy, StrategyConfig, SIGNAL_BUY, SIGNAL_HOLD, SIGNAL_SELL,
};

/// Bars from an explicit close series; open chains from the previous close.
fn bars_from_closes(closes: &[f64]) -> Vec<Bar> {
    let base_date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Bar {
                date: base_date + chrono::Duration::days(i as i64),
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume: 1_000.0,
            }
        })
        .collect()
}

/// Deterministic pseudo-random walk, same LCG trick as the indicator tests.
fn make_walk_bars(n: usize) -> Vec<Bar> {
    let mut closes = Vec::with_capacity(n);
    let mut price = 100.0;
    for i in 0..n {
        let seed = (i as u64).wrapping_mul(6364136223846793005).wrapping_add(1);
        let change = ((seed % 200) as f64 - 100.0) * 0.05;
        price = (price + change).max(10.0);
        closes.push(price);
    }
    bars_from_closes(&closes)
}

/// Flat, then a crash, then a steady climb. Exercises entry stacking while
/// oversold and exits once the climb pushes RSI over the threshold.
fn crash_and_recover_closes() -> Vec<f64> {
    let mut closes = vec![10.0; 14];
    closes.push(5.0);
    for i in 1..=16 {
        closes.push(5.0 + i as f64);
    }
    closes
}

#[test]
fn output_is_row_aligned_with_input() {
    let strategy = RsiMeanReversion::default_params();
    for n in [0, 1, 13, 14, 15, 100] {
        let bars = make_walk_bars(n);
        let table = strategy.generate_signals(&bars);
        assert_eq!(table.len(), n);
        assert_eq!(table.signal.len(), n);
        assert_eq!(table.position.len(), n);
        assert_eq!(table.trade_weight.len(), n);
        assert_eq!(table.active_positions.len(), n);
        assert_eq!(table.indicator("rsi").map(|r| r.len()), Some(n));
        for (i, bar) in bars.iter().enumerate() {
            assert_eq!(table.dates[i], bar.date);
        }
    }
}

#[test]
fn signals_never_depend_on_future_bars() {
    let strategy = RsiMeanReversion::default_params();
    let full = make_walk_bars(200);
    let full_table = strategy.generate_signals(&full);

    for truncated_len in [20, 60, 120, 199] {
        let truncated_table = strategy.generate_signals(&full[..truncated_len]);
        let rsi_full = full_table.indicator("rsi").unwrap();
        let rsi_trunc = truncated_table.indicator("rsi").unwrap();

        for i in 0..truncated_len {
            assert_eq!(
                truncated_table.signal[i], full_table.signal[i],
                "signal diverged at bar {i} for prefix {truncated_len}"
            );
            assert_eq!(
                truncated_table.trade_weight[i], full_table.trade_weight[i],
                "trade_weight diverged at bar {i}"
            );
            assert_eq!(
                truncated_table.active_positions[i], full_table.active_positions[i],
                "active_positions diverged at bar {i}"
            );
            let same_rsi =
                (rsi_trunc[i].is_nan() && rsi_full[i].is_nan()) || rsi_trunc[i] == rsi_full[i];
            assert!(same_rsi, "rsi diverged at bar {i}");
        }
    }
}

#[test]
fn warmup_rows_hold_with_nan_rsi() {
    let strategy = RsiMeanReversion::default_params();
    // Straight down: maximally oversold once RSI exists, undefined before.
    let closes: Vec<f64> = (0..40).map(|i| 100.0 - i as f64).collect();
    let table = strategy.generate_signals(&bars_from_closes(&closes));
    let rsi = table.indicator("rsi").unwrap();

    for i in 0..14 {
        assert_eq!(table.signal[i], SIGNAL_HOLD);
        assert_eq!(table.trade_weight[i], 0.0);
        assert_eq!(table.active_positions[i], 0);
        assert!(rsi[i].is_nan(), "rsi[{i}] should be NaN during warmup");
    }
    assert!(!rsi[14].is_nan());
}

#[test]
fn rsi_stays_within_bounds() {
    let strategy = RsiMeanReversion::default_params();
    let table = strategy.generate_signals(&make_walk_bars(300));
    for (i, &v) in table.indicator("rsi").unwrap().iter().enumerate() {
        if !v.is_nan() {
            assert!((0.0..=100.0).contains(&v), "rsi[{i}] = {v} out of bounds");
        }
    }
}

#[test]
fn loss_free_window_yields_rsi_exactly_100() {
    let strategy = RsiMeanReversion::default_params();
    // Monotonically rising closes: no losses anywhere in the window.
    let closes: Vec<f64> = (0..30).map(|i| 50.0 + i as f64).collect();
    let table = strategy.generate_signals(&bars_from_closes(&closes));
    let rsi = table.indicator("rsi").unwrap();
    for i in 14..30 {
        assert_eq!(rsi[i], 100.0, "rsi[{i}] must be exactly 100, got {}", rsi[i]);
    }
    // Overbought the whole time, but nothing is open, so no exit ever fires.
    assert!(table.signal.iter().all(|&s| s == SIGNAL_HOLD));
}

#[test]
fn entries_stop_at_the_position_cap() {
    let strategy = RsiMeanReversion::default_params();
    // Persistent decline keeps RSI pinned at 0 from bar 14 onward.
    let closes: Vec<f64> = (0..40).map(|i| 100.0 - i as f64).collect();
    let table = strategy.generate_signals(&bars_from_closes(&closes));

    // Five entries back to back, then the cap blocks everything.
    for i in 14..19 {
        assert_eq!(table.signal[i], SIGNAL_BUY);
        assert_eq!(table.active_positions[i], (i - 13) as i32);
    }
    for i in 19..40 {
        assert_eq!(table.signal[i], SIGNAL_HOLD, "entry fired at cap (bar {i})");
        assert_eq!(table.active_positions[i], 5);
    }
    assert!(table.active_positions.iter().all(|&a| (0..=5).contains(&a)));
}

#[test]
fn active_positions_steps_match_signals() {
    let strategy = RsiMeanReversion::default_params();
    let table = strategy.generate_signals(&bars_from_closes(&crash_and_recover_closes()));
    for i in 1..table.len() {
        assert_eq!(
            table.active_positions[i] - table.active_positions[i - 1],
            table.signal[i],
            "active count did not step by the signal at bar {i}"
        );
    }
    assert!(table.active_positions.iter().all(|&a| a >= 0));
}

#[test]
fn crash_then_recovery_round_trip() {
    let strategy = RsiMeanReversion::default_params();
    let closes = crash_and_recover_closes();
    let table = strategy.generate_signals(&bars_from_closes(&closes));
    let rsi = table.indicator("rsi").unwrap();

    // Bar 14: crash bar, all losses in the window, full-strength entry.
    assert_eq!(rsi[14], 0.0);
    assert_eq!(table.signal[14], SIGNAL_BUY);
    assert_eq!(table.trade_weight[14], 0.1);
    assert_eq!(table.active_positions[14], 1);

    // The climb stacks two more entries while still oversold, then exits
    // start once RSI crosses the overbought line.
    assert_eq!(table.signal[15], SIGNAL_BUY);
    assert_eq!(table.signal[16], SIGNAL_BUY);
    assert_eq!(table.active_positions[16], 3);
    assert_eq!(table.signal[17], SIGNAL_HOLD);

    assert_eq!(table.signal[26], SIGNAL_SELL);
    assert!(rsi[26] > 70.0);
    assert_eq!(table.active_positions[26], 2);

    // Once the crash bar leaves the window the series is loss-free: RSI 100,
    // and the remaining position unwinds.
    assert_eq!(rsi[28], 100.0);
    assert_eq!(table.signal[28], SIGNAL_SELL);
    assert_eq!(table.active_positions[28], 0);

    // Nothing left to exit, so an overbought RSI alone does nothing.
    assert_eq!(table.signal[29], SIGNAL_HOLD);
    assert_eq!(table.active_positions[29], 0);
}

#[test]
fn moderate_dip_produces_neutral_rsi_and_no_signal() {
    let strategy = RsiMeanReversion::default_params();
    // One 5-point loss then one 5-point gain in the window: RSI is exactly 50.
    let mut closes = vec![10.0; 14];
    closes.push(5.0);
    closes.push(10.0);
    let table = strategy.generate_signals(&bars_from_closes(&closes));
    assert_eq!(table.indicator("rsi").unwrap()[15], 50.0);
    assert_eq!(table.signal[15], SIGNAL_HOLD);
    assert_eq!(table.trade_weight[15], 0.0);
    // The bar-14 entry is still carried as open.
    assert_eq!(table.active_positions[15], 1);
}

#[test]
fn exit_weight_ignores_position_size() {
    // Same series, two very different position sizes: entry weights scale,
    // exit weights are identical. Changing this asymmetry must break here.
    let closes = crash_and_recover_closes();
    let bars = bars_from_closes(&closes);

    let small = RsiMeanReversion::new(30.0, 70.0, 14, 5, 0.1, StrategyConfig::default()).unwrap();
    let large = RsiMeanReversion::new(30.0, 70.0, 14, 5, 0.4, StrategyConfig::default()).unwrap();
    let table_small = small.generate_signals(&bars);
    let table_large = large.generate_signals(&bars);

    let rsi = table_small.indicator("rsi").unwrap();
    assert_eq!(table_small.signal[26], SIGNAL_SELL);
    assert_eq!(table_large.signal[26], SIGNAL_SELL);

    let expected_exit = -(rsi[26] - 70.0) / 30.0;
    assert_eq!(table_small.trade_weight[26], expected_exit);
    assert_eq!(table_large.trade_weight[26], expected_exit);

    // Entry on the crash bar scales with position size.
    assert_eq!(table_small.trade_weight[14], 0.1);
    assert_eq!(table_large.trade_weight[14], 0.4);
}

#[test]
fn weight_sign_always_matches_signal() {
    let strategy = RsiMeanReversion::default_params();
    let table = strategy.generate_signals(&make_walk_bars(300));
    for i in 0..table.len() {
        match table.signal[i] {
            SIGNAL_BUY => assert!(table.trade_weight[i] > 0.0),
            SIGNAL_SELL => assert!(table.trade_weight[i] < 0.0),
            SIGNAL_HOLD => assert_eq!(table.trade_weight[i], 0.0),
            other => panic!("unexpected signal value {other} at bar {i}"),
        }
    }
}

#[test]
fn position_column_is_untouched() {
    let strategy = RsiMeanReversion::default_params();
    let table = strategy.generate_signals(&bars_from_closes(&crash_and_recover_closes()));
    assert!(table.position.iter().all(|&p| p == 0));
}
