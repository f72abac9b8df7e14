//! Property tests for signal-generation invariants.
//!
//! Uses proptest over random close series to verify:
//! 1. Row alignment — output length always equals input length
//! 2. Signal domain — every signal is -1, 0, or +1
//! 3. RSI bounds — every defined RSI value lies in [0, 100]
//! 4. Count bookkeeping — active_positions steps by the signal, within [0, cap]
//! 5. Weight signs — trade_weight sign always matches the signal
//! 6. Causality — truncating the input never changes the surviving prefix

use chrono::NaiveDate;
use proptest::collection::vec;
use proptest::prelude::*;
use rig_core::domain::Bar;
// proptest's prelude also exports a `Strategy` trait; bring ours in
// anonymously so `generate_signals` resolves without a name clash.
use rig_core::strategy::Strategy as _;
use rig_core::strategy::{RsiMeanReversion, SIGNAL_BUY, SIGNAL_HOLD, SIGNAL_SELL};

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
                low: (open.min(close) - 1.0).max(0.01),
                close,
                volume: 1_000.0,
            }
        })
        .collect()
}

fn arb_closes() -> impl Strategy<Value = Vec<f64>> {
    vec(
        (10.0..500.0_f64).prop_map(|p| (p * 100.0).round() / 100.0),
        0..80,
    )
}

proptest! {
    #[test]
    fn output_length_matches_input(closes in arb_closes()) {
        let strategy = RsiMeanReversion::default_params();
        let table = strategy.generate_signals(&bars_from_closes(&closes));
        prop_assert_eq!(table.len(), closes.len());
        prop_assert_eq!(table.signal.len(), closes.len());
        prop_assert_eq!(table.trade_weight.len(), closes.len());
        prop_assert_eq!(table.active_positions.len(), closes.len());
    }

    #[test]
    fn signals_stay_in_domain(closes in arb_closes()) {
        let strategy = RsiMeanReversion::default_params();
        let table = strategy.generate_signals(&bars_from_closes(&closes));
        for &s in &table.signal {
            prop_assert!(s == SIGNAL_BUY || s == SIGNAL_HOLD || s == SIGNAL_SELL);
        }
    }

    #[test]
    fn rsi_is_nan_or_bounded(closes in arb_closes()) {
        let strategy = RsiMeanReversion::default_params();
        let table = strategy.generate_signals(&bars_from_closes(&closes));
        let rsi = table.indicator("rsi").unwrap();
        for (i, &v) in rsi.iter().enumerate() {
            if i < strategy.rsi_period() {
                prop_assert!(v.is_nan(), "warmup rsi[{}] = {}", i, v);
            } else {
                prop_assert!((0.0..=100.0).contains(&v), "rsi[{}] = {}", i, v);
            }
        }
    }

    #[test]
    fn active_count_steps_by_the_signal(closes in arb_closes()) {
        let strategy = RsiMeanReversion::default_params();
        let table = strategy.generate_signals(&bars_from_closes(&closes));
        for i in 0..table.len() {
            let prev = if i == 0 { 0 } else { table.active_positions[i - 1] };
            prop_assert_eq!(table.active_positions[i] - prev, table.signal[i]);
            prop_assert!(table.active_positions[i] >= 0);
            prop_assert!(table.active_positions[i] <= strategy.max_positions());
        }
    }

    #[test]
    fn weight_sign_matches_signal(closes in arb_closes()) {
        let strategy = RsiMeanReversion::default_params();
        let table = strategy.generate_signals(&bars_from_closes(&closes));
        for i in 0..table.len() {
            match table.signal[i] {
                SIGNAL_BUY => prop_assert!(table.trade_weight[i] > 0.0),
                SIGNAL_SELL => prop_assert!(table.trade_weight[i] < 0.0),
                _ => prop_assert_eq!(table.trade_weight[i], 0.0),
            }
        }
    }

    #[test]
    fn truncation_never_rewrites_the_prefix(
        closes in vec((10.0..500.0_f64), 16..80),
        cut in 0.2..0.95_f64,
    ) {
        let strategy = RsiMeanReversion::default_params();
        let bars = bars_from_closes(&closes);
        let cut_len = ((bars.len() as f64) * cut) as usize;

        let full = strategy.generate_signals(&bars);
        let truncated = strategy.generate_signals(&bars[..cut_len]);
        let rsi_full = full.indicator("rsi").unwrap();
        let rsi_trunc = truncated.indicator("rsi").unwrap();

        for i in 0..cut_len {
            prop_assert_eq!(truncated.signal[i], full.signal[i]);
            prop_assert_eq!(truncated.trade_weight[i], full.trade_weight[i]);
            prop_assert_eq!(truncated.active_positions[i], full.active_positions[i]);
            prop_assert!(
                (rsi_trunc[i].is_nan() && rsi_full[i].is_nan()) || rsi_trunc[i] == rsi_full[i]
            );
        }
    }
}
