//! Synthetic price paths via geometric Brownian motion.
//!
//! Closes follow `S_{t+1} = S_t * exp((mu - sigma^2/2) + sigma * z)` with
//! daily drift/volatility and standard-normal z. OHLC is synthesized around
//! the closes so the bars look plausible to indicators that read high/low.

use crate::domain::Bar;
use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Parameters for one GBM path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GbmConfig {
    pub start_price: f64,
    /// Daily drift (e.g., 0.0004 ≈ 10% annual).
    pub drift: f64,
    /// Daily volatility (e.g., 0.012 ≈ 19% annual).
    pub volatility: f64,
    pub days: usize,
    pub start_date: NaiveDate,
}

impl Default for GbmConfig {
    fn default() -> Self {
        Self {
            start_price: 100.0,
            drift: 0.0004,
            volatility: 0.012,
            days: 252,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 2).expect("valid date"),
        }
    }
}

/// Draw one standard normal via Box-Muller from two uniforms.
fn standard_normal(rng: &mut StdRng) -> f64 {
    // Open interval keeps ln(u) finite.
    let u1: f64 = rng.gen_range(f64::EPSILON..1.0);
    let u2: f64 = rng.gen_range(0.0..1.0);
    (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos()
}

/// Generate a GBM bar path from a seeded RNG.
pub fn generate_gbm_bars(config: &GbmConfig, rng: &mut StdRng) -> Vec<Bar> {
    let mut bars = Vec::with_capacity(config.days);
    let mut price = config.start_price;
    let mut date = config.start_date;

    for _ in 0..config.days {
        let z = standard_normal(rng);
        let log_return = config.drift - 0.5 * config.volatility * config.volatility
            + config.volatility * z;
        let close = price * log_return.exp();

        let open = price;
        let span = close.max(open) * 0.25 * config.volatility.max(1e-6);
        let high = open.max(close) + span * rng.gen_range(0.0..1.0);
        let low = (open.min(close) - span * rng.gen_range(0.0..1.0)).max(close.min(open) * 0.5);
        let volume = rng.gen_range(500_000.0..1_500_000.0_f64).round();

        bars.push(Bar {
            date,
            open,
            high,
            low,
            close,
            volume,
        });

        price = close;
        date = next_weekday(date);
    }

    bars
}

/// Generate a path from a bare seed.
pub fn generate_gbm_bars_seeded(config: &GbmConfig, seed: u64) -> Vec<Bar> {
    let mut rng = StdRng::seed_from_u64(seed);
    generate_gbm_bars(config, &mut rng)
}

fn next_weekday(date: NaiveDate) -> NaiveDate {
    use chrono::{Datelike, Weekday};
    let mut next = date + chrono::Duration::days(1);
    while matches!(next.weekday(), Weekday::Sat | Weekday::Sun) {
        next += chrono::Duration::days(1);
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_has_requested_length() {
        let bars = generate_gbm_bars_seeded(&GbmConfig::default(), 7);
        assert_eq!(bars.len(), 252);
    }

    #[test]
    fn same_seed_same_path() {
        let config = GbmConfig::default();
        let a = generate_gbm_bars_seeded(&config, 42);
        let b = generate_gbm_bars_seeded(&config, 42);
        assert_eq!(a, b);
    }

    #[test]
    fn different_seeds_diverge() {
        let config = GbmConfig::default();
        let a = generate_gbm_bars_seeded(&config, 1);
        let b = generate_gbm_bars_seeded(&config, 2);
        assert_ne!(a, b);
    }

    #[test]
    fn bars_are_sane_and_positive() {
        let bars = generate_gbm_bars_seeded(&GbmConfig::default(), 9);
        for bar in &bars {
            assert!(bar.is_sane(), "insane bar: {bar:?}");
        }
    }

    #[test]
    fn opens_chain_from_previous_close() {
        let bars = generate_gbm_bars_seeded(&GbmConfig::default(), 3);
        for pair in bars.windows(2) {
            assert_eq!(pair[1].open, pair[0].close);
        }
    }

    #[test]
    fn dates_skip_weekends_and_increase() {
        use chrono::{Datelike, Weekday};
        let bars = generate_gbm_bars_seeded(&GbmConfig::default(), 5);
        for pair in bars.windows(2) {
            assert!(pair[1].date > pair[0].date);
        }
        for bar in &bars {
            assert!(!matches!(bar.date.weekday(), Weekday::Sat | Weekday::Sun));
        }
    }

    #[test]
    fn zero_volatility_follows_pure_drift() {
        let config = GbmConfig {
            volatility: 0.0,
            drift: 0.001,
            days: 10,
            ..GbmConfig::default()
        };
        let bars = generate_gbm_bars_seeded(&config, 11);
        let expected = 100.0 * (0.001_f64 * 10.0).exp();
        assert!((bars[9].close - expected).abs() < 1e-9);
    }
}
