//! Synthetic price series generation.
//!
//! Produces a geometric random walk on business days. Useful for demos
//! (`perfview sample`) and for exercising the engine on realistic-length data.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::{Sample, SampleConfig};
use crate::error::AppError;

/// Trading days per year used to scale drift/volatility to a daily step.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Generate a seeded geometric random walk, one sample per weekday.
pub fn generate_series(config: &SampleConfig) -> Result<Vec<Sample>, AppError> {
    if config.end < config.start {
        return Err(AppError::new(2, "Sample end date must not be before its start date."));
    }
    if !(config.initial_value.is_finite() && config.initial_value > 0.0) {
        return Err(AppError::new(2, "Initial value must be finite and > 0."));
    }
    if !config.drift.is_finite() {
        return Err(AppError::new(2, "Drift must be finite."));
    }
    if !(config.volatility.is_finite() && config.volatility >= 0.0) {
        return Err(AppError::new(2, "Volatility must be finite and >= 0."));
    }

    let mut rng = StdRng::seed_from_u64(sample_seed(config));
    let normal = Normal::new(0.0, 1.0)
        .map_err(|e| AppError::new(4, format!("Noise distribution error: {e}")))?;

    let dt = 1.0 / TRADING_DAYS_PER_YEAR;
    // Ito correction keeps the expected growth rate equal to `drift`.
    let mu = (config.drift - 0.5 * config.volatility * config.volatility) * dt;
    let sigma = config.volatility * dt.sqrt();

    let mut out = Vec::new();
    let mut value = config.initial_value;
    let mut date = config.start;
    let mut first = true;

    while date <= config.end {
        if is_business_day(date) {
            if !first {
                let z: f64 = normal.sample(&mut rng);
                value *= (mu + sigma * z).exp();
            }
            first = false;
            out.push(Sample::new(date, value));
        }
        date += Duration::days(1);
    }

    Ok(out)
}

fn is_business_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

fn sample_seed(config: &SampleConfig) -> u64 {
    let mut hasher = DefaultHasher::new();
    config.seed.hash(&mut hasher);
    config.start.hash(&mut hasher);
    config.end.hash(&mut hasher);
    config.initial_value.to_bits().hash(&mut hasher);
    config.drift.to_bits().hash(&mut hasher);
    config.volatility.to_bits().hash(&mut hasher);
    hasher.finish()
}
