//! Data sources other than user files.

pub mod sample;

pub use sample::{generate_series, TRADING_DAYS_PER_YEAR};
