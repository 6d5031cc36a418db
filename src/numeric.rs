//! Rounding and percentage formatting.
//!
//! Every reported mean and percentage goes through [`round2`]: the value's
//! shortest decimal representation is rounded to two places with ties away
//! from zero, so `2.675` reports as `2.68` even though the nearest `f64` sits
//! just below it.

use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

pub fn round_dp(value: f64, places: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    Decimal::from_str(&value.to_string())
        .ok()
        .map(|d| d.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|d| d.to_f64())
        .unwrap_or(value)
}

pub fn round2(value: f64) -> f64 {
    round_dp(value, 2)
}

/// `part / whole` as a percentage with two decimals and a trailing `%`.
/// A zero `whole` reports `0.00%`.
pub fn format_percent(part: usize, whole: usize) -> String {
    let percent = if whole == 0 {
        0.0
    } else {
        round2(part as f64 / whole as f64 * 100.0)
    };
    format!("{percent:.2}%")
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}
