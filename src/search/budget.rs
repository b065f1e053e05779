//! Per-move time budget.
//!
//! Turns the game clock's remaining-time figure into the time this move may
//! spend. The figure arrives in an unknown unit: anything below 10 000 is
//! taken as seconds.

use std::time::Duration;

/// Remaining-time values below this are seconds, not milliseconds.
const SECONDS_THRESHOLD: f64 = 10_000.0;

/// Time always left on the clock after this move.
const RESERVE_MS: f64 = 50.0;

/// Smallest budget ever handed out.
const FLOOR_MS: f64 = 50.0;

/// Budget allocation parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BudgetConfig {
    /// Share of the remaining time spent on this move.
    pub fraction: f64,
    pub min_ms: u64,
    pub max_ms: u64,
}

impl Default for BudgetConfig {
    fn default() -> Self {
        BudgetConfig {
            fraction: 0.08,
            min_ms: 150,
            max_ms: 15_000,
        }
    }
}

impl BudgetConfig {
    /// Budget for a move given `remaining` time in either unit.
    pub fn move_budget(&self, remaining: f64) -> Duration {
        move_budget(remaining, self)
    }
}

/// Converts a remaining-time figure to milliseconds. Negative and NaN
/// inputs count as no time left.
pub fn normalize_remaining_ms(remaining: f64) -> f64 {
    if remaining.is_nan() || remaining <= 0.0 {
        return 0.0;
    }
    if remaining < SECONDS_THRESHOLD {
        remaining * 1000.0
    } else {
        remaining
    }
}

/// Allocates `fraction` of the remaining time, clamped to
/// `[min_ms, min(max_ms, remaining - 50ms)]` and never below 50ms.
pub fn move_budget(remaining: f64, config: &BudgetConfig) -> Duration {
    let remaining_ms = normalize_remaining_ms(remaining);
    let upper = (config.max_ms as f64).min(remaining_ms - RESERVE_MS);
    let fraction = if config.fraction.is_finite() {
        config.fraction.max(0.0)
    } else {
        0.0
    };
    let ms = (remaining_ms * fraction)
        .max(config.min_ms as f64)
        .min(upper)
        .max(FLOOR_MS);
    Duration::from_millis(ms.round() as u64)
}
