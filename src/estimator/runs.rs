//! Per-run drop chance, expected runs to first drop, and the display string.

use crate::estimator::constants::{BASE_ROLL_RATE, DECIMAL_DISPLAY_LIMIT, LUCK_RATE_PER_POINT};

pub const ZERO_CHANCE_DISPLAY: &str = "Impossible (drop chance = 0)";

/// Percentage chance of the ultra dropping on one completion of the dungeon.
pub fn drop_chance_percent(ultra_tickets: f64, dungeon_tickets: f64, effective_luck: u8) -> f64 {
    let roll_rate = LUCK_RATE_PER_POINT * f64::from(effective_luck) + BASE_ROLL_RATE;
    100.0 * (ultra_tickets / dungeon_tickets) * roll_rate
}

/// Expected completions until the first drop. Infinite when the chance is not positive.
pub fn average_runs(drop_chance_percent: f64) -> f64 {
    if drop_chance_percent > 0.0 {
        100.0 / drop_chance_percent
    } else {
        f64::INFINITY
    }
}

pub fn format_runs(avg_runs: f64) -> String {
    if !avg_runs.is_finite() {
        return ZERO_CHANCE_DISPLAY.to_string();
    }
    if avg_runs < DECIMAL_DISPLAY_LIMIT {
        format!("{avg_runs:.2} runs (average)")
    } else {
        format!("{} runs (average)", group_thousands(avg_runs.round()))
    }
}

/// Integer rendering with `,` between each group of three digits.
fn group_thousands(value: f64) -> String {
    let digits = format!("{:.0}", value.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0.0 {
        grouped.push('-');
    }
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
