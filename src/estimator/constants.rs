//! Game-balance constants. Fixed values, not tuning knobs.

/// Highest luck stat, before and after the dice bonus.
pub const MAX_LUCK: u8 = 25;

/// Per-luck-point increase of the base roll rate.
pub const LUCK_RATE_PER_POINT: f64 = 0.0005;

/// Base roll rate at zero luck (0.6%).
pub const BASE_ROLL_RATE: f64 = 0.006;

/// Runs below this are shown with two decimals; at or above, as a grouped integer.
pub const DECIMAL_DISPLAY_LIMIT: f64 = 1000.0;

/// Selectable dice-bonus multipliers.
pub const DICE_BONUS_OPTIONS: &[f64] = &[0.0, 0.5, 1.0];

pub const DISCLAIMER: &str = "This is an average. Actual results vary.";
