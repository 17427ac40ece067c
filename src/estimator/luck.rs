//! Luck input handling and the dice-bonus scaling.

use crate::estimator::constants::MAX_LUCK;

/// Clamp a raw luck input into `[0, MAX_LUCK]`.
pub fn clamp_luck(raw: i64) -> u8 {
    raw.clamp(0, i64::from(MAX_LUCK)) as u8
}

/// Parse a dice-bonus selection. Unparseable, non-finite or negative input counts as no bonus.
pub fn parse_dice_bonus(raw: &str) -> f64 {
    raw.trim()
        .parse::<f64>()
        .ok()
        .map_or(0.0, sanitize_dice_bonus)
}

pub fn sanitize_dice_bonus(bonus: f64) -> f64 {
    if bonus.is_finite() && bonus > 0.0 {
        bonus
    } else {
        0.0
    }
}

/// `floor(luck + luck * bonus)`, capped at `MAX_LUCK`.
pub fn effective_luck(luck: u8, dice_bonus: f64) -> u8 {
    let luck = f64::from(luck.min(MAX_LUCK));
    let boosted = (luck + luck * sanitize_dice_bonus(dice_bonus)).floor();
    boosted.min(f64::from(MAX_LUCK)) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_luck_bounds_both_ends() {
        assert_eq!(clamp_luck(-4), 0);
        assert_eq!(clamp_luck(12), 12);
        assert_eq!(clamp_luck(400), 25);
    }

    #[test]
    fn parse_dice_bonus_treats_garbage_as_zero() {
        assert_eq!(parse_dice_bonus("0.5"), 0.5);
        assert_eq!(parse_dice_bonus(" 1 "), 1.0);
        assert_eq!(parse_dice_bonus("double"), 0.0);
        assert_eq!(parse_dice_bonus("-1"), 0.0);
        assert_eq!(parse_dice_bonus("NaN"), 0.0);
        assert_eq!(parse_dice_bonus("inf"), 0.0);
    }

    #[test]
    fn effective_luck_floors_and_caps() {
        assert_eq!(effective_luck(10, 1.0), 20);
        assert_eq!(effective_luck(25, 1.0), 25);
        assert_eq!(effective_luck(0, 1.0), 0);
        assert_eq!(effective_luck(7, 0.5), 10);
        assert_eq!(effective_luck(13, 0.0), 13);
    }
}
