//! Drop-rate estimator: resolve a dungeon/ultra selection against the loaded tables and report
//! the expected number of dungeon completions needed for one drop.
//!
//! The pipeline is linear: selection check, key resolution, ticket validation, drop eligibility,
//! then the formula. Each stage either proceeds or ends the attempt with a specific message.

pub mod constants;
pub mod eligibility;
pub mod luck;
pub mod runs;
pub mod slug;

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::data::data_registry::DataRegistry;
use crate::data::dungeon::DungeonRecord;
use crate::data::record::Keyed;
use crate::data::ultra::UltraRecord;

pub use constants::{DICE_BONUS_OPTIONS, DISCLAIMER, MAX_LUCK};
pub use eligibility::{can_drop_in, drop_locations, DropScope, Eligibility};
pub use luck::{clamp_luck, effective_luck, parse_dice_bonus, sanitize_dice_bonus};
pub use runs::{average_runs, drop_chance_percent, format_runs, ZERO_CHANCE_DISPLAY};
pub use slug::slugify;

/// One calculation request. Keys are names or ids as shown by the pickers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    pub dungeon: Option<String>,
    pub ultra: Option<String>,
    /// Raw luck input; clamped to `[0, MAX_LUCK]` before use.
    pub luck: i64,
    pub dice_bonus: f64,
}

impl Selection {
    pub fn new(dungeon: &str, ultra: &str, luck: i64, dice_bonus: f64) -> Self {
        Self {
            dungeon: Some(dungeon.to_string()),
            ultra: Some(ultra.to_string()),
            luck,
            dice_bonus,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Dungeon,
    Ultra,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dungeon => f.write_str("Dungeon"),
            Self::Ultra => f.write_str("Ultra"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EstimateError {
    #[error("Data not loaded yet. Please wait a moment and try again.")]
    NotLoaded,
    #[error("Please select both a dungeon and an ultra.")]
    SelectionIncomplete,
    #[error("{kind} '{key}' not found.")]
    NotFound { kind: RecordKind, key: String },
    #[error("{kind} '{key}' tickets data missing or invalid.")]
    InvalidTickets { kind: RecordKind, key: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunsEstimate {
    pub dungeon: String,
    pub ultra: String,
    pub luck: u8,
    pub dice_bonus: f64,
    pub effective_luck: u8,
    pub drop_chance_percent: f64,
    /// `None` when the drop chance is zero.
    pub avg_runs: Option<f64>,
    pub display: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Impossibility {
    pub dungeon: String,
    pub ultra: String,
    pub valid_locations: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EstimateOutcome {
    Runs(RunsEstimate),
    Impossible(Impossibility),
}

impl EstimateOutcome {
    /// The single line shown to the user.
    pub fn headline(&self) -> &str {
        match self {
            Self::Runs(estimate) => &estimate.display,
            Self::Impossible(impossible) => &impossible.message,
        }
    }
}

/// Estimator bound to one loaded registry.
#[derive(Debug, Clone, Copy)]
pub struct DropRateEstimator<'a> {
    registry: &'a DataRegistry,
}

impl<'a> DropRateEstimator<'a> {
    pub fn new(registry: &'a DataRegistry) -> Self {
        Self { registry }
    }

    pub fn estimate(&self, selection: &Selection) -> Result<EstimateOutcome, EstimateError> {
        let (Some(dungeon_key), Some(ultra_key)) = (
            non_blank(selection.dungeon.as_deref()),
            non_blank(selection.ultra.as_deref()),
        ) else {
            return Err(EstimateError::SelectionIncomplete);
        };

        let dungeon = self
            .registry
            .resolve_dungeon(dungeon_key)
            .ok_or_else(|| EstimateError::NotFound {
                kind: RecordKind::Dungeon,
                key: dungeon_key.to_string(),
            })?;
        let ultra = self.resolve_ultra(ultra_key)?;

        estimate_pair(
            dungeon,
            ultra,
            self.registry.dungeons(),
            clamp_luck(selection.luck),
            selection.dice_bonus,
        )
    }

    /// Ultra-first flow: every dungeon the ultra can drop in.
    pub fn locations(&self, ultra_key: &str) -> Result<Eligibility<'a>, EstimateError> {
        let ultra_key = non_blank(Some(ultra_key)).ok_or(EstimateError::SelectionIncomplete)?;
        let ultra = self.resolve_ultra(ultra_key)?;
        Ok(drop_locations(ultra, self.registry.dungeons()))
    }

    fn resolve_ultra(&self, key: &str) -> Result<&'a UltraRecord, EstimateError> {
        self.registry
            .resolve_ultra(key)
            .ok_or_else(|| EstimateError::NotFound {
                kind: RecordKind::Ultra,
                key: key.to_string(),
            })
    }
}

fn non_blank(key: Option<&str>) -> Option<&str> {
    key.filter(|key| !key.trim().is_empty())
}

/// Validate, check eligibility and compute for an already-resolved pair.
/// `dungeons` is the full table, used to name valid locations when the pair is impossible.
pub fn estimate_pair(
    dungeon: &DungeonRecord,
    ultra: &UltraRecord,
    dungeons: &[DungeonRecord],
    luck: u8,
    dice_bonus: f64,
) -> Result<EstimateOutcome, EstimateError> {
    let ultra_tickets = ultra.finite_tickets().ok_or_else(|| EstimateError::InvalidTickets {
        kind: RecordKind::Ultra,
        key: ultra.display_key(),
    })?;
    let dungeon_tickets = dungeon
        .usable_tickets()
        .ok_or_else(|| EstimateError::InvalidTickets {
            kind: RecordKind::Dungeon,
            key: dungeon.display_key(),
        })?;

    if !can_drop_in(ultra, dungeon) {
        let valid_locations = drop_locations(ultra, dungeons).location_names();
        let message = format!(
            "{} cannot drop in {}. Try {}.",
            ultra.display_key(),
            dungeon.display_key(),
            valid_locations.as_deref().unwrap_or("another dungeon")
        );
        return Ok(EstimateOutcome::Impossible(Impossibility {
            dungeon: dungeon.display_key(),
            ultra: ultra.display_key(),
            valid_locations,
            message,
        }));
    }

    let luck = luck.min(MAX_LUCK);
    let dice_bonus = sanitize_dice_bonus(dice_bonus);
    let effective = effective_luck(luck, dice_bonus);
    let chance = drop_chance_percent(ultra_tickets, dungeon_tickets, effective);
    let avg = average_runs(chance);

    Ok(EstimateOutcome::Runs(RunsEstimate {
        dungeon: dungeon.display_key(),
        ultra: ultra.display_key(),
        luck,
        dice_bonus,
        effective_luck: effective,
        drop_chance_percent: chance,
        avg_runs: avg.is_finite().then_some(avg),
        display: format_runs(avg),
    }))
}
