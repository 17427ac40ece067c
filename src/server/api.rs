use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::data::record::Keyed;
use crate::data::{DataRegistry, DungeonRecord, UltraRecord};
use crate::estimator::{
    parse_dice_bonus, sanitize_dice_bonus, DropRateEstimator, EstimateError, Selection,
    DICE_BONUS_OPTIONS, DISCLAIMER, MAX_LUCK,
};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid request body: {0}")]
    Parse(serde_json::Error),
    #[error("{0}")]
    Estimate(#[from] EstimateError),
    #[error("failed to serialize response: {0}")]
    Serialize(serde_json::Error),
}

impl ApiError {
    pub fn status(&self) -> (u16, &'static str) {
        match self {
            Self::Parse(_) => (400, "Bad Request"),
            Self::Estimate(EstimateError::SelectionIncomplete) => (400, "Bad Request"),
            Self::Estimate(EstimateError::NotFound { .. }) => (404, "Not Found"),
            Self::Estimate(EstimateError::InvalidTickets { .. }) => (422, "Unprocessable Entity"),
            Self::Estimate(EstimateError::NotLoaded) => (503, "Service Unavailable"),
            Self::Serialize(_) => (500, "Internal Server Error"),
        }
    }
}

pub fn health_payload() -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&serde_json::json!({
        "status": "ok",
        "service": "ultradrop-api",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

pub fn dice_payload() -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&serde_json::json!({
        "dice_bonus_options": DICE_BONUS_OPTIONS,
        "max_luck": MAX_LUCK
    }))
}

#[derive(Debug, Clone, Serialize)]
pub struct DungeonListItem {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub tickets: Option<f64>,
}

impl From<&DungeonRecord> for DungeonListItem {
    fn from(dungeon: &DungeonRecord) -> Self {
        Self {
            key: dungeon.display_key(),
            name: dungeon.name.clone(),
            id: dungeon.id_key(),
            tickets: dungeon.tickets,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UltraListItem {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub tickets: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drops_in: Option<String>,
}

pub fn dungeons_payload(registry: &DataRegistry) -> Result<String, serde_json::Error> {
    let list: Vec<DungeonListItem> = registry.dungeons().iter().map(Into::into).collect();
    serde_json::to_string_pretty(&serde_json::json!({ "dungeons": list }))
}

pub fn ultras_payload(registry: &DataRegistry) -> Result<String, serde_json::Error> {
    let list: Vec<UltraListItem> = registry
        .ultras()
        .iter()
        .map(|ultra: &UltraRecord| UltraListItem {
            key: ultra.display_key(),
            name: ultra.name.clone(),
            id: ultra.id_key(),
            tickets: ultra.tickets,
            drops_in: ultra.drops_in.clone(),
        })
        .collect();
    serde_json::to_string_pretty(&serde_json::json!({ "ultras": list }))
}

/// Ultra-first flow: where the chosen ultra can drop.
pub fn ultra_locations_payload(registry: &DataRegistry, ultra_key: &str) -> Result<String, ApiError> {
    let eligibility = DropRateEstimator::new(registry).locations(ultra_key)?;
    let dungeons: Vec<DungeonListItem> =
        eligibility.dungeons.iter().map(|dungeon| DungeonListItem::from(*dungeon)).collect();
    serde_json::to_string_pretty(&serde_json::json!({
        "ultra": ultra_key,
        "all_dungeons": eligibility.is_everywhere(),
        "description": eligibility.description,
        "dungeons": dungeons
    }))
    .map_err(ApiError::Serialize)
}

pub fn data_version_payload(registry: &DataRegistry) -> Result<String, serde_json::Error> {
    let sources = registry.sources();
    serde_json::to_string_pretty(&serde_json::json!({
        "dungeons": {
            "source": sources.map(|s| s.dungeons.to_string()),
            "records": registry.dungeons().len()
        },
        "ultras": {
            "source": sources.map(|s| s.ultras.to_string()),
            "records": registry.ultras().len()
        },
        "loaded_at": registry.loaded_at().to_rfc3339()
    }))
}

/// Body of POST /api/estimate. Pickers submit strings, so luck and dice bonus accept either form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EstimateRequest {
    #[serde(default)]
    pub dungeon: Option<String>,
    #[serde(default)]
    pub ultra: Option<String>,
    #[serde(default)]
    pub luck: Option<Value>,
    #[serde(default)]
    pub dice_bonus: Option<Value>,
}

impl EstimateRequest {
    pub fn into_selection(self) -> Selection {
        Selection {
            dungeon: self.dungeon,
            ultra: self.ultra,
            luck: self.luck.as_ref().map_or(0, luck_from_value),
            dice_bonus: self.dice_bonus.as_ref().map_or(0.0, dice_from_value),
        }
    }
}

fn luck_from_value(value: &Value) -> i64 {
    let parsed = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed
        .filter(|luck| luck.is_finite())
        .map_or(0, |luck| luck.trunc() as i64)
}

fn dice_from_value(value: &Value) -> f64 {
    match value {
        Value::Number(number) => number.as_f64().map_or(0.0, sanitize_dice_bonus),
        Value::String(text) => parse_dice_bonus(text),
        _ => 0.0,
    }
}

#[derive(Debug, Serialize)]
struct EstimateResponse<T: Serialize> {
    status: &'static str,
    result: T,
    disclaimer: &'static str,
}

pub fn estimate_payload(registry: &DataRegistry, body: &str) -> Result<String, ApiError> {
    let request: EstimateRequest = serde_json::from_str(body).map_err(ApiError::Parse)?;
    let selection = request.into_selection();
    let outcome = DropRateEstimator::new(registry).estimate(&selection)?;

    serde_json::to_string_pretty(&EstimateResponse {
        status: "ok",
        result: outcome,
        disclaimer: DISCLAIMER,
    })
    .map_err(ApiError::Serialize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_fields_accept_strings_and_numbers() {
        let request: EstimateRequest = serde_json::from_str(
            r#"{"dungeon":"Cave","ultra":"Slime","luck":"12","dice_bonus":"0.5"}"#,
        )
        .unwrap();
        let selection = request.into_selection();
        assert_eq!(selection.luck, 12);
        assert_eq!(selection.dice_bonus, 0.5);

        let request: EstimateRequest =
            serde_json::from_str(r#"{"luck":7.9,"dice_bonus":-3}"#).unwrap();
        let selection = request.into_selection();
        assert_eq!(selection.luck, 7);
        assert_eq!(selection.dice_bonus, 0.0);
        assert_eq!(selection.dungeon, None);
    }
}
