//! Ultra table: creatures with a ticket weight and an optional list of dungeons they drop in.

use serde::{Deserialize, Serialize};

use crate::data::record::{lenient_tickets, Keyed, RecordId};

pub const DEFAULT_ULTRAS_PATH: &str = "data/ultras.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UltraRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(default, deserialize_with = "lenient_tickets")]
    pub tickets: Option<f64>,
    /// Comma-separated dungeon keys. Absent, empty or "all" means every dungeon.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drops_in: Option<String>,
}

impl UltraRecord {
    pub fn named(name: &str, tickets: f64, drops_in: Option<&str>) -> Self {
        Self {
            name: Some(name.to_string()),
            id: None,
            tickets: Some(tickets),
            drops_in: drops_in.map(str::to_string),
        }
    }
}

impl Keyed for UltraRecord {
    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn id(&self) -> Option<&RecordId> {
        self.id.as_ref()
    }

    fn tickets(&self) -> Option<f64> {
        self.tickets
    }
}
