//! Dungeon table: each record is a loot pool whose ticket total weights every ultra in it.

use serde::{Deserialize, Serialize};

use crate::data::record::{lenient_tickets, Keyed, RecordId};

pub const DEFAULT_DUNGEONS_PATH: &str = "data/dungeons.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DungeonRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(default, deserialize_with = "lenient_tickets")]
    pub tickets: Option<f64>,
}

impl DungeonRecord {
    pub fn named(name: &str, tickets: f64) -> Self {
        Self {
            name: Some(name.to_string()),
            id: None,
            tickets: Some(tickets),
        }
    }

    /// Tickets usable as the formula's denominator: finite and strictly positive.
    pub fn usable_tickets(&self) -> Option<f64> {
        self.finite_tickets().filter(|tickets| *tickets > 0.0)
    }
}

impl Keyed for DungeonRecord {
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
