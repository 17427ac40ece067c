//! Which dungeons an ultra can drop in, from its `drops_in` list.

use serde::Serialize;

use crate::data::dungeon::DungeonRecord;
use crate::data::record::Keyed;
use crate::data::ultra::UltraRecord;
use crate::estimator::slug::slugify;

const UNKNOWN_DUNGEONS: &str = "Unknown Dungeons";

/// Parsed `drops_in` restriction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropScope {
    /// Absent, empty or "all": every dungeon.
    Everywhere,
    /// Slugified tokens; a dungeon matches if any token equals its match key or raw id.
    Restricted(Vec<String>),
}

impl DropScope {
    pub fn parse(drops_in: Option<&str>) -> Self {
        let raw = drops_in.unwrap_or_default().trim();
        if raw.is_empty() || raw.eq_ignore_ascii_case("all") {
            return Self::Everywhere;
        }
        Self::Restricted(
            raw.split(',')
                .map(|token| slugify(token.trim()))
                .filter(|token| !token.is_empty())
                .collect(),
        )
    }

    pub fn of(ultra: &UltraRecord) -> Self {
        Self::parse(ultra.drops_in.as_deref())
    }

    pub fn includes(&self, dungeon: &DungeonRecord) -> bool {
        match self {
            Self::Everywhere => true,
            Self::Restricted(tokens) => {
                let match_key = dungeon.match_key();
                let id_key = dungeon.id_key();
                tokens
                    .iter()
                    .any(|token| *token == match_key || id_key.as_deref() == Some(token.as_str()))
            }
        }
    }
}

/// Where an ultra drops, in table order, with a human-readable summary.
#[derive(Debug, Clone, Serialize)]
pub struct Eligibility<'a> {
    #[serde(skip)]
    pub scope: DropScope,
    pub dungeons: Vec<&'a DungeonRecord>,
    pub description: String,
}

impl Eligibility<'_> {
    pub fn is_everywhere(&self) -> bool {
        self.scope == DropScope::Everywhere
    }

    /// Display keys of the matched dungeons, or `None` when a restriction resolved to nothing.
    pub fn location_names(&self) -> Option<String> {
        if self.dungeons.is_empty() {
            return None;
        }
        Some(
            self.dungeons
                .iter()
                .map(|dungeon| dungeon.display_key())
                .collect::<Vec<_>>()
                .join(", "),
        )
    }
}

pub fn can_drop_in(ultra: &UltraRecord, dungeon: &DungeonRecord) -> bool {
    DropScope::of(ultra).includes(dungeon)
}

pub fn drop_locations<'a>(ultra: &UltraRecord, dungeons: &'a [DungeonRecord]) -> Eligibility<'a> {
    let scope = DropScope::of(ultra);
    let matched: Vec<&DungeonRecord> = dungeons.iter().filter(|d| scope.includes(d)).collect();

    let mut eligibility = Eligibility {
        scope,
        dungeons: matched,
        description: String::new(),
    };
    eligibility.description = match (&eligibility.scope, eligibility.location_names()) {
        (DropScope::Everywhere, _) => "drops in all dungeons".to_string(),
        (DropScope::Restricted(_), None) => format!("drops in: {UNKNOWN_DUNGEONS}"),
        (DropScope::Restricted(_), Some(names)) => format!("drops in: {names}"),
    };
    eligibility
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::record::RecordId;

    fn table() -> Vec<DungeonRecord> {
        vec![
            DungeonRecord::named("Dark Cave", 1000.0),
            DungeonRecord {
                name: None,
                id: Some(RecordId::from("ice_cave")),
                tickets: Some(800.0),
            },
            DungeonRecord {
                name: Some("Lava Keep".to_string()),
                id: Some(RecordId::from(42)),
                tickets: Some(500.0),
            },
        ]
    }

    #[test]
    fn empty_and_all_match_everything() {
        let dungeons = table();
        for drops_in in [None, Some(""), Some("  "), Some("all"), Some("ALL"), Some(" All ")] {
            let ultra = UltraRecord::named("Slime", 5.0, drops_in);
            let eligibility = drop_locations(&ultra, &dungeons);
            assert_eq!(eligibility.dungeons.len(), 3, "drops_in {drops_in:?}");
            assert_eq!(eligibility.description, "drops in all dungeons");
        }
    }

    #[test]
    fn restricted_list_matches_by_slug_and_keeps_table_order() {
        let dungeons = table();
        let ultra = UltraRecord::named("Yeti", 5.0, Some("ice_cave, Dark Cave"));
        let eligibility = drop_locations(&ultra, &dungeons);

        let names: Vec<String> = eligibility.dungeons.iter().map(|d| d.display_key()).collect();
        assert_eq!(names, vec!["Dark Cave", "ice_cave"]);
        assert_eq!(eligibility.description, "drops in: Dark Cave, ice_cave");
        assert!(!can_drop_in(&ultra, &dungeons[2]));
    }

    #[test]
    fn restricted_list_matches_raw_numeric_id() {
        let dungeons = table();
        let ultra = UltraRecord::named("Salamander", 5.0, Some("42"));
        assert!(can_drop_in(&ultra, &dungeons[2]));
        assert!(!can_drop_in(&ultra, &dungeons[0]));
    }

    #[test]
    fn unmatched_restriction_reports_unknown_dungeons() {
        let dungeons = table();
        let ultra = UltraRecord::named("Ghost", 5.0, Some("haunted_manor"));
        let eligibility = drop_locations(&ultra, &dungeons);

        assert!(eligibility.dungeons.is_empty());
        assert_eq!(eligibility.description, "drops in: Unknown Dungeons");
        assert_eq!(eligibility.location_names(), None);
    }
}
