//! Shared record identity: the string-or-number `id`, lenient `tickets` decoding, and the
//! name/id accessors every module uses to identify a dungeon or ultra.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::estimator::slugify;

/// Record id as it appears in the tables: either a JSON string or a JSON number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Text(String),
    Number(serde_json::Number),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Number(number) => match number.as_f64() {
                // 3.0 prints as "3".
                Some(value) if number.is_f64() && value.fract() == 0.0 && value.abs() < 1e15 => {
                    write!(f, "{}", value as i64)
                }
                _ => write!(f, "{number}"),
            },
        }
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<i64> for RecordId {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

/// Name/id/tickets access shared by dungeon and ultra records.
pub trait Keyed {
    fn name(&self) -> Option<&str>;
    fn id(&self) -> Option<&RecordId>;
    fn tickets(&self) -> Option<f64>;

    /// Raw string form of the id, if the record has one.
    fn id_key(&self) -> Option<String> {
        self.id().map(ToString::to_string).filter(|id| !id.is_empty())
    }

    /// First non-empty of name and id. Empty when the record has neither.
    fn display_key(&self) -> String {
        match self.name().filter(|name| !name.is_empty()) {
            Some(name) => name.to_string(),
            None => self.id_key().unwrap_or_default(),
        }
    }

    /// Normalized identity used for drop-location matching.
    fn match_key(&self) -> String {
        slugify(&self.display_key())
    }

    /// Tickets that are usable as a formula weight (finite).
    fn finite_tickets(&self) -> Option<f64> {
        self.tickets().filter(|tickets| tickets.is_finite())
    }

    /// Whether `key` names this record: exact name or id first, then slug equality.
    fn matches_exact(&self, key: &str) -> bool {
        self.name() == Some(key) || self.id_key().as_deref() == Some(key)
    }

    fn matches_slug(&self, slug: &str) -> bool {
        !slug.is_empty()
            && (self.match_key() == slug
                || self.id_key().map(|id| slugify(&id)).as_deref() == Some(slug))
    }
}

/// Resolve a UI/CLI-provided key against a table. Exact name/id matches win over slug matches.
pub fn resolve_key<'a, R: Keyed>(records: &'a [R], key: &str) -> Option<&'a R> {
    if let Some(found) = records.iter().find(|record| record.matches_exact(key)) {
        return Some(found);
    }
    let slug = slugify(key);
    records.iter().find(|record| record.matches_slug(&slug))
}

/// Decode `tickets` leniently: anything other than a JSON number is treated as missing.
pub(crate) fn lenient_tickets<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(serde_json::Value::as_f64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_ids_render_like_plain_integers() {
        let int: RecordId = serde_json::from_str("7").unwrap();
        let float: RecordId = serde_json::from_str("7.0").unwrap();
        let frac: RecordId = serde_json::from_str("7.5").unwrap();
        let text: RecordId = serde_json::from_str("\"ice_cave\"").unwrap();

        assert_eq!(int.to_string(), "7");
        assert_eq!(float.to_string(), "7");
        assert_eq!(frac.to_string(), "7.5");
        assert_eq!(text.to_string(), "ice_cave");
    }
}
