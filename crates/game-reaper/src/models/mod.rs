//! Game Reaper models.
//!
//! The reaper only understands one field of a game record, `lastUpdated`.
//! Everything else the mobile client writes is carried along opaquely.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::cmp::Ordering;
use std::fmt;

/// Key of a child under the games collection.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameKey(String);

impl GameKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GameKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GameKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

/// Value of a record's `lastUpdated` child, as the database orders it.
///
/// The database sorts children on `lastUpdated` as: missing or null, then
/// `false`, `true`, numbers ascending, and finally strings and objects. A
/// numeric `endAt` bound therefore selects everything up to and including
/// numbers at or below it, and never a string or an object.
#[derive(Debug, Clone, PartialEq)]
pub enum LastUpdated {
    /// Field missing or null.
    Absent,
    Bool(bool),
    /// Seconds since the Unix epoch, kept exactly as written.
    Number(Number),
    /// String, array or object.
    Other,
}

impl LastUpdated {
    fn from_field(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) => LastUpdated::Absent,
            Some(Value::Bool(b)) => LastUpdated::Bool(*b),
            Some(Value::Number(n)) => LastUpdated::Number(n.clone()),
            Some(_) => LastUpdated::Other,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            LastUpdated::Absent => 0,
            LastUpdated::Bool(false) => 1,
            LastUpdated::Bool(true) => 2,
            LastUpdated::Number(_) => 3,
            LastUpdated::Other => 4,
        }
    }

    /// Whether a range query bounded by `endAt=cutoff` includes this value.
    pub fn is_at_or_before(&self, cutoff: i64) -> bool {
        match self {
            LastUpdated::Absent | LastUpdated::Bool(_) => true,
            LastUpdated::Number(n) => {
                if let Some(i) = n.as_i64() {
                    i <= cutoff
                } else if n.is_u64() {
                    // Above i64::MAX.
                    false
                } else {
                    n.as_f64().is_some_and(|f| f <= cutoff as f64)
                }
            }
            LastUpdated::Other => false,
        }
    }

    /// Index order of two values.
    pub fn index_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (LastUpdated::Number(a), LastUpdated::Number(b)) => match (a.as_i64(), b.as_i64()) {
                (Some(a), Some(b)) => a.cmp(&b),
                _ => {
                    let a = a.as_f64().unwrap_or(f64::MAX);
                    let b = b.as_f64().unwrap_or(f64::MAX);
                    a.total_cmp(&b)
                }
            },
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

/// A game record as stored by the mobile client.
///
/// All fields, `lastUpdated` included, are carried exactly as written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameRecord {
    pub fields: Map<String, Value>,
}

impl GameRecord {
    /// A record with only a `lastUpdated` value.
    pub fn updated_at(last_updated: i64) -> Self {
        let mut fields = Map::new();
        fields.insert(LAST_UPDATED.to_string(), Value::from(last_updated));
        Self { fields }
    }

    /// Interpret an arbitrary JSON child as a game record.
    ///
    /// Non-object children become an empty record rather than an error: they
    /// have no `lastUpdated` child, so the database returns them for the
    /// range query and they are still candidates for deletion.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(fields) => Self { fields },
            _ => Self::default(),
        }
    }

    /// The `lastUpdated` child.
    pub fn last_updated(&self) -> LastUpdated {
        LastUpdated::from_field(self.fields.get(LAST_UPDATED))
    }

    /// Whether this record falls inside a range query ending at `cutoff`.
    pub fn is_stale(&self, cutoff: i64) -> bool {
        self.last_updated().is_at_or_before(cutoff)
    }
}

/// Name of the indexed child the reaper orders by.
pub const LAST_UPDATED: &str = "lastUpdated";

/// Summary of a single reaper run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReapOutcome {
    /// Records with `lastUpdated <= cutoff` were deleted.
    pub cutoff: i64,
    /// Number of keys removed by the batched write.
    pub deleted: usize,
}

/// Readiness check response.
///
/// Returned by the `/ready` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessResponse {
    /// "ready" or "not_ready".
    pub status: String,

    /// Deployment region.
    pub region: String,

    /// Game store connectivity ("healthy" or "unhealthy").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_keeps_every_field() {
        let value = json!({
            "lastUpdated": 1500,
            "course": "Pebble Beach",
            "holes": [4, 5, 3]
        });
        let record: GameRecord = serde_json::from_value(value.clone()).unwrap();

        assert_eq!(record.last_updated(), LastUpdated::Number(Number::from(1500_i64)));
        assert_eq!(record.fields["course"], "Pebble Beach");
        assert_eq!(serde_json::to_value(&record).unwrap(), value);
    }

    #[test]
    fn test_last_updated_kinds() {
        assert_eq!(GameRecord::from_value(json!({})).last_updated(), LastUpdated::Absent);
        assert_eq!(
            GameRecord::from_value(json!({ "lastUpdated": null })).last_updated(),
            LastUpdated::Absent
        );
        assert_eq!(
            GameRecord::from_value(json!({ "lastUpdated": true })).last_updated(),
            LastUpdated::Bool(true)
        );
        assert_eq!(
            GameRecord::from_value(json!({ "lastUpdated": "yesterday" })).last_updated(),
            LastUpdated::Other
        );
        assert_eq!(GameRecord::from_value(json!(7)).last_updated(), LastUpdated::Absent);
    }

    #[test]
    fn test_is_stale_boundary() {
        let cutoff = 1400;
        assert!(GameRecord::updated_at(1000).is_stale(cutoff));
        assert!(GameRecord::updated_at(1400).is_stale(cutoff));
        assert!(!GameRecord::updated_at(1401).is_stale(cutoff));
        assert!(GameRecord::default().is_stale(cutoff));
    }

    #[test]
    fn test_fractional_timestamp_is_not_rounded() {
        let cutoff = 1400;
        assert!(!GameRecord::from_value(json!({ "lastUpdated": 1400.5 })).is_stale(cutoff));
        assert!(GameRecord::from_value(json!({ "lastUpdated": 1399.5 })).is_stale(cutoff));
        assert!(!GameRecord::from_value(json!({ "lastUpdated": u64::MAX })).is_stale(cutoff));
    }

    #[test]
    fn test_non_numeric_timestamps_follow_index_order() {
        let cutoff = 1400;
        assert!(GameRecord::from_value(json!({ "lastUpdated": null })).is_stale(cutoff));
        assert!(GameRecord::from_value(json!({ "lastUpdated": false })).is_stale(cutoff));
        assert!(!GameRecord::from_value(json!({ "lastUpdated": "9999" })).is_stale(cutoff));
        assert!(!GameRecord::from_value(json!({ "lastUpdated": {"at": 1} })).is_stale(cutoff));
    }

    #[test]
    fn test_index_cmp() {
        let absent = LastUpdated::Absent;
        let truthy = LastUpdated::Bool(true);
        let low = LastUpdated::Number(Number::from(1000_i64));
        let fractional = LastUpdated::Number(Number::from_f64(1000.5).unwrap());
        let text = LastUpdated::Other;

        assert_eq!(absent.index_cmp(&truthy), Ordering::Less);
        assert_eq!(truthy.index_cmp(&low), Ordering::Less);
        assert_eq!(low.index_cmp(&fractional), Ordering::Less);
        assert_eq!(fractional.index_cmp(&text), Ordering::Less);
        assert_eq!(low.index_cmp(&low), Ordering::Equal);
    }

    #[test]
    fn test_game_key_serializes_as_plain_string() {
        let key = GameKey::new("-NxYz123");
        assert_eq!(serde_json::to_string(&key).unwrap(), "\"-NxYz123\"");
        assert_eq!(key.to_string(), "-NxYz123");
    }
}
