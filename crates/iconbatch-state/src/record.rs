use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::error::{StateError, StateResult};

const REQUIRED_FIELDS: [&str; 4] = ["processed", "total", "success", "lastAttempt"];

/// Progress for a single work item (one collection URL).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressRecord {
    /// Icons completed so far.
    pub processed: u64,
    /// Last discovered icon count.
    pub total: u64,
    /// Whether the most recent attempt finished without error.
    pub success: bool,
    /// When this record was written, at millisecond precision.
    #[serde(rename = "lastAttempt", with = "timestamp")]
    last_attempt: DateTime<Utc>,
}

impl ProgressRecord {
    pub fn new(processed: u64, total: u64, success: bool, last_attempt: DateTime<Utc>) -> Self {
        Self {
            processed,
            total,
            success,
            last_attempt: last_attempt.trunc_subsecs(3),
        }
    }

    /// Create a record stamped with the current time.
    pub fn stamped(processed: u64, total: u64, success: bool) -> Self {
        Self::new(processed, total, success, Utc::now())
    }

    pub fn last_attempt(&self) -> DateTime<Utc> {
        self.last_attempt
    }

    /// `processed <= total`.
    pub fn is_consistent(&self) -> bool {
        self.processed <= self.total
    }

    pub fn is_complete(&self) -> bool {
        self.success && self.total > 0 && self.processed >= self.total
    }

    /// Best-effort read of a record whose fields have unexpected types.
    /// Counts fall back to 0, `success` to false and an unreadable
    /// `lastAttempt` to the Unix epoch.
    fn coerce(fields: &serde_json::Map<String, Value>) -> Self {
        let count = |name: &str| fields.get(name).and_then(loose_count).unwrap_or(0);
        let success = fields.get("success").and_then(Value::as_bool).unwrap_or(false);
        let last_attempt = fields
            .get("lastAttempt")
            .and_then(parse_loose_timestamp)
            .unwrap_or_default();

        Self::new(count("processed"), count("total"), success, last_attempt)
    }
}

/// A non-negative count, accepting floats and numeric strings.
fn loose_count(value: &Value) -> Option<u64> {
    match value {
        Value::String(s) => s.trim().parse().ok(),
        other => other
            .as_u64()
            .or_else(|| other.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
    }
}

fn parse_loose_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
                    .iter()
                    .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                    .map(|naive| naive.and_utc())
            }),
        Value::Number(n) => n.as_i64().and_then(DateTime::<Utc>::from_timestamp_millis),
        _ => None,
    }
}

/// The full persisted record set, keyed by work item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Progress {
    records: BTreeMap<String, ProgressRecord>,
}

impl Progress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a serialized record set.
    ///
    /// Text that is not JSON or fails `validate` is corrupt. A structurally
    /// valid set always loads: a record with mistyped fields is coerced on
    /// its own and logged, the other records are kept as written.
    pub fn parse(text: &str) -> StateResult<Self> {
        let raw: Value = serde_json::from_str(text)
            .map_err(|e| StateError::Corrupt(format!("invalid JSON: {e}")))?;

        if !validate(&raw) {
            return Err(StateError::Corrupt(
                "expected an object of progress records".to_string(),
            ));
        }

        let mut progress = Progress::new();
        if let Value::Object(map) = raw {
            for (key, value) in map {
                let record = match serde_json::from_value::<ProgressRecord>(value.clone()) {
                    Ok(record) => record,
                    Err(e) => {
                        warn!(key = %key, error = %e, "Progress record has mistyped fields, coercing");
                        match &value {
                            Value::Object(fields) => ProgressRecord::coerce(fields),
                            _ => continue,
                        }
                    }
                };
                progress.insert(key, record);
            }
        }
        Ok(progress)
    }

    /// Serialize with two-space indentation.
    pub fn to_json_pretty(&self) -> StateResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn get(&self, key: &str) -> Option<&ProgressRecord> {
        self.records.get(key)
    }

    /// Replace the record for `key`.
    pub fn insert(&mut self, key: impl Into<String>, record: ProgressRecord) {
        self.records.insert(key.into(), record);
    }

    /// Index at which processing of `key` should continue.
    pub fn resume_offset(&self, key: &str) -> u64 {
        self.get(key).map(|r| r.processed).unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ProgressRecord)> {
        self.records.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Keys whose record has `processed > total`.
    pub fn integrity_violations(&self) -> Vec<&str> {
        self.iter()
            .filter(|(_, r)| !r.is_consistent())
            .map(|(k, _)| k)
            .collect()
    }
}

/// Structural check of a raw record set: an object whose every value is an
/// object carrying `processed`, `total`, `success` and `lastAttempt`.
/// Field types are not inspected.
pub fn validate(raw: &serde_json::Value) -> bool {
    match raw.as_object() {
        Some(map) => map.values().all(|value| {
            value
                .as_object()
                .is_some_and(|record| REQUIRED_FIELDS.iter().all(|f| record.contains_key(*f)))
        }),
        None => false,
    }
}

/// ISO-8601 with millisecond precision and a `Z` suffix.
mod timestamp {
    use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let s = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc).trunc_subsecs(3))
            .map_err(serde::de::Error::custom)
    }
}
