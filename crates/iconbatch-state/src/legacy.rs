//! Conversion from the older progress format.
//!
//! Early progress files mapped each collection URL straight to a processed
//! count (`{"url": 40}`), some entries later grew into `{"processed": 40}`
//! objects. Neither carries a total or a timestamp, so conversion assumes a
//! total of 100 and spaces synthetic timestamps 15 minutes apart.

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;

use crate::error::{StateError, StateResult};
use crate::record::validate;
use crate::{Progress, ProgressRecord};

const ASSUMED_TOTAL: u64 = 100;
const SPACING_MINUTES: i64 = 15;

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, 12, 20, 10, 0, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

/// Whether `raw` looks like a legacy record set that `convert` can upgrade.
pub fn is_legacy(raw: &Value) -> bool {
    raw.as_object().is_some_and(|map| !map.is_empty()) && !validate(raw)
}

/// Convert a legacy record set, keeping entry order for the timestamps.
pub fn convert(raw: &Value) -> StateResult<Progress> {
    let map = raw
        .as_object()
        .ok_or_else(|| StateError::Corrupt("legacy progress must be an object".to_string()))?;

    let base = base_time();
    let mut progress = Progress::new();

    for (index, (url, value)) in map.iter().enumerate() {
        let processed = match value {
            Value::Object(fields) => fields.get("processed").and_then(as_count),
            other => as_count(other),
        }
        .unwrap_or(0);

        // Only a bare count of exactly 100 meant "done" in the old format.
        let success = value.as_u64() == Some(ASSUMED_TOTAL);
        let last_attempt = base + Duration::minutes(index as i64 * SPACING_MINUTES);

        progress.insert(
            url.clone(),
            ProgressRecord::new(processed, ASSUMED_TOTAL, success, last_attempt),
        );
    }

    Ok(progress)
}

fn as_count(value: &Value) -> Option<u64> {
    value
        .as_u64()
        .or_else(|| value.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_convert_bare_counts() {
        let raw = json!({"urlA": 100, "urlB": 40});
        let progress = convert(&raw).unwrap();

        let a = progress.get("urlA").unwrap();
        assert_eq!((a.processed, a.total, a.success), (100, 100, true));
        assert_eq!(a.last_attempt().to_rfc3339(), "2023-12-20T10:00:00+00:00");

        let b = progress.get("urlB").unwrap();
        assert_eq!((b.processed, b.total, b.success), (40, 100, false));
        assert_eq!(b.last_attempt().to_rfc3339(), "2023-12-20T10:15:00+00:00");
    }

    #[test]
    fn test_convert_object_and_garbage_entries() {
        let raw = json!({
            "urlA": {"processed": 100},
            "urlB": "oops",
            "urlC": {"processed": "many"}
        });
        let progress = convert(&raw).unwrap();

        assert_eq!(progress.get("urlA").unwrap().processed, 100);
        assert!(!progress.get("urlA").unwrap().success);
        assert_eq!(progress.get("urlB").unwrap().processed, 0);
        assert_eq!(progress.get("urlC").unwrap().processed, 0);
    }

    #[test]
    fn test_is_legacy() {
        assert!(is_legacy(&json!({"urlA": 3})));
        assert!(!is_legacy(&json!({})));
        assert!(!is_legacy(&json!([3])));
        assert!(!is_legacy(&json!({
            "urlA": {"processed": 3, "total": 10, "success": true, "lastAttempt": "x"}
        })));
    }

    #[test]
    fn test_convert_rejects_non_object() {
        assert!(convert(&json!([1, 2])).unwrap_err().is_corrupt());
    }
}
