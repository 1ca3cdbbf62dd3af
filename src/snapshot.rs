//! Decoding untrusted JSON into a [`Snapshot`].
//!
//! Two levels of strictness apply:
//!
//! - **Shape** is checked strictly. The document must be an object whose
//!   `listings` and `logins` fields are arrays of objects. Anything else is a
//!   caller contract violation and fails fast with an [`AnalyticsError`].
//! - **Fields** are read leniently. A price sent as a string, an id sent as a
//!   number or a timestamp that does not parse never rejects the record; the
//!   field falls back to `None` and the accessors on
//!   [`ListingRecord`](crate::model::ListingRecord) supply defaults.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{AnalyticsError, json_type_name};
use crate::model::{ListingRecord, LoginEvent, Snapshot};

impl Snapshot {
    pub fn new(listings: Vec<ListingRecord>, logins: Vec<LoginEvent>) -> Self {
        Self { listings, logins }
    }

    /// Parse a snapshot from raw JSON text.
    pub fn from_json(raw: &str) -> Result<Self, AnalyticsError> {
        let document: Value = serde_json::from_str(raw)?;
        Self::from_value(document)
    }

    /// Build a snapshot from an already-parsed JSON document.
    ///
    /// Absent or `null` collections are treated as empty.
    pub fn from_value(document: Value) -> Result<Self, AnalyticsError> {
        let mut fields = match document {
            Value::Object(fields) => fields,
            other => {
                return Err(AnalyticsError::InvalidDocument {
                    found: json_type_name(&other),
                });
            }
        };

        let listings = decode_collection(fields.remove("listings"), "listings")?;
        let logins = decode_collection(fields.remove("logins"), "logins")?;

        Ok(Self { listings, logins })
    }
}

fn decode_collection<T: DeserializeOwned>(
    value: Option<Value>,
    field: &'static str,
) -> Result<Vec<T>, AnalyticsError> {
    let items = match value {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(items)) => items,
        Some(other) => {
            return Err(AnalyticsError::NotASequence {
                field,
                found: json_type_name(&other),
            });
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            if !item.is_object() {
                return Err(AnalyticsError::InvalidRecord {
                    collection: field,
                    index,
                    reason: format!("expected an object, got {}", json_type_name(&item)),
                });
            }
            serde_json::from_value(item).map_err(|e| AnalyticsError::InvalidRecord {
                collection: field,
                index,
                reason: e.to_string(),
            })
        })
        .collect()
}

/// Field-level deserializers that never reject a record.
pub(crate) mod lenient {
    use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;
    use tracing::warn;

    use crate::model::ListingStatus;

    /// Naive layouts tried after RFC 3339, interpreted as UTC.
    const NAIVE_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

    /// Postgres-style `2024-01-15 10:30:00+00`.
    const OFFSET_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f%#z";

    pub fn timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<Value>::deserialize(deserializer)?;
        Ok(raw.and_then(|value| {
            let parsed = match &value {
                Value::Null => return None,
                Value::String(s) if s.trim().is_empty() => return None,
                Value::String(s) => parse_timestamp(s),
                Value::Number(n) => n.as_i64().and_then(DateTime::from_timestamp_millis),
                _ => None,
            };
            if parsed.is_none() {
                warn!(value = %value, "Ignoring unparseable timestamp");
            }
            parsed
        }))
    }

    /// Parse a textual timestamp in any of the accepted layouts.
    pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
        let raw = raw.trim();

        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        if let Ok(dt) = DateTime::parse_from_str(raw, OFFSET_DATETIME_FORMAT) {
            return Some(dt.with_timezone(&Utc));
        }
        for format in NAIVE_DATETIME_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
                return Some(naive.and_utc());
            }
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
    }

    pub fn number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<Value>::deserialize(deserializer)?;
        Ok(match raw {
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
            _ => None,
        })
    }

    pub fn integer<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<Value>::deserialize(deserializer)?;
        Ok(match raw {
            Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
            Some(Value::String(s)) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().map(|f| f as i64))
            }
            _ => None,
        })
    }

    /// Identifiers may arrive as strings or numbers; both are kept as text.
    pub fn identifier<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<Value>::deserialize(deserializer)?;
        Ok(match raw {
            Some(Value::String(s)) if !s.is_empty() => Some(s),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        })
    }

    pub fn status<'de, D>(deserializer: D) -> Result<ListingStatus, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<Value>::deserialize(deserializer)?;
        Ok(ListingStatus::from(match raw {
            Some(Value::String(s)) => Some(s),
            _ => None,
        }))
    }

    pub fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<Value>::deserialize(deserializer)?;
        Ok(match raw {
            Some(Value::String(s)) => Some(s),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        })
    }

    pub fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(optional_text(deserializer)?.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ListingStatus;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    #[test]
    fn test_from_json_full_record() {
        let raw = r#"{
            "listings": [{
                "id": "a1",
                "title": "Road bike",
                "category": "Sports",
                "price": 250.5,
                "status": "sold",
                "quantity": 2,
                "views_count": 40,
                "seller_id": "s1",
                "created_at": "2024-03-01T10:00:00Z",
                "sold_at": "2024-03-05T10:00:00+02:00",
                "image_url": "ignored"
            }],
            "logins": [{ "user_id": "u1", "logged_in_at": "2024-03-02T08:15:00Z" }]
        }"#;

        let snapshot = Snapshot::from_json(raw).unwrap();

        assert_eq!(snapshot.listings.len(), 1);
        assert_eq!(snapshot.logins.len(), 1);

        let listing = &snapshot.listings[0];
        assert_eq!(listing.id.as_deref(), Some("a1"));
        assert_eq!(listing.status, ListingStatus::Sold);
        assert_eq!(listing.quantity(), 2);
        assert_eq!(listing.views(), 40);
        assert_eq!(
            listing.sold_at,
            Some(Utc.with_ymd_and_hms(2024, 3, 5, 8, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_missing_collections_are_empty() {
        let snapshot = Snapshot::from_value(json!({})).unwrap();
        assert!(snapshot.listings.is_empty());
        assert!(snapshot.logins.is_empty());

        let snapshot = Snapshot::from_value(json!({ "listings": [], "logins": null })).unwrap();
        assert!(snapshot.logins.is_empty());
    }

    #[test]
    fn test_non_object_document_fails() {
        let err = Snapshot::from_value(json!([1, 2, 3])).unwrap_err();
        assert!(matches!(
            err,
            AnalyticsError::InvalidDocument { found: "an array" }
        ));
    }

    #[test]
    fn test_non_sequence_listings_fails() {
        let err = Snapshot::from_value(json!({ "listings": "oops" })).unwrap_err();
        assert!(matches!(
            err,
            AnalyticsError::NotASequence {
                field: "listings",
                ..
            }
        ));
    }

    #[test]
    fn test_non_object_record_fails_with_index() {
        let err = Snapshot::from_value(json!({ "logins": [{}, 42] })).unwrap_err();
        match err {
            AnalyticsError::InvalidRecord {
                collection, index, ..
            } => {
                assert_eq!(collection, "logins");
                assert_eq!(index, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_invalid_json_text_fails() {
        assert!(matches!(
            Snapshot::from_json("{not json"),
            Err(AnalyticsError::Json(_))
        ));
    }

    #[test]
    fn test_unparseable_timestamp_keeps_record() {
        let snapshot = Snapshot::from_value(json!({
            "listings": [{ "price": "19.99", "created_at": "next tuesday", "status": "SOLD" }]
        }))
        .unwrap();

        let listing = &snapshot.listings[0];
        assert!(listing.created_at.is_none());
        assert_eq!(listing.price(), 19.99);
        assert!(listing.is_sold());
    }

    #[test]
    fn test_lenient_scalars() {
        let snapshot = Snapshot::from_value(json!({
            "listings": [{
                "id": 17,
                "seller_id": 4,
                "quantity": "3",
                "views_count": 12.0,
                "category": null,
                "title": null,
                "status": null
            }]
        }))
        .unwrap();

        let listing = &snapshot.listings[0];
        assert_eq!(listing.id.as_deref(), Some("17"));
        assert_eq!(listing.seller_id.as_deref(), Some("4"));
        assert_eq!(listing.quantity(), 3);
        assert_eq!(listing.views(), 12);
        assert!(listing.category.is_none());
        assert_eq!(listing.title, "");
        assert_eq!(listing.status, ListingStatus::Other);
    }

    #[test]
    fn test_non_string_status_reads_as_other() {
        let snapshot = Snapshot::from_value(json!({
            "listings": [
                { "title": "a", "price": 10, "status": 1 },
                { "title": "b", "price": 10, "status": { "v": "sold" } },
                { "title": "c", "price": 10, "status": ["active"] },
                { "title": "d", "price": 10, "status": true }
            ]
        }))
        .unwrap();

        assert_eq!(snapshot.listings.len(), 4);
        for listing in &snapshot.listings {
            assert_eq!(listing.status, ListingStatus::Other);
            assert!(!listing.is_sold() && !listing.is_active());
        }
    }

    #[test]
    fn test_parse_timestamp_layouts() {
        let expected = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();

        assert_eq!(
            lenient::parse_timestamp("2024-01-15T10:30:00Z"),
            Some(expected)
        );
        assert_eq!(
            lenient::parse_timestamp("2024-01-15T10:30:00.000"),
            Some(expected)
        );
        assert_eq!(
            lenient::parse_timestamp("2024-01-15 10:30:00"),
            Some(expected)
        );
        assert_eq!(
            lenient::parse_timestamp("2024-01-15 10:30:00+00"),
            Some(expected)
        );
        assert_eq!(
            lenient::parse_timestamp("2024-01-15"),
            Some(Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap())
        );
        assert_eq!(lenient::parse_timestamp("15/01/2024"), None);
    }

    #[test]
    fn test_epoch_millis_timestamp() {
        let snapshot = Snapshot::from_value(json!({
            "logins": [{ "user_id": "u1", "logged_in_at": 1_705_314_600_000_i64 }]
        }))
        .unwrap();

        assert_eq!(
            snapshot.logins[0].logged_in_at,
            Some(Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap())
        );
    }
}
