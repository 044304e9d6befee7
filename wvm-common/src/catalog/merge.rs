//! Building and updating typed records from caller payloads
//!
//! Updates are a shallow merge: payload keys overwrite the record's keys,
//! keys absent from the payload are kept, and an explicit `null` removes
//! the key. Protected keys (the id and child collections) are ignored.

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use super::model::Payload;
use crate::{Error, Result};

/// Build a new record from a payload, stamping it with `id`
pub fn from_payload<T>(payload: &Payload, id: &str, protected: &[&str]) -> Result<T>
where
    T: DeserializeOwned,
{
    let mut object = Payload::new();
    for (key, value) in payload {
        if protected.contains(&key.as_str()) || value.is_null() {
            continue;
        }
        object.insert(key.clone(), value.clone());
    }
    object.insert("id".to_string(), Value::String(id.to_string()));

    serde_json::from_value(Value::Object(object))
        .map_err(|e| Error::InvalidInput(format!("Invalid payload: {}", e)))
}

/// Shallow-merge `payload` over `existing`
pub fn merge_update<T>(existing: &T, payload: &Payload, protected: &[&str]) -> Result<T>
where
    T: Serialize + DeserializeOwned,
{
    let mut object = match serde_json::to_value(existing)? {
        Value::Object(object) => object,
        other => {
            return Err(Error::Internal(format!(
                "Record did not serialize to an object: {}",
                other
            )))
        }
    };

    for (key, value) in payload {
        if key == "id" || protected.contains(&key.as_str()) {
            continue;
        }
        if value.is_null() {
            object.remove(key);
        } else {
            object.insert(key.clone(), value.clone());
        }
    }

    serde_json::from_value(Value::Object(object))
        .map_err(|e| Error::InvalidInput(format!("Invalid payload: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::model::{Location, Offset, Venue};
    use serde_json::json;

    fn payload(value: Value) -> Payload {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_from_payload_sets_id_and_drops_protected() {
        let venue: Venue = from_payload(
            &payload(json!({"id": "spoofed", "name": "Arena", "maps": [{"id": "x"}]})),
            "v1",
            &["maps"],
        )
        .unwrap();
        assert_eq!(venue.id, "v1");
        assert_eq!(venue.name, "Arena");
        assert!(venue.maps.is_empty());
    }

    #[test]
    fn test_merge_preserves_untouched_fields() {
        let existing: Location = serde_json::from_value(json!({
            "id": "l1",
            "name": "Booth",
            "description": "old",
            "number": 4,
            "position": {"top": "10%", "left": "20%"}
        }))
        .unwrap();

        let merged = merge_update(&existing, &payload(json!({"description": "new"})), &[]).unwrap();

        assert_eq!(merged.description, "new");
        assert_eq!(merged.name, "Booth");
        assert_eq!(merged.number, Some(4));
        assert_eq!(merged.position, existing.position);
    }

    #[test]
    fn test_merge_never_changes_id_or_protected() {
        let existing = Venue {
            id: "v1".to_string(),
            name: "Arena".to_string(),
            ..Default::default()
        };
        let merged = merge_update(
            &existing,
            &payload(json!({"id": "v2", "maps": [{"id": "m9"}], "name": "Dome"})),
            &["maps"],
        )
        .unwrap();
        assert_eq!(merged.id, "v1");
        assert!(merged.maps.is_empty());
        assert_eq!(merged.name, "Dome");
    }

    #[test]
    fn test_explicit_null_removes_field() {
        let existing: Location = serde_json::from_value(json!({
            "id": "l1",
            "fiber": "SM",
            "position": {"top": 5, "left": 6},
            "color": "red"
        }))
        .unwrap();

        let merged = merge_update(
            &existing,
            &payload(json!({"fiber": null, "position": null, "color": null})),
            &[],
        )
        .unwrap();

        assert_eq!(merged.fiber, "");
        assert!(merged.position.is_none());
        assert!(!merged.extra.contains_key("color"));
    }

    #[test]
    fn test_merge_accepts_new_extra_fields() {
        let existing = Location {
            id: "l1".to_string(),
            ..Default::default()
        };
        let merged = merge_update(
            &existing,
            &payload(json!({"position": {"top": "1%", "left": "2%"}, "tag": "vip"})),
            &[],
        )
        .unwrap();
        assert_eq!(
            merged.position.unwrap().top,
            Offset::Css("1%".to_string())
        );
        assert_eq!(merged.extra["tag"], "vip");
    }

    #[test]
    fn test_type_mismatch_is_invalid_input() {
        let existing = Location::default();
        let err = merge_update(&existing, &payload(json!({"number": "seven"})), &[]).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }
}
