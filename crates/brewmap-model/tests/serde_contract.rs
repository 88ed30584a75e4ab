// SPDX-License-Identifier: Apache-2.0

use brewmap_model::{CafeId, CafeRecord, CafeUpdate};

#[test]
fn record_rejects_unknown_fields() {
    let raw = r#"{
      "id": 1, "name": "Joe's", "map_url": "http://x", "img_url": "http://y",
      "location": "Town", "has_sockets": true, "has_toilet": true, "has_wifi": true,
      "can_take_calls": false, "seats": null, "coffee_price": null, "rating": 5
    }"#;
    assert!(serde_json::from_str::<CafeRecord>(raw).is_err());
}

#[test]
fn record_id_is_serialized_as_plain_integer() {
    let raw = r#"{
      "id": 12, "name": "Joe's", "map_url": "http://x", "img_url": "http://y",
      "location": "Town", "has_sockets": true, "has_toilet": false, "has_wifi": true,
      "can_take_calls": false, "seats": "10-20", "coffee_price": null
    }"#;
    let record: CafeRecord = serde_json::from_str(raw).expect("decode record");
    assert_eq!(record.id, CafeId::new(12));
    assert_eq!(record.seats.as_deref(), Some("10-20"));
    assert_eq!(record.coffee_price, None);

    let encoded = serde_json::to_value(&record).expect("encode record");
    assert_eq!(encoded["id"], serde_json::json!(12));
}

#[test]
fn update_fields_default_to_absent() {
    let update: CafeUpdate = serde_json::from_str(r#"{"has_wifi": false}"#).expect("decode");
    assert_eq!(update.has_wifi, Some(false));
    assert!(update.has_toilet.is_none());
    assert!(!update.is_empty());
}
