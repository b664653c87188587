// SPDX-FileCopyrightText: Copyright (C) 2018-2025 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use serde_json::json;

use filtersync_core::filter::FilterSet as CoreFilterSet;

use super::*;

fn timestamp() -> Timestamp {
    "2026-03-15T12:00:00Z".parse().unwrap()
}

#[test]
fn serialize_success() {
    let filters = CoreFilterSet {
        keyword: "shoes".to_owned(),
        ..Default::default()
    };
    let response = _core::ResponseEnvelope::success(
        filters.clone(),
        vec![json!({"id": 1})],
        1,
        timestamp(),
    );
    let json = serde_json::to_value(ResponseEnvelope::from(response)).unwrap();
    assert_eq!("success", json["status"]);
    assert_eq!(json!([{"id": 1}]), json["items"]);
    assert_eq!(filters.fingerprint().to_string(), json["fingerprint"]);
    assert!(json.get("error").is_none());
    assert_eq!(
        json!({
            "hasSearch": true,
            "activeFiltersCount": 1,
            "hasActiveFilters": true,
            "activeFilters": [{"field": "searchKeyword", "value": "shoes"}],
            "timestamp": "2026-03-15T12:00:00Z",
        }),
        json["meta"]
    );
}

#[test]
fn roundtrip_into_core() {
    let response = _core::ResponseEnvelope::<serde_json::Value>::error(
        CoreFilterSet::default(),
        "timeout",
        timestamp(),
    );
    let json = serde_json::to_string(&ResponseEnvelope::from(response.clone())).unwrap();
    let decoded: ResponseEnvelope = serde_json::from_str(&json).unwrap();
    assert_eq!(
        response,
        _core::ResponseEnvelope::<serde_json::Value>::try_from(decoded).unwrap()
    );
}

#[test]
fn reject_malformed_fingerprint() {
    let response = _core::ResponseEnvelope::<serde_json::Value>::empty(
        CoreFilterSet::default(),
        timestamp(),
    );
    let mut response = ResponseEnvelope::from(response);
    response.fingerprint = "abc".to_owned();
    assert!(_core::ResponseEnvelope::<serde_json::Value>::try_from(response).is_err());
}
