//! Trade listing records

use crate::LocaleText;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Summary of a trade dataset as shown in list views.
///
/// Built from the `result.data` rows of the egov `gettable` endpoint. Fields
/// the upstream adds beyond these are dropped on the way in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    /// Row id assigned by the store; never read from upstream payloads
    #[serde(
        rename = "_id",
        default,
        skip_deserializing,
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub struct_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_name: Option<LocaleText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org_name: Option<LocaleText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sphere_name: Option<LocaleText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(
        default,
        with = "crate::number",
        skip_serializing_if = "Option::is_none"
    )]
    pub full_count: Option<f64>,
    #[serde(
        default,
        with = "crate::number",
        skip_serializing_if = "Option::is_none"
    )]
    pub user_org_id: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sphere_id: Option<String>,
    #[serde(
        default,
        with = "crate::number",
        skip_serializing_if = "Option::is_none"
    )]
    pub late_day: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_ai: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_graph: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_aral: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_ai: Option<bool>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub geo_type: Vec<String>,
    #[serde(
        default,
        with = "crate::number",
        skip_serializing_if = "Option::is_none"
    )]
    pub rating: Option<f64>,
    #[serde(
        default,
        with = "crate::timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub update_date: Option<DateTime<Utc>>,
    #[serde(
        default,
        with = "crate::timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_update: Option<DateTime<Utc>>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_parse_upstream_row() {
        let listing: Listing = serde_json::from_value(json!({
            "_id": "should-not-be-read",
            "id": 991,
            "structId": "5f1e9a",
            "dataName": { "uzbText": "Savdo", "rusText": "Торговля" },
            "orgName": { "engText": "Ministry" },
            "name": "trade_objects",
            "fullCount": 120,
            "userOrgId": 42,
            "sphereId": "607ff39e7b6428eee08802be",
            "lateDay": 3,
            "isAi": false,
            "isGraph": true,
            "geoType": ["region", "district"],
            "rating": 4.5,
            "updateDate": "2023-01-02T03:04:05",
            "lastUpdate": null,
            "somethingNew": { "nested": true }
        }))
        .unwrap();

        assert_eq!(listing.id, None);
        assert_eq!(listing.struct_id.as_deref(), Some("5f1e9a"));
        assert_eq!(
            listing.data_name.as_ref().and_then(|t| t.rus_text.as_deref()),
            Some("Торговля")
        );
        assert_eq!(listing.full_count, Some(120.0));
        assert_eq!(listing.is_graph, Some(true));
        assert_eq!(listing.has_ai, None);
        assert_eq!(listing.geo_type, vec!["region", "district"]);
        assert_eq!(
            listing.update_date,
            Some(Utc.with_ymd_and_hms(2023, 1, 2, 3, 4, 5).unwrap())
        );
        assert_eq!(listing.last_update, None);
    }

    #[test]
    fn test_serialize_uses_camel_case_and_id() {
        let listing = Listing {
            id: Some(7),
            struct_id: Some("abc".to_string()),
            is_ai: Some(true),
            update_date: Some(Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap()),
            ..Default::default()
        };

        let value = serde_json::to_value(&listing).unwrap();
        assert_eq!(
            value,
            json!({
                "_id": 7,
                "structId": "abc",
                "isAi": true,
                "geoType": [],
                "updateDate": "2024-05-06T07:08:09.000Z"
            })
        );
    }

    #[test]
    fn test_loose_upstream_shapes() {
        let listing: Listing = serde_json::from_value(json!({
            "geoType": null,
            "lateDay": 1.5,
            "fullCount": "42",
            "userOrgId": null
        }))
        .unwrap();

        assert!(listing.geo_type.is_empty());
        assert_eq!(listing.late_day, Some(1.5));
        assert_eq!(listing.full_count, Some(42.0));
        assert_eq!(listing.user_org_id, None);
    }

    #[test]
    fn test_invalid_timestamp_is_rejected() {
        let result = serde_json::from_value::<Listing>(json!({ "updateDate": "soon" }));
        assert!(result.is_err());
    }
}
