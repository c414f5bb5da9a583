//! Trade passport records

use crate::LocaleText;
use serde::{Deserialize, Serialize};

/// Contact and registration details of one trade entity.
///
/// Dates are kept as the strings egov sends; `trade_id` is the lookup key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Passport {
    #[serde(
        rename = "_id",
        default,
        skip_deserializing,
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trade_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telephone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ogr_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_web: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org_name: Option<LocaleText>,
}

impl Passport {
    pub fn new(trade_id: impl Into<String>) -> Self {
        Self {
            trade_id: Some(trade_id.into()),
            ..Default::default()
        }
    }
}
