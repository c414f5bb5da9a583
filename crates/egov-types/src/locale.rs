//! Four-locale text groups

use serde::{Deserialize, Serialize};

/// The same string content in the four language variants egov publishes.
///
/// Missing variants stay `None` and are omitted when serialized; nothing
/// checks that all four are present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocaleText {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uzb_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uzb_kr_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rus_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eng_text: Option<String>,
}

impl LocaleText {
    pub fn is_empty(&self) -> bool {
        self.uzb_text.is_none()
            && self.uzb_kr_text.is_none()
            && self.rus_text.is_none()
            && self.eng_text.is_none()
    }
}
