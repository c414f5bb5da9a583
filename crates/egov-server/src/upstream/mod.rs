//! Client for the egov open-data API
//!
//! One request per call, no retries. The upstream status code is not
//! interpreted: whatever body comes back is handed to the caller as-is.

use bytes::Bytes;
use egov_core::{EgovError, Result};
use reqwest::header::{
    HeaderMap, HeaderName, CONTENT_DISPOSITION, CONTENT_LENGTH, CONTENT_TYPE,
};
use reqwest::Client as ReqwestClient;
use serde_json::{json, Value};
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://data.egov.uz";

/// Sphere the listing seed routine pulls from.
pub const DEFAULT_SEED_SPHERE_ID: &str = "607ff39e7b6428eee08802be";

/// Page size egov expects for the main-data table call.
const MAIN_DATA_LIMIT: u32 = 40;

/// Partner search parameters, forwarded verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartnerSearch {
    pub name: String,
    pub offset: String,
    pub limit: String,
    pub lang: String,
}

/// File export parameters, forwarded verbatim.
///
/// `file_type`: 1 json, 2 xml, 3 xlsx. `lang`: 1 uz latin, 2 uz cyrillic, 3 ru.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRequest {
    pub id: String,
    pub file_type: String,
    pub table_type: String,
    pub lang: String,
}

/// A downloaded export together with the headers the proxy mirrors.
#[derive(Debug, Clone)]
pub struct UpstreamFile {
    pub body: Bytes,
    pub content_type: Option<Vec<u8>>,
    pub content_disposition: Option<Vec<u8>>,
    pub content_length: Option<Vec<u8>>,
}

pub struct EgovClient {
    http: ReqwestClient,
    base_url: String,
    token: String,
}

impl EgovClient {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            http: ReqwestClient::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Table rows of one dataset
    pub async fn fetch_main_data(&self, guid_id: &str) -> Result<Value> {
        debug!("Fetching main data: guid={}", guid_id);

        let response = self
            .http
            .post(self.url("/apiClient/Main/GetMainData"))
            .query(&[("GuidId", guid_id)])
            .json(&json!({
                "fields": {},
                "guidId": guid_id,
                "limit": MAIN_DATA_LIMIT,
                "offset": 0,
            }))
            .send()
            .await
            .map_err(transport)?;

        response.json().await.map_err(transport)
    }

    /// Free-text partner search; the token travels as a query parameter
    pub async fn fetch_partner_search(&self, search: &PartnerSearch) -> Result<Value> {
        debug!(
            "Partner search: name={}, offset={}, limit={}, lang={}",
            search.name, search.offset, search.limit, search.lang
        );

        let response = self
            .http
            .get(self.url("/apiPartner/Partner/WebService"))
            .query(&[
                ("token", self.token.as_str()),
                ("name", search.name.as_str()),
                ("offset", search.offset.as_str()),
                ("limit", search.limit.as_str()),
                ("lang", search.lang.as_str()),
            ])
            .send()
            .await
            .map_err(transport)?;

        response.json().await.map_err(transport)
    }

    /// Listing page of a sphere; rows are under `result.data`
    pub async fn fetch_listing_seed(
        &self,
        sphere_id: &str,
        limit: u32,
        offset: u32,
    ) -> Result<Value> {
        debug!(
            "Fetching listing seed: sphere={}, limit={}, offset={}",
            sphere_id, limit, offset
        );

        let response = self
            .http
            .get(self.url("/apiClient/main/gettable"))
            .query(&[
                ("limit", limit.to_string()),
                ("offset", offset.to_string()),
                ("sphereId", sphere_id.to_string()),
            ])
            .send()
            .await
            .map_err(transport)?;

        response.json().await.map_err(transport)
    }

    pub async fn fetch_file(&self, request: &FileRequest) -> Result<UpstreamFile> {
        debug!(
            "Fetching file: id={}, fileType={}, tableType={}, lang={}",
            request.id, request.file_type, request.table_type, request.lang
        );

        let response = self
            .http
            .get(self.url("/apiData/MainData/GetByFile"))
            .query(&[
                ("id", request.id.as_str()),
                ("fileType", request.file_type.as_str()),
                ("tableType", request.table_type.as_str()),
                ("lang", request.lang.as_str()),
            ])
            .send()
            .await
            .map_err(transport)?;

        let headers = response.headers();
        let content_type = header_bytes(headers, &CONTENT_TYPE);
        let content_disposition = header_bytes(headers, &CONTENT_DISPOSITION);
        let content_length = header_bytes(headers, &CONTENT_LENGTH);

        let body = response.bytes().await.map_err(transport)?;

        Ok(UpstreamFile {
            body,
            content_type,
            content_disposition,
            content_length,
        })
    }
}

fn transport(e: reqwest::Error) -> EgovError {
    EgovError::Transport(e.to_string())
}

fn header_bytes(headers: &HeaderMap, name: &HeaderName) -> Option<Vec<u8>> {
    headers.get(name).map(|v| v.as_bytes().to_vec())
}
