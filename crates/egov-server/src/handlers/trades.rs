//! Upstream-backed trade handlers
//!
//! Each handler makes exactly one call to the egov API and passes the result
//! through without reshaping it.

use super::{ID_REQUIRED, NAME_REQUIRED};
use crate::error::ApiError;
use crate::extractors::QueryParams;
use crate::upstream::{FileRequest, PartnerSearch};
use crate::AppState;
use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderName, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use tracing::warn;

/// `GET /trade-table?id=<guid>`
pub async fn table(
    State(state): State<AppState>,
    query: QueryParams,
) -> Result<Json<Value>, ApiError> {
    const ROUTE: &str = "trade-table";

    let id = query.require("id", ID_REQUIRED).map_err(ApiError::at(ROUTE))?;

    let body = state
        .upstream
        .fetch_main_data(id)
        .await
        .map_err(ApiError::at(ROUTE))?;

    Ok(Json(body))
}

/// `GET /trade?name=&offset=&limit=&lang=`
pub async fn search(
    State(state): State<AppState>,
    query: QueryParams,
) -> Result<Json<Value>, ApiError> {
    const ROUTE: &str = "trade";

    let name = query
        .require("name", NAME_REQUIRED)
        .map_err(ApiError::at(ROUTE))?;

    let search = PartnerSearch {
        name: name.to_string(),
        offset: query.get_or("offset", "0").to_string(),
        limit: query.get_or("limit", "10").to_string(),
        lang: query.get_or("lang", "ru").to_string(),
    };

    let body = state
        .upstream
        .fetch_partner_search(&search)
        .await
        .map_err(ApiError::at(ROUTE))?;

    Ok(Json(body))
}

/// `GET /trade-file?id=&fileType=&tableType=&lang=`
///
/// Streams back the export bytes with the upstream's content headers.
pub async fn file(
    State(state): State<AppState>,
    query: QueryParams,
) -> Result<Response, ApiError> {
    const ROUTE: &str = "trade-file";

    let id = query.require("id", ID_REQUIRED).map_err(ApiError::at(ROUTE))?;

    let request = FileRequest {
        id: id.to_string(),
        file_type: query.get_or("fileType", "1").to_string(),
        table_type: query.get_or("tableType", "2").to_string(),
        lang: query.get_or("lang", "3").to_string(),
    };

    let file = state
        .upstream
        .fetch_file(&request)
        .await
        .map_err(ApiError::at(ROUTE))?;

    let mut headers = HeaderMap::new();
    mirror_header(&mut headers, header::CONTENT_TYPE, file.content_type);
    mirror_header(&mut headers, header::CONTENT_DISPOSITION, file.content_disposition);
    mirror_header(&mut headers, header::CONTENT_LENGTH, file.content_length);

    Ok((headers, file.body).into_response())
}

fn mirror_header(headers: &mut HeaderMap, name: HeaderName, raw: Option<Vec<u8>>) {
    let Some(raw) = raw else {
        return;
    };
    match HeaderValue::from_bytes(&raw) {
        Ok(value) => {
            headers.insert(name, value);
        }
        Err(e) => warn!("Dropping upstream {} header: {}", name, e),
    }
}

#[cfg(test)]
mod tests {
    use crate::handlers::test_support::{json, send, TestApp, TEST_TOKEN};
    use axum::http::{header, StatusCode};
    use httpmock::prelude::*;
    use serde_json::json;

    const UNREACHABLE: &str = "http://127.0.0.1:1";

    #[tokio::test]
    async fn test_every_route_rejects_empty_query() {
        let app = TestApp::new(UNREACHABLE);

        for route in ["trade-table", "trade-passport", "trade-list", "trade", "trade-file"] {
            let (status, _, body) = send(app.router(), &format!("/api/v1/{}", route)).await;

            assert_eq!(status, StatusCode::NOT_FOUND, "route {}", route);
            assert_eq!(json(&body), json!({ "error": "Query Not Found" }), "route {}", route);
        }
    }

    #[tokio::test]
    async fn test_table_passes_upstream_json_through() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/apiClient/Main/GetMainData")
                    .query_param("GuidId", "g-1");
                then.status(200)
                    .json_body(json!({ "result": { "data": { "rows": [{ "a": 1 }] } } }));
            })
            .await;
        let app = TestApp::new(&server.base_url());

        let (status, _, body) = send(app.router(), "/api/v1/trade-table?id=g-1").await;

        mock.assert_async().await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json(&body),
            json!({ "result": { "data": { "rows": [{ "a": 1 }] } } })
        );
    }

    #[tokio::test]
    async fn test_missing_id_stops_before_upstream() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|_when, then| {
                then.status(200).json_body(json!({}));
            })
            .await;
        let app = TestApp::new(&server.base_url());

        for uri in [
            "/api/v1/trade-table?id=&offset=1",
            "/api/v1/trade-file?lang=3",
        ] {
            let (status, _, body) = send(app.router(), uri).await;
            assert_eq!(status, StatusCode::NOT_FOUND);
            assert_eq!(json(&body), json!({ "error": "Query id is required" }));
        }

        let (status, _, body) = send(app.router(), "/api/v1/trade?lang=uz").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json(&body), json!({ "error": "Query Name is required" }));

        assert_eq!(mock.calls_async().await, 0);
    }

    #[tokio::test]
    async fn test_search_applies_defaults() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/apiPartner/Partner/WebService")
                    .query_param("token", TEST_TOKEN)
                    .query_param("name", "bozor")
                    .query_param("offset", "0")
                    .query_param("limit", "10")
                    .query_param("lang", "ru");
                then.status(200).json_body(json!({ "count": 0, "items": [] }));
            })
            .await;
        let app = TestApp::new(&server.base_url());

        let (status, _, body) = send(app.router(), "/api/v1/trade?name=bozor").await;

        mock.assert_async().await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json(&body), json!({ "count": 0, "items": [] }));
    }

    #[tokio::test]
    async fn test_file_mirrors_upstream_headers_and_bytes() {
        let payload: Vec<u8> = vec![0x50, 0x4b, 0x03, 0x04, 0xff, 0x00, 0x10];
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/apiData/MainData/GetByFile")
                    .query_param("id", "77")
                    .query_param("fileType", "1")
                    .query_param("tableType", "2")
                    .query_param("lang", "3");
                then.status(200)
                    .header("content-type", "application/octet-stream; charset=binary")
                    .header("content-disposition", "attachment; filename=\"trade_77.json\"")
                    .body(payload.clone());
            })
            .await;
        let app = TestApp::new(&server.base_url());

        let (status, headers, body) = send(app.router(), "/api/v1/trade-file?id=77").await;

        mock.assert_async().await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_ref(), payload.as_slice());
        assert_eq!(
            headers[header::CONTENT_TYPE],
            "application/octet-stream; charset=binary"
        );
        assert_eq!(
            headers[header::CONTENT_DISPOSITION],
            "attachment; filename=\"trade_77.json\""
        );
        assert_eq!(headers[header::CONTENT_LENGTH], "7");
    }

    #[tokio::test]
    async fn test_upstream_failure_is_500_with_route_prefix() {
        let app = TestApp::new(UNREACHABLE);

        for (uri, prefix) in [
            ("/api/v1/trade-table?id=1", "Error in fetching trade-table TransportError: "),
            ("/api/v1/trade?name=x", "Error in fetching trade TransportError: "),
            ("/api/v1/trade-file?id=1", "Error in fetching trade-file TransportError: "),
        ] {
            let (status, headers, body) = send(app.router(), uri).await;
            let text = std::str::from_utf8(&body).unwrap();

            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert!(text.starts_with(prefix), "unexpected body: {}", text);
            assert!(headers[header::CONTENT_TYPE]
                .to_str()
                .unwrap()
                .starts_with("text/plain"));
        }
    }
}
