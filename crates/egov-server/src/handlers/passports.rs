//! Trade passport handler

use super::ID_REQUIRED;
use crate::error::ApiError;
use crate::extractors::QueryParams;
use crate::AppState;
use axum::{extract::State, Json};
use egov_core::{Passport, StoreResponse};

const ROUTE: &str = "trade-passport";

/// `GET /trade-passport?id=<tradeId>`
pub async fn get(
    State(state): State<AppState>,
    query: QueryParams,
) -> Result<Json<StoreResponse<Option<Passport>>>, ApiError> {
    let trade_id = query.require("id", ID_REQUIRED).map_err(ApiError::at(ROUTE))?;

    let passport = state
        .passports
        .find_passport_by_trade_id(trade_id)
        .await
        .map_err(ApiError::at(ROUTE))?;

    Ok(Json(StoreResponse::new(passport)))
}

#[cfg(test)]
mod tests {
    use crate::handlers::test_support::{json, send, TestApp};
    use axum::http::StatusCode;
    use egov_core::{Passport, PassportStore};
    use serde_json::json;

    #[tokio::test]
    async fn test_found_passport_is_wrapped() {
        let app = TestApp::new("http://127.0.0.1:1");
        let mut passport = Passport::new("T1");
        passport.telephone = Some("+998 71 000 00 00".to_string());
        app.db.insert_passports(&[passport]).await.unwrap();

        let (status, _, body) = send(app.router(), "/api/v1/trade-passport?id=T1").await;

        assert_eq!(status, StatusCode::OK);
        let data = &json(&body)["result"]["data"];
        assert_eq!(data["tradeId"], "T1");
        assert_eq!(data["telephone"], "+998 71 000 00 00");
    }

    #[tokio::test]
    async fn test_missing_passport_is_null() {
        let app = TestApp::new("http://127.0.0.1:1");
        app.db.insert_passports(&[Passport::new("T1")]).await.unwrap();

        let (status, _, body) = send(app.router(), "/api/v1/trade-passport?id=T2").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json(&body), json!({ "result": { "data": null } }));
    }

    #[tokio::test]
    async fn test_empty_id_is_rejected() {
        let app = TestApp::new("http://127.0.0.1:1");

        let (status, _, body) = send(app.router(), "/api/v1/trade-passport?id=&x=1").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json(&body), json!({ "error": "Query id is required" }));
    }
}
