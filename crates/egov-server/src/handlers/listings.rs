//! Trade listing handler

use crate::error::ApiError;
use crate::extractors::QueryParams;
use crate::AppState;
use axum::{extract::State, Json};
use egov_core::{Listing, StoreResponse};
use tracing::debug;

const ROUTE: &str = "trade-list";

/// `GET /trade-list?offset=&limit=`
///
/// Returns every cached listing. `offset` and `limit` are accepted but do not
/// page the result.
pub async fn list(
    State(state): State<AppState>,
    query: QueryParams,
) -> Result<Json<StoreResponse<Vec<Listing>>>, ApiError> {
    debug!(
        "Listing trades: offset={}, limit={} (not applied)",
        query.get_or("offset", "0"),
        query.get_or("limit", "10")
    );

    let listings = state
        .listings
        .find_all_listings()
        .await
        .map_err(ApiError::at(ROUTE))?;

    Ok(Json(StoreResponse::new(listings)))
}
