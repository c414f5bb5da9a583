//! Conversion of domain errors into HTTP responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use egov_core::{EgovError, ErrorBody};
use tracing::error;

/// A failed request on a named route.
///
/// Query problems answer 404 with `{"error": ...}`; collaborator failures
/// answer 500 with a plain-text `Error in fetching <route> <error>`.
#[derive(Debug)]
pub struct ApiError {
    route: &'static str,
    source: EgovError,
}

impl ApiError {
    pub fn new(route: &'static str, source: EgovError) -> Self {
        Self { route, source }
    }

    /// `map_err` adapter bound to a route
    pub fn at(route: &'static str) -> impl Fn(EgovError) -> Self {
        move |source| Self::new(route, source)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.source.is_client_error() {
            return rejection(&self.source);
        }

        error!("Error in fetching {}: {}", self.route, self.source);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Error in fetching {} {}", self.route, self.source),
        )
            .into_response()
    }
}

/// 404 with the error's message as JSON
pub fn rejection(err: &EgovError) -> Response {
    (StatusCode::NOT_FOUND, Json(ErrorBody::new(err.to_string()))).into_response()
}
