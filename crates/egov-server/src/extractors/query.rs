//! Query-string extractor with the proxy's presence checks

use crate::error::rejection;
use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::request::Parts,
    response::{IntoResponse, Response},
};
use egov_core::{EgovError, Result};
use std::collections::HashMap;

/// Non-empty set of query parameters.
///
/// Requests without any query parameter are rejected with
/// `404 {"error": "Query Not Found"}` before the handler runs. A bare key
/// such as `?offset` counts as a parameter with an empty value.
#[derive(Debug, Clone)]
pub struct QueryParams(HashMap<String, String>);

impl QueryParams {
    pub fn new(params: HashMap<String, String>) -> Result<Self> {
        if params.is_empty() {
            return Err(EgovError::MissingQuery);
        }
        Ok(Self(params))
    }

    /// Value of a parameter that must be present and non-empty
    pub fn require(&self, key: &str, message: &'static str) -> Result<&str> {
        match self.0.get(key).map(String::as_str) {
            Some(value) if !value.is_empty() => Ok(value),
            _ => Err(EgovError::MissingRequiredField(message)),
        }
    }

    /// Value of an optional parameter, falling back when absent or empty
    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        match self.0.get(key).map(String::as_str) {
            Some(value) if !value.is_empty() => value,
            _ => default,
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for QueryParams
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let Query(params) =
            Query::<HashMap<String, String>>::from_request_parts(parts, state)
                .await
                .map_err(IntoResponse::into_response)?;

        QueryParams::new(params).map_err(|e| rejection(&e))
    }
}
