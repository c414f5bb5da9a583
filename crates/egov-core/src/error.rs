//! Error types for the egov proxy

use thiserror::Error;

pub type Result<T> = std::result::Result<T, EgovError>;

#[derive(Error, Debug)]
pub enum EgovError {
    /// The request carried no query parameters at all
    #[error("Query Not Found")]
    MissingQuery,

    /// A named parameter is absent or empty; carries the client-facing message
    #[error("{0}")]
    MissingRequiredField(&'static str),

    #[error("TransportError: {0}")]
    Transport(String),

    #[error("StoreUnavailable: {0}")]
    StoreUnavailable(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl EgovError {
    /// Whether the error stems from the client's query rather than a collaborator
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::MissingQuery | Self::MissingRequiredField(_))
    }
}

impl From<serde_json::Error> for EgovError {
    fn from(e: serde_json::Error) -> Self {
        EgovError::Serialization(e.to_string())
    }
}
