//! JSON envelopes returned by the proxy

use serde::{Deserialize, Serialize};

/// `{"result": {"data": ...}}`, the wrapper around store-backed reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreResponse<T> {
    pub result: StoreData<T>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreData<T> {
    pub data: T,
}

impl<T> StoreResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            result: StoreData { data },
        }
    }

    pub fn into_data(self) -> T {
        self.result.data
    }
}

/// `{"error": "..."}`, the body of rejected queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
