//! Egov Core Library
//!
//! Error type and persistence ports shared by the egov proxy.

// Re-export pure types from egov-types
pub use egov_types::*;

pub mod error;
pub mod ports;

pub use error::{EgovError, Result};
pub use ports::{ListingStore, PassportStore};
