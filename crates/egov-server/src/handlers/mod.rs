//! HTTP handlers

pub mod health;
pub mod listings;
pub mod passports;
pub mod trades;

#[cfg(test)]
pub(crate) mod test_support;

pub use health::health;

const ID_REQUIRED: &str = "Query id is required";
const NAME_REQUIRED: &str = "Query Name is required";
