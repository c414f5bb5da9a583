//! Ports implemented by the infrastructure layer

pub mod storage;

pub use storage::{ListingStore, PassportStore};
