//! Storage layer
//!
//! Embedded SQLite stands in for the document store. Each record kind has its
//! own table; the locale groups are kept as JSON text columns.

pub mod connection;
pub mod db;

pub use connection::{ConnectionManager, ConnectionState};
pub use db::Database;
