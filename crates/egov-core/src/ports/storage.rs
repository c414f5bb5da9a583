//! Storage traits for the cached record kinds

use crate::Result;
use async_trait::async_trait;
use egov_types::{Listing, Passport};

/// Listing store
#[async_trait]
pub trait ListingStore: Send + Sync {
    /// Appends every record; repeated inserts duplicate rows. Returns the count written.
    async fn insert_listings(&self, records: &[Listing]) -> Result<usize>;
    /// All rows in insertion order.
    async fn find_all_listings(&self) -> Result<Vec<Listing>>;
}

/// Passport store
#[async_trait]
pub trait PassportStore: Send + Sync {
    async fn insert_passports(&self, records: &[Passport]) -> Result<usize>;
    /// First row whose `tradeId` equals `trade_id`.
    async fn find_passport_by_trade_id(&self, trade_id: &str) -> Result<Option<Passport>>;
}
