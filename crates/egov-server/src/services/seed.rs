//! Seed routines that fill the record store outside of any request

use crate::upstream::EgovClient;
use egov_core::{EgovError, Listing, ListingStore, Passport, PassportStore, Result};
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

pub struct Seeder {
    upstream: Arc<EgovClient>,
    listings: Arc<dyn ListingStore>,
    passports: Arc<dyn PassportStore>,
}

impl Seeder {
    pub fn new(
        upstream: Arc<EgovClient>,
        listings: Arc<dyn ListingStore>,
        passports: Arc<dyn PassportStore>,
    ) -> Self {
        Self {
            upstream,
            listings,
            passports,
        }
    }

    /// Pulls one page of a sphere and appends its rows to the listing store.
    ///
    /// A payload without `result` inserts nothing. Running twice duplicates
    /// the rows.
    pub async fn seed_listings(&self, sphere_id: &str, limit: u32, offset: u32) -> Result<usize> {
        info!(
            "Seeding listings: sphere={}, limit={}, offset={}",
            sphere_id, limit, offset
        );

        let payload = self
            .upstream
            .fetch_listing_seed(sphere_id, limit, offset)
            .await?;

        let records = match listing_rows(payload)? {
            Some(records) => records,
            None => {
                warn!("Listing seed payload carries no result, nothing inserted");
                return Ok(0);
            }
        };

        let inserted = self.listings.insert_listings(&records).await?;
        info!("Seeded {} listings", inserted);
        Ok(inserted)
    }

    /// Appends caller-supplied passports
    pub async fn seed_passports(&self, records: &[Passport]) -> Result<usize> {
        let inserted = self.passports.insert_passports(records).await?;
        info!("Seeded {} passports", inserted);
        Ok(inserted)
    }
}

fn listing_rows(payload: Value) -> Result<Option<Vec<Listing>>> {
    let Value::Object(mut root) = payload else {
        return Ok(None);
    };
    let result = match root.remove("result") {
        Some(Value::Null) | None => return Ok(None),
        Some(result) => result,
    };

    match result.get("data") {
        Some(data @ Value::Array(_)) => Ok(Some(serde_json::from_value(data.clone())?)),
        _ => Err(EgovError::Serialization(
            "listing seed payload has no result.data array".to_string(),
        )),
    }
}
