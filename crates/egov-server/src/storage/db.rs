//! SQLite record store for listings and passports

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use egov_core::{
    EgovError, Listing, ListingStore, LocaleText, Passport, PassportStore, Result,
};
use sqlx::{QueryBuilder, Sqlite};
use std::sync::Arc;
use tracing::debug;

use super::connection::{store_unavailable, ConnectionManager};

/// Rows per multi-row INSERT, well below SQLite's bound-parameter limit
const INSERT_CHUNK: usize = 50;

pub struct Database {
    connections: Arc<ConnectionManager>,
}

impl Database {
    pub fn new(connections: Arc<ConnectionManager>) -> Self {
        Self { connections }
    }
}

#[async_trait]
impl ListingStore for Database {
    async fn insert_listings(&self, records: &[Listing]) -> Result<usize> {
        if records.is_empty() {
            return Ok(0);
        }
        let pool = self.connections.ensure_connected().await?;

        let rows = records
            .iter()
            .map(NewListingRow::try_from)
            .collect::<Result<Vec<_>>>()?;

        for chunk in rows.chunks(INSERT_CHUNK) {
            let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(
                "INSERT INTO trade_list (struct_id, data_name, org_name, sphere_name, name, \
                 full_count, user_org_id, sphere_id, late_day, is_ai, is_graph, is_aral, \
                 has_ai, geo_type, rating, update_date, last_update) ",
            );
            builder.push_values(chunk, |mut b, row| {
                b.push_bind(row.struct_id.clone())
                    .push_bind(row.data_name.clone())
                    .push_bind(row.org_name.clone())
                    .push_bind(row.sphere_name.clone())
                    .push_bind(row.name.clone())
                    .push_bind(row.full_count)
                    .push_bind(row.user_org_id)
                    .push_bind(row.sphere_id.clone())
                    .push_bind(row.late_day)
                    .push_bind(row.is_ai)
                    .push_bind(row.is_graph)
                    .push_bind(row.is_aral)
                    .push_bind(row.has_ai)
                    .push_bind(row.geo_type.clone())
                    .push_bind(row.rating)
                    .push_bind(row.update_date)
                    .push_bind(row.last_update);
            });
            builder
                .build()
                .execute(&pool)
                .await
                .map_err(store_unavailable)?;
        }

        debug!("Inserted {} listings", rows.len());
        Ok(rows.len())
    }

    async fn find_all_listings(&self) -> Result<Vec<Listing>> {
        let pool = self.connections.ensure_connected().await?;

        let rows: Vec<ListingRow> = sqlx::query_as(
            r#"
            SELECT row_id, struct_id, data_name, org_name, sphere_name, name,
                   full_count, user_org_id, sphere_id, late_day, is_ai, is_graph,
                   is_aral, has_ai, geo_type, rating, update_date, last_update
            FROM trade_list
            ORDER BY row_id
            "#,
        )
        .fetch_all(&pool)
        .await
        .map_err(store_unavailable)?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }
}

#[async_trait]
impl PassportStore for Database {
    async fn insert_passports(&self, records: &[Passport]) -> Result<usize> {
        if records.is_empty() {
            return Ok(0);
        }
        let pool = self.connections.ensure_connected().await?;

        let org_names = records
            .iter()
            .map(|p| encode_locale(p.org_name.as_ref()))
            .collect::<Result<Vec<_>>>()?;

        for (chunk, org_chunk) in records
            .chunks(INSERT_CHUNK)
            .zip(org_names.chunks(INSERT_CHUNK))
        {
            let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(
                "INSERT INTO trade_passport (trade_id, full_name, telephone, ogr_email, \
                 link_web, create_date, update_date, name, org_name) ",
            );
            builder.push_values(chunk.iter().zip(org_chunk), |mut b, (p, org_name)| {
                b.push_bind(p.trade_id.clone())
                    .push_bind(p.full_name.clone())
                    .push_bind(p.telephone.clone())
                    .push_bind(p.ogr_email.clone())
                    .push_bind(p.link_web.clone())
                    .push_bind(p.create_date.clone())
                    .push_bind(p.update_date.clone())
                    .push_bind(p.name.clone())
                    .push_bind(org_name.clone());
            });
            builder
                .build()
                .execute(&pool)
                .await
                .map_err(store_unavailable)?;
        }

        debug!("Inserted {} passports", records.len());
        Ok(records.len())
    }

    async fn find_passport_by_trade_id(&self, trade_id: &str) -> Result<Option<Passport>> {
        let pool = self.connections.ensure_connected().await?;

        let row: Option<PassportRow> = sqlx::query_as(
            r#"
            SELECT row_id, trade_id, full_name, telephone, ogr_email, link_web,
                   create_date, update_date, name, org_name
            FROM trade_passport
            WHERE trade_id = ?1
            ORDER BY row_id
            LIMIT 1
            "#,
        )
        .bind(trade_id)
        .fetch_optional(&pool)
        .await
        .map_err(store_unavailable)?;

        Ok(row.map(|r| r.into()))
    }
}

fn encode_locale(text: Option<&LocaleText>) -> Result<Option<String>> {
    text.map(serde_json::to_string)
        .transpose()
        .map_err(EgovError::from)
}

fn decode_locale(raw: Option<String>) -> Option<LocaleText> {
    raw.and_then(|s| serde_json::from_str(&s).ok())
}

/// Listing with its JSON columns already encoded
struct NewListingRow {
    struct_id: Option<String>,
    data_name: Option<String>,
    org_name: Option<String>,
    sphere_name: Option<String>,
    name: Option<String>,
    full_count: Option<f64>,
    user_org_id: Option<f64>,
    sphere_id: Option<String>,
    late_day: Option<f64>,
    is_ai: Option<bool>,
    is_graph: Option<bool>,
    is_aral: Option<bool>,
    has_ai: Option<bool>,
    geo_type: String,
    rating: Option<f64>,
    update_date: Option<DateTime<Utc>>,
    last_update: Option<DateTime<Utc>>,
}

impl TryFrom<&Listing> for NewListingRow {
    type Error = EgovError;

    fn try_from(l: &Listing) -> Result<Self> {
        Ok(Self {
            struct_id: l.struct_id.clone(),
            data_name: encode_locale(l.data_name.as_ref())?,
            org_name: encode_locale(l.org_name.as_ref())?,
            sphere_name: encode_locale(l.sphere_name.as_ref())?,
            name: l.name.clone(),
            full_count: l.full_count,
            user_org_id: l.user_org_id,
            sphere_id: l.sphere_id.clone(),
            late_day: l.late_day,
            is_ai: l.is_ai,
            is_graph: l.is_graph,
            is_aral: l.is_aral,
            has_ai: l.has_ai,
            geo_type: serde_json::to_string(&l.geo_type)?,
            rating: l.rating,
            update_date: l.update_date,
            last_update: l.last_update,
        })
    }
}

// Helper structs for sqlx query_as
#[derive(sqlx::FromRow)]
struct ListingRow {
    row_id: i64,
    struct_id: Option<String>,
    data_name: Option<String>,
    org_name: Option<String>,
    sphere_name: Option<String>,
    name: Option<String>,
    full_count: Option<f64>,
    user_org_id: Option<f64>,
    sphere_id: Option<String>,
    late_day: Option<f64>,
    is_ai: Option<bool>,
    is_graph: Option<bool>,
    is_aral: Option<bool>,
    has_ai: Option<bool>,
    geo_type: String,
    rating: Option<f64>,
    update_date: Option<DateTime<Utc>>,
    last_update: Option<DateTime<Utc>>,
}

impl From<ListingRow> for Listing {
    fn from(r: ListingRow) -> Self {
        Listing {
            id: Some(r.row_id),
            struct_id: r.struct_id,
            data_name: decode_locale(r.data_name),
            org_name: decode_locale(r.org_name),
            sphere_name: decode_locale(r.sphere_name),
            name: r.name,
            full_count: r.full_count,
            user_org_id: r.user_org_id,
            sphere_id: r.sphere_id,
            late_day: r.late_day,
            is_ai: r.is_ai,
            is_graph: r.is_graph,
            is_aral: r.is_aral,
            has_ai: r.has_ai,
            geo_type: serde_json::from_str(&r.geo_type).unwrap_or_default(),
            rating: r.rating,
            update_date: r.update_date,
            last_update: r.last_update,
        }
    }
}

#[derive(sqlx::FromRow)]
struct PassportRow {
    row_id: i64,
    trade_id: Option<String>,
    full_name: Option<String>,
    telephone: Option<String>,
    ogr_email: Option<String>,
    link_web: Option<String>,
    create_date: Option<String>,
    update_date: Option<String>,
    name: Option<String>,
    org_name: Option<String>,
}

impl From<PassportRow> for Passport {
    fn from(r: PassportRow) -> Self {
        Passport {
            id: Some(r.row_id),
            trade_id: r.trade_id,
            full_name: r.full_name,
            telephone: r.telephone,
            ogr_email: r.ogr_email,
            link_web: r.link_web,
            create_date: r.create_date,
            update_date: r.update_date,
            name: r.name,
            org_name: decode_locale(r.org_name),
        }
    }
}
