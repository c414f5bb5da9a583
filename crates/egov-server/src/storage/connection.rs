//! Lazily opened SQLite pool shared by every handler

use egov_core::{EgovError, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use tokio::sync::{Mutex, RwLock};
use tracing::{error, info};

/// Observable connection state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

enum Slot {
    Disconnected,
    Connecting,
    Connected(SqlitePool),
}

/// Owns the pool and opens it on first use.
///
/// Concurrent first callers queue on `connect_gate`, so at most one connect
/// attempt is in flight. A failed attempt leaves the manager disconnected and
/// the next call tries again.
pub struct ConnectionManager {
    database_url: String,
    slot: RwLock<Slot>,
    connect_gate: Mutex<()>,
}

impl ConnectionManager {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            slot: RwLock::new(Slot::Disconnected),
            connect_gate: Mutex::new(()),
        }
    }

    pub async fn state(&self) -> ConnectionState {
        match &*self.slot.read().await {
            Slot::Disconnected => ConnectionState::Disconnected,
            Slot::Connecting => ConnectionState::Connecting,
            Slot::Connected(_) => ConnectionState::Connected,
        }
    }

    pub async fn ensure_connected(&self) -> Result<SqlitePool> {
        if let Some(pool) = self.connected_pool().await {
            return Ok(pool);
        }

        let _gate = self.connect_gate.lock().await;

        // Another caller may have finished connecting while we waited
        if let Some(pool) = self.connected_pool().await {
            return Ok(pool);
        }

        *self.slot.write().await = Slot::Connecting;

        match open_pool(&self.database_url).await {
            Ok(pool) => {
                info!("Connected to store at: {}", self.database_url);
                *self.slot.write().await = Slot::Connected(pool.clone());
                Ok(pool)
            }
            Err(e) => {
                error!("Error in connecting to store: {}", e);
                *self.slot.write().await = Slot::Disconnected;
                Err(e)
            }
        }
    }

    async fn connected_pool(&self) -> Option<SqlitePool> {
        match &*self.slot.read().await {
            Slot::Connected(pool) => Some(pool.clone()),
            _ => None,
        }
    }
}

fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

async fn open_pool(database_url: &str) -> Result<SqlitePool> {
    let in_memory = is_in_memory(database_url);

    let mut options = SqliteConnectOptions::from_str(database_url)
        .map_err(store_unavailable)?
        .create_if_missing(true);

    if !in_memory {
        let filename = options.clone().get_filename().to_path_buf();
        if let Some(parent) = filename.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.map_err(|e| {
                    EgovError::StoreUnavailable(format!(
                        "Failed to create database directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }
        options = options.journal_mode(SqliteJournalMode::Wal);
    }

    // An in-memory database lives and dies with its single connection
    let pool_options = if in_memory {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(5)
    };

    let pool = pool_options
        .connect_with(options)
        .await
        .map_err(store_unavailable)?;

    run_migrations(&pool).await?;

    Ok(pool)
}

async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS trade_list (
            row_id INTEGER PRIMARY KEY AUTOINCREMENT,
            struct_id TEXT,
            data_name TEXT,
            org_name TEXT,
            sphere_name TEXT,
            name TEXT,
            full_count REAL,
            user_org_id REAL,
            sphere_id TEXT,
            late_day REAL,
            is_ai BOOLEAN,
            is_graph BOOLEAN,
            is_aral BOOLEAN,
            has_ai BOOLEAN,
            geo_type TEXT NOT NULL DEFAULT '[]',
            rating REAL,
            update_date DATETIME,
            last_update DATETIME
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(store_unavailable)?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS trade_passport (
            row_id INTEGER PRIMARY KEY AUTOINCREMENT,
            trade_id TEXT,
            full_name TEXT,
            telephone TEXT,
            ogr_email TEXT,
            link_web TEXT,
            create_date TEXT,
            update_date TEXT,
            name TEXT,
            org_name TEXT
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(store_unavailable)?;

    Ok(())
}

pub(crate) fn store_unavailable(e: sqlx::Error) -> EgovError {
    EgovError::StoreUnavailable(e.to_string())
}
