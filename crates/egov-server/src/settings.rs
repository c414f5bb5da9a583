//! Process configuration, read once from the environment at startup

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{info, warn};

use crate::upstream::DEFAULT_BASE_URL;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/egov.db";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// `PORT`
    pub port: u16,
    /// `BIND_HOST`
    pub bind_host: String,
    /// `EGOV_TOKEN`, partner token forwarded to the search endpoint
    pub egov_token: String,
    /// `EGOV_BASE_URL`
    pub egov_base_url: String,
    /// `DATABASE_URL`
    pub database_url: String,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment...");
        Self::from_environment(::config::Environment::default())
    }

    fn from_environment(env: ::config::Environment) -> Result<Self> {
        let settings: Settings = ::config::Config::builder()
            .set_default("port", i64::from(DEFAULT_PORT))?
            .set_default("bind_host", "0.0.0.0")?
            .set_default("egov_token", "")?
            .set_default("egov_base_url", DEFAULT_BASE_URL)?
            .set_default("database_url", DEFAULT_DATABASE_URL)?
            .add_source(env)
            .build()
            .context("Failed to read environment")?
            .try_deserialize()
            .context("Invalid configuration")?;

        if settings.egov_token.is_empty() {
            warn!("EGOV_TOKEN not set, partner search requests will be rejected upstream");
        }

        Ok(settings)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.bind_host, self.port)
    }
}
