//! Egov Proxy Server
//!
//! Republishes part of the egov open-data API under `/api/v1` and serves
//! cached trade listings and passports from an embedded SQLite store.

mod error;
mod extractors;
mod handlers;
mod services;
mod settings;
mod storage;
mod upstream;

use anyhow::{Context, Result};
use axum::{routing::get, Router};
use clap::{Parser, Subcommand};
use egov_core::{ListingStore, Passport, PassportStore};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use services::Seeder;
use settings::Settings;
use storage::{ConnectionManager, Database};
use upstream::{EgovClient, DEFAULT_SEED_SPHERE_ID};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub upstream: Arc<EgovClient>,
    pub listings: Arc<dyn ListingStore>,
    pub passports: Arc<dyn PassportStore>,
    pub connections: Arc<ConnectionManager>,
}

impl AppState {
    fn from_settings(settings: &Settings) -> Self {
        let connections = Arc::new(ConnectionManager::new(settings.database_url.clone()));
        let db = Arc::new(Database::new(connections.clone()));

        Self {
            upstream: Arc::new(EgovClient::new(
                settings.egov_base_url.clone(),
                settings.egov_token.clone(),
            )),
            listings: db.clone(),
            passports: db,
            connections,
        }
    }
}

#[derive(Parser)]
#[command(name = "egov-proxy")]
#[command(author, version, about = "Proxy and cache for the egov open-data API", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server (default)
    Serve,

    /// Fill the record store outside of any request
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Fetch one page of a sphere and append it to the listing store
    Listings {
        /// Sphere to pull
        #[arg(long, default_value = DEFAULT_SEED_SPHERE_ID)]
        sphere_id: String,

        #[arg(long, default_value_t = 10)]
        limit: u32,

        #[arg(long, default_value_t = 0)]
        offset: u32,
    },

    /// Append passports read from a JSON array file
    Passports {
        #[arg(short, long)]
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    // Set up panic hook to log crashes
    std::panic::set_hook(Box::new(|info| {
        let location = info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()));
        let payload = if let Some(s) = info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };
        eprintln!("[PANIC] at {:?}: {}", location, payload);
        tracing::error!("PANIC at {:?}: {}", location, payload);
    }));

    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("[FATAL] Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    let outcome = match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => run_server().await,
        Commands::Seed { target } => run_seed(target).await,
    };

    if let Err(e) = outcome {
        error!("egov-proxy failed: {:#}", e);
        std::process::exit(1);
    }
}

async fn run_server() -> Result<()> {
    info!("Starting egov proxy v{}", env!("CARGO_PKG_VERSION"));

    let settings = Settings::from_env().context("Failed to load configuration")?;
    info!(
        "Config loaded: bind={}, upstream={}, db={}",
        settings.bind_address(),
        settings.egov_base_url,
        settings.database_url
    );

    // The store connects lazily on the first request that needs it
    let state = AppState::from_settings(&settings);

    let addr: SocketAddr = settings
        .bind_address()
        .parse()
        .context("Failed to parse bind address")?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app(state))
        .await
        .context("Server error")?;

    Ok(())
}

async fn run_seed(target: SeedTarget) -> Result<()> {
    let settings = Settings::from_env().context("Failed to load configuration")?;
    let state = AppState::from_settings(&settings);
    let seeder = Seeder::new(state.upstream, state.listings, state.passports);

    match target {
        SeedTarget::Listings {
            sphere_id,
            limit,
            offset,
        } => {
            seeder
                .seed_listings(&sphere_id, limit, offset)
                .await
                .context("Failed to seed listings")?;
        }
        SeedTarget::Passports { file } => {
            let records = read_passports(&file).await?;
            seeder
                .seed_passports(&records)
                .await
                .context("Failed to seed passports")?;
        }
    }

    Ok(())
}

async fn read_passports(path: &Path) -> Result<Vec<Passport>> {
    let raw = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_slice(&raw)
        .with_context(|| format!("Failed to parse passports from {}", path.display()))
}

/// Full router: health probe, API routes, CORS and request tracing
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .nest("/api/v1", api_routes())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/trade-table", get(handlers::trades::table))
        .route("/trade-passport", get(handlers::passports::get))
        .route("/trade-list", get(handlers::listings::list))
        .route("/trade", get(handlers::trades::search))
        .route("/trade-file", get(handlers::trades::file))
}
