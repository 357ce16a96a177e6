//! CuacaMap - Backend Server
//!
//! Village-level weather forecasts for Indonesia, proxied from BMKG, with
//! hazard early-warning alerts.

use axum::{routing::get, Router};
use shared::alerts::{Clock, SystemClock};
use std::{net::SocketAddr, sync::Arc};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod external;
mod handlers;
mod routes;
mod services;

pub use crate::config::Config;
use external::BmkgClient;
use services::VillageDirectory;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub villages: Arc<VillageDirectory>,
    pub bmkg: BmkgClient,
    pub clock: Arc<dyn Clock>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cuacamap_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::load()?;

    tracing::info!("Starting CuacaMap Server");
    tracing::info!("Environment: {}", config.environment);
    tracing::info!("BMKG endpoint: {}", config.bmkg.base_url);

    let villages = VillageDirectory::load(&config.data.desa_path).await;
    if !villages.is_available() {
        tracing::warn!("Village data unavailable; village endpoints will answer 503");
    }

    let bmkg = BmkgClient::new(&config.bmkg)?;

    // Create application state
    let state = AppState {
        config: Arc::new(config.clone()),
        villages: Arc::new(villages),
        bmkg,
        clock: Arc::new(SystemClock),
    };

    // Build application
    let app = create_app(state);

    // Start server
    let ip: std::net::IpAddr = config.server.host.parse()?;
    let addr = SocketAddr::from((ip, config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes and middleware
fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(handlers::health_check))
        .nest("/api", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "CuacaMap API v2.0 - Prakiraan cuaca desa dari BMKG"
}
