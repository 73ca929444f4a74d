//! Letter quotation server
//!
//! Prices fabricated 3D letter signage, keeps each user's saved quotations
//! and exports them as CSV, printable documents or portable JSON.

use axum::{routing::get, Router};
use std::{net::SocketAddr, sync::Arc};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod handlers;
mod middleware;
mod routes;
mod services;

pub use crate::config::Config;

use error::{AppError, AppResult};
use services::{AuthService, QuotationService};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub auth: AuthService,
    pub quotes: QuotationService,
}

impl AppState {
    /// Validate the catalog and seed the credential store
    pub fn new(config: Config) -> AppResult<Self> {
        let catalog = config.catalog.clone().unwrap_or_default();
        catalog.validate()?;
        let auth = AuthService::new(&config.auth)?;

        Ok(Self {
            config: Arc::new(config),
            auth,
            quotes: QuotationService::new(Arc::new(catalog)),
        })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lq_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::load()?;

    tracing::info!("Starting letter quotation server");
    tracing::info!("Environment: {}", config.environment);
    if config.catalog.is_some() {
        tracing::info!("Using catalog from configuration");
    }
    if !config.auth.enabled {
        tracing::warn!("Authentication disabled; all requests act as guest");
    }

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .map_err(|e| AppError::Configuration(format!("Invalid server address: {}", e)))?;

    // Create application state
    let state = AppState::new(config)?;

    // Build application
    let app = create_app(state);

    // Start server
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
        .nest("/api/v1", routes::api_routes(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "3D Letter Quotation API v1.0"
}
