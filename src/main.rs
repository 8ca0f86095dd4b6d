//! BadminTour Finance Service - Main Application Entry Point
//!
//! REST API for the club's bookkeeping core: the chart of accounts, the
//! append-only double-entry ledger, the coach payout approval workflow, and
//! the revenue/COGS/OPEX report.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Database**: PostgreSQL with sqlx (async queries)
//! - **Authentication**: API key with SHA-256 hashing, role-based capability
//! - **Format**: JSON requests/responses
//!
//! # Startup Flow
//!
//! 1. Load configuration from environment variables
//! 2. Create database connection pool
//! 3. Run database migrations
//! 4. Build HTTP router with routes and middleware
//! 5. Start server on configured port

mod config;
mod db;
mod error;
mod handlers;
mod middleware;
mod models;
mod services;

use tracing_subscriber::EnvFilter;

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging with tracing subscriber. Reads RUST_LOG environment
    // variable (defaults to "info" level)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // Load configuration
    let config = config::Config::from_env()?;
    tracing::info!("Configuration loaded");

    // Create database pool
    let pool = db::create_pool(&config.database_url).await?;
    tracing::info!("Database pool created");

    // Run migrations
    db::run_migrations(&pool).await?;
    tracing::info!("Database migrations complete");

    // Create authenticated routes (API endpoints)
    let authenticated_routes = Router::new()
        // Chart of accounts
        .route("/api/v1/coa/seed", post(handlers::coa::seed))
        .route("/api/v1/coa", get(handlers::coa::list_accounts))
        .route("/api/v1/coa/{code}", get(handlers::coa::get_account))
        // Journal
        .route("/api/v1/journal", post(handlers::journal::record_entry))
        .route(
            "/api/v1/journal/{id}",
            get(handlers::journal::get_transaction),
        )
        // Payout workflow
        .route("/api/v1/payouts", post(handlers::payouts::create_payout))
        .route("/api/v1/payouts", get(handlers::payouts::list_payouts))
        .route(
            "/api/v1/payouts/{id}/decision",
            post(handlers::payouts::decide_payout),
        )
        // Reports
        .route(
            "/api/v1/reports/finance",
            get(handlers::reports::finance_report),
        )
        // Apply authentication middleware to all routes in this group
        .route_layer(axum_middleware::from_fn_with_state(
            pool.clone(),
            middleware::auth::auth_middleware,
        ));

    // Combine authenticated routes with public routes
    let app = Router::new()
        // Public routes (no authentication required)
        .route("/health", get(handlers::health::health_check))
        // Merge authenticated routes
        .merge(authenticated_routes)
        // Add request tracing middleware for observability
        .layer(TraceLayer::new_for_http())
        // Share database pool with all handlers via State extraction
        .with_state(pool);

    // Bind to network address and start server
    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    // Start serving HTTP requests
    axum::serve(listener, app).await?;

    Ok(())
}
