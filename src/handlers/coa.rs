//! Chart-of-accounts HTTP handlers.
//!
//! - POST /api/v1/coa/seed - Idempotently seed the fixed catalog (admin)
//! - GET /api/v1/coa - List accounts, optionally by section
//! - GET /api/v1/coa/{code} - Get one account

use crate::{
    db::DbPool,
    error::AppError,
    middleware::auth::AuthContext,
    models::account::{Account, Section},
    services::coa,
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};

/// Response for the seed operation.
#[derive(Debug, Serialize)]
pub struct SeedResponse {
    /// Number of catalog entries upserted
    pub count: u64,
}

/// Seed the chart of accounts.
///
/// Safe to call repeatedly: the upsert merges, duplicate codes never error.
///
/// # Response (200)
///
/// ```json
/// { "count": 21 }
/// ```
pub async fn seed(
    State(pool): State<DbPool>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<SeedResponse>, AppError> {
    auth.require_admin()?;

    let count = coa::seed_chart_of_accounts(&pool).await?;
    tracing::info!(count, by = %auth.actor_name, "chart of accounts seeded");

    Ok(Json(SeedResponse { count }))
}

/// Query parameters for the account listing.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Section name ("ASSET", "LIABILITY", "EQUITY", "REVENUE", "COGS",
    /// "EXPENSE"); omitted = whole chart
    pub section: Option<String>,
}

/// List accounts, optionally restricted to one section.
///
/// A section listing contains the section's leaf accounts plus the HEADER
/// rows whose code prefix matches.
pub async fn list_accounts(
    State(pool): State<DbPool>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Account>>, AppError> {
    let section = match query.section.as_deref() {
        Some(name) => Some(
            Section::parse(name)
                .ok_or_else(|| AppError::InvalidRequest(format!("Unknown section {name}")))?,
        ),
        None => None,
    };

    let accounts = coa::list_accounts(&pool, section).await?;
    Ok(Json(accounts))
}

/// Get a single account by code.
pub async fn get_account(
    State(pool): State<DbPool>,
    Path(code): Path<String>,
) -> Result<Json<Account>, AppError> {
    let account = coa::lookup(&pool, &code).await?;
    Ok(Json(account))
}
