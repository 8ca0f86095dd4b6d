//! Journal HTTP handlers.
//!
//! - POST /api/v1/journal - Record a manual income/expense entry (admin)
//! - GET /api/v1/journal/{id} - Get a posted transaction

use crate::{
    db::DbPool,
    error::AppError,
    middleware::auth::AuthContext,
    models::journal::{JournalTransaction, ManualEntryRequest, RecordedEntryResponse},
    services::{coa, journal},
};
use axum::{
    Extension, Json,
    extract::{Path, State},
};
use chrono::Utc;
use uuid::Uuid;

/// Record a manual journal entry.
///
/// The body is a closed tagged union (`"kind": "income" | "expense"`); the
/// service builds the balancing cash leg, so whatever reaches the ledger is
/// balanced by construction.
///
/// # Request Body
///
/// ```json
/// {
///   "kind": "income",
///   "ref_id": "TRX-2026-0042",
///   "description": "Saturday session income",
///   "items": [
///     { "account_code": "4-100", "amount": 60 },
///     { "account_code": "4-200", "amount": 40 }
///   ]
/// }
/// ```
///
/// # Response (200)
///
/// ```json
/// { "id": "770e8400-...", "ref_id": "TRX-2026-0042" }
/// ```
///
/// Re-posting an already-recorded ref_id returns the original transaction's
/// id instead of appending a duplicate.
pub async fn record_entry(
    State(pool): State<DbPool>,
    Extension(auth): Extension<AuthContext>,
    Json(request): Json<ManualEntryRequest>,
) -> Result<Json<RecordedEntryResponse>, AppError> {
    auth.require_admin()?;

    let coa_index = coa::load_index(&pool).await?;
    let prepared = journal::prepare_manual_entry(&request, &coa_index)?;

    let (ManualEntryRequest::Income(body) | ManualEntryRequest::Expense(body)) = &request;
    let date = body.date.unwrap_or_else(Utc::now);

    let transaction = journal::record_posting(
        &pool,
        &body.ref_id,
        date,
        &body.description,
        prepared.category,
        prepared.posting,
        prepared.metadata,
        &auth.actor_name,
    )
    .await?;

    Ok(Json(RecordedEntryResponse {
        id: transaction.id,
        ref_id: transaction.ref_id,
    }))
}

/// Get a posted transaction by id.
pub async fn get_transaction(
    State(pool): State<DbPool>,
    Path(transaction_id): Path<Uuid>,
) -> Result<Json<JournalTransaction>, AppError> {
    let transaction = journal::get_transaction_by_id(&pool, transaction_id)
        .await?
        .ok_or(AppError::NotFound("journal transaction"))?;

    Ok(Json(transaction))
}
