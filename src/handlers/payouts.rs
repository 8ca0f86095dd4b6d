//! Payout HTTP handlers.
//!
//! - POST /api/v1/payouts - Create a withdrawal request (coach)
//! - GET /api/v1/payouts - List requests (coaches see their own)
//! - POST /api/v1/payouts/{id}/decision - Approve or reject (admin)

use crate::{
    db::DbPool,
    error::AppError,
    middleware::auth::AuthContext,
    models::payout::{
        CreatePayoutRequest, PayoutDecisionRequest, PayoutDecisionResponse, PayoutRequest,
        PayoutStatus,
    },
    services::payout,
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use uuid::Uuid;

/// Create a pending payout request for the authenticated coach.
///
/// # Request Body
///
/// ```json
/// {
///   "amount": 50000,
///   "bank_details": "BCA 1234567890 a.n. Coach",
///   "notes": "March commission"
/// }
/// ```
pub async fn create_payout(
    State(pool): State<DbPool>,
    Extension(auth): Extension<AuthContext>,
    Json(request): Json<CreatePayoutRequest>,
) -> Result<Json<PayoutRequest>, AppError> {
    let created = payout::create_payout_request(&pool, &auth, request).await?;
    Ok(Json(created))
}

/// Query parameters for the payout listing.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// "pending", "rejected" or "paid"; omitted = all
    pub status: Option<String>,
}

/// List payout requests, newest first.
pub async fn list_payouts(
    State(pool): State<DbPool>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<PayoutRequest>>, AppError> {
    let status = match query.status.as_deref() {
        Some(s) => Some(
            PayoutStatus::parse(s)
                .ok_or_else(|| AppError::InvalidRequest(format!("Unknown status {s}")))?,
        ),
        None => None,
    };

    let payouts = payout::list_payout_requests(&pool, &auth, status).await?;
    Ok(Json(payouts))
}

/// Decide a pending payout request.
///
/// # Request Body
///
/// ```json
/// { "action": "approve" }
/// ```
///
/// # Responses
///
/// - **200**: `{ "status": "paid", "message": "Payout approved and settled" }`
/// - **404**: no such request
/// - **409**: request already processed (no side effect performed)
pub async fn decide_payout(
    State(pool): State<DbPool>,
    Extension(auth): Extension<AuthContext>,
    Path(payout_id): Path<Uuid>,
    Json(request): Json<PayoutDecisionRequest>,
) -> Result<Json<PayoutDecisionResponse>, AppError> {
    let decision = payout::decide_payout(&pool, &auth, payout_id, request.action).await?;
    Ok(Json(decision))
}
