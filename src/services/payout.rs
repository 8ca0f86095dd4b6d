//! Payout workflow service - request creation, listing and decisions.
//!
//! # Atomicity
//!
//! Approval mutates two records: the payout request (status flip) and the
//! ledger (settlement posting). Both writes happen inside one PostgreSQL
//! transaction, so they commit together or not at all. The status flip is a
//! conditional UPDATE on `status = 'pending'`, which also gives
//! single-writer-wins semantics when two admins race on the same request.

use crate::{
    db::DbPool,
    error::AppError,
    middleware::auth::AuthContext,
    models::api_key::Role,
    models::payout::{
        CreatePayoutRequest, DecisionAction, PayoutDecisionResponse, PayoutRequest, PayoutStatus,
    },
    services::{coa, journal},
};
use chrono::Utc;
use uuid::Uuid;

const PAYOUT_COLUMNS: &str = "id, coach_id, coach_name, amount, bank_details, notes, status, \
                              requested_at, processed_at, processed_by";

/// Create a pending withdrawal request for the authenticated coach.
pub async fn create_payout_request(
    pool: &DbPool,
    auth: &AuthContext,
    request: CreatePayoutRequest,
) -> Result<PayoutRequest, AppError> {
    auth.require_coach()?;

    if request.amount <= 0 {
        return Err(AppError::InvalidRequest(
            "Payout amount must be positive".to_string(),
        ));
    }
    if request.bank_details.trim().is_empty() {
        return Err(AppError::InvalidRequest(
            "Bank details are required".to_string(),
        ));
    }

    let payout = sqlx::query_as::<_, PayoutRequest>(&format!(
        r#"
        INSERT INTO finance_payouts (coach_id, coach_name, amount, bank_details, notes)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING {PAYOUT_COLUMNS}
        "#
    ))
    .bind(auth.api_key_id)
    .bind(&auth.actor_name)
    .bind(request.amount)
    .bind(&request.bank_details)
    .bind(&request.notes)
    .fetch_one(pool)
    .await?;

    Ok(payout)
}

/// List payout requests, optionally filtered by status.
///
/// Admins see every request; coaches see only their own.
pub async fn list_payout_requests(
    pool: &DbPool,
    auth: &AuthContext,
    status: Option<PayoutStatus>,
) -> Result<Vec<PayoutRequest>, AppError> {
    let coach_filter = match auth.role {
        Role::Admin => None,
        Role::Coach => Some(auth.api_key_id),
    };

    let payouts = sqlx::query_as::<_, PayoutRequest>(&format!(
        r#"
        SELECT {PAYOUT_COLUMNS}
        FROM finance_payouts
        WHERE ($1::text IS NULL OR status = $1)
          AND ($2::uuid IS NULL OR coach_id = $2)
        ORDER BY requested_at DESC
        "#
    ))
    .bind(status.map(|s| s.as_str()))
    .bind(coach_filter)
    .fetch_all(pool)
    .await?;

    Ok(payouts)
}

/// Decide a pending payout request.
///
/// # Process
///
/// 1. Require the admin capability
/// 2. Conditionally flip `pending -> paid|rejected` (stamping
///    processed_at/processed_by) inside a database transaction
/// 3. On approve, post the settlement transaction
///    (`ref_id = "PAYOUT-{id}"`) in the same database transaction
/// 4. Commit both writes, or neither
///
/// # Errors
///
/// - `NotFound`: no request with this id
/// - `AlreadyProcessed`: the request left `pending` earlier (no mutation)
pub async fn decide_payout(
    pool: &DbPool,
    auth: &AuthContext,
    payout_id: Uuid,
    action: DecisionAction,
) -> Result<PayoutDecisionResponse, AppError> {
    auth.require_admin()?;

    let target = action.target_status();
    let coa_index = coa::load_index(pool).await?;

    let mut tx = pool.begin().await?;

    // Conditional flip: only a pending row is touched. Under concurrent
    // decisions exactly one UPDATE matches; the loser sees zero rows.
    let payout = sqlx::query_as::<_, PayoutRequest>(&format!(
        r#"
        UPDATE finance_payouts
        SET status = $1, processed_at = NOW(), processed_by = $2
        WHERE id = $3 AND status = 'pending'
        RETURNING {PAYOUT_COLUMNS}
        "#
    ))
    .bind(target.as_str())
    .bind(&auth.actor_name)
    .bind(payout_id)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(payout) = payout else {
        tx.rollback().await?;
        // Distinguish missing from already-processed for the caller.
        let status: Option<String> =
            sqlx::query_scalar("SELECT status FROM finance_payouts WHERE id = $1")
                .bind(payout_id)
                .fetch_optional(pool)
                .await?;
        return Err(match status {
            Some(status) => AppError::AlreadyProcessed { status },
            None => AppError::NotFound("payout request"),
        });
    };

    if action == DecisionAction::Approve {
        let posting = journal::build_payout_settlement(&payout, &coa_index)?;
        let now = Utc::now();

        // Settlement rides the same transaction as the status flip.
        sqlx::query(
            r#"
            INSERT INTO finance_ledger
                (ref_id, entry_date, posted_at, description, category, entries, status, created_by)
            VALUES ($1, $2, $3, $4, 'LIABILITY', $5, 'posted', $6)
            "#,
        )
        .bind(payout.settlement_ref_id())
        .bind(now.date_naive())
        .bind(now)
        .bind(format!("Payout settlement for {}", payout.coach_name))
        .bind(sqlx::types::Json(posting.into_lines()))
        .bind(&auth.actor_name)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    let message = match action {
        DecisionAction::Approve => "Payout approved and settled".to_string(),
        DecisionAction::Reject => "Payout rejected".to_string(),
    };

    tracing::info!(
        payout_id = %payout_id,
        action = ?action,
        by = %auth.actor_name,
        "payout decided"
    );

    Ok(PayoutDecisionResponse {
        status: target,
        message,
    })
}
