//! Finance report HTTP handler.
//!
//! - GET /api/v1/reports/finance?start_date=&end_date= - Build the report

use crate::{
    db::DbPool,
    error::AppError,
    middleware::auth::AuthContext,
    models::report::{FinanceReport, ReportQuery},
    services::report,
};
use axum::{
    Extension, Json,
    extract::{Query, State},
};

/// Build the revenue/COGS/OPEX report for an optional date window.
///
/// Both bounds are inclusive `YYYY-MM-DD` dates; either may be omitted.
///
/// # Response (200)
///
/// ```json
/// {
///   "summary": { "revenue": 100, "cogs": 0, "opex": 0, "net_profit": 100 },
///   "chart_data": [
///     { "date": "2026-03-07", "revenue": 100, "expenses": 0, "profit": 100 }
///   ],
///   "details": {
///     "revenue": [
///       { "code": "4-100", "name": "Membership Fees", "amount": 60 },
///       { "code": "4-200", "name": "Event & Booking Income", "amount": 40 }
///     ],
///     "cogs": [],
///     "opex": []
///   }
/// }
/// ```
pub async fn finance_report(
    State(pool): State<DbPool>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<FinanceReport>, AppError> {
    auth.require_admin()?;

    let report = report::build_finance_report(&pool, &query).await?;
    Ok(Json(report))
}
