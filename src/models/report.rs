//! Finance report response types.
//!
//! The report is a pure reduction over ledger entries in a date window:
//! section totals, a per-day time series, and per-account breakdowns.
//! All amounts are signed nets in minor currency units.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Query parameters for the finance report.
///
/// Both bounds are inclusive and optional; an absent bound leaves that side
/// of the window open.
#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Section totals over the report window.
///
/// Invariant: `net_profit == revenue - cogs - opex`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub revenue: i64,
    pub cogs: i64,
    pub opex: i64,
    pub net_profit: i64,
}

/// One day of the report time series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartPoint {
    /// Calendar day (entry_date of the contributing transactions)
    pub date: NaiveDate,
    pub revenue: i64,
    /// COGS + OPEX for the day
    pub expenses: i64,
    pub profit: i64,
}

/// One account's contribution to a section, for the breakdown lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BreakdownLine {
    pub code: String,
    /// Resolved from the chart of accounts; falls back to the raw code
    pub name: String,
    pub amount: i64,
}

/// Per-section account breakdowns, each sorted by amount descending.
#[derive(Debug, Clone, Serialize)]
pub struct ReportDetails {
    pub revenue: Vec<BreakdownLine>,
    pub cogs: Vec<BreakdownLine>,
    pub opex: Vec<BreakdownLine>,
}

/// Complete finance report for a date window.
#[derive(Debug, Clone, Serialize)]
pub struct FinanceReport {
    pub summary: ReportSummary,
    /// Ordered by date ascending
    pub chart_data: Vec<ChartPoint>,
    pub details: ReportDetails,
}
