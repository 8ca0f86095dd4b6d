//! Journal data models and API request/response types.
//!
//! This module defines:
//! - `LedgerLine`: one debit/credit line of a posted transaction
//! - `Posting`: a validated, balanced set of lines (the only way lines reach
//!   the ledger)
//! - `JournalTransaction`: database entity for one posted transaction
//! - `ManualEntryRequest`: the tagged income/expense body accepted by the API
//!
//! # Validation
//!
//! Ledger rows are immutable once posted, so all checking happens up front:
//! `Posting::new` rejects empty entry sets, lines that set both or neither
//! side, negative amounts, unknown or HEADER account codes, and entry sets
//! whose debits and credits do not sum to the same total.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::account::CoaIndex;

/// One debit/credit line of a journal transaction.
///
/// Amounts are in minor currency units (never floats). Exactly one of
/// `debit`/`credit` is nonzero; `Posting::new` enforces this.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerLine {
    pub account_code: String,
    pub debit: i64,
    pub credit: i64,
    pub description: String,
}

impl LedgerLine {
    /// A pure debit line.
    pub fn debit(account_code: impl Into<String>, amount: i64, description: impl Into<String>) -> Self {
        Self {
            account_code: account_code.into(),
            debit: amount,
            credit: 0,
            description: description.into(),
        }
    }

    /// A pure credit line.
    pub fn credit(account_code: impl Into<String>, amount: i64, description: impl Into<String>) -> Self {
        Self {
            account_code: account_code.into(),
            debit: 0,
            credit: amount,
            description: description.into(),
        }
    }
}

/// High-level category of a journal transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum JournalCategory {
    Revenue,
    Expense,
    Liability,
}

impl JournalCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Revenue => "REVENUE",
            Self::Expense => "EXPENSE",
            Self::Liability => "LIABILITY",
        }
    }
}

/// A validated, balanced set of ledger lines ready to be recorded.
///
/// This is the validating factory the journal recorder accepts: there is no
/// other way to construct one, so unbalanced or dangling entry sets cannot
/// reach the ledger.
#[derive(Debug, Clone)]
pub struct Posting {
    lines: Vec<LedgerLine>,
}

impl Posting {
    /// Validate a set of lines against the chart of accounts.
    ///
    /// # Errors
    ///
    /// - `InvalidRequest`: empty set, negative amount, a line setting both
    ///   or neither of debit/credit, or a code that is unknown or a HEADER
    /// - `UnbalancedEntries`: `sum(debit) != sum(credit)`
    pub fn new(lines: Vec<LedgerLine>, coa: &CoaIndex) -> Result<Self, AppError> {
        if lines.is_empty() {
            return Err(AppError::InvalidRequest(
                "Journal entries must not be empty".to_string(),
            ));
        }

        for line in &lines {
            if line.debit < 0 || line.credit < 0 {
                return Err(AppError::InvalidRequest(format!(
                    "Negative amount on account {}",
                    line.account_code
                )));
            }
            if (line.debit == 0) == (line.credit == 0) {
                return Err(AppError::InvalidRequest(format!(
                    "Entry on account {} must set exactly one of debit/credit",
                    line.account_code
                )));
            }
            if !coa.is_known(&line.account_code) {
                return Err(AppError::InvalidRequest(format!(
                    "Unknown account code {}",
                    line.account_code
                )));
            }
            if !coa.is_postable(&line.account_code) {
                return Err(AppError::InvalidRequest(format!(
                    "Account {} is a header and cannot be posted to",
                    line.account_code
                )));
            }
        }

        let debits: i64 = lines.iter().map(|l| l.debit).sum();
        let credits: i64 = lines.iter().map(|l| l.credit).sum();
        if debits != credits {
            return Err(AppError::UnbalancedEntries { debits, credits });
        }

        Ok(Self { lines })
    }

    pub fn lines(&self) -> &[LedgerLine] {
        &self.lines
    }

    /// Total debit side (equals the credit side by construction).
    pub fn total(&self) -> i64 {
        self.lines.iter().map(|l| l.debit).sum()
    }

    pub fn into_lines(self) -> Vec<LedgerLine> {
        self.lines
    }
}

/// Optional metadata attached to a journal transaction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JournalMetadata {
    /// Per-item breakdown of a split entry (mirrors the request items)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<Vec<BreakdownItem>>,

    /// Reference to an uploaded payment proof (stored elsewhere)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proof_image: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl JournalMetadata {
    pub fn is_empty(&self) -> bool {
        self.breakdown.is_none() && self.proof_image.is_none() && self.notes.is_none()
    }
}

/// One item of a split-entry breakdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreakdownItem {
    pub account_code: String,
    pub amount: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Represents a posted journal transaction from the database.
///
/// # Database Table
///
/// Maps to `finance_ledger`. Each row:
/// - Is immutable once inserted (no update or delete path exists)
/// - Embeds its debit/credit lines as a JSON list
/// - Carries a denormalized `entry_date` for the reporter's range scans
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct JournalTransaction {
    /// Unique identifier for this transaction
    pub id: Uuid,

    /// Caller-supplied correlation id; posting the same ref_id twice
    /// returns the original transaction instead of creating a duplicate
    pub ref_id: String,

    /// Date-only projection of `posted_at`, used for range queries
    pub entry_date: NaiveDate,

    /// When the transaction was recorded
    pub posted_at: DateTime<Utc>,

    pub description: String,

    /// High-level category ("REVENUE", "EXPENSE", "LIABILITY")
    pub category: String,

    /// Balanced debit/credit lines
    pub entries: sqlx::types::Json<Vec<LedgerLine>>,

    /// Optional breakdown / proof-image / notes blob
    pub metadata: Option<sqlx::types::Json<JournalMetadata>>,

    /// Always "posted" (reserved for future draft states)
    pub status: String,

    /// Actor who recorded the transaction
    pub created_by: Option<String>,
}

/// One item of a split income/expense entry.
///
/// # JSON Example
///
/// ```json
/// { "account_code": "4-100", "amount": 60, "description": "Membership" }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct SplitItem {
    pub account_code: String,
    pub amount: i64,
    pub description: Option<String>,
}

/// Request to record a manual journal entry.
///
/// A closed tagged union: income splits a single cash receipt across N
/// revenue accounts, expense splits a single cash payment across N
/// COGS/expense accounts. The service builds the balancing cash leg itself,
/// so callers can never submit an unbalanced transaction.
///
/// # JSON Example
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
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ManualEntryRequest {
    Income(ManualEntryBody),
    Expense(ManualEntryBody),
}

/// Common fields of both manual-entry kinds.
#[derive(Debug, Deserialize)]
pub struct ManualEntryBody {
    /// Correlation id, also the idempotency key
    pub ref_id: String,

    /// Effective timestamp; defaults to now
    pub date: Option<DateTime<Utc>>,

    pub description: String,

    /// Category legs; each is paired against the cash account
    pub items: Vec<SplitItem>,

    pub proof_image: Option<String>,

    pub notes: Option<String>,
}

/// Response returned when a journal entry is recorded.
#[derive(Debug, Serialize)]
pub struct RecordedEntryResponse {
    pub id: Uuid,
    pub ref_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coa() -> CoaIndex {
        CoaIndex::from_catalog()
    }

    #[test]
    fn accepts_balanced_lines() {
        let posting = Posting::new(
            vec![
                LedgerLine::debit("1-100", 100, "cash in"),
                LedgerLine::credit("4-100", 60, "fees"),
                LedgerLine::credit("4-200", 40, "booking"),
            ],
            &coa(),
        )
        .expect("balanced posting");
        assert_eq!(posting.total(), 100);
        assert_eq!(posting.lines().len(), 3);
    }

    #[test]
    fn rejects_empty_entry_set() {
        let err = Posting::new(vec![], &coa()).unwrap_err();
        assert!(matches!(err, AppError::InvalidRequest(_)));
    }

    #[test]
    fn rejects_unbalanced_lines() {
        let err = Posting::new(
            vec![
                LedgerLine::debit("1-100", 100, "cash in"),
                LedgerLine::credit("4-100", 90, "fees"),
            ],
            &coa(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            AppError::UnbalancedEntries {
                debits: 100,
                credits: 90
            }
        ));
    }

    #[test]
    fn rejects_unknown_account_code() {
        let err = Posting::new(
            vec![
                LedgerLine::debit("1-100", 10, "cash"),
                LedgerLine::credit("4-999", 10, "nope"),
            ],
            &coa(),
        )
        .unwrap_err();
        assert!(matches!(err, AppError::InvalidRequest(_)));
    }

    #[test]
    fn rejects_header_account() {
        // "4-000" exists but is a HEADER, not a postable leaf.
        let err = Posting::new(
            vec![
                LedgerLine::debit("1-100", 10, "cash"),
                LedgerLine::credit("4-000", 10, "header"),
            ],
            &coa(),
        )
        .unwrap_err();
        assert!(matches!(err, AppError::InvalidRequest(_)));
    }

    #[test]
    fn rejects_two_sided_and_zero_lines() {
        let both = Posting::new(
            vec![LedgerLine {
                account_code: "1-100".into(),
                debit: 5,
                credit: 5,
                description: "both sides".into(),
            }],
            &coa(),
        );
        assert!(both.is_err());

        let neither = Posting::new(
            vec![LedgerLine {
                account_code: "1-100".into(),
                debit: 0,
                credit: 0,
                description: "no sides".into(),
            }],
            &coa(),
        );
        assert!(neither.is_err());
    }

    #[test]
    fn rejects_negative_amounts() {
        let err = Posting::new(
            vec![
                LedgerLine::debit("1-100", -10, "bad"),
                LedgerLine::credit("4-100", -10, "bad"),
            ],
            &coa(),
        )
        .unwrap_err();
        assert!(matches!(err, AppError::InvalidRequest(_)));
    }
}
