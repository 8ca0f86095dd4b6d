//! Journal recorder - the only write path into the ledger.
//!
//! Two posting shapes exist in production:
//! - **Split manual entry**: one cash leg against N category legs (income
//!   credits revenue accounts, expense debits COGS/expense accounts), built
//!   here so the transaction balances by construction
//! - **Payout settlement**: exactly two legs, debit the payable-salary
//!   liability and credit cash, built by this module and posted by the
//!   payout service inside its own database transaction
//!
//! # Idempotency
//!
//! `ref_id` is the idempotency key: recording with an already-used ref_id
//! returns the original transaction instead of appending a duplicate.

use crate::{
    db::DbPool,
    error::AppError,
    models::{
        account::{CASH_BANK, CoaIndex, PAYABLE_SALARY_COMMISSION},
        journal::{
            BreakdownItem, JournalCategory, JournalMetadata, JournalTransaction, LedgerLine,
            ManualEntryRequest, Posting,
        },
        payout::PayoutRequest,
    },
};
use chrono::{DateTime, Utc};
use uuid::Uuid;

const LEDGER_COLUMNS: &str =
    "id, ref_id, entry_date, posted_at, description, category, entries, metadata, status, created_by";

/// A validated manual entry, ready to record.
pub struct PreparedEntry {
    pub posting: Posting,
    pub category: JournalCategory,
    pub metadata: JournalMetadata,
}

/// Build the balanced posting for a manual income or expense entry.
///
/// Income: debit cash for the item total, credit each revenue item.
/// Expense: credit cash for the item total, debit each cost item.
///
/// # Errors
///
/// - `InvalidRequest`: no items, or an item with a non-positive amount
/// - errors from `Posting::new` (unknown/HEADER codes)
pub fn prepare_manual_entry(
    request: &ManualEntryRequest,
    coa: &CoaIndex,
) -> Result<PreparedEntry, AppError> {
    let (body, category) = match request {
        ManualEntryRequest::Income(body) => (body, JournalCategory::Revenue),
        ManualEntryRequest::Expense(body) => (body, JournalCategory::Expense),
    };

    if body.items.is_empty() {
        return Err(AppError::InvalidRequest(
            "Manual entry requires at least one item".to_string(),
        ));
    }
    for item in &body.items {
        if item.amount <= 0 {
            return Err(AppError::InvalidRequest(format!(
                "Item amount for {} must be positive",
                item.account_code
            )));
        }
    }

    let total: i64 = body.items.iter().map(|i| i.amount).sum();

    let mut lines = Vec::with_capacity(body.items.len() + 1);
    match category {
        JournalCategory::Revenue => {
            lines.push(LedgerLine::debit(CASH_BANK, total, body.description.clone()));
            for item in &body.items {
                lines.push(LedgerLine::credit(
                    &item.account_code,
                    item.amount,
                    item.description.clone().unwrap_or_else(|| body.description.clone()),
                ));
            }
        }
        _ => {
            lines.push(LedgerLine::credit(CASH_BANK, total, body.description.clone()));
            for item in &body.items {
                lines.push(LedgerLine::debit(
                    &item.account_code,
                    item.amount,
                    item.description.clone().unwrap_or_else(|| body.description.clone()),
                ));
            }
        }
    }

    let posting = Posting::new(lines, coa)?;

    let metadata = JournalMetadata {
        breakdown: Some(
            body.items
                .iter()
                .map(|i| BreakdownItem {
                    account_code: i.account_code.clone(),
                    amount: i.amount,
                    description: i.description.clone(),
                })
                .collect(),
        ),
        proof_image: body.proof_image.clone(),
        notes: body.notes.clone(),
    };

    Ok(PreparedEntry {
        posting,
        category,
        metadata,
    })
}

/// Build the two-leg settlement posting for an approved payout:
/// debit payable salary & commission, credit cash & bank, both for the
/// requested amount.
pub fn build_payout_settlement(
    payout: &PayoutRequest,
    coa: &CoaIndex,
) -> Result<Posting, AppError> {
    let description = format!("Payout settlement for {}", payout.coach_name);
    Posting::new(
        vec![
            LedgerLine::debit(PAYABLE_SALARY_COMMISSION, payout.amount, description.clone()),
            LedgerLine::credit(CASH_BANK, payout.amount, description),
        ],
        coa,
    )
}

/// Record a validated posting as one immutable ledger row.
///
/// # Process
///
/// 1. Check for an existing transaction with the same ref_id
/// 2. Insert the row (entries embedded as JSON, entry_date derived from the
///    effective timestamp)
///
/// Each call yields exactly one ledger record; there is no update-in-place.
pub async fn record_posting(
    pool: &DbPool,
    ref_id: &str,
    date: DateTime<Utc>,
    description: &str,
    category: JournalCategory,
    posting: Posting,
    metadata: JournalMetadata,
    created_by: &str,
) -> Result<JournalTransaction, AppError> {
    // Same ref_id: return the original instead of double-posting.
    if let Some(existing) = find_by_ref_id(pool, ref_id).await? {
        return Ok(existing);
    }

    let metadata = (!metadata.is_empty()).then_some(sqlx::types::Json(metadata));

    let transaction = sqlx::query_as::<_, JournalTransaction>(&format!(
        r#"
        INSERT INTO finance_ledger
            (ref_id, entry_date, posted_at, description, category, entries, metadata, status, created_by)
        VALUES ($1, $2, $3, $4, $5, $6, $7, 'posted', $8)
        RETURNING {LEDGER_COLUMNS}
        "#
    ))
    .bind(ref_id)
    .bind(date.date_naive())
    .bind(date)
    .bind(description)
    .bind(category.as_str())
    .bind(sqlx::types::Json(posting.into_lines()))
    .bind(metadata)
    .bind(created_by)
    .fetch_one(pool)
    .await?;

    Ok(transaction)
}

/// Get a transaction by id.
pub async fn get_transaction_by_id(
    pool: &DbPool,
    transaction_id: Uuid,
) -> Result<Option<JournalTransaction>, AppError> {
    let transaction = sqlx::query_as::<_, JournalTransaction>(&format!(
        "SELECT {LEDGER_COLUMNS} FROM finance_ledger WHERE id = $1"
    ))
    .bind(transaction_id)
    .fetch_optional(pool)
    .await?;

    Ok(transaction)
}

async fn find_by_ref_id(
    pool: &DbPool,
    ref_id: &str,
) -> Result<Option<JournalTransaction>, AppError> {
    let transaction = sqlx::query_as::<_, JournalTransaction>(&format!(
        "SELECT {LEDGER_COLUMNS} FROM finance_ledger WHERE ref_id = $1"
    ))
    .bind(ref_id)
    .fetch_optional(pool)
    .await?;

    Ok(transaction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::journal::{ManualEntryBody, SplitItem};

    fn coa() -> CoaIndex {
        CoaIndex::from_catalog()
    }

    fn income_body(items: Vec<SplitItem>) -> ManualEntryRequest {
        ManualEntryRequest::Income(ManualEntryBody {
            ref_id: "TRX-1".into(),
            date: None,
            description: "Saturday session income".into(),
            items,
            proof_image: None,
            notes: None,
        })
    }

    fn item(code: &str, amount: i64) -> SplitItem {
        SplitItem {
            account_code: code.into(),
            amount,
            description: None,
        }
    }

    #[test]
    fn split_income_balances_by_construction() {
        let request = income_body(vec![item("4-100", 60), item("4-200", 40)]);
        let prepared = prepare_manual_entry(&request, &coa()).expect("valid entry");

        let lines = prepared.posting.lines();
        assert_eq!(lines.len(), 3);
        // One cash debit leg for the total, then the category credits.
        assert_eq!(lines[0].account_code, CASH_BANK);
        assert_eq!(lines[0].debit, 100);
        let debits: i64 = lines.iter().map(|l| l.debit).sum();
        let credits: i64 = lines.iter().map(|l| l.credit).sum();
        assert_eq!(debits, credits);
        assert_eq!(prepared.category, JournalCategory::Revenue);
    }

    #[test]
    fn split_expense_balances_by_construction() {
        let request = ManualEntryRequest::Expense(ManualEntryBody {
            ref_id: "TRX-2".into(),
            date: None,
            description: "Court rental and shuttles".into(),
            items: vec![item("6-200", 70), item("5-200", 30)],
            proof_image: None,
            notes: None,
        });
        let prepared = prepare_manual_entry(&request, &coa()).expect("valid entry");

        let lines = prepared.posting.lines();
        assert_eq!(lines[0].account_code, CASH_BANK);
        assert_eq!(lines[0].credit, 100);
        let debits: i64 = lines.iter().map(|l| l.debit).sum();
        let credits: i64 = lines.iter().map(|l| l.credit).sum();
        assert_eq!(debits, credits);
        assert_eq!(prepared.category, JournalCategory::Expense);
    }

    #[test]
    fn manual_entry_requires_items() {
        let request = income_body(vec![]);
        assert!(matches!(
            prepare_manual_entry(&request, &coa()),
            Err(AppError::InvalidRequest(_))
        ));
    }

    #[test]
    fn manual_entry_rejects_nonpositive_items() {
        let request = income_body(vec![item("4-100", 0)]);
        assert!(prepare_manual_entry(&request, &coa()).is_err());

        let request = income_body(vec![item("4-100", -5)]);
        assert!(prepare_manual_entry(&request, &coa()).is_err());
    }

    #[test]
    fn manual_entry_rejects_unknown_item_code() {
        let request = income_body(vec![item("4-999", 10)]);
        assert!(prepare_manual_entry(&request, &coa()).is_err());
    }

    #[test]
    fn breakdown_mirrors_the_items() {
        let request = income_body(vec![item("4-100", 60), item("4-200", 40)]);
        let prepared = prepare_manual_entry(&request, &coa()).unwrap();
        let breakdown = prepared.metadata.breakdown.expect("breakdown present");
        assert_eq!(breakdown.len(), 2);
        assert_eq!(breakdown[0].account_code, "4-100");
        assert_eq!(breakdown[1].amount, 40);
    }

    #[test]
    fn payout_settlement_has_exactly_two_legs() {
        let payout = PayoutRequest {
            id: Uuid::nil(),
            coach_id: Uuid::nil(),
            coach_name: "Coach Rudi".into(),
            amount: 50_000,
            bank_details: "BCA 123".into(),
            notes: None,
            status: "pending".into(),
            requested_at: Utc::now(),
            processed_at: None,
            processed_by: None,
        };
        let posting = build_payout_settlement(&payout, &coa()).expect("valid settlement");
        let lines = posting.lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].account_code, PAYABLE_SALARY_COMMISSION);
        assert_eq!(lines[0].debit, 50_000);
        assert_eq!(lines[1].account_code, CASH_BANK);
        assert_eq!(lines[1].credit, 50_000);
        assert_eq!(posting.total(), 50_000);
    }
}
