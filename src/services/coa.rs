//! Chart-of-accounts service - seeding, lookup and section listing.
//!
//! The chart is a fixed catalog embedded in the binary. Seeding is a
//! merge-upsert keyed by account code, so bootstrap is repeatable: running
//! the seed twice leaves exactly one row per code, and operator-edited
//! descriptions survive a re-seed.

use crate::{
    db::DbPool,
    error::AppError,
    models::account::{Account, AccountType, CHART_OF_ACCOUNTS, CoaIndex, Section},
};

/// Idempotently upsert the fixed account catalog.
///
/// Returns the number of catalog entries written. Existing rows are merged:
/// name/type/balance/cash-out flags follow the catalog, a stored description
/// is kept unless the catalog provides one.
pub async fn seed_chart_of_accounts(pool: &DbPool) -> Result<u64, AppError> {
    let mut count = 0u64;

    for def in CHART_OF_ACCOUNTS {
        sqlx::query(
            r#"
            INSERT INTO finance_coa (code, name, account_type, normal_balance, description, is_cash_out)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (code) DO UPDATE SET
                name = EXCLUDED.name,
                account_type = EXCLUDED.account_type,
                normal_balance = EXCLUDED.normal_balance,
                description = COALESCE(EXCLUDED.description, finance_coa.description),
                is_cash_out = EXCLUDED.is_cash_out,
                updated_at = NOW()
            "#,
        )
        .bind(def.code)
        .bind(def.name)
        .bind(def.account_type.as_str())
        .bind(def.normal_balance.as_str())
        .bind(def.description)
        .bind(def.is_cash_out)
        .execute(pool)
        .await?;

        count += 1;
    }

    Ok(count)
}

/// Look up a single account by code.
pub async fn lookup(pool: &DbPool, code: &str) -> Result<Account, AppError> {
    sqlx::query_as::<_, Account>(
        r#"
        SELECT code, name, account_type, normal_balance, description, is_cash_out,
               created_at, updated_at
        FROM finance_coa
        WHERE code = $1
        "#,
    )
    .bind(code)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound("account"))
}

/// List the chart, optionally restricted to one section.
///
/// With a section filter, returns that section's leaf accounts plus the
/// HEADER rows whose leading digit matches the section (headers belong to a
/// section by code prefix, regardless of their own type tag).
pub async fn list_accounts(
    pool: &DbPool,
    section: Option<Section>,
) -> Result<Vec<Account>, AppError> {
    let accounts = fetch_all(pool).await?;

    Ok(match section {
        Some(section) => filter_section(accounts, section),
        None => accounts,
    })
}

/// Build the in-memory index (code -> name / postability) from the seeded
/// rows. One query; consumers do map lookups afterwards.
pub async fn load_index(pool: &DbPool) -> Result<CoaIndex, AppError> {
    let accounts = fetch_all(pool).await?;
    Ok(CoaIndex::from_rows(&accounts))
}

async fn fetch_all(pool: &DbPool) -> Result<Vec<Account>, AppError> {
    Ok(sqlx::query_as::<_, Account>(
        r#"
        SELECT code, name, account_type, normal_balance, description, is_cash_out,
               created_at, updated_at
        FROM finance_coa
        ORDER BY code
        "#,
    )
    .fetch_all(pool)
    .await?)
}

/// Section filter: leaf accounts of the section's type, plus headers whose
/// code prefix matches.
fn filter_section(accounts: Vec<Account>, section: Section) -> Vec<Account> {
    accounts
        .into_iter()
        .filter(|a| match a.parsed_type() {
            Some(AccountType::Header) => Section::from_code(&a.code) == Some(section),
            Some(t) => t == section.leaf_type(),
            None => false,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::account::{CHART_OF_ACCOUNTS, NormalBalance};
    use chrono::Utc;

    fn catalog_rows() -> Vec<Account> {
        CHART_OF_ACCOUNTS
            .iter()
            .map(|def| Account {
                code: def.code.to_string(),
                name: def.name.to_string(),
                account_type: def.account_type.as_str().to_string(),
                normal_balance: def.normal_balance.as_str().to_string(),
                description: def.description.map(str::to_string),
                is_cash_out: def.is_cash_out,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            })
            .collect()
    }

    #[test]
    fn expense_section_includes_its_header() {
        let filtered = filter_section(catalog_rows(), Section::Expense);
        let codes: Vec<&str> = filtered.iter().map(|a| a.code.as_str()).collect();
        assert!(codes.contains(&"6-000"));
        assert!(codes.contains(&"6-100"));
        assert!(!codes.contains(&"5-100"));
        assert!(!codes.contains(&"4-000"));
    }

    #[test]
    fn header_belongs_to_exactly_one_section() {
        // "6-000" must never show up outside the expense section.
        for section in [
            Section::Asset,
            Section::Liability,
            Section::Equity,
            Section::Revenue,
            Section::Cogs,
        ] {
            let filtered = filter_section(catalog_rows(), section);
            assert!(
                filtered.iter().all(|a| a.code != "6-000"),
                "6-000 leaked into {:?}",
                section
            );
        }
    }

    #[test]
    fn header_section_follows_code_not_type_tag() {
        // A header mis-tagged as EXPENSE still belongs to the section its
        // leading digit names.
        let mut rows = catalog_rows();
        rows.push(Account {
            code: "4-900".into(),
            name: "Oddly tagged header".into(),
            account_type: "HEADER".into(),
            normal_balance: NormalBalance::Debit.as_str().into(),
            description: None,
            is_cash_out: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        });
        let revenue = filter_section(rows.clone(), Section::Revenue);
        assert!(revenue.iter().any(|a| a.code == "4-900"));
        let expense = filter_section(rows, Section::Expense);
        assert!(expense.iter().all(|a| a.code != "4-900"));
    }
}
