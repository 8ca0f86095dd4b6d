//! Reporting aggregator - revenue/COGS/OPEX totals and the daily series.
//!
//! A read-only reducer over ledger rows in a date window. Lines are
//! classified by their account code's leading digit (4 revenue, 5 COGS,
//! 6 OPEX) and netted by the section's normal-balance convention: revenue
//! nets `credit - debit`, COGS and OPEX net `debit - credit`.
//!
//! The report is recomputed from scratch on every call. There is no cache
//! or materialization; a single club's ledger is small enough that a full
//! scan per request is fine.

use crate::{
    db::DbPool,
    error::AppError,
    models::{
        account::{CoaIndex, Section},
        journal::JournalTransaction,
        report::{
            BreakdownLine, ChartPoint, FinanceReport, ReportDetails, ReportQuery, ReportSummary,
        },
    },
    services::coa,
};
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};

/// Build the finance report for an optionally date-bounded window.
pub async fn build_finance_report(
    pool: &DbPool,
    query: &ReportQuery,
) -> Result<FinanceReport, AppError> {
    let transactions = sqlx::query_as::<_, JournalTransaction>(
        r#"
        SELECT id, ref_id, entry_date, posted_at, description, category, entries,
               metadata, status, created_by
        FROM finance_ledger
        WHERE ($1::date IS NULL OR entry_date >= $1)
          AND ($2::date IS NULL OR entry_date <= $2)
        ORDER BY entry_date
        "#,
    )
    .bind(query.start_date)
    .bind(query.end_date)
    .fetch_all(pool)
    .await?;

    let coa_index = coa::load_index(pool).await?;

    Ok(aggregate(&transactions, &coa_index))
}

/// Reduce a set of transactions into the report.
///
/// Pure function over in-memory rows so the accounting identities are
/// testable without a database.
pub fn aggregate(transactions: &[JournalTransaction], coa: &CoaIndex) -> FinanceReport {
    let mut revenue_total = 0i64;
    let mut cogs_total = 0i64;
    let mut opex_total = 0i64;

    // code -> net amount, per section
    let mut revenue_by_code: HashMap<String, i64> = HashMap::new();
    let mut cogs_by_code: HashMap<String, i64> = HashMap::new();
    let mut opex_by_code: HashMap<String, i64> = HashMap::new();

    // day -> (revenue, expenses); BTreeMap keeps the series date-ordered
    let mut daily: BTreeMap<NaiveDate, (i64, i64)> = BTreeMap::new();

    for tx in transactions {
        for line in tx.entries.iter() {
            // Classification is by code prefix only; the account's declared
            // type tag plays no part here.
            let (section, net) = match Section::from_code(&line.account_code) {
                Some(Section::Revenue) => (Section::Revenue, line.credit - line.debit),
                Some(Section::Cogs) => (Section::Cogs, line.debit - line.credit),
                Some(Section::Expense) => (Section::Expense, line.debit - line.credit),
                // Asset/liability/equity legs (and malformed codes) do not
                // feed the profit report.
                _ => continue,
            };

            let bucket = daily.entry(tx.entry_date).or_insert((0, 0));
            match section {
                Section::Revenue => {
                    revenue_total += net;
                    *revenue_by_code.entry(line.account_code.clone()).or_insert(0) += net;
                    bucket.0 += net;
                }
                Section::Cogs => {
                    cogs_total += net;
                    *cogs_by_code.entry(line.account_code.clone()).or_insert(0) += net;
                    bucket.1 += net;
                }
                Section::Expense => {
                    opex_total += net;
                    *opex_by_code.entry(line.account_code.clone()).or_insert(0) += net;
                    bucket.1 += net;
                }
                _ => unreachable!(),
            }
        }
    }

    let chart_data = daily
        .into_iter()
        .map(|(date, (revenue, expenses))| ChartPoint {
            date,
            revenue,
            expenses,
            profit: revenue - expenses,
        })
        .collect();

    FinanceReport {
        summary: ReportSummary {
            revenue: revenue_total,
            cogs: cogs_total,
            opex: opex_total,
            net_profit: revenue_total - cogs_total - opex_total,
        },
        chart_data,
        details: ReportDetails {
            revenue: breakdown(revenue_by_code, coa),
            cogs: breakdown(cogs_by_code, coa),
            opex: breakdown(opex_by_code, coa),
        },
    }
}

/// Turn a per-code map into a breakdown list sorted by amount descending.
/// Names come from the precomputed chart index; unresolved codes fall back
/// to displaying the raw code.
fn breakdown(by_code: HashMap<String, i64>, coa: &CoaIndex) -> Vec<BreakdownLine> {
    let mut lines: Vec<BreakdownLine> = by_code
        .into_iter()
        .map(|(code, amount)| BreakdownLine {
            name: coa.name_of(&code).unwrap_or(&code).to_string(),
            code,
            amount,
        })
        .collect();
    // Ties break on code so the ordering is deterministic.
    lines.sort_by(|a, b| b.amount.cmp(&a.amount).then_with(|| a.code.cmp(&b.code)));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::journal::LedgerLine;
    use chrono::Utc;
    use uuid::Uuid;

    fn tx(date: &str, entries: Vec<LedgerLine>) -> JournalTransaction {
        JournalTransaction {
            id: Uuid::new_v4(),
            ref_id: format!("TRX-{}", Uuid::new_v4()),
            entry_date: date.parse().unwrap(),
            posted_at: Utc::now(),
            description: "test".into(),
            category: "REVENUE".into(),
            entries: sqlx::types::Json(entries),
            metadata: None,
            status: "posted".into(),
            created_by: None,
        }
    }

    fn coa() -> CoaIndex {
        CoaIndex::from_catalog()
    }

    #[test]
    fn split_income_aggregates_to_its_total() {
        // 100 split 60/40 across two revenue accounts, cash debit 100.
        let transactions = vec![tx(
            "2026-03-07",
            vec![
                LedgerLine::debit("1-100", 100, "cash"),
                LedgerLine::credit("4-100", 60, "fees"),
                LedgerLine::credit("4-200", 40, "booking"),
            ],
        )];
        let report = aggregate(&transactions, &coa());

        assert_eq!(report.summary.revenue, 100);
        assert_eq!(report.summary.cogs, 0);
        assert_eq!(report.summary.opex, 0);
        assert_eq!(report.summary.net_profit, 100);

        assert_eq!(report.details.revenue.len(), 2);
        let detail_sum: i64 = report.details.revenue.iter().map(|l| l.amount).sum();
        assert_eq!(detail_sum, 100);
        // Sorted by amount descending.
        assert_eq!(report.details.revenue[0].code, "4-100");
        assert_eq!(report.details.revenue[0].name, "Membership Fees");
    }

    #[test]
    fn net_profit_identity_holds() {
        let transactions = vec![
            tx(
                "2026-03-07",
                vec![
                    LedgerLine::debit("1-100", 500, "cash"),
                    LedgerLine::credit("4-300", 500, "jersey sales"),
                ],
            ),
            tx(
                "2026-03-08",
                vec![
                    LedgerLine::credit("1-100", 320, "cash"),
                    LedgerLine::debit("5-100", 200, "jersey cogs"),
                    LedgerLine::debit("6-200", 120, "court"),
                ],
            ),
        ];
        let report = aggregate(&transactions, &coa());

        assert_eq!(
            report.summary.net_profit,
            report.summary.revenue - report.summary.cogs - report.summary.opex
        );
        // Whole ledger in window: daily profits sum to the net profit.
        let chart_profit: i64 = report.chart_data.iter().map(|p| p.profit).sum();
        assert_eq!(chart_profit, report.summary.net_profit);
    }

    #[test]
    fn chart_data_is_ordered_by_date() {
        let transactions = vec![
            tx(
                "2026-03-09",
                vec![
                    LedgerLine::debit("1-100", 10, "cash"),
                    LedgerLine::credit("4-100", 10, "fees"),
                ],
            ),
            tx(
                "2026-03-07",
                vec![
                    LedgerLine::debit("1-100", 20, "cash"),
                    LedgerLine::credit("4-100", 20, "fees"),
                ],
            ),
        ];
        let report = aggregate(&transactions, &coa());
        let dates: Vec<NaiveDate> = report.chart_data.iter().map(|p| p.date).collect();
        assert!(dates.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(report.chart_data[0].revenue, 20);
    }

    #[test]
    fn classification_ignores_the_type_tag() {
        // A line on "4-300" counts as revenue purely by code prefix; the
        // index has no say in classification, only in naming.
        let transactions = vec![tx(
            "2026-03-07",
            vec![
                LedgerLine::debit("1-100", 75, "cash"),
                LedgerLine::credit("4-300", 75, "jerseys"),
            ],
        )];
        let report = aggregate(&transactions, &coa());
        assert_eq!(report.summary.revenue, 75);
        assert!(report.details.cogs.is_empty());
        assert!(report.details.opex.is_empty());
    }

    #[test]
    fn unresolved_codes_fall_back_to_raw_code() {
        // "4-950" is not in the chart; it still aggregates, displayed by
        // its raw code.
        let transactions = vec![tx(
            "2026-03-07",
            vec![
                LedgerLine::debit("1-100", 30, "cash"),
                LedgerLine::credit("4-950", 30, "mystery income"),
            ],
        )];
        let report = aggregate(&transactions, &coa());
        assert_eq!(report.details.revenue[0].name, "4-950");
        assert_eq!(report.details.revenue[0].amount, 30);
    }

    #[test]
    fn refunds_net_against_revenue() {
        // A debit on a revenue account (refund) reduces the section total.
        let transactions = vec![
            tx(
                "2026-03-07",
                vec![
                    LedgerLine::debit("1-100", 100, "cash"),
                    LedgerLine::credit("4-100", 100, "fees"),
                ],
            ),
            tx(
                "2026-03-07",
                vec![
                    LedgerLine::credit("1-100", 25, "cash out"),
                    LedgerLine::debit("4-100", 25, "refund"),
                ],
            ),
        ];
        let report = aggregate(&transactions, &coa());
        assert_eq!(report.summary.revenue, 75);
        assert_eq!(report.details.revenue[0].amount, 75);
    }

    #[test]
    fn payout_settlement_does_not_touch_profit() {
        // Liability/asset legs are outside the 4/5/6 sections.
        let transactions = vec![tx(
            "2026-03-07",
            vec![
                LedgerLine::debit("2-100", 50_000, "settle payable"),
                LedgerLine::credit("1-100", 50_000, "cash out"),
            ],
        )];
        let report = aggregate(&transactions, &coa());
        assert_eq!(report.summary.revenue, 0);
        assert_eq!(report.summary.net_profit, 0);
        assert!(report.chart_data.is_empty());
    }
}
