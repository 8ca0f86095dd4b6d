//! Chart-of-accounts data models.
//!
//! This module defines:
//! - `AccountType` / `NormalBalance`: standard accounting classifications
//! - `Section`: the report section encoded in an account code's leading digit
//! - `Account`: database entity for one chart-of-accounts row
//! - `CHART_OF_ACCOUNTS`: the fixed catalog seeded at bootstrap
//!
//! # Account Codes
//!
//! Codes are hierarchical `"D-DDD"` strings where the leading digit encodes
//! the section: 1=assets, 2=liabilities, 3=equity, 4=revenue, 5=COGS,
//! 6=operating expenses. `HEADER` rows (codes ending in `-000`) summarize a
//! section and are not postable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Account code of the club's cash & bank account.
///
/// Every manual income/expense entry pairs its category legs against this
/// account, and payout settlements credit it.
pub const CASH_BANK: &str = "1-100";

/// Account code of the salary & commission payable liability.
///
/// Approved coach payouts debit this account (settling the liability).
pub const PAYABLE_SALARY_COMMISSION: &str = "2-100";

/// Account classification following standard accounting categories.
///
/// `Header` is structural: it labels a section of the chart and cannot
/// receive postings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccountType {
    Header,
    Asset,
    Liability,
    Equity,
    Revenue,
    Cogs,
    Expense,
}

impl AccountType {
    /// String representation stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Header => "HEADER",
            Self::Asset => "ASSET",
            Self::Liability => "LIABILITY",
            Self::Equity => "EQUITY",
            Self::Revenue => "REVENUE",
            Self::Cogs => "COGS",
            Self::Expense => "EXPENSE",
        }
    }

    /// Parse the database representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "HEADER" => Some(Self::Header),
            "ASSET" => Some(Self::Asset),
            "LIABILITY" => Some(Self::Liability),
            "EQUITY" => Some(Self::Equity),
            "REVENUE" => Some(Self::Revenue),
            "COGS" => Some(Self::Cogs),
            "EXPENSE" => Some(Self::Expense),
            _ => None,
        }
    }

    /// The side on which accounts of this type naturally increase.
    ///
    /// Assets, COGS and expenses grow by debit; liabilities, equity and
    /// revenue grow by credit. Headers never carry a balance, debit is a
    /// placeholder.
    pub fn default_normal_balance(&self) -> NormalBalance {
        match self {
            Self::Asset | Self::Cogs | Self::Expense | Self::Header => NormalBalance::Debit,
            Self::Liability | Self::Equity | Self::Revenue => NormalBalance::Credit,
        }
    }
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Side of the ledger on which an account's balance normally sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NormalBalance {
    Debit,
    Credit,
}

impl NormalBalance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debit => "DEBIT",
            Self::Credit => "CREDIT",
        }
    }
}

/// Report section derived from an account code's leading digit.
///
/// Classification is purely positional: a code starting with `4` belongs to
/// the revenue section no matter what its `account_type` tag says. This is
/// also how HEADER rows are associated with a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Asset,
    Liability,
    Equity,
    Revenue,
    Cogs,
    Expense,
}

impl Section {
    /// Classify a code by its leading digit. Returns `None` for codes
    /// outside the 1..=6 range (or malformed codes).
    pub fn from_code(code: &str) -> Option<Self> {
        match code.as_bytes().first()? {
            b'1' => Some(Self::Asset),
            b'2' => Some(Self::Liability),
            b'3' => Some(Self::Equity),
            b'4' => Some(Self::Revenue),
            b'5' => Some(Self::Cogs),
            b'6' => Some(Self::Expense),
            _ => None,
        }
    }

    /// The account type whose leaf accounts populate this section.
    pub fn leaf_type(&self) -> AccountType {
        match self {
            Self::Asset => AccountType::Asset,
            Self::Liability => AccountType::Liability,
            Self::Equity => AccountType::Equity,
            Self::Revenue => AccountType::Revenue,
            Self::Cogs => AccountType::Cogs,
            Self::Expense => AccountType::Expense,
        }
    }

    /// Parse a section name as used in query strings ("ASSET", "REVENUE", ...).
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ASSET" => Some(Self::Asset),
            "LIABILITY" => Some(Self::Liability),
            "EQUITY" => Some(Self::Equity),
            "REVENUE" => Some(Self::Revenue),
            "COGS" => Some(Self::Cogs),
            "EXPENSE" => Some(Self::Expense),
            _ => None,
        }
    }
}

/// Represents a chart-of-accounts record from the database.
///
/// # Database Table
///
/// Maps to `finance_coa`, keyed by `code`. Rows are seeded once at setup,
/// rarely mutated, and never deleted while ledger entries reference them.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Account {
    /// Hierarchical "D-DDD" account code (globally unique)
    pub code: String,

    /// Human-readable account name
    pub name: String,

    /// Accounting classification ("HEADER", "ASSET", ..., "EXPENSE")
    pub account_type: String,

    /// "DEBIT" or "CREDIT"
    pub normal_balance: String,

    /// Optional free-form description
    pub description: Option<String>,

    /// Whether this account appears in cash-out pickers (e.g. payroll)
    pub is_cash_out: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Parsed account type; `None` if the stored string is unrecognized.
    pub fn parsed_type(&self) -> Option<AccountType> {
        AccountType::parse(&self.account_type)
    }

    /// Whether postings may reference this account (HEADER rows may not).
    pub fn is_postable(&self) -> bool {
        self.parsed_type() != Some(AccountType::Header)
    }
}

/// In-memory index over the chart of accounts.
///
/// Built once per request batch (from the seeded rows, or from the embedded
/// catalog in tests) so posting validation and report name resolution are
/// map lookups instead of per-line scans.
#[derive(Debug, Clone)]
pub struct CoaIndex {
    accounts: std::collections::HashMap<String, IndexedAccount>,
}

#[derive(Debug, Clone)]
struct IndexedAccount {
    name: String,
    postable: bool,
}

impl CoaIndex {
    /// Index a set of database rows.
    pub fn from_rows(rows: &[Account]) -> Self {
        Self {
            accounts: rows
                .iter()
                .map(|a| {
                    (
                        a.code.clone(),
                        IndexedAccount {
                            name: a.name.clone(),
                            postable: a.is_postable(),
                        },
                    )
                })
                .collect(),
        }
    }

    /// Index the embedded catalog (used by tests and bootstrap paths).
    pub fn from_catalog() -> Self {
        Self {
            accounts: CHART_OF_ACCOUNTS
                .iter()
                .map(|def| {
                    (
                        def.code.to_string(),
                        IndexedAccount {
                            name: def.name.to_string(),
                            postable: def.account_type != AccountType::Header,
                        },
                    )
                })
                .collect(),
        }
    }

    /// Whether the code exists in the chart at all.
    pub fn is_known(&self, code: &str) -> bool {
        self.accounts.contains_key(code)
    }

    /// Whether postings may reference this code (known and not a HEADER).
    pub fn is_postable(&self, code: &str) -> bool {
        self.accounts.get(code).is_some_and(|a| a.postable)
    }

    /// Account name for a code, if known.
    pub fn name_of(&self, code: &str) -> Option<&str> {
        self.accounts.get(code).map(|a| a.name.as_str())
    }
}

/// One entry in the fixed chart-of-accounts catalog.
#[derive(Debug, Clone, Copy)]
pub struct AccountDef {
    pub code: &'static str,
    pub name: &'static str,
    pub account_type: AccountType,
    pub normal_balance: NormalBalance,
    pub description: Option<&'static str>,
    pub is_cash_out: bool,
}

const fn leaf(
    code: &'static str,
    name: &'static str,
    account_type: AccountType,
    normal_balance: NormalBalance,
    is_cash_out: bool,
) -> AccountDef {
    AccountDef {
        code,
        name,
        account_type,
        normal_balance,
        description: None,
        is_cash_out,
    }
}

const fn header(code: &'static str, name: &'static str) -> AccountDef {
    AccountDef {
        code,
        name,
        account_type: AccountType::Header,
        normal_balance: NormalBalance::Debit,
        description: None,
        is_cash_out: false,
    }
}

/// The club's fixed chart of accounts.
///
/// Embedded in the binary so a fresh deployment bootstraps itself with one
/// idempotent seed call.
pub const CHART_OF_ACCOUNTS: &[AccountDef] = &[
    // 1-xxx Assets
    header("1-000", "Assets"),
    leaf("1-100", "Cash & Bank", AccountType::Asset, NormalBalance::Debit, false),
    leaf("1-200", "Accounts Receivable", AccountType::Asset, NormalBalance::Debit, false),
    leaf("1-300", "Jersey Inventory", AccountType::Asset, NormalBalance::Debit, false),
    // 2-xxx Liabilities
    header("2-000", "Liabilities"),
    leaf(
        "2-100",
        "Payable Salary & Commission",
        AccountType::Liability,
        NormalBalance::Credit,
        false,
    ),
    leaf(
        "2-200",
        "Unearned Membership Fees",
        AccountType::Liability,
        NormalBalance::Credit,
        false,
    ),
    // 3-xxx Equity
    header("3-000", "Equity"),
    leaf("3-100", "Retained Earnings", AccountType::Equity, NormalBalance::Credit, false),
    // 4-xxx Revenue
    header("4-000", "Revenue"),
    leaf("4-100", "Membership Fees", AccountType::Revenue, NormalBalance::Credit, false),
    leaf("4-200", "Event & Booking Income", AccountType::Revenue, NormalBalance::Credit, false),
    leaf("4-300", "Jersey Sales", AccountType::Revenue, NormalBalance::Credit, false),
    leaf("4-400", "Sponsorship Income", AccountType::Revenue, NormalBalance::Credit, false),
    // 5-xxx Cost of goods sold
    header("5-000", "Cost of Goods Sold"),
    leaf("5-100", "Jersey Cost of Goods", AccountType::Cogs, NormalBalance::Debit, false),
    leaf("5-200", "Shuttlecock Cost", AccountType::Cogs, NormalBalance::Debit, false),
    // 6-xxx Operating expenses
    header("6-000", "Operating Expenses"),
    leaf(
        "6-100",
        "Coach Salary & Commission",
        AccountType::Expense,
        NormalBalance::Debit,
        true,
    ),
    leaf("6-200", "Court Rental", AccountType::Expense, NormalBalance::Debit, true),
    leaf(
        "6-300",
        "Equipment & Maintenance",
        AccountType::Expense,
        NormalBalance::Debit,
        true,
    ),
    leaf("6-400", "Admin & Miscellaneous", AccountType::Expense, NormalBalance::Debit, true),
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn catalog_codes_are_unique() {
        let mut seen = HashSet::new();
        for def in CHART_OF_ACCOUNTS {
            assert!(seen.insert(def.code), "duplicate code {}", def.code);
        }
    }

    #[test]
    fn catalog_codes_match_their_section() {
        // Leaf rows must sit in the section their type names; headers carry
        // the section's leading digit by convention.
        for def in CHART_OF_ACCOUNTS {
            let section = Section::from_code(def.code).expect("valid leading digit");
            if def.account_type != AccountType::Header {
                assert_eq!(
                    section.leaf_type(),
                    def.account_type,
                    "code {} is tagged {} but sits in section {:?}",
                    def.code,
                    def.account_type,
                    section
                );
            }
        }
    }

    #[test]
    fn section_classification_is_positional() {
        assert_eq!(Section::from_code("4-300"), Some(Section::Revenue));
        assert_eq!(Section::from_code("6-000"), Some(Section::Expense));
        assert_eq!(Section::from_code("5-100"), Some(Section::Cogs));
        assert_eq!(Section::from_code("9-999"), None);
        assert_eq!(Section::from_code(""), None);
    }

    #[test]
    fn normal_balance_defaults_by_type() {
        assert_eq!(AccountType::Asset.default_normal_balance(), NormalBalance::Debit);
        assert_eq!(AccountType::Cogs.default_normal_balance(), NormalBalance::Debit);
        assert_eq!(AccountType::Expense.default_normal_balance(), NormalBalance::Debit);
        assert_eq!(AccountType::Liability.default_normal_balance(), NormalBalance::Credit);
        assert_eq!(AccountType::Revenue.default_normal_balance(), NormalBalance::Credit);
        assert_eq!(AccountType::Equity.default_normal_balance(), NormalBalance::Credit);
    }

    #[test]
    fn catalog_defaults_agree_with_type() {
        for def in CHART_OF_ACCOUNTS {
            if def.account_type != AccountType::Header {
                assert_eq!(def.normal_balance, def.account_type.default_normal_balance());
            }
        }
    }

    #[test]
    fn type_roundtrips_through_strings() {
        for t in [
            AccountType::Header,
            AccountType::Asset,
            AccountType::Liability,
            AccountType::Equity,
            AccountType::Revenue,
            AccountType::Cogs,
            AccountType::Expense,
        ] {
            assert_eq!(AccountType::parse(t.as_str()), Some(t));
        }
    }
}
