//! Payout request models and the approval workflow state machine.
//!
//! A coach requests a withdrawal; an admin later approves or rejects it.
//! Approval settles the liability through the journal (one debit to the
//! payable account, one credit to cash) and marks the request paid in the
//! same database transaction.
//!
//! # States
//!
//! ```text
//! pending --approve--> paid      (posts one settlement transaction)
//! pending --reject---> rejected  (no ledger effect)
//! ```
//!
//! `paid` and `rejected` are terminal; a decision on a non-pending request
//! fails with a conflict and performs no side effect.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Workflow state of a payout request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayoutStatus {
    Pending,
    Rejected,
    Paid,
}

impl PayoutStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Rejected => "rejected",
            Self::Paid => "paid",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "rejected" => Some(Self::Rejected),
            "paid" => Some(Self::Paid),
            _ => None,
        }
    }

    /// Only pending requests accept a decision.
    pub fn is_decidable(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

impl std::fmt::Display for PayoutStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Admin decision on a pending payout request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DecisionAction {
    Approve,
    Reject,
}

impl DecisionAction {
    /// The terminal state this action transitions a pending request into.
    ///
    /// Approval goes straight to `paid`: settlement is posted atomically
    /// with the status flip, so no intermediate "approved" state is stored.
    pub fn target_status(&self) -> PayoutStatus {
        match self {
            Self::Approve => PayoutStatus::Paid,
            Self::Reject => PayoutStatus::Rejected,
        }
    }
}

/// Represents a payout request record from the database.
///
/// # Database Table
///
/// Maps to `finance_payouts`. Once a request leaves `pending` the row is
/// immutable (the status never reverts).
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct PayoutRequest {
    pub id: Uuid,

    /// API key id of the requesting coach
    pub coach_id: Uuid,

    pub coach_name: String,

    /// Requested amount in minor currency units (positive, checked by the
    /// database)
    pub amount: i64,

    /// Free-form transfer destination (bank name / account number)
    pub bank_details: String,

    pub notes: Option<String>,

    /// "pending", "rejected" or "paid"
    pub status: String,

    pub requested_at: DateTime<Utc>,

    /// Stamped when the request is decided
    pub processed_at: Option<DateTime<Utc>>,

    /// Actor name of the deciding admin
    pub processed_by: Option<String>,
}

impl PayoutRequest {
    /// Parsed status; `None` if the stored string is unrecognized.
    pub fn parsed_status(&self) -> Option<PayoutStatus> {
        PayoutStatus::parse(&self.status)
    }

    /// Correlation id of the settlement transaction this request owns once
    /// approved (`"PAYOUT-{id}"` convention, a soft reference).
    pub fn settlement_ref_id(&self) -> String {
        format!("PAYOUT-{}", self.id)
    }
}

/// Request body for a coach withdrawal request.
///
/// # JSON Example
///
/// ```json
/// {
///   "amount": 50000,
///   "bank_details": "BCA 1234567890 a.n. Coach",
///   "notes": "March commission"
/// }
/// ```
#[derive(Debug, Deserialize)]
pub struct CreatePayoutRequest {
    pub amount: i64,
    pub bank_details: String,
    pub notes: Option<String>,
}

/// Request body for an admin decision.
#[derive(Debug, Deserialize)]
pub struct PayoutDecisionRequest {
    pub action: DecisionAction,
}

/// Response to a payout decision.
#[derive(Debug, Serialize)]
pub struct PayoutDecisionResponse {
    pub status: PayoutStatus,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_pending_is_decidable() {
        assert!(PayoutStatus::Pending.is_decidable());
        assert!(!PayoutStatus::Rejected.is_decidable());
        assert!(!PayoutStatus::Paid.is_decidable());
    }

    #[test]
    fn actions_map_to_terminal_states() {
        assert_eq!(DecisionAction::Approve.target_status(), PayoutStatus::Paid);
        assert_eq!(DecisionAction::Reject.target_status(), PayoutStatus::Rejected);
        assert!(!DecisionAction::Approve.target_status().is_decidable());
        assert!(!DecisionAction::Reject.target_status().is_decidable());
    }

    #[test]
    fn status_roundtrips_through_strings() {
        for s in [PayoutStatus::Pending, PayoutStatus::Rejected, PayoutStatus::Paid] {
            assert_eq!(PayoutStatus::parse(s.as_str()), Some(s));
        }
        assert_eq!(PayoutStatus::parse("approved"), None);
    }

    #[test]
    fn settlement_ref_follows_convention() {
        let req = PayoutRequest {
            id: Uuid::nil(),
            coach_id: Uuid::nil(),
            coach_name: "Coach".into(),
            amount: 50_000,
            bank_details: "BCA 123".into(),
            notes: None,
            status: "pending".into(),
            requested_at: Utc::now(),
            processed_at: None,
            processed_by: None,
        };
        assert_eq!(
            req.settlement_ref_id(),
            format!("PAYOUT-{}", Uuid::nil())
        );
    }
}
