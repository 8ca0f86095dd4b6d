//! Business logic services.
//!
//! Services contain core logic separated from HTTP handlers: posting
//! validation, the payout workflow, and report aggregation. Every operation
//! takes the caller's `AuthContext` explicitly where a capability is
//! required; nothing reads ambient auth state.

pub mod coa;
pub mod journal;
pub mod payout;
pub mod report;
