//! Data models representing database entities and API bodies.
//!
//! This module contains all data structures that map to database tables,
//! plus the request/response types of the HTTP API.

/// Chart of accounts (codes, types, the fixed catalog)
pub mod account;
/// API key authentication model
pub mod api_key;
/// Journal transactions and the validated posting factory
pub mod journal;
/// Payout requests and the approval state machine
pub mod payout;
/// Finance report response types
pub mod report;
