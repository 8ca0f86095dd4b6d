//! HTTP request handlers (route handlers).
//!
//! Each handler is an async function that:
//! 1. Receives HTTP request data (JSON body, URL params, etc.)
//! 2. Invokes the relevant service with the caller's capability context
//! 3. Returns HTTP response (JSON, status code)

/// Chart-of-accounts endpoints
pub mod coa;
/// Health check endpoint
pub mod health;
/// Journal recording endpoints
pub mod journal;
/// Payout workflow endpoints
pub mod payouts;
/// Finance report endpoint
pub mod reports;
