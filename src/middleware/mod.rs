//! HTTP middleware components.
//!
//! Middleware run before route handlers; the only one here authenticates
//! requests and injects the caller's capability context.

/// API key authentication middleware
pub mod auth;
