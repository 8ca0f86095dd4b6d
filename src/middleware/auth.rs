//! API key authentication middleware.
//!
//! Intercepts every protected request to:
//! 1. Extract the API key from the Authorization header
//! 2. Hash it and verify it exists in the database
//! 3. Inject an `AuthContext` (identity + role capability) into the request
//! 4. Reject unauthorized requests with HTTP 401
//!
//! The context is an explicit capability token: handlers pass it into every
//! service call, and services check the role themselves. No core operation
//! reads auth state from anywhere else.

use crate::{
    db::DbPool,
    error::AppError,
    models::api_key::{ApiKey, Role},
};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Authentication context attached to authenticated requests.
///
/// Inserted into the request's extension map; route handlers extract it
/// with `Extension<AuthContext>` and hand it to the services.
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// ID of the authenticated API key (doubles as the actor id; a coach's
    /// payout requests are keyed by it)
    pub api_key_id: Uuid,

    /// Display name of the staff member making the request
    pub actor_name: String,

    /// Capability role granted to this key
    pub role: Role,
}

impl AuthContext {
    /// Require the admin capability.
    pub fn require_admin(&self) -> Result<(), AppError> {
        match self.role {
            Role::Admin => Ok(()),
            _ => Err(AppError::Forbidden),
        }
    }

    /// Require the coach capability (admins do not impersonate coaches).
    pub fn require_coach(&self) -> Result<(), AppError> {
        match self.role {
            Role::Coach => Ok(()),
            _ => Err(AppError::Forbidden),
        }
    }
}

/// API key authentication middleware function.
///
/// # Flow
///
/// 1. Extract `Authorization: Bearer <key>` header
/// 2. Hash `<key>` with SHA-256
/// 3. Look up the hash where `is_active = true`
/// 4. Found: inject `AuthContext`, call next handler
/// 5. Not found: return 401 Unauthorized
pub async fn auth_middleware(
    State(pool): State<DbPool>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or(AppError::InvalidApiKey)?;

    // Expected format: "Bearer <api_key>"
    let api_key = auth_header
        .strip_prefix("Bearer ")
        .ok_or(AppError::InvalidApiKey)?;

    let mut hasher = Sha256::new();
    hasher.update(api_key.as_bytes());
    let key_hash = hex::encode(hasher.finalize());

    let api_key_record = sqlx::query_as::<_, ApiKey>(
        "SELECT id, key_hash, actor_name, role, is_active, created_at
         FROM api_keys
         WHERE key_hash = $1 AND is_active = true",
    )
    .bind(&key_hash)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::InvalidApiKey)?;

    // A key with an unknown role stored in the database authenticates
    // nobody.
    let role = Role::parse(&api_key_record.role).ok_or(AppError::InvalidApiKey)?;

    let auth_context = AuthContext {
        api_key_id: api_key_record.id,
        actor_name: api_key_record.actor_name,
        role,
    };

    request.extensions_mut().insert(auth_context);

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(role: Role) -> AuthContext {
        AuthContext {
            api_key_id: Uuid::nil(),
            actor_name: "Tester".into(),
            role,
        }
    }

    #[test]
    fn admin_capability_is_role_checked() {
        assert!(ctx(Role::Admin).require_admin().is_ok());
        assert!(matches!(
            ctx(Role::Coach).require_admin(),
            Err(AppError::Forbidden)
        ));
    }

    #[test]
    fn coach_capability_is_role_checked() {
        assert!(ctx(Role::Coach).require_coach().is_ok());
        assert!(matches!(
            ctx(Role::Admin).require_coach(),
            Err(AppError::Forbidden)
        ));
    }
}
