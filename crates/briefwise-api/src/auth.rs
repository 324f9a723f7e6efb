//! Caller identity extraction.
//!
//! Authentication itself is an upstream concern (session/JWT termination at
//! the gateway). This server trusts the `x-user-id` header the gateway sets
//! and rejects requests without one. Ownership checks against that id are
//! mandatory in the handlers — they are what prevent cross-user status
//! leakage.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

use crate::error::ApiError;

/// The authenticated caller, as asserted by the gateway.
#[derive(Debug, Clone, Copy)]
pub struct AuthPrincipal {
    pub user_id: Uuid,
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthPrincipal
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get("x-user-id")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("Missing x-user-id header".to_string()))?;

        let user_id = Uuid::parse_str(header)
            .map_err(|_| ApiError::Unauthorized("Invalid x-user-id header".to_string()))?;

        Ok(AuthPrincipal { user_id })
    }
}
