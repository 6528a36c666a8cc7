use axum::{extract::FromRequestParts, http::request::Parts};

use crate::error::AppError;

/// Header carrying the opaque session token minted by the session issuer.
pub const SESSION_HEADER: &str = "x-session-id";

/// Cart scope. The token is opaque here: issuance, expiry and teardown are
/// the session service's concern.
#[derive(Debug, Clone)]
pub struct SessionId(pub String);

impl<S> FromRequestParts<S> for SessionId
where
    S: Send + Sync,
{
    type Rejection = AppError;
    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(SESSION_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| AppError::BadRequest(format!("Missing {SESSION_HEADER} header")))?;

        Ok(SessionId(value.to_string()))
    }
}
