//! Request identity.
//!
//! The session layer in front of this service authenticates the user and
//! forwards the identity in the `x-user-id` header. Handlers read the
//! resulting [`UserId`] from request extensions.

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;

use super::error::ApiError;
use crate::memorization::UserId;

pub const USER_HEADER: &str = "x-user-id";

/// Reject requests without a usable `x-user-id`, otherwise stash the
/// [`UserId`] for the handler.
pub async fn require_user(mut req: Request, next: Next) -> Result<Response, ApiError> {
    let user = req
        .headers()
        .get(USER_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|raw| UserId::new(raw).ok())
        .ok_or(ApiError::MissingIdentity)?;

    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}
