//! Handler-side extractor for the authenticated member.

use axum::{extract::FromRequestParts, http::StatusCode, http::request::Parts};

use super::context::AuthContext;
use super::types::AuthMember;

/// Extracts the member established by the authentication middleware.
/// Rejects with 401 if the route was reached without one (i.e. the route is
/// not behind the middleware).
pub struct CurrentMember(pub AuthMember);

impl<S> FromRequestParts<S> for CurrentMember
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(_parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        AuthContext::current()
            .map(CurrentMember)
            .ok_or(StatusCode::UNAUTHORIZED)
    }
}
