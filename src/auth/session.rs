//! Session issuance: the login-time path that renewal mirrors.
//!
//! Password verification happens before this layer; callers hand us an
//! already-authenticated member and get back the access token header value
//! and the refresh cookie, with the refresh value recorded as the member's
//! single active session.

use super::cookie::build_refresh_cookie;
use super::state::AuthState;
use crate::db::Member;

/// Credentials minted at login.
pub struct SessionTokens {
    /// Raw access token (goes out on the Authorization header)
    pub access_token: String,
    /// Set-Cookie value for the refresh token
    pub refresh_cookie: String,
}

/// Failure to establish a session.
#[derive(Debug)]
pub enum SessionError {
    Jwt(crate::jwt::JwtError),
    Store(sqlx::Error),
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::Jwt(e) => write!(f, "Failed to issue tokens: {}", e),
            SessionError::Store(e) => write!(f, "Failed to record session: {}", e),
        }
    }
}

impl std::error::Error for SessionError {}

/// Issue an access + refresh pair for a member and record the refresh value,
/// superseding any previously active session for this account.
pub async fn establish_session(
    state: &AuthState,
    member: &Member,
) -> Result<SessionTokens, SessionError> {
    let access = state
        .jwt
        .issue_access_token(&member.email, &member.nickname)
        .map_err(SessionError::Jwt)?;
    let refresh = state
        .jwt
        .issue_refresh_token(&member.email)
        .map_err(SessionError::Jwt)?;

    state
        .db
        .refresh_tokens()
        .record(
            &member.email,
            &refresh.token,
            refresh.issued_at,
            refresh.expires_at,
        )
        .await
        .map_err(SessionError::Store)?;

    Ok(SessionTokens {
        access_token: access.token,
        refresh_cookie: build_refresh_cookie(
            &refresh.token,
            refresh.duration,
            state.secure_cookies,
        ),
    })
}
