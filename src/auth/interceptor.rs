//! Per-request authentication middleware.
//!
//! Runs once per inbound request, ahead of every protected handler:
//!
//! 1. Usable access token: identity comes from its claims, no store read,
//!    no response tokens rewritten.
//! 2. Otherwise, usable refresh token whose value matches the stored one:
//!    a fresh access + refresh pair is issued, the stored value rotated,
//!    and both new credentials attached to the response.
//! 3. Otherwise: uniform 401, downstream never invoked.
//!
//! The request context is populated before downstream handling and cleared
//! on every exit path, including mid-flow failures.

use axum::{
    extract::{Request, State},
    http::{HeaderValue, header},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::context::AuthContext;
use super::cookie::{REFRESH_COOKIE_NAME, build_refresh_cookie, get_access_token, get_cookie};
use super::errors::{AuthError, AuthErrorKind};
use super::state::AuthState;
use super::types::AuthMember;
use crate::jwt::TokenStatus;

/// Credentials minted by a successful renewal, to be attached to the
/// response after downstream handling.
struct RenewedTokens {
    access_token: String,
    refresh_cookie: String,
}

pub async fn authenticate(
    State(state): State<AuthState>,
    request: Request,
    next: Next,
) -> Response {
    AuthContext::scope(async move {
        let result = intercept(&state, request, next).await;
        // Hard invariant: the context is emptied whatever happened above.
        AuthContext::clear();

        match result {
            Ok(response) => response,
            Err(error) => {
                tracing::warn!(reason = error.kind.as_str(), "authentication rejected");
                error.into_response()
            }
        }
    })
    .await
}

async fn intercept(
    state: &AuthState,
    request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let reject = |kind| AuthError::new(kind, state.secure_cookies);

    // A usable access token authenticates by itself; expired or malformed
    // ones are treated like absent ones and fall through to the refresh path.
    if let Some(access_token) = get_access_token(request.headers()) {
        if let TokenStatus::Usable(claims) = state.jwt.inspect_access_token(access_token) {
            AuthContext::set(AuthMember {
                email: claims.sub,
                nickname: claims.nickname,
            });
            return Ok(next.run(request).await);
        }
    }

    let refresh_token = get_cookie(request.headers(), REFRESH_COOKIE_NAME)
        .ok_or_else(|| reject(AuthErrorKind::MissingCredential))?
        .to_string();

    let claims = match state.jwt.inspect_refresh_token(&refresh_token) {
        TokenStatus::Usable(claims) => claims,
        TokenStatus::Expired => return Err(reject(AuthErrorKind::ExpiredCredential)),
        TokenStatus::Malformed => return Err(reject(AuthErrorKind::MalformedCredential)),
    };

    // The renewed identity is derived from the refresh token's own subject,
    // never from whatever the (stale) access token claimed.
    let member = state
        .db
        .members()
        .get_by_email(&claims.sub)
        .await
        .map_err(|e| {
            tracing::error!("Failed to look up member: {}", e);
            reject(AuthErrorKind::StoreError)
        })?
        .ok_or_else(|| reject(AuthErrorKind::SubjectNotFound))?;

    let new_access = state
        .jwt
        .issue_access_token(&member.email, &member.nickname)
        .map_err(|e| {
            tracing::error!("Failed to issue access token: {}", e);
            reject(AuthErrorKind::StoreError)
        })?;
    let new_refresh = state.jwt.issue_refresh_token(&member.email).map_err(|e| {
        tracing::error!("Failed to issue refresh token: {}", e);
        reject(AuthErrorKind::StoreError)
    })?;

    // Single-use renewal: swap the stored value only if the presented token
    // is still the current one. A replayed or superseded token loses here.
    let rotated = state
        .db
        .refresh_tokens()
        .rotate(
            &member.email,
            &refresh_token,
            &new_refresh.token,
            new_refresh.issued_at,
            new_refresh.expires_at,
        )
        .await
        .map_err(|e| {
            tracing::error!("Failed to rotate refresh token: {}", e);
            reject(AuthErrorKind::StoreError)
        })?;
    if !rotated {
        return Err(reject(AuthErrorKind::RefreshMismatch));
    }

    tracing::debug!(member = %member.email, "access token renewed from refresh token");

    AuthContext::set(AuthMember {
        email: member.email,
        nickname: member.nickname,
    });

    let renewed = RenewedTokens {
        access_token: new_access.token,
        refresh_cookie: build_refresh_cookie(
            &new_refresh.token,
            new_refresh.duration,
            state.secure_cookies,
        ),
    };

    let mut response = next.run(request).await;
    attach_renewed_tokens(&mut response, &renewed);
    Ok(response)
}

/// Write the renewed credentials onto the outgoing response: the access token
/// on the same header it arrives on, the refresh token as a cookie with the
/// same attributes as login issuance.
fn attach_renewed_tokens(response: &mut Response, renewed: &RenewedTokens) {
    if let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", renewed.access_token)) {
        response.headers_mut().insert(header::AUTHORIZATION, value);
    }
    if let Ok(value) = HeaderValue::from_str(&renewed.refresh_cookie) {
        response.headers_mut().append(header::SET_COOKIE, value);
    }
}
