//! Session endpoints.
//!
//! - GET `/verify` - 200 iff the request authenticated
//! - POST `/logout` - Revoke the stored refresh token and clear the cookie

use axum::{
    Json,
    extract::State,
    http::{StatusCode, header::SET_COOKIE},
    response::IntoResponse,
};

use super::error::{ApiError, ResultExt};
use crate::auth::{
    AuthState, CurrentMember, REFRESH_COOKIE_NAME, clear_refresh_cookie, get_cookie,
};
use crate::jwt::TokenStatus;

/// Lightweight auth-status probe, mounted behind the interceptor. The
/// middleware has already done the work; reaching the handler with an
/// identity is the answer.
pub async fn verify(CurrentMember(_member): CurrentMember) -> impl IntoResponse {
    StatusCode::OK
}

/// Logout - revoke the member's stored refresh token and clear the cookie.
///
/// Not behind the interceptor: logout must work even when the access token
/// has expired, and it must not trigger a renewal on the way out.
pub async fn logout(
    State(state): State<AuthState>,
    request: axum::extract::Request,
) -> Result<impl IntoResponse, ApiError> {
    let (parts, _body) = request.into_parts();

    if let Some(refresh_token) = get_cookie(&parts.headers, REFRESH_COOKIE_NAME) {
        if let TokenStatus::Usable(claims) = state.jwt.inspect_refresh_token(refresh_token) {
            state
                .db
                .refresh_tokens()
                .clear(&claims.sub)
                .await
                .db_err("Failed to revoke refresh token")?;
        }
    }

    let clear_cookie = clear_refresh_cookie(state.secure_cookies);
    Ok((
        StatusCode::OK,
        [(SET_COOKIE, clear_cookie)],
        Json(serde_json::json!({ "success": true })),
    ))
}
