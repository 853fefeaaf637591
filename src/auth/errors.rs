//! Authentication error types.
//!
//! The internal taxonomy distinguishes why authentication failed; the
//! external response does not. Every credential failure maps to the same 401
//! with the same body, so a caller cannot probe which stage rejected them or
//! whether an account exists.

use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

use super::cookie::clear_refresh_cookie;

/// Internal failure kinds, surfaced only in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorKind {
    /// Neither credential was present or usable.
    MissingCredential,
    /// Refresh token not decodable or signature mismatch.
    MalformedCredential,
    /// Refresh token well-formed but past expiry.
    ExpiredCredential,
    /// Presented refresh token is not the currently stored value
    /// (replayed, superseded, or never issued).
    RefreshMismatch,
    /// Claims name a subject with no corresponding member.
    SubjectNotFound,
    /// Credential store I/O failure.
    StoreError,
}

impl AuthErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingCredential => "missing credential",
            Self::MalformedCredential => "malformed credential",
            Self::ExpiredCredential => "expired credential",
            Self::RefreshMismatch => "refresh token mismatch",
            Self::SubjectNotFound => "subject not found",
            Self::StoreError => "store error",
        }
    }
}

/// Authentication failure carried out of the interceptor.
#[derive(Debug)]
pub struct AuthError {
    pub kind: AuthErrorKind,
    secure_cookies: bool,
}

impl AuthError {
    pub fn new(kind: AuthErrorKind, secure_cookies: bool) -> Self {
        Self {
            kind,
            secure_cookies,
        }
    }

    fn status_code(&self) -> StatusCode {
        match self.kind {
            AuthErrorKind::StoreError => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNAUTHORIZED,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        use axum::Json;
        use axum::http::HeaderValue;
        use serde::Serialize;

        #[derive(Serialize)]
        struct ErrorResponse {
            error: &'static str,
        }

        // Uniform body for all rejection causes.
        let message = match self.kind {
            AuthErrorKind::StoreError => "Internal error",
            _ => "Authentication required",
        };

        let mut response = (
            self.status_code(),
            Json(ErrorResponse { error: message }),
        )
            .into_response();

        // A rejected refresh token is dead either way; clear the cookie so
        // the client stops replaying it.
        if self.status_code() == StatusCode::UNAUTHORIZED {
            let clear = clear_refresh_cookie(self.secure_cookies);
            if let Ok(value) = HeaderValue::from_str(&clear) {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
        }

        response
    }
}
