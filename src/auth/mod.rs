//! Dual-token request authentication.
//!
//! Short-lived access tokens (15 min, stateless) ride the Authorization
//! header; a long-lived refresh token (7 days, one active value per member)
//! rides an HttpOnly cookie. When the access token is expired or absent, the
//! middleware transparently renews both tokens from the refresh token and
//! rotates the stored value, so each refresh token renews at most once.

mod context;
mod cookie;
mod errors;
mod extractor;
mod interceptor;
mod session;
mod state;
mod types;

pub use context::AuthContext;
pub use cookie::{
    REFRESH_COOKIE_NAME, build_refresh_cookie, clear_refresh_cookie, get_access_token, get_cookie,
};
pub use errors::{AuthError, AuthErrorKind};
pub use extractor::CurrentMember;
pub use interceptor::authenticate;
pub use session::{SessionError, SessionTokens, establish_session};
pub use state::AuthState;
pub use types::AuthMember;
