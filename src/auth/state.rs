//! Shared state for the authentication layer.

use std::sync::Arc;

use crate::db::Database;
use crate::jwt::JwtConfig;

/// Everything the interceptor needs: the signing config (read-only,
/// process-wide), the credential store, and cookie policy.
#[derive(Clone)]
pub struct AuthState {
    pub db: Database,
    pub jwt: Arc<JwtConfig>,
    pub secure_cookies: bool,
}
