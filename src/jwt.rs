//! JWT credential issuance and verification.
//!
//! Two token kinds: short-lived access tokens (15 minutes, stateless) and
//! long-lived refresh tokens (7 days, tracked server-side). Expiry is checked
//! against the codec's own [`Clock`] rather than the library default, so
//! `exp == now` counts as expired and tests can run on simulated time.

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Token type for distinguishing access vs refresh tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    /// Short-lived access token - stateless, carries display claims
    Access,
    /// Long-lived refresh token - single active value per member
    Refresh,
}

/// Claims for access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject (member email)
    pub sub: String,
    /// Member display name
    pub nickname: String,
    /// Token type
    #[serde(rename = "typ")]
    pub token_type: TokenType,
    /// Issued at (Unix timestamp)
    pub iat: u64,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
}

/// Claims for refresh tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshClaims {
    /// Subject (member email)
    pub sub: String,
    /// Token type
    #[serde(rename = "typ")]
    pub token_type: TokenType,
    /// Issued at (Unix timestamp)
    pub iat: u64,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
}

/// Access token duration: 15 minutes
pub const ACCESS_TOKEN_DURATION_SECS: u64 = 15 * 60;

/// Refresh token duration: 7 days
pub const REFRESH_TOKEN_DURATION_SECS: u64 = 7 * 24 * 60 * 60;

/// Clock source for issuance and expiry checks.
///
/// System time plus an offset. The offset is zero in production; tests call
/// [`Clock::advance`] to simulate the passage of time without sleeping.
#[derive(Clone, Default)]
pub struct Clock {
    offset_secs: Arc<AtomicI64>,
}

impl Clock {
    pub fn system() -> Self {
        Self::default()
    }

    /// Current Unix timestamp in seconds.
    pub fn now(&self) -> u64 {
        let real = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64;
        real.saturating_add(self.offset_secs.load(Ordering::Relaxed))
            .max(0) as u64
    }

    /// Shift the clock forward by `secs`. All handles cloned from this clock
    /// observe the shift.
    pub fn advance(&self, secs: u64) {
        self.offset_secs.fetch_add(secs as i64, Ordering::Relaxed);
    }
}

/// Outcome of inspecting a presented token.
#[derive(Debug, Clone)]
pub enum TokenStatus<C> {
    /// Signature valid, correct type, not expired.
    Usable(C),
    /// Signature valid, correct type, but past expiry. Decides renewal
    /// eligibility: an expired access token falls through to the refresh path.
    Expired,
    /// Not decodable, signature mismatch, or wrong token type.
    Malformed,
}

impl<C> TokenStatus<C> {
    pub fn is_usable(&self) -> bool {
        matches!(self, TokenStatus::Usable(_))
    }
}

/// Result of generating a token.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// The JWT token string
    pub token: String,
    /// Issued at timestamp (Unix seconds)
    pub issued_at: u64,
    /// Expiration timestamp (Unix seconds)
    pub expires_at: u64,
    /// Token duration in seconds
    pub duration: u64,
}

/// Configuration for JWT operations. The signing key is set once at startup
/// and never mutated.
#[derive(Clone)]
pub struct JwtConfig {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    clock: Clock,
}

impl JwtConfig {
    /// Create a new JWT configuration with the given secret and system time.
    pub fn new(secret: &[u8]) -> Self {
        Self::with_clock(secret, Clock::system())
    }

    /// Create a configuration with an explicit clock source.
    pub fn with_clock(secret: &[u8], clock: Clock) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            clock,
        }
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    /// Generate an access token for a member.
    pub fn issue_access_token(
        &self,
        email: &str,
        nickname: &str,
    ) -> Result<IssuedToken, JwtError> {
        let now = self.clock.now();
        let exp = now + ACCESS_TOKEN_DURATION_SECS;

        let claims = AccessClaims {
            sub: email.to_string(),
            nickname: nickname.to_string(),
            token_type: TokenType::Access,
            iat: now,
            exp,
        };

        let token = jsonwebtoken::encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(JwtError::Encoding)?;

        Ok(IssuedToken {
            token,
            issued_at: now,
            expires_at: exp,
            duration: ACCESS_TOKEN_DURATION_SECS,
        })
    }

    /// Generate a refresh token for a member.
    pub fn issue_refresh_token(&self, email: &str) -> Result<IssuedToken, JwtError> {
        let now = self.clock.now();
        let exp = now + REFRESH_TOKEN_DURATION_SECS;

        let claims = RefreshClaims {
            sub: email.to_string(),
            token_type: TokenType::Refresh,
            iat: now,
            exp,
        };

        let token = jsonwebtoken::encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(JwtError::Encoding)?;

        Ok(IssuedToken {
            token,
            issued_at: now,
            expires_at: exp,
            duration: REFRESH_TOKEN_DURATION_SECS,
        })
    }

    /// Inspect a presented access token. Never fails; garbage input is
    /// `Malformed`, a signature-valid token past its expiry is `Expired`.
    pub fn inspect_access_token(&self, token: &str) -> TokenStatus<AccessClaims> {
        match self.decode::<AccessClaims>(token) {
            Some(claims) if claims.token_type == TokenType::Access => {
                if claims.exp > self.clock.now() {
                    TokenStatus::Usable(claims)
                } else {
                    TokenStatus::Expired
                }
            }
            _ => TokenStatus::Malformed,
        }
    }

    /// Inspect a presented refresh token.
    pub fn inspect_refresh_token(&self, token: &str) -> TokenStatus<RefreshClaims> {
        match self.decode::<RefreshClaims>(token) {
            Some(claims) if claims.token_type == TokenType::Refresh => {
                if claims.exp > self.clock.now() {
                    TokenStatus::Usable(claims)
                } else {
                    TokenStatus::Expired
                }
            }
            _ => TokenStatus::Malformed,
        }
    }

    /// Decode and signature-check a token without the library's expiry
    /// validation; callers compare expiry against our own clock.
    fn decode<C: serde::de::DeserializeOwned>(&self, token: &str) -> Option<C> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = false;

        jsonwebtoken::decode::<C>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .ok()
    }
}

/// Errors that can occur during JWT operations.
#[derive(Debug)]
pub enum JwtError {
    /// Error encoding the token
    Encoding(jsonwebtoken::errors::Error),
}

impl std::fmt::Display for JwtError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JwtError::Encoding(e) => write!(f, "Failed to encode token: {}", e),
        }
    }
}

impl std::error::Error for JwtError {}
