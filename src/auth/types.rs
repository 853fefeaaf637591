//! Authenticated identity types.

/// The principal established for one request: derived from a verified
/// credential's claims, held in the request context for the duration of
/// downstream handling, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthMember {
    /// Member email (token subject)
    pub email: String,
    /// Member display name
    pub nickname: String,
}
