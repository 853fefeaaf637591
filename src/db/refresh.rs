//! Refresh token storage: one active value per member.
//!
//! Issuing a new refresh token overwrites the previous row, so a superseded
//! value can never renew again even before its own expiry. Access tokens are
//! stateless and never stored.

use sqlx::sqlite::SqlitePool;

/// Store for the single active refresh token per member.
pub struct RefreshTokenStore {
    pool: SqlitePool,
}

impl RefreshTokenStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Record the active refresh token for a member, replacing any prior
    /// value. Used at login issuance.
    pub async fn record(
        &self,
        email: &str,
        token: &str,
        issued_at: u64,
        expires_at: u64,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO refresh_tokens (email, token, issued_at, expires_at, updated_at)
             VALUES (?, ?, ?, ?, datetime('now'))
             ON CONFLICT(email) DO UPDATE SET
                 token = excluded.token,
                 issued_at = excluded.issued_at,
                 expires_at = excluded.expires_at,
                 updated_at = excluded.updated_at",
        )
        .bind(email)
        .bind(token)
        .bind(issued_at as i64)
        .bind(expires_at as i64)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Atomically validate a presented refresh token and replace it with a new
    /// one. Returns false if the presented value is not the currently stored
    /// value for this member (replayed, superseded, or never issued).
    ///
    /// The compare-and-swap runs as a single UPDATE so concurrent renewals
    /// presenting the same stale value cannot both succeed: the loser's WHERE
    /// clause matches zero rows.
    pub async fn rotate(
        &self,
        email: &str,
        presented: &str,
        new_token: &str,
        issued_at: u64,
        expires_at: u64,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE refresh_tokens
             SET token = ?, issued_at = ?, expires_at = ?, updated_at = datetime('now')
             WHERE email = ? AND token = ?",
        )
        .bind(new_token)
        .bind(issued_at as i64)
        .bind(expires_at as i64)
        .bind(email)
        .bind(presented)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Get the currently stored refresh token value for a member.
    pub async fn get(&self, email: &str) -> Result<Option<String>, sqlx::Error> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT token FROM refresh_tokens WHERE email = ?")
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(|(token,)| token))
    }

    /// Delete the stored refresh token for a member (logout).
    pub async fn clear(&self, email: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE email = ?")
            .bind(email)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete all refresh tokens whose own expiry has passed.
    pub async fn delete_expired(&self, now: u64) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE expires_at <= ?")
            .bind(now as i64)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
