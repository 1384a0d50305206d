//! Repository for the `oauth_states` table.

use sqlx::PgPool;

/// Minutes an authorization-flow state stays redeemable.
const STATE_EXPIRY_MINS: i32 = 10;

/// Stores and consumes short-lived CSRF state for the OAuth login flow.
pub struct OauthStateRepo;

impl OauthStateRepo {
    /// Persist a CSRF state and its PKCE verifier with a 10-minute expiry.
    pub async fn create(
        pool: &PgPool,
        state: &str,
        pkce_verifier: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO oauth_states (state, pkce_verifier, expires_at)
             VALUES ($1, $2, NOW() + make_interval(mins => $3))",
        )
        .bind(state)
        .bind(pkce_verifier)
        .bind(STATE_EXPIRY_MINS)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Atomically consume a state row, returning its PKCE verifier.
    ///
    /// The delete-returning form validates existence and expiry in one query,
    /// so a state can be redeemed at most once. Returns `None` for unknown or
    /// expired states.
    pub async fn consume(pool: &PgPool, state: &str) -> Result<Option<String>, sqlx::Error> {
        let row: Option<(String,)> = sqlx::query_as(
            "DELETE FROM oauth_states
             WHERE state = $1 AND expires_at > NOW()
             RETURNING pkce_verifier",
        )
        .bind(state)
        .fetch_optional(pool)
        .await?;
        Ok(row.map(|(verifier,)| verifier))
    }
}
