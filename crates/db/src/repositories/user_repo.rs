//! Repository for the `users` table.

use notable_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::user::{CreateUser, User};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, email, name, dob, is_oauth, otp, otp_expiry, created_at, updated_at";

/// Provides CRUD and OTP state operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (email, name, dob, is_oauth)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.email)
            .bind(&input.name)
            .bind(input.dob)
            .bind(input.is_oauth)
            .fetch_one(pool)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by email (case-sensitive, matching the stored value).
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Store a fresh one-time code and its expiry on the user row.
    ///
    /// Concurrent issuance is last-write-wins: a newer code replaces an
    /// in-flight one.
    pub async fn set_otp(
        pool: &PgPool,
        id: DbId,
        otp: &str,
        expires_at: Timestamp,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE users SET otp = $2, otp_expiry = $3, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(otp)
        .bind(expires_at)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Atomically verify and clear a one-time code.
    ///
    /// The compare-and-clear is a single conditional UPDATE, so a code can be
    /// consumed at most once even under concurrent verification attempts.
    /// Returns the user row on success, `None` when the email is unknown, the
    /// code doesn't match, no expiry is stored, or the expiry has passed.
    pub async fn consume_otp(
        pool: &PgPool,
        email: &str,
        otp: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET otp = NULL, otp_expiry = NULL, updated_at = NOW()
             WHERE email = $1
               AND otp = $2
               AND otp_expiry IS NOT NULL
               AND otp_expiry > NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .bind(otp)
            .fetch_optional(pool)
            .await
    }
}
